use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("page is missing from the document")]
    /// A page referenced while writing does not exist
    PageMissing,

    #[error("page {page} does not exist, the document has {count} page(s)")]
    /// A page number outside `1..=count` was requested
    InvalidPage { page: usize, count: usize },

    #[error("unknown unit of measure `{0}`")]
    /// The unit of measure could not be recognised
    UnitFormat(String),

    #[error("the available width ({available:.3}) is narrower than a single character ({required:.3})")]
    /// Not even one glyph fits in the column or cell
    ColumnTooNarrow { available: f64, required: f64 },

    #[error("`{operation}` needs a font, but none has been selected")]
    /// Text was measured or drawn before [set_font](crate::Document::set_font)
    NoFontSelected { operation: &'static str },

    #[error("font {0} is not registered with the document")]
    /// A font id that doesn't belong to this document
    UnknownFont(usize),

    #[error("`{operation}` needs an open page")]
    /// Content was produced before the first page was added
    NoPage { operation: &'static str },

    #[error("the document was aborted by an earlier error")]
    /// A previous fatal error discarded the in-progress document
    Aborted,
}
