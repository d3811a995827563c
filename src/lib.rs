mod bidi;
pub use bidi::*;

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod content;
pub use content::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

/// Cells, word wrapping, paragraph flow and page breaks
pub mod layout;

mod metrics;
pub use metrics::*;

mod page;
pub use page::*;

/// Standard page sizes
pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
