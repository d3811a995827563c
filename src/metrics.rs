//! Character advance widths.
//!
//! Layout only ever asks a font two questions: how wide is a character, and
//! how far does the font reach above and below the baseline. Anything that can
//! answer them implements [`FontMetrics`].

/// Code point of the soft hyphen
pub const SOFT_HYPHEN: u32 = 0xAD;
/// Code point of the no-break space
pub const NO_BREAK_SPACE: u32 = 0xA0;
/// Width used when a font knows nothing about a character, in 1/1000 em
pub const FALLBACK_WIDTH: f64 = 600.0;

/// Per-font glyph metrics, in glyph space units (1/1000 of the font size)
pub trait FontMetrics {
    /// Advance width of a character, if the font has a width for it
    fn char_width(&self, code: u32) -> Option<f64>;

    /// Width used for characters the font has no width for
    fn default_width(&self) -> Option<f64> {
        None
    }

    /// Ascent (positive) and descent (negative) above and below the baseline
    fn ascent_descent(&self) -> (f64, f64);

    /// Thickness of the underline stroke
    fn underline_thickness(&self) -> f64 {
        50.0
    }

    /// Whether text is drawn with two-byte glyph codes instead of single-byte codes
    fn is_unicode(&self) -> bool;

    /// Append the encoded form of a character to `out`
    fn encode(&self, code: u32, out: &mut Vec<u8>);
}

/// Width of a character at size 1000, without spacing or stretching
pub fn raw_char_width(font: &dyn FontMetrics, code: u32) -> f64 {
    if code == SOFT_HYPHEN {
        return 0.0;
    }
    font.char_width(code)
        .or_else(|| font.default_width())
        .or_else(|| font.char_width(32))
        .unwrap_or(FALLBACK_WIDTH)
}

/// A font at a given size, with the current stretching and spacing applied
#[derive(Clone, Copy)]
pub struct TextMetrics<'a> {
    pub font: &'a dyn FontMetrics,
    /// font size in user units
    pub size: f64,
    /// horizontal scaling, in percent
    pub stretching: f64,
    /// extra character spacing, in user units
    pub spacing: f64,
}

impl<'a> TextMetrics<'a> {
    pub fn new(font: &'a dyn FontMetrics, size: f64) -> TextMetrics<'a> {
        TextMetrics {
            font,
            size,
            stretching: 100.0,
            spacing: 0.0,
        }
    }

    /// Advance of one character. Positive spacing is only added when another
    /// character follows.
    pub fn char_width(&self, code: u32, not_last: bool) -> f64 {
        let mut w = raw_char_width(self.font, code) * self.size / 1000.0;
        if self.spacing < 0.0 || (self.spacing > 0.0 && not_last) {
            w += self.spacing;
        }
        w * self.stretching / 100.0
    }

    pub fn string_width(&self, codes: &[u32]) -> f64 {
        self.run(codes).width()
    }

    /// Measure every character of `codes`
    pub fn run(&self, codes: &[u32]) -> GlyphRun {
        let n = codes.len();
        GlyphRun {
            glyphs: codes
                .iter()
                .enumerate()
                .map(|(i, &c)| (c, self.char_width(c, i + 1 < n)))
                .collect(),
        }
    }

    /// The widest advance in the font's default glyph range
    pub fn max_char_width(&self, codes: &[u32]) -> f64 {
        codes
            .iter()
            .map(|&c| self.char_width(c, false))
            .fold(0.0, f64::max)
    }
}

/// An ordered run of characters and their advance widths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    pub glyphs: Vec<(u32, f64)>,
}

impl GlyphRun {
    pub fn width(&self) -> f64 {
        self.glyphs.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn code(&self, i: usize) -> Option<u32> {
        self.glyphs.get(i).map(|(c, _)| *c)
    }

    pub fn advance(&self, i: usize) -> f64 {
        self.glyphs.get(i).map(|(_, w)| *w).unwrap_or(0.0)
    }
}

/// Decode a string into code points, the unit every layout routine works in
pub fn codes_of(text: &str) -> Vec<u32> {
    text.chars().map(u32::from).collect()
}

/// Re-assemble code points into a string
pub fn string_of(codes: &[u32]) -> String {
    codes
        .iter()
        .map(|&c| char::from_u32(c).unwrap_or('\u{FFFD}'))
        .collect()
}
