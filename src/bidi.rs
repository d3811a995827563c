//! Logical to visual reordering of bidirectional text.

use crate::metrics::{codes_of, string_of};
use unicode_bidi::{BidiInfo, Level};

/// Base writing direction of a paragraph
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Converts a line of characters from logical (typed) order to display order
pub trait BidiReorder {
    /// Reorder `codes` for display. With `base` set, that paragraph direction
    /// is forced, otherwise it is detected from the text.
    fn reorder(&self, codes: &[u32], base: Option<Direction>) -> Vec<u32>;

    /// Whether the text contains any right-to-left characters
    fn has_rtl(&self, codes: &[u32]) -> bool;
}

/// Reordering with the Unicode Bidirectional Algorithm
#[derive(Debug, Default, Copy, Clone)]
pub struct UnicodeBidi;

impl BidiReorder for UnicodeBidi {
    fn reorder(&self, codes: &[u32], base: Option<Direction>) -> Vec<u32> {
        if codes.is_empty() {
            return Vec::new();
        }
        let text = string_of(codes);
        let level = base.map(|d| match d {
            Direction::LeftToRight => Level::ltr(),
            Direction::RightToLeft => Level::rtl(),
        });
        let info = BidiInfo::new(&text, level);
        if !info.has_rtl() && base != Some(Direction::RightToLeft) {
            return codes.to_vec();
        }

        let mut out = String::with_capacity(text.len());
        for para in info.paragraphs.iter() {
            let line = para.range.clone();
            out.push_str(&info.reorder_line(para, line));
        }
        codes_of(&out)
    }

    fn has_rtl(&self, codes: &[u32]) -> bool {
        let text = string_of(codes);
        BidiInfo::new(&text, None).has_rtl()
    }
}

/// Leaves text in logical order
#[derive(Debug, Default, Copy, Clone)]
pub struct NoReorder;

impl BidiReorder for NoReorder {
    fn reorder(&self, codes: &[u32], _base: Option<Direction>) -> Vec<u32> {
        codes.to_vec()
    }

    fn has_rtl(&self, _codes: &[u32]) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_is_untouched() {
        let codes = codes_of("hello world");
        assert_eq!(UnicodeBidi.reorder(&codes, None), codes);
        assert!(!UnicodeBidi.has_rtl(&codes));
    }

    #[test]
    fn hebrew_is_reversed_for_display() {
        let codes = codes_of("\u{5d0}\u{5d1}\u{5d2}");
        assert!(UnicodeBidi.has_rtl(&codes));
        assert_eq!(
            UnicodeBidi.reorder(&codes, None),
            codes_of("\u{5d2}\u{5d1}\u{5d0}")
        );
    }

    #[test]
    fn forced_rtl_base_moves_latin_runs() {
        let codes = codes_of("abc \u{5d0}\u{5d1}");
        let shown = string_of(&UnicodeBidi.reorder(&codes, Some(Direction::RightToLeft)));
        assert_eq!(shown, "\u{5d1}\u{5d0} abc");
    }
}
