//! Page formats and orientation.
//!
//! Sizes are given in portrait orientation (width ≤ height), in points.
//! [`Orientation`] decides which way round a page is laid out.
//!
//! ```
//! use pdf_flow::pagesize::{Orientation, A4};
//!
//! let (w, h) = Orientation::Landscape.apply(A4);
//! assert!(w > h);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// Which side of the page is the long one
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Turn a page size into this orientation
    pub fn apply(self, size: PageSize) -> PageSize {
        let (short, long) = if size.0 <= size.1 {
            (size.0, size.1)
        } else {
            (size.1, size.0)
        };
        match self {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_swaps_sides() {
        assert_eq!(Orientation::Portrait.apply(LETTER), LETTER);
        assert_eq!(Orientation::Landscape.apply(LETTER), (LETTER.1, LETTER.0));
        assert_eq!(Orientation::Portrait.apply((LETTER.1, LETTER.0)), LETTER);
    }
}
