/// Four lengths around a box, in user units. Used for page margins as well as
/// for the padding (inside the border) and margins (outside the border) of cells.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Space between a cell's border and its text
pub type CellPadding = Margins;
/// Space around a cell's border
pub type CellMargin = Margins;

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: f64, right: f64, bottom: f64, left: f64) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all(value: f64) -> Margins {
        Margins::trbl(value, value, value, value)
    }

    /// Create margins with one value for top and bottom and another for left and right
    pub fn symmetric(vertical: f64, horizontal: f64) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::default()
    }

    /// The same margins with left and right exchanged, as used on facing
    /// pages of a booklet
    pub fn mirrored(&self) -> Margins {
        Margins {
            left: self.right,
            right: self.left,
            ..*self
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirroring_swaps_left_and_right_only() {
        let m = Margins::trbl(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.mirrored(), Margins::trbl(1.0, 4.0, 3.0, 2.0));
        assert_eq!(m.horizontal(), 6.0);
        assert_eq!(m.vertical(), 4.0);
    }
}
