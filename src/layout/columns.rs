/// Size and top of one column
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColumnBounds {
    /// width of the column
    pub width: f64,
    /// space to the next column
    pub space: f64,
    /// where the column starts on the page the columns were set up on
    pub y: f64,
}

/// Column setup of the page body
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnLayout {
    pub columns: Vec<ColumnBounds>,
    pub current: usize,
    /// page the columns were set up on; only there do columns start below the top margin
    pub start_page: usize,
}

impl ColumnLayout {
    /// Divide the width between the original margins into `count` columns of
    /// `width` (0 or too wide = widest possible), starting at `y`
    pub fn equal(count: usize, width: f64, y: f64, available: f64, start_page: usize) -> ColumnLayout {
        if count < 2 {
            return ColumnLayout {
                start_page,
                ..Default::default()
            };
        }
        let max_width = available / count as f64;
        let width = if width <= 0.0 || width > max_width {
            max_width
        } else {
            width
        };
        let space = (available - count as f64 * width) / (count - 1) as f64;
        ColumnLayout {
            columns: vec![ColumnBounds { width, space, y }; count],
            current: 0,
            start_page,
        }
    }

    /// Number of columns, at least one
    pub fn count(&self) -> usize {
        self.columns.len().max(1)
    }

    pub fn is_multi(&self) -> bool {
        self.columns.len() > 1
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.count()
    }

    pub fn bounds(&self, column: usize) -> Option<&ColumnBounds> {
        self.columns.get(column)
    }

    /// Distance from the start edge of column 0 to the start edge of `column`
    pub fn offset(&self, column: usize) -> f64 {
        self.columns
            .iter()
            .take(column)
            .map(|c| c.width + c.space)
            .sum()
    }
}
