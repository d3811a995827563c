use crate::{
    pagesize::{Orientation, PageSize, A4},
    units::*,
};

/// Settings a [`Document`](crate::Document) starts out with. Lengths are
/// typed so they don't depend on the chosen user unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    /// The unit all layout calls are made in
    pub unit: Unit,
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin_left: Pt,
    pub margin_top: Pt,
    pub margin_right: Pt,
    /// Distance from the bottom edge at which pages break
    pub break_margin: Pt,
    pub auto_page_break: bool,
    /// Distance of the header from the top edge
    pub header_margin: Pt,
    /// Distance of the footer from the bottom edge
    pub footer_margin: Pt,
    /// Default left and right cell padding
    pub cell_padding: Pt,
    /// Line height as a multiple of the font size
    pub cell_height_ratio: f64,
    pub line_width: Pt,
    /// Swap left and right margins on every new page
    pub booklet: bool,
    /// Lay out right-to-left
    pub rtl: bool,
    /// Leave borders open where a box is split by a page or column break
    pub open_cells: bool,
    /// Deflate page content streams
    pub compress: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let margin = Pt(28.35);
        DocumentConfig {
            unit: Unit::Millimeter,
            page_size: A4,
            orientation: Orientation::Portrait,
            margin_left: margin,
            margin_top: margin,
            margin_right: margin,
            break_margin: margin * 2.0,
            auto_page_break: true,
            header_margin: Mm(10.0).into(),
            footer_margin: Mm(10.0).into(),
            cell_padding: margin / 10.0,
            cell_height_ratio: 1.25,
            line_width: Pt(0.57),
            booklet: false,
            rtl: false,
            open_cells: true,
            compress: true,
        }
    }
}

impl DocumentConfig {
    pub fn new() -> DocumentConfig {
        DocumentConfig::default()
    }

    pub fn unit(&mut self, unit: Unit) -> &mut Self {
        self.unit = unit;
        self
    }

    pub fn page_size(&mut self, size: PageSize, orientation: Orientation) -> &mut Self {
        self.page_size = size;
        self.orientation = orientation;
        self
    }

    /// Set the left, top and right page margins
    pub fn margins<L: Into<Pt>, T: Into<Pt>, R: Into<Pt>>(&mut self, left: L, top: T, right: R) -> &mut Self {
        self.margin_left = left.into();
        self.margin_top = top.into();
        self.margin_right = right.into();
        self
    }

    pub fn auto_page_break<P: Into<Pt>>(&mut self, enabled: bool, margin: P) -> &mut Self {
        self.auto_page_break = enabled;
        self.break_margin = margin.into();
        self
    }

    pub fn header_footer_margins<H: Into<Pt>, F: Into<Pt>>(&mut self, header: H, footer: F) -> &mut Self {
        self.header_margin = header.into();
        self.footer_margin = footer.into();
        self
    }

    pub fn cell_padding<P: Into<Pt>>(&mut self, padding: P) -> &mut Self {
        self.cell_padding = padding.into();
        self
    }

    pub fn cell_height_ratio(&mut self, ratio: f64) -> &mut Self {
        self.cell_height_ratio = ratio;
        self
    }

    pub fn line_width<P: Into<Pt>>(&mut self, width: P) -> &mut Self {
        self.line_width = width.into();
        self
    }

    pub fn booklet(&mut self, booklet: bool) -> &mut Self {
        self.booklet = booklet;
        self
    }

    pub fn rtl(&mut self, rtl: bool) -> &mut Self {
        self.rtl = rtl;
        self
    }

    pub fn open_cells(&mut self, open: bool) -> &mut Self {
        self.open_cells = open;
        self
    }

    pub fn compress(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }
}
