//! Pages, columns, and the decision to move to the next of either.

use super::state::{Checkpoint, Region, StateGuard};
use crate::{
    content::{fmt_num, ContentSink},
    layout::{ColumnLayout, Margins},
    page::Page,
    Document, PDFError,
};

/// Callbacks run while pages are produced. Header and footer drawing starts
/// from the default graphic state with zero cell padding and the page's
/// original margins, and whatever it changes is undone afterwards.
pub trait PageHooks {
    /// Draw the page header, with the cursor at the header margin
    fn header(&mut self, _doc: &mut Document) -> Result<(), PDFError> {
        Ok(())
    }

    /// Draw the page footer, with the cursor at the footer margin
    fn footer(&mut self, _doc: &mut Document) -> Result<(), PDFError> {
        Ok(())
    }

    /// Whether content that doesn't fit may move to the next column or page
    fn accept_page_break(&mut self, doc: &Document) -> bool {
        let ctx = doc.context();
        ctx.page.auto_page_break || (ctx.gs.columns.is_multi() && !ctx.gs.columns.is_last())
    }
}

/// No header, no footer, default break rules
#[derive(Debug, Default, Copy, Clone)]
pub struct NoHooks;

impl PageHooks for NoHooks {}

impl Document {
    /// Add a page after the last one and move the cursor to its top. If
    /// pages after the current one exist already, move to the next one instead.
    pub fn add_page(&mut self) -> Result<(), PDFError> {
        self.run(|doc| doc.add_page_impl())
    }

    pub(crate) fn add_page_impl(&mut self) -> Result<(), PDFError> {
        self.end_page()?;
        self.start_page()
    }

    /// Close the last page, drawing its footer
    pub(crate) fn end_page(&mut self) -> Result<(), PDFError> {
        if self.page == 0 || self.pages.len() > self.page || !self.page_open {
            return Ok(());
        }
        self.run_footer()?;
        self.page_open = false;
        log::trace!("closed page {}", self.page);
        Ok(())
    }

    fn start_page(&mut self) -> Result<(), PDFError> {
        if self.pages.len() > self.page {
            self.set_page_impl(self.page + 1, false)?;
            let top = self.ctx.page.margins.top;
            self.set_y(top, true);
            return Ok(());
        }

        if self.config.booklet {
            self.swap_margins();
        }
        let saved = self.ctx.gs.clone();

        self.pages.push(Page::new(self.ctx.page.clone()));
        self.page = self.pages.len();
        self.page_open = true;
        log::debug!("started page {}", self.page);

        self.ctx.gs = saved.clone();
        self.emit_graphic_state();
        self.set_page_mark();
        self.run_header()?;
        self.ctx.gs = saved;
        self.set_page_mark();
        Ok(())
    }

    /// Exchange the original left and right margins, moving the current
    /// margins by the same amount
    fn swap_margins(&mut self) {
        let margins = &mut self.ctx.page.margins;
        std::mem::swap(&mut margins.left, &mut margins.right);
        let delta = margins.left - margins.right;
        self.ctx.gs.left_margin += delta;
        self.ctx.gs.right_margin -= delta;
    }

    /// Select the font, line style and colours again at the start of a page
    fn emit_graphic_state(&mut self) {
        let k = self.ctx.k;
        let mut ops = vec![
            self.ctx.gs.line_style.operators(k),
            self.ctx.gs.fill_colour.fill_operator(),
        ];
        if let Some(font) = self.ctx.gs.font {
            ops.push(format!(
                "BT /F{} {} Tf ET",
                font.id.index() + 1,
                fmt_num(font.size_pt)
            ));
        }
        self.out(&ops.join("\n"));
    }

    fn run_header(&mut self) -> Result<(), PDFError> {
        let original = self.ctx.page.margins;
        let rtl = self.ctx.gs.rtl;
        let last_h = self.ctx.cursor.last_h;

        if let Some(mut hooks) = self.hooks.take() {
            let result = {
                let checkpoint = Checkpoint::Graphics(Box::new(self.ctx.gs.clone()), last_h);
                let mut doc = StateGuard::new(self, checkpoint);
                doc.enter_region(Region::Header, original, rtl)?;
                let x = if rtl { original.right } else { original.left };
                let y = doc.ctx.header_margin;
                doc.set_xy(x, y);
                let result = hooks.header(&mut doc);
                doc.out("Q");
                doc.ctx.region = Region::Body;
                result
            };
            self.hooks = Some(hooks);
            result?;
        }

        let x = if rtl { original.right } else { original.left };
        let y = self.ctx.page.margins.top;
        self.set_xy(x, y);
        self.ctx.cursor.last_h = last_h;
        Ok(())
    }

    fn run_footer(&mut self) -> Result<(), PDFError> {
        let original = self.ctx.page.margins;
        let rtl = self.ctx.gs.rtl;
        let checkpoint = Checkpoint::Graphics(Box::new(self.ctx.gs.clone()), self.ctx.cursor.last_h);
        let cursor = self.ctx.cursor;

        if let Some(page) = self.current_page_mut() {
            page.footer_mark = Some(page.mark());
        }
        self.out("");

        let Some(mut hooks) = self.hooks.take() else {
            return Ok(());
        };
        let result = {
            let mut doc = StateGuard::new(self, checkpoint);
            doc.enter_region(Region::Footer, original, rtl)?;
            let x = if rtl { original.right } else { original.left };
            let y = doc.ctx.page.height - doc.ctx.footer_margin;
            doc.set_xy(x, y);
            let result = hooks.footer(&mut doc);
            doc.out("Q");
            doc.ctx.region = Region::Body;
            result
        };
        self.hooks = Some(hooks);
        self.ctx.cursor.x = cursor.x;
        self.ctx.cursor.y = cursor.y;
        result
    }

    /// Reset the graphic state for a header or footer
    fn enter_region(&mut self, region: Region, original: Margins, rtl: bool) -> Result<(), PDFError> {
        let font = self.ctx.gs.font;
        self.ctx.region = region;
        self.ctx.gs = self.default_gs.clone();
        self.ctx.gs.font = font;
        self.ctx.gs.rtl = rtl;
        self.ctx.gs.columns = ColumnLayout::default();
        self.out("q");
        self.ctx.gs.left_margin = original.left;
        self.ctx.gs.right_margin = original.right;
        self.ctx.gs.cell_padding = Margins::empty();
        let font = match region {
            Region::Header => self.header_font,
            Region::Footer => self.footer_font,
            Region::Body => None,
        };
        if let Some((id, size)) = font {
            self.set_font_impl(id, size)?;
        }
        Ok(())
    }

    /// Content appended from now on paints over borders and fills added
    /// later by paragraph boxes
    pub fn set_page_mark(&mut self) {
        if let Some(page) = self.current_page_mut() {
            page.set_body_mark();
        }
    }

    /// Make page `n` (1-based) the current page. With `reset_margins` the
    /// margins go back to the page's original margins and the cursor to its top.
    pub fn set_page(&mut self, n: usize, reset_margins: bool) -> Result<(), PDFError> {
        self.run(|doc| doc.set_page_impl(n, reset_margins))
    }

    pub(crate) fn set_page_impl(&mut self, n: usize, reset_margins: bool) -> Result<(), PDFError> {
        if n == 0 || n > self.pages.len() {
            return Err(PDFError::InvalidPage {
                page: n,
                count: self.pages.len(),
            });
        }
        let old_left = self.ctx.page.margins.left;
        self.page = n;
        self.ctx.page = self.pages[n - 1].geometry.clone();
        let margins = self.ctx.page.margins;
        if reset_margins {
            self.ctx.gs.left_margin = margins.left;
            self.ctx.gs.right_margin = margins.right;
            self.set_y(margins.top, true);
        } else if margins.left != old_left {
            let delta = margins.left - margins.right;
            self.ctx.gs.left_margin += delta;
            self.ctx.gs.right_margin -= delta;
        }
        Ok(())
    }

    /// Make the last page the current page
    pub fn last_page(&mut self, reset_margins: bool) -> Result<(), PDFError> {
        let n = self.pages.len();
        self.set_page(n, reset_margins)
    }

    /// The current page number, 0 before the first page
    pub fn page_no(&self) -> usize {
        self.page
    }

    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    /// Whether a block of height `h` at `y` (the cursor by default) would
    /// cross the break trigger where breaks are allowed
    pub fn would_break(&self, h: f64, y: Option<f64>) -> bool {
        let y = y.unwrap_or(self.ctx.cursor.y);
        y + h > self.ctx.break_trigger() && self.ctx.in_body()
    }

    /// Move to the next column or page when a block of height `h` at `y`
    /// doesn't fit above the bottom margin. Returns whether the cursor moved
    /// to a new column or page.
    pub fn check_page_break(&mut self, h: f64, y: Option<f64>) -> Result<bool, PDFError> {
        self.run(|doc| doc.page_break_impl(h, y))
    }

    pub(crate) fn page_break_impl(&mut self, h: f64, y: Option<f64>) -> Result<bool, PDFError> {
        if !self.would_break(h, y) || !self.accept_page_break() {
            return Ok(false);
        }

        let columns = &self.ctx.gs.columns;
        if columns.is_multi() {
            if !columns.is_last() {
                let next = columns.current + 1;
                log::debug!("column break to column {next} on page {}", self.page);
                self.select_column_impl(next);
                return Ok(true);
            }
            if !self.ctx.page.auto_page_break {
                return Ok(false);
            }
            log::debug!("page break after the last column of page {}", self.page);
            self.add_page_impl()?;
            self.select_column_impl(0);
            return Ok(true);
        }

        let x = self.ctx.cursor.x;
        let old = self.ctx.page.margins;
        log::debug!("page break after page {}", self.page);
        self.add_page_impl()?;
        let new = self.ctx.page.margins;
        self.ctx.cursor.y = new.top;
        self.ctx.cursor.x = if self.ctx.gs.rtl {
            x - (new.right - old.right)
        } else {
            x + (new.left - old.left)
        };
        Ok(true)
    }

    fn accept_page_break(&mut self) -> bool {
        match self.hooks.take() {
            Some(mut hooks) => {
                let accepted = hooks.accept_page_break(self);
                self.hooks = Some(hooks);
                accepted
            }
            None => NoHooks.accept_page_break(self),
        }
    }

    /// Split the page body into `count` columns of `width` (0 for the widest
    /// possible), starting at `y` (the cursor by default). Fewer than two
    /// columns switch column mode off.
    pub fn set_equal_columns(&mut self, count: usize, width: f64, y: Option<f64>) {
        let margins = self.ctx.page.margins;
        let available = self.ctx.page.width - margins.left - margins.right;
        let y = y.unwrap_or(self.ctx.cursor.y);
        self.ctx.gs.columns = ColumnLayout::equal(count, width, y, available, self.page);
        self.select_column_impl(0);
    }

    /// Leave column mode, restoring the original margins
    pub fn reset_columns(&mut self) {
        self.ctx.gs.left_margin = self.ctx.page.margins.left;
        self.ctx.gs.right_margin = self.ctx.page.margins.right;
        self.set_equal_columns(0, 0.0, None);
    }

    /// Move to column `col`; out of range selects the first column
    pub fn select_column(&mut self, col: usize) {
        self.select_column_impl(col);
    }

    pub fn current_column(&self) -> usize {
        self.ctx.gs.columns.current
    }

    pub(crate) fn select_column_impl(&mut self, col: usize) {
        let columns = &self.ctx.gs.columns;
        if !columns.is_multi() {
            return;
        }
        let col = if col >= columns.count() { 0 } else { col };
        let Some(bounds) = columns.bounds(col).copied() else {
            return;
        };
        if col != columns.current {
            self.ctx.cursor.y = self.column_top(bounds.y);
        }
        let x = self.column_start_x(col);
        let w = self.ctx.page.width;
        if self.ctx.gs.rtl {
            self.ctx.gs.right_margin = w - x;
            self.ctx.gs.left_margin = x - bounds.width;
        } else {
            self.ctx.gs.left_margin = x;
            self.ctx.gs.right_margin = w - x - bounds.width;
        }
        self.ctx.gs.columns.current = col;
        self.ctx.cursor.x = x;
    }

    /// The x coordinate lines of column `col` start at
    pub(crate) fn column_start_x(&self, col: usize) -> f64 {
        let offset = self.ctx.gs.columns.offset(col);
        let margins = self.ctx.page.margins;
        if self.ctx.gs.rtl {
            self.ctx.page.width - margins.right - offset
        } else {
            margins.left + offset
        }
    }

    /// Top of a column on the current page: its start on the page the
    /// columns were set up on, the top margin on later pages
    pub(crate) fn column_top(&self, column_y: f64) -> f64 {
        if self.page == self.ctx.gs.columns.start_page {
            column_y
        } else {
            self.ctx.page.margins.top
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layout::{CellOptions, LineAdvance},
        units::Unit,
        CoreFont, DocumentConfig,
    };
    use std::{cell::RefCell, rc::Rc};

    fn doc() -> Document {
        let mut config = DocumentConfig::new();
        config
            .unit(Unit::Point)
            .page_size((crate::Pt(200.0), crate::Pt(300.0)), Default::default())
            .margins(crate::Pt(10.0), crate::Pt(10.0), crate::Pt(10.0))
            .auto_page_break(true, crate::Pt(20.0));
        let mut doc = Document::new(config);
        let font = doc.add_font(CoreFont::courier().into());
        doc.set_font(font, 10.0).unwrap();
        doc.add_page().unwrap();
        doc
    }

    #[test]
    fn breaks_only_past_the_trigger() {
        let mut doc = doc();
        // trigger is at 280
        doc.set_y(270.0, false);
        assert!(!doc.check_page_break(10.0, None).unwrap());
        assert_eq!(doc.num_pages(), 1);
        assert!(doc.check_page_break(10.0 + 1e-6, None).unwrap());
        assert_eq!(doc.num_pages(), 2);
        assert_eq!(doc.page_no(), 2);
        assert_eq!(doc.get_y(), 10.0);
    }

    #[test]
    fn disabled_auto_break_never_breaks() {
        let mut doc = doc();
        doc.set_auto_page_break(false, 20.0);
        doc.set_y(275.0, false);
        assert!(!doc.check_page_break(50.0, None).unwrap());
        assert_eq!(doc.num_pages(), 1);
    }

    struct Declines;

    impl PageHooks for Declines {
        fn accept_page_break(&mut self, _doc: &Document) -> bool {
            false
        }
    }

    #[test]
    fn hook_can_decline_a_break() {
        let mut doc = doc();
        doc.set_hooks(Declines);
        doc.set_y(275.0, false);
        assert!(!doc.check_page_break(50.0, None).unwrap());
    }

    #[derive(Clone, Default)]
    struct Recorder {
        breaks_in_header: Rc<RefCell<Vec<bool>>>,
    }

    impl PageHooks for Recorder {
        fn header(&mut self, doc: &mut Document) -> Result<(), PDFError> {
            doc.set_y(290.0, false);
            let broke = doc.check_page_break(100.0, None)?;
            self.breaks_in_header.borrow_mut().push(broke);
            doc.set_cell_margins(Margins::all(3.0));
            doc.cell(0.0, 0.0, "Header", &CellOptions::new().ln(LineAdvance::NextLine))
        }

        fn footer(&mut self, doc: &mut Document) -> Result<(), PDFError> {
            doc.cell(0.0, 0.0, "Footer", &CellOptions::new())
        }
    }

    #[test]
    fn header_cannot_break_or_leak_state() {
        let recorder = Recorder::default();
        let mut doc = doc();
        doc.set_hooks(recorder.clone());
        doc.set_xy(50.0, 100.0);
        doc.add_page().unwrap();
        assert_eq!(*recorder.breaks_in_header.borrow(), vec![false]);
        assert_eq!(doc.num_pages(), 2);
        assert_eq!(doc.get_y(), 10.0);
        assert_eq!(doc.get_x(), 10.0);
        assert_eq!(doc.cell_margins(), Margins::empty());
        let content = doc.page_content(2).unwrap();
        assert!(content.contains("q\n"));
        assert!(content.contains("(Header)"));
        let footer = doc.page_content(1).unwrap();
        assert!(footer.contains("(Footer)"));
    }

    #[test]
    fn set_page_rejects_missing_pages() {
        let mut doc = doc();
        let err = doc.set_page(3, false);
        assert!(matches!(err, Err(PDFError::InvalidPage { page: 3, count: 1 })));
        assert!(doc.is_aborted());
    }

    #[test]
    fn adding_a_page_moves_through_existing_pages() {
        let mut doc = doc();
        doc.add_page().unwrap();
        doc.add_page().unwrap();
        doc.set_page(1, true).unwrap();
        doc.add_page().unwrap();
        assert_eq!(doc.page_no(), 2);
        assert_eq!(doc.num_pages(), 3);
        doc.last_page(false).unwrap();
        assert_eq!(doc.page_no(), 3);
    }

    #[test]
    fn columns_fill_before_the_page_breaks() {
        let mut doc = doc();
        doc.set_equal_columns(2, 80.0, Some(50.0));
        assert_eq!(doc.get_x(), 10.0);
        assert_eq!(doc.margins().right, 110.0);
        doc.set_y(275.0, false);
        assert!(doc.check_page_break(10.0, None).unwrap());
        assert_eq!(doc.current_column(), 1);
        assert_eq!(doc.num_pages(), 1);
        // space between the columns is 180 - 160 = 20
        assert_eq!(doc.get_x(), 110.0);
        assert_eq!(doc.get_y(), 50.0);
        assert_eq!(doc.margins().left, 110.0);

        doc.set_y(275.0, false);
        assert!(doc.check_page_break(10.0, None).unwrap());
        assert_eq!(doc.num_pages(), 2);
        assert_eq!(doc.current_column(), 0);
        assert_eq!(doc.get_x(), 10.0);

        doc.select_column(1);
        // not the page the columns started on
        assert_eq!(doc.get_y(), 10.0);
        doc.reset_columns();
        assert_eq!(doc.margins().left, 10.0);
        assert_eq!(doc.margins().right, 10.0);
    }

    #[test]
    fn booklet_pages_swap_margins() {
        let mut config = DocumentConfig::new();
        config
            .unit(Unit::Point)
            .margins(crate::Pt(10.0), crate::Pt(10.0), crate::Pt(30.0))
            .booklet(true);
        let mut doc = Document::new(config);
        doc.add_page().unwrap();
        assert_eq!(doc.margins().left, 30.0);
        doc.add_page().unwrap();
        assert_eq!(doc.margins().left, 10.0);
        assert_eq!(doc.get_x(), 10.0);
    }
}
