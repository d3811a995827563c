//! Text that flows over many lines: [`Document::write_text`] for running
//! text from the cursor, and [`Document::multi_cell`] for paragraph boxes
//! that may cross column and page boundaries.
//!
//! A paragraph box is laid out in three steps. Its text is measured, then
//! emitted line by line through the page-break controller, and finally the
//! box's fill and border are drawn on every page and column it touched. The
//! backfill goes to each page's content mark, so it paints under the text.

use super::{
    border::{BorderSpec, SegmentPosition},
    cell::{Align, CellOptions, LineAdvance, Stretch, VAlign},
    linebreak::LineBreaker,
    margins::{CellMargin, CellPadding, Margins},
    state::{Checkpoint, Region, StateGuard},
};
use crate::{
    bidi::Direction,
    content::ContentSink,
    metrics::{codes_of, TextMetrics},
    page::LinkTarget,
    Document, PDFError,
};

/// Options of [`Document::write_text`]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteOptions {
    pub link: Option<LinkTarget>,
    pub fill: bool,
    pub align: Align,
    /// move to the start of the next line after the last one
    pub ln: bool,
    pub stretch: Stretch,
    /// the text starts a block; trailing spaces are trimmed from lines of
    /// right-to-left text
    pub first_block: bool,
    /// stop once this much height is used up, 0 for no limit
    pub max_h: f64,
    /// cell margins of the enclosing box, the current ones by default
    pub margin: Option<CellMargin>,
}

impl WriteOptions {
    pub fn new() -> WriteOptions {
        WriteOptions::default()
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn ln(mut self, ln: bool) -> Self {
        self.ln = ln;
        self
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn link(mut self, target: LinkTarget) -> Self {
        self.link = Some(target);
        self
    }

    pub fn stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn max_h(mut self, max_h: f64) -> Self {
        self.max_h = max_h;
        self
    }
}

/// Options of [`Document::multi_cell`]
#[derive(Debug, Clone, PartialEq)]
pub struct MultiCellOptions {
    pub border: BorderSpec,
    pub align: Align,
    pub fill: bool,
    /// where the cursor goes once the box is done
    pub ln: LineAdvance,
    /// start here instead of at the cursor
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// measure lines with the current font size instead of the last line height
    pub reset_h: bool,
    pub stretch: Stretch,
    /// keep the vertical cell padding around the text
    pub auto_padding: bool,
    /// height the text may use, 0 for no limit
    pub max_h: f64,
    /// position of the text inside `max_h`
    pub valign: VAlign,
    /// shrink the font until the text fits `max_h`
    pub fit_cell: bool,
}

impl Default for MultiCellOptions {
    fn default() -> Self {
        MultiCellOptions {
            border: BorderSpec::None,
            align: Align::Justify,
            fill: false,
            ln: LineAdvance::NextLine,
            x: None,
            y: None,
            reset_h: true,
            stretch: Stretch::None,
            auto_padding: true,
            max_h: 0.0,
            valign: VAlign::Top,
            fit_cell: false,
        }
    }
}

impl MultiCellOptions {
    pub fn new() -> MultiCellOptions {
        MultiCellOptions::default()
    }

    pub fn border<B: Into<BorderSpec>>(mut self, border: B) -> Self {
        self.border = border.into();
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn ln(mut self, ln: LineAdvance) -> Self {
        self.ln = ln;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn reset_h(mut self, reset: bool) -> Self {
        self.reset_h = reset;
        self
    }

    pub fn stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn auto_padding(mut self, auto: bool) -> Self {
        self.auto_padding = auto;
        self
    }

    pub fn max_h(mut self, max_h: f64, valign: VAlign) -> Self {
        self.max_h = max_h;
        self.valign = valign;
        self
    }

    pub fn fit_cell(mut self, fit: bool) -> Self {
        self.fit_cell = fit;
        self
    }
}

/// The pages and columns a paragraph box occupies, from where its text
/// started to where it ended
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FlowSpan {
    pub start_page: usize,
    pub start_column: usize,
    pub end_page: usize,
    pub end_column: usize,
    /// number of columns on every page, at least one
    pub columns: usize,
}

/// One (page, column) piece of a [`FlowSpan`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpanSegment {
    pub page: usize,
    pub column: usize,
    pub position: SegmentPosition,
}

impl FlowSpan {
    pub fn is_single(&self) -> bool {
        self.start_page == self.end_page && self.start_column == self.end_column
    }

    /// Every touched (page, column) pair in reading order, with its place in the box
    pub fn segments(&self) -> impl Iterator<Item = SpanSegment> + '_ {
        let last_column = self.columns.max(1) - 1;
        (self.start_page..=self.end_page).flat_map(move |page| {
            let first = if page == self.start_page { self.start_column } else { 0 };
            let last = if page == self.end_page { self.end_column } else { last_column };
            (first..=last).map(move |column| SpanSegment {
                page,
                column,
                position: self.classify(page, column),
            })
        })
    }

    fn classify(&self, page: usize, column: usize) -> SegmentPosition {
        if self.is_single() {
            SegmentPosition::Whole
        } else if page == self.start_page && column == self.start_column {
            SegmentPosition::Start
        } else if page == self.end_page && column == self.end_column {
            SegmentPosition::End
        } else {
            SegmentPosition::Middle
        }
    }
}

/// Text as the flow consumes it: carriage returns dropped, never empty
fn flow_codes(codes: &[u32]) -> Vec<u32> {
    let codes: Vec<u32> = codes.iter().copied().filter(|&c| c != u32::from('\r')).collect();
    if codes.is_empty() {
        vec![32]
    } else {
        codes
    }
}

fn trim_end_spaces(codes: &mut Vec<u32>) {
    while codes
        .last()
        .and_then(|&c| char::from_u32(c))
        .map(char::is_whitespace)
        .unwrap_or(false)
    {
        codes.pop();
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

impl Document {
    fn text_metrics(&self, operation: &'static str) -> Result<TextMetrics<'_>, PDFError> {
        let (font, selection) = self
            .selected_font()
            .ok_or(PDFError::NoFontSelected { operation })?;
        Ok(TextMetrics {
            font,
            size: selection.size,
            stretching: self.ctx.gs.stretching,
            spacing: self.ctx.gs.spacing,
        })
    }

    /// Width of `text` in the current font, size, stretching and spacing
    pub fn get_string_width(&mut self, text: &str) -> Result<f64, PDFError> {
        self.run(|doc| {
            let metrics = doc.text_metrics("get_string_width")?;
            Ok(metrics.string_width(&codes_of(text)))
        })
    }

    /// Number of lines `text` takes in a box of width `w` (0 for the rest
    /// of the line), with `padding` (the current one by default) widened to
    /// clear `border`
    pub fn get_num_lines<B: Into<BorderSpec>>(
        &mut self,
        text: &str,
        w: f64,
        padding: Option<CellPadding>,
        border: B,
    ) -> Result<usize, PDFError> {
        let border = border.into();
        self.run(|doc| {
            let mut padding = padding.unwrap_or(doc.ctx.gs.cell_padding);
            border.adjust_padding(&mut padding, doc.ctx.gs.line_style.width);
            doc.count_lines(&codes_of(text), w, &padding)
        })
    }

    /// Height a [`multi_cell`](Document::multi_cell) of width `w` needs for
    /// `text`, vertical padding included when `auto_padding` is set
    pub fn get_string_height<B: Into<BorderSpec>>(
        &mut self,
        w: f64,
        text: &str,
        auto_padding: bool,
        padding: Option<CellPadding>,
        border: B,
    ) -> Result<f64, PDFError> {
        let border = border.into();
        self.run(|doc| {
            let padding = padding.unwrap_or(doc.ctx.gs.cell_padding);
            doc.string_height(w, &codes_of(text), auto_padding, padding, &border)
        })
    }

    /// Lines of `codes` in a box of width `w`, measured with the same line
    /// breaker the flow uses
    pub(crate) fn count_lines(&self, codes: &[u32], w: f64, padding: &CellPadding) -> Result<usize, PDFError> {
        if codes.is_empty() {
            return Ok(1);
        }
        let w = if w <= 0.0 { self.ctx.remaining_width() } else { w };
        let available = w - padding.left - padding.right;
        let metrics = self.text_metrics("get_num_lines")?;
        let breaker = LineBreaker::new(&flow_codes(codes), &metrics, w);
        Ok(breaker.lines(available).count().max(1))
    }

    pub(crate) fn string_height(
        &self,
        w: f64,
        codes: &[u32],
        auto_padding: bool,
        padding: CellPadding,
        border: &BorderSpec,
    ) -> Result<f64, PDFError> {
        let mut padding = padding;
        border.adjust_padding(&mut padding, self.ctx.gs.line_style.width);
        let lines = self.count_lines(codes, w, &padding)?;
        let mut h = lines as f64 * self.ctx.font_size() * self.ctx.gs.cell_height_ratio;
        if auto_padding {
            h += padding.top + padding.bottom;
        }
        Ok(round6(h))
    }

    /// Print text from the cursor on. The first line uses what is left of
    /// the current line, later lines the full width between the margins.
    /// Returns the number of lines written.
    pub fn write_text(&mut self, h: f64, text: &str, opts: &WriteOptions) -> Result<usize, PDFError> {
        self.run(|doc| doc.write_impl(h, &codes_of(text), opts))
    }

    pub(crate) fn write_impl(&mut self, h: f64, text: &[u32], opts: &WriteOptions) -> Result<usize, PDFError> {
        self.require_page("write_text")?;
        let codes = flow_codes(text);

        let (breaker, chr_width, max_char_width) = {
            let metrics = self.text_metrics("write_text")?;
            let page_width = self.ctx.page_body_width();
            (
                LineBreaker::new(&codes, &metrics, page_width),
                metrics.char_width(u32::from('.'), false),
                metrics.max_char_width(&codes),
            )
        };

        let padding_h = self.ctx.gs.cell_padding.left + self.ctx.gs.cell_padding.right;
        let mut w = self.ctx.remaining_width();
        let mut w_max = w - padding_h;
        let required = chr_width.max(max_char_width);
        if required > w_max {
            return Err(PDFError::ColumnTooNarrow {
                available: w_max,
                required,
            });
        }

        let margin = opts.margin.unwrap_or(self.ctx.gs.cell_margin);
        let row_height = h.max(self.ctx.cell_height(self.ctx.font_size(), true));
        let max_y = self.ctx.cursor.y + opts.max_h - row_height;
        let rtl_text = self.ctx.gs.base_direction() == Some(Direction::RightToLeft);
        let line_opts = CellOptions {
            ln: LineAdvance::NextLine,
            align: opts.align,
            fill: opts.fill,
            link: opts.link.clone(),
            stretch: opts.stretch,
            ..CellOptions::default()
        };

        let mut lines = 0;
        let mut start = 0;
        while start < breaker.len() {
            if opts.max_h > 0.0 && self.ctx.cursor.y > max_y {
                log::trace!("text stopped at the height limit after {lines} line(s)");
                break;
            }
            let mid_line = self.line_started(chr_width, &margin);
            let segment = breaker.break_line(start, w_max, mid_line);

            if segment.stalled() {
                if !mid_line {
                    return Err(PDFError::ColumnTooNarrow {
                        available: w_max,
                        required,
                    });
                }
                // the word moves to a line of its own
                self.cell_impl(w, h, &[], &CellOptions::new().ln(LineAdvance::NextLine))?;
            } else {
                let mut line = breaker.line_codes(&segment);
                if opts.first_block && rtl_text {
                    trim_end_spaces(&mut line);
                }
                log::trace!(
                    "line {}: {} char(s), {:.3} of {:.3} wide",
                    lines + 1,
                    line.len(),
                    segment.width,
                    w_max
                );

                if segment.finished {
                    if segment.width <= 0.0 && line.is_empty() {
                        break;
                    }
                    let rtl = self.ctx.gs.rtl;
                    let (w, align) = match opts.align {
                        Align::Justify => (w, if rtl { Align::Right } else { Align::Left }),
                        Align::Center => (w, Align::Center),
                        Align::Left if !rtl => (segment.width, Align::Left),
                        Align::Right if rtl => (segment.width, Align::Right),
                        Align::Start => (segment.width, Align::Start),
                        other => (w, other),
                    };
                    let last = CellOptions {
                        ln: if opts.ln { LineAdvance::NextLine } else { LineAdvance::Right },
                        align,
                        ..line_opts.clone()
                    };
                    self.cell_impl(w, h, &line, &last)?;
                    lines += 1;
                    break;
                }

                if segment.explicit_break {
                    let align = match opts.align {
                        Align::Justify if self.ctx.gs.rtl => Align::Right,
                        Align::Justify => Align::Left,
                        other => other,
                    };
                    // an empty line at the bottom of a column is dropped
                    if !line.is_empty() || self.ctx.cursor.y < self.ctx.break_trigger() - row_height {
                        self.cell_impl(w, h, &line, &CellOptions { align, ..line_opts.clone() })?;
                    }
                } else {
                    self.cell_impl(w, h, &line, &line_opts)?;
                }
                lines += 1;
                start = segment.resume;
            }

            w = self.ctx.remaining_width();
            w_max = w - padding_h;
        }
        Ok(lines)
    }

    /// Whether the cursor is past the start of the line by at least one character
    fn line_started(&self, chr_width: f64, margin: &CellMargin) -> bool {
        let ctx = &self.ctx;
        let padding = &ctx.gs.cell_padding;
        if ctx.gs.rtl {
            ctx.cursor.x <= ctx.page.width - ctx.gs.right_margin - padding.right - margin.right - chr_width
        } else {
            ctx.cursor.x >= ctx.gs.left_margin + padding.left + margin.left + chr_width
        }
    }

    /// Print `text` in a box of width `w` (0 for the rest of the line) and at
    /// least `h` high, wrapping lines and continuing in the next column or on
    /// the next page as needed. Fill and border are drawn around the part of
    /// the box on every page and column. Returns the number of lines written.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, opts: &MultiCellOptions) -> Result<usize, PDFError> {
        self.run(|doc| doc.multi_cell_impl(w, h, &codes_of(text), opts))
    }

    pub(crate) fn multi_cell_impl(
        &mut self,
        w: f64,
        h: f64,
        text: &[u32],
        opts: &MultiCellOptions,
    ) -> Result<usize, PDFError> {
        self.require_page("multi_cell")?;
        let checkpoint = Checkpoint::CellSpacing(self.ctx.gs.cell_padding, self.ctx.gs.cell_margin);
        let mut doc = StateGuard::new(self, checkpoint);
        doc.flow_box(w, h, text, opts)
    }

    fn flow_box(&mut self, w: f64, h: f64, text: &[u32], opts: &MultiCellOptions) -> Result<usize, PDFError> {
        let line_width = self.ctx.gs.line_style.width;
        opts.border
            .adjust_padding(&mut self.ctx.gs.cell_padding, line_width);
        let padding = self.ctx.gs.cell_padding;
        let margin = self.ctx.gs.cell_margin;
        // lines carry no vertical padding or margin of their own
        self.ctx.gs.cell_padding.top = 0.0;
        self.ctx.gs.cell_padding.bottom = 0.0;
        self.ctx.gs.cell_margin = Margins::empty();

        if opts.reset_h {
            self.ctx.cursor.last_h = self.ctx.cell_height(self.ctx.font_size(), true);
        }
        if let Some(y) = opts.y {
            self.set_y(y, true);
        }
        let y = self.ctx.cursor.y;

        // a minimum height that doesn't fit continues on the next page
        let mut h = h;
        let mut rest_h = 0.0;
        let trigger = self.ctx.break_trigger();
        if h > 0.0 && self.ctx.in_body() && y + h + margin.vertical() > trigger {
            let visible = trigger - y;
            rest_h = h - visible;
            h = visible;
        }

        let start_page = self.page;
        let start_column = self.ctx.gs.columns.current;
        if let Some(x) = opts.x {
            self.set_x(x);
        }
        let x = self.get_x();
        let rtl = self.ctx.gs.rtl;
        let page_w = self.ctx.page.width;

        let oy = y + margin.top;
        let ox = if rtl { page_w - x - margin.right } else { x + margin.left };
        self.ctx.cursor.x = ox;
        self.ctx.cursor.y = oy;
        let w = if w > 0.0 {
            w
        } else if rtl {
            ox - self.ctx.gs.left_margin - margin.left
        } else {
            page_w - ox - self.ctx.gs.right_margin - margin.right
        };

        // the margins close in on the box while its text is written
        let (saved_left, saved_right) = (self.ctx.gs.left_margin, self.ctx.gs.right_margin);
        if rtl {
            self.ctx.gs.right_margin = page_w - ox;
            self.ctx.gs.left_margin = ox - w;
        } else {
            self.ctx.gs.left_margin = ox;
            self.ctx.gs.right_margin = page_w - ox - w;
        }

        if opts.auto_padding {
            self.ctx.cursor.y += padding.top;
        }

        let font_before = self.ctx.gs.font;
        let mut max_h = opts.max_h;
        if opts.fit_cell {
            let to_bottom = self.ctx.page.height
                - self.ctx.cursor.y
                - self.ctx.page.margins.bottom
                - self.ctx.gs.cell_padding.top
                - self.ctx.gs.cell_padding.bottom;
            max_h = h.min(to_bottom).max(max_h.min(to_bottom));
            h = max_h;
        }

        if max_h > 0.0 {
            let mut text_height = self.string_height(w, text, opts.auto_padding, padding, &opts.border)?;
            if opts.fit_cell && text_height > max_h && self.font_size_pt() > 1.0 {
                text_height = self.fit_font_size(w, text, max_h, padding, opts)?;
            }
            if text_height < max_h {
                match opts.valign {
                    VAlign::Middle => self.ctx.cursor.y += (max_h - text_height) / 2.0,
                    VAlign::Bottom => self.ctx.cursor.y += max_h - text_height,
                    VAlign::Top => {}
                }
            }
        }

        let last_h = self.ctx.cursor.last_h;
        let write_opts = WriteOptions {
            align: opts.align,
            ln: true,
            stretch: opts.stretch,
            first_block: true,
            max_h,
            margin: Some(margin),
            ..WriteOptions::default()
        };
        let lines = self.write_impl(last_h, text, &write_opts)?;

        if opts.fit_cell {
            if let Some(font) = font_before {
                if self.font_size_pt() != font.size_pt {
                    self.select_font(font.id, font.size_pt, true)?;
                }
            }
        }

        if opts.auto_padding {
            self.ctx.cursor.y += padding.bottom;
        }
        let mut current_y = self.ctx.cursor.y;
        let mut end_page = self.page;

        if rest_h > 0.0 {
            let mut skip = end_page as isize - start_page as isize;
            let mut remaining = rest_h;
            while remaining > 0.0 {
                if skip <= 0 {
                    let h = self.ctx.break_trigger() + 1.0;
                    self.page_break_impl(h, None)?;
                }
                let page_body = if self.ctx.gs.columns.is_multi() {
                    self.ctx.page.height - self.ctx.cursor.y - self.ctx.page.margins.bottom
                } else {
                    self.ctx.page.height - self.ctx.page.margins.top - self.ctx.page.margins.bottom
                };
                if page_body <= 0.0 {
                    break;
                }
                remaining -= page_body;
                skip -= 1;
            }
            current_y = self.ctx.cursor.y;
            end_page = self.page;
        }

        let span = FlowSpan {
            start_page,
            start_column,
            end_page,
            end_column: self.ctx.gs.columns.current,
            columns: self.ctx.gs.columns.count(),
        };
        log::debug!(
            "paragraph of {lines} line(s) spans page {} column {} to page {} column {}",
            span.start_page,
            span.start_column,
            span.end_page,
            span.end_column
        );

        let frame = BoxFrame {
            x,
            w,
            oy,
            ox,
            h,
            rest_h,
            current_y,
            margin,
        };
        let current_y = self.backfill(&span, frame, opts)?;

        if self.ctx.gs.columns.is_multi() {
            let column = self.ctx.gs.columns.current;
            self.select_column_impl(column);
        } else {
            self.ctx.gs.left_margin = saved_left;
            self.ctx.gs.right_margin = saved_right;
            if self.page > start_page {
                let (dl, dr) = self.original_margin_delta(start_page);
                self.ctx.gs.left_margin += dl;
                self.ctx.gs.right_margin += dr;
            }
        }

        match opts.ln {
            LineAdvance::Right => {
                self.set_page_impl(start_page, false)?;
                self.ctx.cursor.y = y;
                self.set_x(x + w + margin.left + margin.right);
            }
            LineAdvance::NextLine => self.set_y(current_y + margin.bottom, true),
            LineAdvance::Below => {
                self.set_y(current_y + margin.bottom, true);
                self.set_x(x + w + margin.left + margin.right);
            }
        }
        Ok(lines)
    }

    /// Shrink the font by bisection until `text` fits `max_h` within one
    /// device unit. Returns the height at the chosen size.
    fn fit_font_size(
        &mut self,
        w: f64,
        text: &[u32],
        max_h: f64,
        padding: CellPadding,
        opts: &MultiCellOptions,
    ) -> Result<f64, PDFError> {
        let Some(font) = self.ctx.gs.font else {
            return Err(PDFError::NoFontSelected { operation: "multi_cell" });
        };
        let mut f_min = 1.0;
        let mut f_max = font.size_pt;
        let mut f_mid = f_max;
        let epsilon = 1.0 / self.ctx.k;
        let mut iterations = 2 * (f_max as i64).clamp(10, 100);
        let mut text_height = max_h;

        while iterations >= 0 {
            f_mid = (f_max + f_min) / 2.0;
            self.select_font(font.id, f_mid, false)?;
            self.ctx.cursor.last_h = self.ctx.cell_height(self.ctx.font_size(), true);
            text_height = self.string_height(w, text, opts.auto_padding, padding, &opts.border)?;
            let diff = max_h - text_height;
            if diff >= 0.0 {
                if diff <= epsilon {
                    break;
                }
                f_min = f_mid;
            } else {
                f_max = f_mid;
            }
            iterations -= 1;
        }

        let size = if iterations < 0 { f_min } else { f_mid };
        self.select_font(font.id, size, true)?;
        self.ctx.cursor.last_h = self.ctx.cell_height(self.ctx.font_size(), true);
        if iterations < 0 {
            text_height = self.string_height(w, text, opts.auto_padding, padding, &opts.border)?;
        }
        log::debug!(
            "fitted font from {:.3}pt to {size:.3}pt, text is {text_height:.3} of {max_h:.3} high",
            font.size_pt
        );
        Ok(text_height)
    }

    /// Change of the original left and right margins between `page` and the current page
    fn original_margin_delta(&self, page: usize) -> (f64, f64) {
        match (self.page(page), self.page(self.page)) {
            (Some(from), Some(to)) => (
                to.geometry.margins.left - from.geometry.margins.left,
                to.geometry.margins.right - from.geometry.margins.right,
            ),
            _ => (0.0, 0.0),
        }
    }

    /// Draw the fill and border of every segment of a paragraph box at the
    /// content mark of its page. Returns where the box ends.
    fn backfill(&mut self, span: &FlowSpan, frame: BoxFrame, opts: &MultiCellOptions) -> Result<f64, PDFError> {
        let open_cells = self.ctx.open_cells;
        let draws = opts.fill || !opts.border.is_none();
        let rtl = self.ctx.gs.rtl;
        let margin = frame.margin;
        let mut h = frame.h;
        let mut rest_h = frame.rest_h;
        let mut pending: Option<(usize, String)> = None;

        for segment in span.segments() {
            if pending.as_ref().map(|(page, _)| *page) != Some(segment.page) {
                if let Some((page, code)) = pending.take() {
                    self.insert_backfill(page, &code, draws);
                }
                self.set_page_impl(segment.page, false)?;
                pending = Some((segment.page, String::new()));
            }

            let columns = &self.ctx.gs.columns;
            if columns.is_multi() && segment.column != columns.current {
                self.select_column_impl(segment.column);
            }
            let (x, y) = match segment.position {
                SegmentPosition::Whole | SegmentPosition::Start => (frame.ox, frame.oy),
                SegmentPosition::Middle | SegmentPosition::End => {
                    let (line_x, top) = self.segment_origin(segment.column, frame.x, span.start_page);
                    let x = if rtl { line_x - margin.right } else { line_x + margin.left };
                    (x, top)
                }
            };
            let bottom = self.ctx.page.height - self.ctx.page.margins.bottom;
            let seg_h = match segment.position {
                SegmentPosition::Whole => {
                    h = h.max(frame.current_y - frame.oy);
                    h
                }
                SegmentPosition::Start => bottom - y,
                SegmentPosition::End => (frame.current_y - y).max(rest_h),
                SegmentPosition::Middle => {
                    let seg_h = bottom - y;
                    rest_h -= seg_h;
                    seg_h
                }
            };
            log::trace!(
                "box segment {:?} on page {} column {}: {:.3} high",
                segment.position,
                segment.page,
                segment.column,
                seg_h
            );

            self.ctx.cursor.x = x;
            self.ctx.cursor.y = y;
            let cell = CellOptions::new()
                .border(opts.border.for_position(segment.position, open_cells))
                .ln(LineAdvance::NextLine)
                .fill(opts.fill)
                .ignore_min_height(true);
            let code = self.cell_code(frame.w, seg_h, &[], &cell)?;
            if let Some((_, page_code)) = pending.as_mut() {
                page_code.push_str(&code);
                page_code.push('\n');
            }
        }
        if let Some((page, code)) = pending.take() {
            self.insert_backfill(page, &code, draws);
        }
        Ok(self.ctx.cursor.y)
    }

    /// Where a continuation segment of a box starts: the column's line
    /// start (or the box's x, shifted by any margin change since the first
    /// page) and the column or page top
    fn segment_origin(&self, column: usize, x: f64, start_page: usize) -> (f64, f64) {
        let columns = &self.ctx.gs.columns;
        if columns.is_multi() {
            let top = columns
                .bounds(column)
                .map(|b| self.column_top(b.y))
                .unwrap_or(self.ctx.page.margins.top);
            return (self.column_start_x(column), top);
        }
        let (dl, dr) = self.original_margin_delta(start_page);
        let line_x = if self.ctx.gs.rtl {
            self.ctx.page.width - x - dr
        } else {
            x + dl
        };
        (line_x, self.ctx.page.margins.top)
    }

    fn insert_backfill(&mut self, page: usize, code: &str, draws: bool) {
        if !draws || code.trim().is_empty() {
            return;
        }
        let footer = self.ctx.region == Region::Footer;
        if let Some(page) = page.checked_sub(1).and_then(|i| self.pages.get_mut(i)) {
            let mark = match page.footer_mark {
                Some(mark) if footer => mark,
                _ => page.body_mark,
            };
            page.insert_at(mark, code.trim_end());
        }
    }
}

/// Geometry of a paragraph box, fixed once its text is written
#[derive(Debug, Copy, Clone)]
struct BoxFrame {
    /// x as given by the caller, measured from the right under right-to-left layout
    x: f64,
    w: f64,
    ox: f64,
    oy: f64,
    /// visible part of the requested height on the first page
    h: f64,
    /// requested height left over for later pages
    rest_h: f64,
    /// where the text ended
    current_y: f64,
    margin: CellMargin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{units::Unit, CoreFont, DocumentConfig, Pt};

    fn doc() -> Document {
        let mut config = DocumentConfig::new();
        config
            .unit(Unit::Point)
            .page_size((Pt(200.0), Pt(300.0)), Default::default())
            .margins(Pt(10.0), Pt(10.0), Pt(10.0))
            .auto_page_break(true, Pt(10.0))
            .open_cells(true);
        let mut doc = Document::new(config);
        let font = doc.add_font(CoreFont::courier().into());
        doc.add_page().unwrap();
        doc.set_font(font, 10.0).unwrap();
        doc.set_cell_padding(0.0);
        doc
    }

    fn span(start: (usize, usize), end: (usize, usize), columns: usize) -> Vec<(usize, usize, SegmentPosition)> {
        FlowSpan {
            start_page: start.0,
            start_column: start.1,
            end_page: end.0,
            end_column: end.1,
            columns,
        }
        .segments()
        .map(|s| (s.page, s.column, s.position))
        .collect()
    }

    #[test]
    fn span_segments_are_classified() {
        use SegmentPosition::*;
        assert_eq!(span((1, 0), (1, 0), 1), vec![(1, 0, Whole)]);
        assert_eq!(span((1, 0), (3, 0), 1), vec![(1, 0, Start), (2, 0, Middle), (3, 0, End)]);
        assert_eq!(span((1, 0), (1, 2), 3), vec![(1, 0, Start), (1, 1, Middle), (1, 2, End)]);
        assert_eq!(span((1, 1), (2, 0), 2), vec![(1, 1, Start), (2, 0, End)]);
    }

    #[test]
    fn empty_box_is_one_line_high() {
        let mut doc = doc();
        let lines = doc.multi_cell(50.0, 0.0, "", &MultiCellOptions::new()).unwrap();
        assert_eq!(lines, 1);
        assert_eq!(doc.get_y(), 22.5);
        assert_eq!(doc.get_x(), 10.0);
    }

    #[test]
    fn measured_height_matches_the_flow() {
        let mut doc = doc();
        let text = "the quick brown fox jumps over the lazy dog\nand keeps on running";
        let height = doc.get_string_height(100.0, text, true, None, "").unwrap();
        let expected = doc.get_num_lines(text, 100.0, None, "").unwrap();
        let lines = doc.multi_cell(100.0, 0.0, text, &MultiCellOptions::new()).unwrap();
        assert_eq!(lines, expected);
        assert!((doc.get_y() - 10.0 - height).abs() < 1e-6);
    }

    #[test]
    fn run_of_spaces_at_a_line_end_leaves_an_empty_line() {
        let mut doc = doc();
        doc.set_cell_padding(2.0);
        // "aaaaaaaaa" ends the first line at the first space; the next line
        // opens with the second space and "bbbbbbbbbb" only fits the box
        // without padding
        let text = "aaaaaaaaa  bbbbbbbbbb";
        let expected = doc.get_num_lines(text, 62.0, None, "").unwrap();
        assert_eq!(expected, 4);
        let lines = doc.multi_cell(62.0, 0.0, text, &MultiCellOptions::new()).unwrap();
        assert_eq!(lines, expected);
        assert!(!doc.is_aborted());
    }

    #[test]
    fn single_word_justified_box() {
        let mut doc = doc();
        let lines = doc
            .multi_cell(100.0, 0.0, "word", &MultiCellOptions::new().align(Align::Justify))
            .unwrap();
        assert_eq!(lines, 1);
        assert!(!doc.page_content(1).unwrap().contains("Tw"));
    }

    #[test]
    fn tall_box_continues_on_the_next_page() {
        let mut doc = doc();
        doc.multi_cell(0.0, 500.0, "hello", &MultiCellOptions::new().fill(true))
            .unwrap();
        assert_eq!(doc.num_pages(), 2);
        let first = doc.page_content(1).unwrap();
        let second = doc.page_content(2).unwrap();
        assert!(first.contains("10.000000 290.000000 180.000000 -280.000000 re f"));
        assert!(second.contains("10.000000 290.000000 180.000000 -220.000000 re f"));
        assert_eq!(doc.page_no(), 2);
        assert_eq!(doc.get_y(), 230.0);
    }

    #[test]
    fn split_frame_is_left_open() {
        let mut doc = doc();
        doc.multi_cell(0.0, 500.0, "hello", &MultiCellOptions::new().border("1"))
            .unwrap();
        let first = doc.page_content(1).unwrap();
        let second = doc.page_content(2).unwrap();
        assert!(!first.contains("re S"));
        assert!(first.contains(
            "10.000000 10.000000 m 10.000000 290.000000 l 190.000000 290.000000 l 190.000000 10.000000 l S"
        ));
        assert!(second.contains(
            "190.000000 290.000000 m 190.000000 70.000000 l 10.000000 70.000000 l 10.000000 290.000000 l S"
        ));
    }

    #[test]
    fn backfill_paints_under_the_text() {
        let mut doc = doc();
        doc.multi_cell(100.0, 0.0, "hello", &MultiCellOptions::new().fill(true))
            .unwrap();
        let content = doc.page_content(1).unwrap();
        let fill = content.find("re f").unwrap();
        let text = content.find("TJ").or_else(|| content.find("Tj")).unwrap();
        assert!(fill < text);
    }

    #[test]
    fn box_to_the_right_keeps_the_row() {
        let mut doc = doc();
        doc.multi_cell(50.0, 0.0, "one two three", &MultiCellOptions::new().ln(LineAdvance::Right))
            .unwrap();
        assert_eq!(doc.get_y(), 10.0);
        assert_eq!(doc.get_x(), 60.0);
    }

    #[test]
    fn fit_cell_shrinks_until_the_text_fits() {
        let mut doc = doc();
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor";
        let opts = MultiCellOptions::new().max_h(20.0, VAlign::Top).fit_cell(true);
        let lines = doc.multi_cell(60.0, 20.0, text, &opts).unwrap();
        assert!(lines >= 1);
        assert_eq!(doc.font_size_pt(), 10.0);
        let used = doc.get_y() - 10.0;
        assert!(used >= 20.0 && used <= 21.0, "{used}");
        assert_eq!(doc.num_pages(), 1);
    }

    #[test]
    fn words_move_down_when_the_line_is_started() {
        let mut doc = doc();
        doc.set_x(170.0);
        let lines = doc.write_text(12.5, "abcdef ghi", &WriteOptions::new()).unwrap();
        assert_eq!(lines, 1);
        assert_eq!(doc.get_y(), 22.5);
        assert_eq!(doc.get_x(), 70.0);
    }

    #[test]
    fn written_text_counts_its_lines() {
        let mut doc = doc();
        let lines = doc.write_text(12.5, "one\ntwo", &WriteOptions::new()).unwrap();
        assert_eq!(lines, 2);
        assert_eq!(doc.get_y(), 22.5);
        assert_eq!(doc.get_x(), 28.0);
    }

    #[test]
    fn writing_stops_at_the_height_limit() {
        let mut doc = doc();
        let lines = doc
            .write_text(12.5, "a\nb\nc\nd", &WriteOptions::new().max_h(25.0))
            .unwrap();
        assert_eq!(lines, 2);
    }

    #[test]
    fn too_narrow_for_one_character() {
        let mut doc = doc();
        doc.set_x(188.0);
        let err = doc.write_text(12.5, "abc", &WriteOptions::new());
        assert!(matches!(err, Err(PDFError::ColumnTooNarrow { .. })));
        assert!(doc.is_aborted());
    }
}
