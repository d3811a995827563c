//! Single cells: a box with optional fill and border, and one line of text.

use super::{
    border::{BorderGeometry, BorderSpec},
    state::{Checkpoint, CursorState, FontSelection, LayoutContext, StateGuard, TextRenderMode},
};
use crate::{
    bidi::{BidiReorder, Direction},
    content::{escape_literal, fmt_num, hex_string},
    metrics::{codes_of, FontMetrics, TextMetrics, NO_BREAK_SPACE, SOFT_HYPHEN},
    page::LinkTarget,
    Document, PDFError,
};

/// Horizontal text alignment inside a cell
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    /// the side text starts on: left, or right under right-to-left layout
    #[default]
    Start,
    Left,
    Center,
    Right,
    /// stretch the spaces so the line fills the cell
    Justify,
}

/// Vertical position of the text inside the cell
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Which point of the cell sits at the cursor's y coordinate
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum CAlign {
    /// top of the cell
    #[default]
    Top,
    /// centre of the cell
    Center,
    /// bottom of the cell
    Bottom,
    /// top of the font
    FontTop,
    /// text baseline
    Baseline,
    /// bottom of the font
    FontBottom,
}

/// Where the cursor goes after a cell is drawn
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LineAdvance {
    /// to the right of the cell (left under right-to-left layout)
    #[default]
    Right,
    /// to the start of the next line
    NextLine,
    /// below the cell, keeping x
    Below,
}

/// Fitting text that doesn't match the cell width
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Stretch {
    #[default]
    None,
    /// horizontal scaling, only when the text is too wide
    ScaleIfNeeded,
    /// horizontal scaling to exactly the cell width
    Scale,
    /// character spacing, only when the text is too wide
    SpacingIfNeeded,
    /// character spacing to exactly the cell width
    Spacing,
}

impl Stretch {
    fn forced(self) -> bool {
        matches!(self, Stretch::Scale | Stretch::Spacing)
    }

    fn uses_spacing(self) -> bool {
        matches!(self, Stretch::SpacingIfNeeded | Stretch::Spacing)
    }
}

/// How a cell is drawn
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CellOptions {
    pub border: BorderSpec,
    pub ln: LineAdvance,
    pub align: Align,
    pub fill: bool,
    pub link: Option<LinkTarget>,
    pub stretch: Stretch,
    /// don't grow the cell to the height of one line of text
    pub ignore_min_height: bool,
    pub calign: CAlign,
    pub valign: VAlign,
}

impl CellOptions {
    pub fn new() -> CellOptions {
        CellOptions::default()
    }

    pub fn border<B: Into<BorderSpec>>(mut self, border: B) -> Self {
        self.border = border.into();
        self
    }

    pub fn ln(mut self, ln: LineAdvance) -> Self {
        self.ln = ln;
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

    pub fn link(mut self, target: LinkTarget) -> Self {
        self.link = Some(target);
        self
    }

    pub fn stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn ignore_min_height(mut self, ignore: bool) -> Self {
        self.ignore_min_height = ignore;
        self
    }

    pub fn calign(mut self, calign: CAlign) -> Self {
        self.calign = calign;
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }
}

/// How the spaces of a justified line were widened
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Justification {
    /// number of spaces that were widened
    pub spaces: usize,
    /// width of the text that is not covered by `gap`
    pub text_width: f64,
    /// horizontal distance added per space
    pub gap: f64,
}

/// The result of laying out one cell
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    /// content stream operators
    pub code: String,
    /// the cursor after the cell
    pub cursor: CursorState,
    /// left edge and baseline of the first drawn glyph
    pub text_origin: Option<(f64, f64)>,
    /// width the text occupies
    pub text_width: f64,
    pub justification: Option<Justification>,
    /// link area (x, y, w, h) in user units
    pub link_area: Option<(f64, f64, f64, f64)>,
    /// characters drawn, in display order
    pub drawn: Vec<u32>,
}

/// Whether a line of text needs bidirectional reordering
pub(crate) fn needs_bidi(ctx: &LayoutContext, bidi: &dyn BidiReorder, codes: &[u32]) -> bool {
    ctx.gs.rtl
        || ctx.gs.temp_direction == Some(Direction::RightToLeft)
        || bidi.has_rtl(codes)
}

/// Lay out one cell at the cursor of `ctx`. Nothing in `ctx` is changed; the
/// caller applies the returned cursor.
pub fn render_cell(
    ctx: &LayoutContext,
    font: Option<(&dyn FontMetrics, FontSelection)>,
    bidi: &dyn BidiReorder,
    w: f64,
    h: f64,
    text: &[u32],
    opts: &CellOptions,
) -> Result<RenderedCell, PDFError> {
    let gs = &ctx.gs;
    let k = ctx.k;
    let rtl = gs.rtl;
    let page_h = ctx.page.height;

    let text: Vec<u32> = text
        .iter()
        .filter(|&&c| c != SOFT_HYPHEN)
        .map(|&c| if c == NO_BREAK_SPACE || c == u32::from('\r') { 32 } else { c })
        .collect();

    let mut padding = gs.cell_padding;
    opts.border.adjust_padding(&mut padding, gs.line_style.width);
    let margin = gs.cell_margin;

    let mut h = h;
    if !opts.ignore_min_height {
        h = h.max(ctx.cell_height(ctx.font_size(), true));
    }

    let mut x = ctx.cursor.x;
    let mut y = ctx.cursor.y + margin.top;
    if rtl {
        x -= margin.right;
    } else {
        x += margin.left;
    }

    let (asc, desc) = font.map(|(_, f)| (f.ascent, f.descent)).unwrap_or((0.0, 0.0));

    y -= match (opts.calign, opts.valign) {
        (CAlign::FontTop, VAlign::Top) => padding.top,
        (CAlign::FontTop, VAlign::Bottom) => h - padding.bottom - asc - desc,
        (CAlign::FontTop, VAlign::Middle) => (h - asc - desc) / 2.0,
        (CAlign::Baseline, VAlign::Top) => padding.top + asc,
        (CAlign::Baseline, VAlign::Bottom) => h - padding.bottom - desc,
        (CAlign::Baseline, VAlign::Middle) => (h + asc - desc) / 2.0,
        (CAlign::FontBottom, VAlign::Top) => padding.top + asc + desc,
        (CAlign::FontBottom, VAlign::Bottom) => h - padding.bottom,
        (CAlign::FontBottom, VAlign::Middle) => (h + asc + desc) / 2.0,
        (CAlign::Bottom, _) => h,
        (CAlign::Center, _) => h / 2.0,
        (CAlign::Top, _) => 0.0,
    };

    let yt = match opts.valign {
        VAlign::Top => y + padding.top,
        VAlign::Bottom => y + h - padding.bottom - asc - desc,
        VAlign::Middle => y + (h - asc - desc) / 2.0,
    };
    let baseline = yt + asc;

    let mut w = w;
    if w <= 0.0 {
        w = if rtl {
            x - gs.left_margin
        } else {
            ctx.page.width - gs.right_margin - x
        };
    }

    // operators that go before the cell body
    let mut prelude = String::new();
    let mut s = String::new();

    let frame = opts.border == BorderSpec::Frame;
    if opts.fill || frame {
        let op = match (opts.fill, frame) {
            (true, true) => "B",
            (true, false) => "f",
            _ => "S",
        };
        let xk = if rtl { (x - w) * k } else { x * k };
        s.push_str(&format!(
            "{} {} {} {} re {op} ",
            fmt_num(xk),
            fmt_num((page_h - y) * k),
            fmt_num(w * k),
            fmt_num(-h * k)
        ));
    }
    if !frame {
        s.push_str(&opts.border.operators(
            x,
            y,
            w,
            h,
            BorderGeometry {
                k,
                page_height: page_h,
                rtl,
                current: &gs.line_style,
            },
        ));
    }

    let mut text_origin = None;
    let mut text_width = 0.0;
    let mut justification = None;
    let mut link_area = None;
    let mut drawn = Vec::new();
    let mut stretching = gs.stretching;
    let mut spacing = gs.spacing;
    let mut align = opts.align;
    let mut unicode = false;

    if !text.is_empty() {
        let (metrics, selection) = font.ok_or(PDFError::NoFontSelected { operation: "cell" })?;
        unicode = metrics.is_unicode();
        let display = if needs_bidi(ctx, bidi, &text) {
            bidi.reorder(&text, gs.base_direction())
        } else {
            text.clone()
        };

        let measure = |stretching: f64, spacing: f64, codes: &[u32]| {
            TextMetrics {
                font: metrics,
                size: selection.size,
                stretching,
                spacing,
            }
            .string_width(codes)
        };
        let available = w - padding.left - padding.right;
        let mut width = measure(stretching, spacing, &display);

        if opts.stretch != Stretch::None {
            let ratio = if width <= 0.0 { 1.0 } else { available / width };
            if ratio < 1.0 || (ratio > 1.0 && opts.stretch.forced()) {
                if opts.stretch.uses_spacing() {
                    let gaps = display.len().saturating_sub(1).max(1) as f64;
                    spacing += (available - width) / (gaps * (stretching / 100.0));
                } else {
                    stretching *= ratio;
                }
                width = available;
                align = Align::Start;
            }
        }
        if stretching != 100.0 {
            prelude.push_str(&format!("BT {} Tz ET ", fmt_num(stretching)));
        }
        if spacing != 0.0 {
            prelude.push_str(&format!("BT {} Tc ET ", fmt_num(spacing * k)));
        }

        let colour_flag = gs.colour_flag() && (gs.render_mode as u8) < 4;
        if colour_flag {
            s.push_str(&format!("q {} ", gs.text_colour.fill_operator()));
        }
        s.push_str(&format!(
            "BT {} Tr {} w ET ",
            gs.render_mode as u8,
            fmt_num(gs.text_stroke_width * k)
        ));

        let spaces = display.iter().filter(|&&c| c == 32).count();
        let mut tj_gap: Option<f64> = None;
        if align == Align::Justify && spaces > 0 {
            if unicode {
                let no_spaces: Vec<u32> = display.iter().copied().filter(|&c| c != 32).collect();
                let width_no_spaces = measure(stretching, spacing, &no_spaces);
                let gap = (available - width_no_spaces) / spaces as f64;
                let mut adjust = -1000.0 * gap / if selection.size != 0.0 { selection.size } else { 1.0 };
                if stretching != 100.0 {
                    adjust /= stretching / 100.0;
                }
                tj_gap = Some(adjust);
                justification = Some(Justification {
                    spaces,
                    text_width: width_no_spaces,
                    gap,
                });
            } else {
                let gap = (available - width) / spaces as f64;
                let mut word_spacing = gap * k;
                if stretching != 100.0 {
                    word_spacing /= stretching / 100.0;
                }
                prelude.push_str(&format!("BT {} Tw ET ", fmt_num(word_spacing)));
                justification = Some(Justification {
                    spaces,
                    text_width: width,
                    gap,
                });
            }
            width = available;
        }

        let dx = match align {
            Align::Center => (w - width) / 2.0,
            Align::Right if rtl => padding.right,
            Align::Right => w - width - padding.right,
            Align::Left if rtl => w - width - padding.left,
            Align::Left => padding.left,
            Align::Justify | Align::Start if rtl => padding.right,
            Align::Justify | Align::Start => padding.left,
        };
        let xdx = if rtl { x - dx - width } else { x + dx };

        let encoded = encode_text(metrics, &display, tj_gap);
        s.push_str(&format!(
            "BT {} {} Td [{encoded}] TJ ET",
            fmt_num(xdx * k),
            fmt_num((page_h - baseline) * k)
        ));

        let size_pt = selection.size_pt;
        let line_w = -metrics.underline_thickness() / 1000.0 * size_pt;
        let decoration = |y_pt: f64| {
            format!(
                " {} {} {} {} re f",
                fmt_num(xdx * k),
                fmt_num(y_pt),
                fmt_num(width * k),
                fmt_num(line_w)
            )
        };
        if gs.decoration.underline {
            s.push_str(&decoration((page_h - baseline) * k + line_w));
        }
        if gs.decoration.line_through {
            s.push_str(&decoration((page_h - baseline) * k + line_w + size_pt / 3.0));
        }
        if gs.decoration.overline {
            s.push_str(&decoration((page_h - baseline + asc) * k - line_w));
        }
        if colour_flag {
            s.push_str(" Q");
        }
        if opts.link.is_some() {
            link_area = Some((xdx, yt, width, asc + desc));
        }

        text_origin = Some((xdx, baseline));
        text_width = width;
        drawn = display;
    }

    let mut code = format!(
        "{} {}\n",
        gs.line_style.operators(k),
        gs.fill_colour.fill_operator()
    );
    code.push_str(&prelude);
    if !s.is_empty() {
        code.push_str(&s);
        if spacing != 0.0 {
            code.push_str(" BT 0 Tc ET");
        }
        if stretching != 100.0 {
            code.push_str(" BT 100 Tz ET");
        }
    }
    if !unicode && align == Align::Justify && justification.is_some() {
        code.push_str(" BT 0 Tw ET");
    }

    let mut cursor = CursorState {
        x: ctx.cursor.x,
        y: ctx.cursor.y,
        last_h: h,
    };
    match opts.ln {
        LineAdvance::Right => {
            cursor.x = if rtl {
                x - w - margin.left
            } else {
                x + w + margin.right
            };
        }
        LineAdvance::NextLine | LineAdvance::Below => {
            cursor.y = y + h + margin.bottom;
            if opts.ln == LineAdvance::NextLine {
                cursor.x = ctx.line_start();
            }
        }
    }

    Ok(RenderedCell {
        code,
        cursor,
        text_origin,
        text_width,
        justification,
        link_area,
        drawn,
    })
}

/// Encode display-ordered text for a `TJ` array. With `gap` set, spaces are
/// replaced by that position adjustment.
fn encode_text(font: &dyn FontMetrics, codes: &[u32], gap: Option<f64>) -> String {
    let wrap = |bytes: &[u8]| {
        if font.is_unicode() {
            format!("<{}>", hex_string(bytes))
        } else {
            format!("({})", escape_literal(bytes))
        }
    };
    let mut out = String::new();
    let mut bytes = Vec::new();
    for &c in codes {
        match gap {
            Some(gap) if c == 32 => {
                out.push_str(&wrap(&bytes));
                out.push_str(&format!(" {} ", fmt_num(gap)));
                bytes.clear();
            }
            _ => font.encode(c, &mut bytes),
        }
    }
    out.push_str(&wrap(&bytes));
    out
}

impl Document {
    /// Draw a cell of `w` × `h` at the cursor. A width of 0 extends the cell
    /// to the right margin (left margin under right-to-left layout). A cell
    /// that doesn't fit above the bottom margin moves to the next column or page.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, opts: &CellOptions) -> Result<(), PDFError> {
        self.run(|doc| doc.cell_impl(w, h, &codes_of(text), opts))
    }

    /// Lay out a cell at the cursor without drawing it or moving the cursor
    pub fn preview_cell(&self, w: f64, h: f64, text: &str, opts: &CellOptions) -> Result<RenderedCell, PDFError> {
        render_cell(
            &self.ctx,
            self.selected_font(),
            self.bidi.as_ref(),
            w,
            h,
            &codes_of(text),
            opts,
        )
    }

    pub(crate) fn cell_impl(&mut self, w: f64, h: f64, text: &[u32], opts: &CellOptions) -> Result<(), PDFError> {
        self.require_page("cell")?;
        let checkpoint = Checkpoint::CellSpacing(self.ctx.gs.cell_padding, self.ctx.gs.cell_margin);
        let mut doc = StateGuard::new(self, checkpoint);

        let line_width = doc.ctx.gs.line_style.width;
        opts.border
            .adjust_padding(&mut doc.ctx.gs.cell_padding, line_width);
        let mut h = h;
        if !opts.ignore_min_height {
            h = h.max(doc.ctx.cell_height(doc.ctx.font_size(), true));
        }
        let margins = doc.ctx.gs.cell_margin.vertical();
        doc.page_break_impl(h + margins, None)?;

        let opts = CellOptions {
            ignore_min_height: true,
            ..opts.clone()
        };
        let code = doc.cell_code(w, h, text, &opts)?;
        doc.out(&code);
        Ok(())
    }

    /// Render a cell and apply its effects on the cursor, links and font usage,
    /// returning the operators without emitting them
    pub(crate) fn cell_code(&mut self, w: f64, h: f64, text: &[u32], opts: &CellOptions) -> Result<String, PDFError> {
        let rendered = render_cell(
            &self.ctx,
            self.selected_font(),
            self.bidi.as_ref(),
            w,
            h,
            text,
            opts,
        )?;
        self.ctx.cursor = rendered.cursor;
        if let Some(selection) = self.ctx.gs.font {
            if let Some(font) = self.fonts.get_mut(selection.id) {
                font.record_usage(&rendered.drawn);
            }
        }
        if let (Some(target), Some((x, y, w, h))) = (&opts.link, rendered.link_area) {
            self.link_area(x, y, w, h, target.clone());
        }
        Ok(rendered.code)
    }

    pub(crate) fn selected_font(&self) -> Option<(&dyn FontMetrics, FontSelection)> {
        let selection = self.ctx.gs.font?;
        let font = self.fonts.get(selection.id)?;
        Some((font.metrics(), selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bidi::NoReorder,
        layout::{ColumnLayout, GraphicState, LineStyle, Margins, Region, TextDecoration},
        metrics::tests::Fixed,
        page::PageGeometry,
        pagesize::Orientation,
        transform::TransformStack,
        Colour,
    };
    use id_arena::Arena;

    fn context(rtl: bool) -> (LayoutContext, FontSelection) {
        let mut arena: Arena<crate::Font> = Arena::new();
        let id = arena.alloc(crate::CoreFont::courier().into());
        let selection = FontSelection {
            id,
            size_pt: 10.0,
            size: 10.0,
            ascent: 8.0,
            descent: 2.0,
        };
        let ctx = LayoutContext {
            k: 1.0,
            page: PageGeometry {
                width: 200.0,
                height: 300.0,
                orientation: Orientation::Portrait,
                margins: Margins::trbl(10.0, 10.0, 20.0, 10.0),
                auto_page_break: true,
            },
            cursor: CursorState {
                x: if rtl { 190.0 } else { 10.0 },
                y: 10.0,
                last_h: 0.0,
            },
            gs: GraphicState {
                font: Some(selection),
                stretching: 100.0,
                spacing: 0.0,
                line_style: LineStyle::new(1.0),
                fill_colour: Colour::default(),
                text_colour: Colour::default(),
                render_mode: TextRenderMode::Fill,
                text_stroke_width: 0.0,
                decoration: TextDecoration::default(),
                cell_padding: Margins::symmetric(0.0, 2.0),
                cell_margin: Margins::empty(),
                cell_height_ratio: 1.25,
                left_margin: 10.0,
                right_margin: 10.0,
                rtl,
                temp_direction: None,
                columns: ColumnLayout::default(),
            },
            region: Region::Body,
            transforms: TransformStack::default(),
            header_margin: 5.0,
            footer_margin: 5.0,
            open_cells: true,
        };
        (ctx, selection)
    }

    fn render(ctx: &LayoutContext, sel: FontSelection, w: f64, text: &str, opts: &CellOptions) -> RenderedCell {
        render_cell(ctx, Some((&Fixed, sel)), &NoReorder, w, 0.0, &codes_of(text), opts).unwrap()
    }

    #[test]
    fn empty_height_grows_to_one_line() {
        let (ctx, sel) = context(false);
        let cell = render(&ctx, sel, 50.0, "ab", &CellOptions::new().ln(LineAdvance::NextLine));
        assert_eq!(cell.cursor.last_h, 12.5);
        assert_eq!(cell.cursor.y, 22.5);
        assert_eq!(cell.cursor.x, 10.0);
    }

    #[test]
    fn cursor_moves_right_by_default() {
        let (ctx, sel) = context(false);
        let cell = render(&ctx, sel, 50.0, "ab", &CellOptions::new());
        assert_eq!(cell.cursor.x, 60.0);
        assert_eq!(cell.cursor.y, 10.0);
    }

    #[test]
    fn alignment_offsets() {
        let (ctx, sel) = context(false);
        // "ab" is 20 wide in a 50 wide cell with 2 padding each side
        let left = render(&ctx, sel, 50.0, "ab", &CellOptions::new().align(Align::Left));
        assert_eq!(left.text_origin.unwrap().0, 12.0);
        let right = render(&ctx, sel, 50.0, "ab", &CellOptions::new().align(Align::Right));
        assert_eq!(right.text_origin.unwrap().0, 38.0);
        let center = render(&ctx, sel, 50.0, "ab", &CellOptions::new().align(Align::Center));
        assert_eq!(center.text_origin.unwrap().0, 25.0);
        // middle of a 12.5 high cell with ascent 8 and descent 2
        assert_eq!(left.text_origin.unwrap().1, 10.0 + 1.25 + 8.0);
    }

    #[test]
    fn rtl_mirrors_the_first_glyph() {
        let (ltr_ctx, sel) = context(false);
        let (rtl_ctx, _) = context(true);
        let opts = CellOptions::new().align(Align::Start);
        let ltr = render(&ltr_ctx, sel, 50.0, "ab", &opts);
        let rtl = render(&rtl_ctx, sel, 50.0, "ab", &opts);
        let (lx, _) = ltr.text_origin.unwrap();
        let (rx, _) = rtl.text_origin.unwrap();
        // distance from the start edge of the cell to the near edge of the text is the same
        assert_eq!(lx - 10.0, 190.0 - (rx + rtl.text_width));
        assert_eq!(rtl.cursor.x, 140.0);
    }

    #[test]
    fn justified_spaces_fill_the_line() {
        let (ctx, sel) = context(false);
        let cell = render(&ctx, sel, 100.0, "ab cd ef", &CellOptions::new().align(Align::Justify));
        let j = cell.justification.unwrap();
        assert_eq!(j.spaces, 2);
        let available = 100.0 - 4.0;
        assert!((j.text_width + j.spaces as f64 * j.gap - available).abs() < 1e-9);
        assert!(cell.code.contains(" Tw ET"));
        assert!(cell.code.ends_with(" BT 0 Tw ET"));
    }

    #[test]
    fn justify_without_spaces_is_left_aligned() {
        let (ctx, sel) = context(false);
        let cell = render(&ctx, sel, 100.0, "abcdef", &CellOptions::new().align(Align::Justify));
        assert!(cell.justification.is_none());
        assert!(!cell.code.contains("Tw"));
        assert_eq!(cell.text_origin.unwrap().0, 12.0);
        assert!(cell.text_width.is_finite());
    }

    #[test]
    fn stretching_squeezes_wide_text() {
        let (ctx, sel) = context(false);
        let cell = render(&ctx, sel, 24.0, "abcd", &CellOptions::new().stretch(Stretch::ScaleIfNeeded));
        // 40 wide text into 20 of room
        assert!(cell.code.contains("BT 50.000000 Tz ET"));
        assert!(cell.code.contains(" BT 100 Tz ET"));
        assert_eq!(cell.text_width, 20.0);

        let cell = render(&ctx, sel, 24.0, "abcd", &CellOptions::new().stretch(Stretch::SpacingIfNeeded));
        // 20 too wide over 3 gaps
        assert!(cell.code.contains(&format!("BT {} Tc ET", fmt_num(-20.0 / 3.0))));
    }

    #[test]
    fn fill_and_frame_share_one_rectangle() {
        let (ctx, sel) = context(false);
        let cell = render(&ctx, sel, 50.0, "", &CellOptions::new().fill(true).border("1"));
        assert!(cell.code.contains("10.000000 290.000000 50.000000 -12.500000 re B"));
        let cell = render(&ctx, sel, 50.0, "", &CellOptions::new().border("1"));
        assert!(cell.code.contains("re S"));
        assert!(cell.drawn.is_empty());
    }

    #[test]
    fn cell_alignment_table() {
        let (ctx, sel) = context(false);
        let opts = CellOptions::new().ignore_min_height(true);
        let at = |calign, valign| {
            let opts = opts.clone().calign(calign).valign(valign);
            render_cell(&ctx, Some((&Fixed, sel)), &NoReorder, 50.0, 20.0, &codes_of("a"), &opts)
                .unwrap()
                .text_origin
                .unwrap()
                .1
        };
        // cursor y is 10; padding top/bottom 0; ascent 8, descent 2
        assert_eq!(at(CAlign::Top, VAlign::Top), 18.0);
        assert_eq!(at(CAlign::Baseline, VAlign::Top), 10.0);
        assert_eq!(at(CAlign::Baseline, VAlign::Bottom), 10.0);
        assert_eq!(at(CAlign::Baseline, VAlign::Middle), 10.0);
        assert_eq!(at(CAlign::FontTop, VAlign::Middle), 18.0);
        assert_eq!(at(CAlign::FontBottom, VAlign::Bottom), 8.0);
        assert_eq!(at(CAlign::Bottom, VAlign::Top), -2.0);
        assert_eq!(at(CAlign::Center, VAlign::Middle), 13.0);
    }

    #[test]
    fn text_without_a_font_is_an_error() {
        let (ctx, _) = context(false);
        let err = render_cell(&ctx, None, &NoReorder, 10.0, 0.0, &codes_of("a"), &CellOptions::new());
        assert!(matches!(err, Err(PDFError::NoFontSelected { .. })));
    }
}
