use crate::{
    bidi::{BidiReorder, Direction, UnicodeBidi},
    colour::Colour,
    config::DocumentConfig,
    content::{fmt_num, ContentSink},
    font::{Font, FontId},
    info::Info,
    layout::{
        CellMargin, CellPadding, ColumnLayout, CursorState, FontSelection, GraphicState,
        LayoutContext, LineStyle, Margins, PageHooks, Region, TextDecoration, TextRenderMode,
    },
    page::{AnnotationSink, LinkTarget, Page, PageGeometry, PageWriteContext},
    rect::Rect,
    refs::{ObjectReferences, RefType},
    transform::{Transform, TransformStack},
    PDFError,
};
use id_arena::Arena;
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// A document session: the pages produced so far and the layout state the
/// next drawing call starts from. Renders out with a call to [Document::write].
pub struct Document {
    pub info: Option<Info>,
    pub fonts: Arena<Font>,
    pub(crate) pages: Vec<Page>,
    /// current page, 1-based; 0 before the first page
    pub(crate) page: usize,
    pub(crate) page_open: bool,
    pub(crate) ctx: LayoutContext,
    /// graphic state headers and footers start from
    pub(crate) default_gs: GraphicState,
    pub(crate) config: DocumentConfig,
    pub(crate) hooks: Option<Box<dyn PageHooks>>,
    pub(crate) bidi: Box<dyn BidiReorder>,
    pub(crate) header_font: Option<(FontId, f64)>,
    pub(crate) footer_font: Option<(FontId, f64)>,
    aborted: bool,
}

impl Default for Document {
    fn default() -> Self {
        Document::new(DocumentConfig::default())
    }
}

impl Document {
    pub fn new(config: DocumentConfig) -> Document {
        let unit = config.unit;
        let k = unit.scale_factor();
        let (width, height) = config.orientation.apply(config.page_size);
        let left = unit.from_pt(config.margin_left);
        let right = unit.from_pt(config.margin_right);
        let top = unit.from_pt(config.margin_top);

        let gs = GraphicState {
            font: None,
            stretching: 100.0,
            spacing: 0.0,
            line_style: LineStyle::new(unit.from_pt(config.line_width)),
            fill_colour: Colour::default(),
            text_colour: Colour::default(),
            render_mode: TextRenderMode::Fill,
            text_stroke_width: 0.0,
            decoration: TextDecoration::default(),
            cell_padding: Margins::symmetric(0.0, unit.from_pt(config.cell_padding)),
            cell_margin: Margins::empty(),
            cell_height_ratio: config.cell_height_ratio,
            left_margin: left,
            right_margin: right,
            rtl: config.rtl,
            temp_direction: None,
            columns: ColumnLayout::default(),
        };
        let page = PageGeometry {
            width: unit.from_pt(width),
            height: unit.from_pt(height),
            orientation: config.orientation,
            margins: Margins::trbl(top, right, unit.from_pt(config.break_margin), left),
            auto_page_break: config.auto_page_break,
        };
        let mut ctx = LayoutContext {
            k,
            page,
            cursor: CursorState::default(),
            gs: gs.clone(),
            region: Region::Body,
            transforms: TransformStack::default(),
            header_margin: unit.from_pt(config.header_margin),
            footer_margin: unit.from_pt(config.footer_margin),
            open_cells: config.open_cells,
        };
        ctx.cursor.x = ctx.line_start();
        ctx.cursor.y = top;

        Document {
            info: None,
            fonts: Arena::new(),
            pages: Vec::new(),
            page: 0,
            page_open: false,
            ctx,
            default_gs: gs,
            config,
            hooks: None,
            bidi: Box::new(UnicodeBidi),
            header_font: None,
            footer_font: None,
            aborted: false,
        }
    }

    /// Run a layout operation; a failure aborts the whole document
    pub(crate) fn run<T>(
        &mut self,
        op: impl FnOnce(&mut Document) -> Result<T, PDFError>,
    ) -> Result<T, PDFError> {
        if self.aborted {
            return Err(PDFError::Aborted);
        }
        let result = op(self);
        if let Err(e) = &result {
            log::error!("aborting document: {e}");
            self.aborted = true;
            self.pages.clear();
            self.page = 0;
            self.page_open = false;
        }
        result
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub(crate) fn require_page(&self, operation: &'static str) -> Result<(), PDFError> {
        if self.page == 0 || self.page > self.pages.len() {
            return Err(PDFError::NoPage { operation });
        }
        Ok(())
    }

    pub(crate) fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.page.checked_sub(1).and_then(|p| self.pages.get_mut(p))
    }

    /// Append operators to the current page, if there is one
    pub(crate) fn out(&mut self, operators: &str) {
        if let Some(page) = self.current_page_mut() {
            page.append(operators);
        }
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Install header, footer and page break callbacks
    pub fn set_hooks<H: PageHooks + 'static>(&mut self, hooks: H) {
        self.hooks = Some(Box::new(hooks));
    }

    /// Replace the bidirectional reordering used for text
    pub fn set_bidi<B: BidiReorder + 'static>(&mut self, bidi: B) {
        self.bidi = Box::new(bidi);
    }

    /// The layout state the next call starts from
    pub fn context(&self) -> &LayoutContext {
        &self.ctx
    }

    /// Points per user unit
    pub fn scale_factor(&self) -> f64 {
        self.ctx.k
    }

    pub fn page_width(&self) -> f64 {
        self.ctx.page.width
    }

    pub fn page_height(&self) -> f64 {
        self.ctx.page.height
    }

    /// Operators written to page `n` (1-based) so far
    pub fn page_content(&self, n: usize) -> Option<String> {
        n.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(Page::content)
    }

    pub fn page(&self, n: usize) -> Option<&Page> {
        n.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    // fonts

    /// Add a font to the document structure. The returned id stays valid for
    /// the lifetime of the document.
    pub fn add_font(&mut self, font: Font) -> FontId {
        self.fonts.alloc(font)
    }

    /// Select a font and its size in points
    pub fn set_font(&mut self, id: FontId, size_pt: f64) -> Result<(), PDFError> {
        self.run(|doc| doc.set_font_impl(id, size_pt))
    }

    pub(crate) fn set_font_impl(&mut self, id: FontId, size_pt: f64) -> Result<(), PDFError> {
        self.select_font(id, size_pt, true)
    }

    /// Make `id` at `size_pt` the current font, writing the selection to the
    /// page only when `emit` is set
    pub(crate) fn select_font(&mut self, id: FontId, size_pt: f64, emit: bool) -> Result<(), PDFError> {
        let font = self.fonts.get(id).ok_or(PDFError::UnknownFont(id.index()))?;
        let size = size_pt / self.ctx.k;
        let (ascent, descent) = font.metrics().ascent_descent();
        let selection = FontSelection {
            id,
            size_pt,
            size,
            ascent: if ascent > 0.0 {
                ascent * size / 1000.0
            } else {
                0.85 * size
            },
            descent: if descent <= 0.0 {
                -descent * size / 1000.0
            } else {
                0.15 * size
            },
        };
        self.ctx.gs.font = Some(selection);
        if emit && self.page > 0 {
            self.out(&format!(
                "BT /F{} {} Tf ET",
                id.index() + 1,
                fmt_num(size_pt)
            ));
        }
        Ok(())
    }

    /// Change the size of the selected font, in points
    pub fn set_font_size(&mut self, size_pt: f64) -> Result<(), PDFError> {
        self.run(|doc| {
            let id = doc
                .ctx
                .gs
                .font
                .map(|f| f.id)
                .ok_or(PDFError::NoFontSelected { operation: "set_font_size" })?;
            doc.set_font_impl(id, size_pt)
        })
    }

    pub fn font_size(&self) -> f64 {
        self.ctx.font_size()
    }

    pub fn font_size_pt(&self) -> f64 {
        self.ctx.gs.font.map(|f| f.size_pt).unwrap_or(0.0)
    }

    /// Horizontal scaling of text, in percent
    pub fn set_font_stretching(&mut self, percent: f64) {
        self.ctx.gs.stretching = percent;
    }

    /// Extra space between characters, in user units
    pub fn set_font_spacing(&mut self, spacing: f64) {
        self.ctx.gs.spacing = spacing;
    }

    pub fn set_text_decoration(&mut self, decoration: TextDecoration) {
        self.ctx.gs.decoration = decoration;
    }

    pub fn set_text_render_mode(&mut self, mode: TextRenderMode, stroke_width: f64) {
        self.ctx.gs.render_mode = mode;
        self.ctx.gs.text_stroke_width = stroke_width;
    }

    /// Font used by headers, in points
    pub fn set_header_font(&mut self, id: FontId, size_pt: f64) {
        self.header_font = Some((id, size_pt));
    }

    pub fn set_footer_font(&mut self, id: FontId, size_pt: f64) {
        self.footer_font = Some((id, size_pt));
    }

    // colours and lines

    pub fn set_draw_colour<C: Into<Colour>>(&mut self, colour: C) {
        let colour = colour.into();
        self.ctx.gs.line_style.colour = colour;
        if self.page > 0 {
            self.out(&colour.stroke_operator());
        }
    }

    pub fn set_fill_colour<C: Into<Colour>>(&mut self, colour: C) {
        let colour = colour.into();
        self.ctx.gs.fill_colour = colour;
        if self.page > 0 {
            self.out(&colour.fill_operator());
        }
    }

    pub fn set_text_colour<C: Into<Colour>>(&mut self, colour: C) {
        self.ctx.gs.text_colour = colour.into();
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.ctx.gs.line_style.width = width;
        if self.page > 0 {
            self.out(&format!("{} w", fmt_num(width * self.ctx.k)));
        }
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.ctx.gs.line_style = style;
        if self.page > 0 {
            let ops = self.ctx.gs.line_style.operators(self.ctx.k);
            self.out(&ops);
        }
    }

    // cells

    /// Left and right cell padding
    pub fn set_cell_padding(&mut self, padding: f64) {
        self.ctx.gs.cell_padding.left = padding;
        self.ctx.gs.cell_padding.right = padding;
    }

    pub fn set_cell_paddings(&mut self, padding: CellPadding) {
        self.ctx.gs.cell_padding = padding;
    }

    pub fn cell_paddings(&self) -> CellPadding {
        self.ctx.gs.cell_padding
    }

    pub fn set_cell_margins(&mut self, margin: CellMargin) {
        self.ctx.gs.cell_margin = margin;
    }

    pub fn cell_margins(&self) -> CellMargin {
        self.ctx.gs.cell_margin
    }

    /// Line height as a multiple of the font size
    pub fn set_cell_height_ratio(&mut self, ratio: f64) {
        self.ctx.gs.cell_height_ratio = ratio;
    }

    /// Height of one line of text at `font_size`, with vertical padding
    pub fn cell_height(&self, font_size: f64) -> f64 {
        self.ctx.cell_height(font_size, true)
    }

    // margins

    /// Set the left, top and (optionally) right page margins. The values also
    /// become the page's original margins.
    pub fn set_margins(&mut self, left: f64, top: f64, right: Option<f64>) {
        let right = right.unwrap_or(left);
        self.ctx.gs.left_margin = left;
        self.ctx.gs.right_margin = right;
        self.ctx.page.margins.left = left;
        self.ctx.page.margins.right = right;
        self.ctx.page.margins.top = top;
        self.sync_geometry();
    }

    pub fn set_left_margin(&mut self, margin: f64) {
        self.ctx.gs.left_margin = margin;
        if self.page > 0 && self.ctx.cursor.x < margin {
            self.ctx.cursor.x = margin;
        }
    }

    pub fn set_right_margin(&mut self, margin: f64) {
        self.ctx.gs.right_margin = margin;
        let limit = self.ctx.page.width - margin;
        if self.page > 0 && self.ctx.cursor.x > limit {
            self.ctx.cursor.x = limit;
        }
    }

    pub fn set_top_margin(&mut self, margin: f64) {
        self.ctx.page.margins.top = margin;
        if self.page > 0 && self.ctx.cursor.y < margin {
            self.ctx.cursor.y = margin;
        }
        self.sync_geometry();
    }

    /// Enable or disable automatic page breaks, with the distance from the
    /// bottom edge at which they happen
    pub fn set_auto_page_break(&mut self, auto: bool, margin: f64) {
        self.ctx.page.auto_page_break = auto;
        self.ctx.page.margins.bottom = margin;
        self.sync_geometry();
    }

    pub fn set_header_margin(&mut self, margin: f64) {
        self.ctx.header_margin = margin;
    }

    pub fn set_footer_margin(&mut self, margin: f64) {
        self.ctx.footer_margin = margin;
    }

    /// Current left, top, right and bottom page margins
    pub fn margins(&self) -> Margins {
        Margins::trbl(
            self.ctx.page.margins.top,
            self.ctx.gs.right_margin,
            self.ctx.page.margins.bottom,
            self.ctx.gs.left_margin,
        )
    }

    /// Keep the stored geometry of the current page in step with the context
    fn sync_geometry(&mut self) {
        let geometry = self.ctx.page.clone();
        if let Some(page) = self.current_page_mut() {
            page.geometry = geometry;
        }
    }

    // direction

    pub fn set_rtl(&mut self, rtl: bool) {
        self.ctx.gs.rtl = rtl;
    }

    pub fn rtl(&self) -> bool {
        self.ctx.gs.rtl
    }

    /// Force the base direction of text, or `None` to detect it again
    pub fn set_temp_rtl(&mut self, direction: Option<Direction>) {
        self.ctx.gs.temp_direction = direction;
    }

    // cursor

    /// Horizontal position, measured from the right edge under right-to-left layout
    pub fn get_x(&self) -> f64 {
        if self.ctx.gs.rtl {
            self.ctx.page.width - self.ctx.cursor.x
        } else {
            self.ctx.cursor.x
        }
    }

    pub fn get_y(&self) -> f64 {
        self.ctx.cursor.y
    }

    /// Move horizontally. Negative values are measured from the far edge.
    pub fn set_x(&mut self, x: f64) {
        let w = self.ctx.page.width;
        let x = match (self.ctx.gs.rtl, x >= 0.0) {
            (true, true) => w - x,
            (true, false) => x.abs(),
            (false, true) => x,
            (false, false) => w + x,
        };
        self.ctx.cursor.x = x;
    }

    /// Move vertically, optionally back to the start of the line. Negative
    /// values are measured from the bottom edge.
    pub fn set_y(&mut self, y: f64, reset_x: bool) {
        if reset_x {
            self.ctx.cursor.x = self.ctx.line_start();
        }
        let h = self.ctx.page.height;
        let y = if y >= 0.0 { y } else { h + y };
        self.ctx.cursor.y = y.clamp(0.0, h);
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.set_y(y, false);
        self.set_x(x);
    }

    /// Height of the last line drawn
    pub fn last_h(&self) -> f64 {
        self.ctx.cursor.last_h
    }

    pub fn set_last_h(&mut self, h: f64) {
        self.ctx.cursor.last_h = h;
    }

    /// Go to the start of the next line, `h` below (the last line height by default)
    pub fn ln(&mut self, h: Option<f64>) {
        let gs = &self.ctx.gs;
        if gs.columns.is_multi() {
            if let Some(col) = gs.columns.bounds(gs.columns.current) {
                let col_x = self.column_start_x(gs.columns.current);
                if self.ctx.cursor.y == self.column_top(col.y) && self.ctx.cursor.x == col_x {
                    // already at the top of the column
                    return;
                }
            }
        }
        self.ctx.cursor.x = self.ctx.line_start();
        self.ctx.cursor.y += h.unwrap_or(self.ctx.cursor.last_h);
    }

    // transformations

    /// Start a group of transformations, ended by [Document::stop_transform]
    pub fn start_transform(&mut self) {
        self.out("q");
        self.ctx.transforms.push_level();
    }

    pub fn stop_transform(&mut self) {
        if self.ctx.transforms.pop_level() {
            self.out("Q");
        }
    }

    fn transform(&mut self, t: Transform) {
        self.out(&t.operator());
        self.ctx.transforms.push(t);
    }

    /// Move by (`tx`, `ty`) user units, y growing downward
    pub fn translate(&mut self, tx: f64, ty: f64) {
        let k = self.ctx.k;
        self.transform(Transform::translate(tx * k, -ty * k));
    }

    /// Scale by `sx`, `sy` percent around the point (`x`, `y`)
    pub fn scale(&mut self, sx: f64, sy: f64, x: f64, y: f64) {
        let k = self.ctx.k;
        let origin_y = (self.ctx.page.height - y) * k;
        self.transform(Transform::scale_about(sx / 100.0, sy / 100.0, x * k, origin_y));
    }

    /// Rotate counter-clockwise by `degrees` around the point (`x`, `y`)
    pub fn rotate(&mut self, degrees: f64, x: f64, y: f64) {
        let k = self.ctx.k;
        let origin_y = (self.ctx.page.height - y) * k;
        self.transform(Transform::rotate_about(degrees.to_radians(), x * k, origin_y));
    }

    // links

    /// Make the area at (`x`, `y`), `w` × `h` of the current page clickable
    pub fn add_link(&mut self, x: f64, y: f64, w: f64, h: f64, target: LinkTarget) -> Result<(), PDFError> {
        self.run(|doc| {
            doc.require_page("add_link")?;
            doc.link_area(x, y, w, h, target);
            Ok(())
        })
    }

    pub(crate) fn link_area(&mut self, x: f64, y: f64, w: f64, h: f64, target: LinkTarget) {
        let k = self.ctx.k;
        let page_h = self.ctx.page.height;
        let rect = Rect::bounding(&[(x * k, (page_h - y - h) * k), ((x + w) * k, (page_h - y) * k)]);
        let rect = self.ctx.transforms.map_rect(rect);
        if let Some(page) = self.current_page_mut() {
            page.register_link(rect, target);
        }
    }

    /// Write the entire document to the writer, closing the last page first.
    /// The document is rendered in memory before it is written out.
    pub fn write<W: Write>(mut self, mut w: W) -> Result<(), PDFError> {
        if self.aborted {
            return Err(PDFError::Aborted);
        }
        self.run(|doc| doc.end_page())?;

        let Document {
            info,
            fonts,
            pages,
            ctx,
            config,
            ..
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        let target = PageWriteContext {
            k: ctx.k,
            parent: page_tree_id,
            font_count: fonts.len(),
            compress: config.compress,
            pages: page_refs
                .iter()
                .zip(pages.iter())
                .map(|(r, p)| (*r, p.geometry.height))
                .collect(),
        };
        for (page_index, page) in pages.iter().enumerate() {
            page.write(&mut refs, page_index, &target, &mut writer)?;
        }
        log::debug!("wrote {} page(s), {} font(s)", pages.len(), fonts.len());

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        units::{Pt, Unit},
        CoreFont,
    };

    fn doc() -> Document {
        let mut config = DocumentConfig::new();
        config.unit(Unit::Point).margins(Pt(10.0), Pt(10.0), Pt(10.0));
        Document::new(config)
    }

    #[test]
    fn font_metrics_follow_the_size() {
        let mut doc = doc();
        let id = doc.add_font(CoreFont::courier().into());
        doc.set_font(id, 10.0).unwrap();
        let f = doc.context().gs.font.unwrap();
        assert_eq!(f.size, 10.0);
        assert!((f.ascent - 6.29).abs() < 1e-9);
        assert!((f.descent - 1.57).abs() < 1e-9);
    }

    #[test]
    fn rtl_x_is_measured_from_the_right() {
        let mut doc = doc();
        doc.set_rtl(true);
        doc.set_x(30.0);
        assert_eq!(doc.context().cursor.x, doc.page_width() - 30.0);
        assert_eq!(doc.get_x(), 30.0);
    }

    #[test]
    fn negative_y_counts_from_the_bottom() {
        let mut doc = doc();
        doc.set_y(-20.0, true);
        assert_eq!(doc.get_y(), doc.page_height() - 20.0);
        assert_eq!(doc.get_x(), 10.0);
    }

    #[test]
    fn errors_abort_the_document() {
        let mut doc = doc();
        let err = doc.set_font_size(12.0);
        assert!(matches!(err, Err(PDFError::NoFontSelected { .. })));
        assert!(doc.is_aborted());
        assert!(matches!(doc.add_page(), Err(PDFError::Aborted)));
    }

    #[test]
    fn links_are_mapped_through_transforms() {
        let mut doc = doc();
        doc.add_page().unwrap();
        doc.start_transform();
        doc.translate(5.0, 5.0);
        doc.add_link(10.0, 10.0, 20.0, 10.0, LinkTarget::Uri("https://example.com".into()))
            .unwrap();
        doc.stop_transform();
        let page = doc.page(1).unwrap();
        let rect = page.links[0].rect;
        let h = doc.page_height();
        assert_eq!(rect.x1, Pt(15.0));
        assert_eq!(rect.y2, Pt(h - 10.0 - 5.0));
    }
}
