//! Layout state of a document session: where the cursor is, what the page
//! looks like, and the graphic state text and borders are drawn with.

use super::{
    border::LineStyle,
    columns::ColumnLayout,
    margins::{CellMargin, CellPadding},
};
use crate::{
    bidi::Direction, colour::Colour, font::FontId, page::PageGeometry,
    transform::TransformStack, Document,
};
use std::ops::{Deref, DerefMut};

/// Which part of the page content is currently produced
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Region {
    #[default]
    Body,
    Header,
    Footer,
}

/// Current drawing position and the height of the last line drawn
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
    pub last_h: f64,
}

/// The selected font, with its size-dependent metrics in user units
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontSelection {
    pub id: FontId,
    pub size_pt: f64,
    pub size: f64,
    pub ascent: f64,
    /// distance below the baseline, positive
    pub descent: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TextDecoration {
    pub underline: bool,
    pub line_through: bool,
    pub overline: bool,
}

/// How glyph outlines are painted
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TextRenderMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    Clip,
}

/// Everything that is saved before, and restored after, a nested rendering
/// such as a page header
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicState {
    pub font: Option<FontSelection>,
    /// horizontal scaling in percent
    pub stretching: f64,
    /// extra character spacing in user units
    pub spacing: f64,
    pub line_style: LineStyle,
    pub fill_colour: Colour,
    pub text_colour: Colour,
    pub render_mode: TextRenderMode,
    pub text_stroke_width: f64,
    pub decoration: TextDecoration,
    pub cell_padding: CellPadding,
    pub cell_margin: CellMargin,
    pub cell_height_ratio: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    pub rtl: bool,
    pub temp_direction: Option<Direction>,
    pub columns: ColumnLayout,
}

impl GraphicState {
    /// Whether text needs its own colour, different from the fill colour
    pub fn colour_flag(&self) -> bool {
        self.fill_colour != self.text_colour
    }

    /// Direction forced on the bidi algorithm, if any
    pub fn base_direction(&self) -> Option<Direction> {
        match self.temp_direction {
            Some(d) => Some(d),
            None if self.rtl => Some(Direction::RightToLeft),
            None => None,
        }
    }
}

/// The full, explicit layout state of a document session
#[derive(Debug, Clone)]
pub struct LayoutContext {
    /// points per user unit
    pub k: f64,
    /// geometry of the current page
    pub page: PageGeometry,
    pub cursor: CursorState,
    pub gs: GraphicState,
    pub region: Region,
    pub transforms: TransformStack,
    pub header_margin: f64,
    pub footer_margin: f64,
    pub open_cells: bool,
}

impl LayoutContext {
    /// Height of a line for a font size: size × ratio plus vertical padding
    pub fn cell_height(&self, font_size: f64, padding: bool) -> f64 {
        let mut h = font_size * self.gs.cell_height_ratio;
        if padding {
            h += self.gs.cell_padding.top + self.gs.cell_padding.bottom;
        }
        (h * 1_000_000.0).round() / 1_000_000.0
    }

    pub fn font_size(&self) -> f64 {
        self.gs.font.map(|f| f.size).unwrap_or(0.0)
    }

    pub fn break_trigger(&self) -> f64 {
        self.page.break_trigger()
    }

    pub fn in_body(&self) -> bool {
        self.region == Region::Body
    }

    /// Width from the cursor to the far margin
    pub fn remaining_width(&self) -> f64 {
        if self.gs.rtl {
            self.cursor.x - self.gs.left_margin
        } else {
            self.page.width - self.gs.right_margin - self.cursor.x
        }
    }

    /// Width between the current margins
    pub fn page_body_width(&self) -> f64 {
        self.page.width - self.gs.left_margin - self.gs.right_margin
    }

    /// The x coordinate lines start at
    pub fn line_start(&self) -> f64 {
        if self.gs.rtl {
            self.page.width - self.gs.right_margin
        } else {
            self.gs.left_margin
        }
    }
}

/// What a [`StateGuard`] puts back when it goes out of scope
#[derive(Debug, Clone)]
pub(crate) enum Checkpoint {
    /// the complete graphic state and the last line height
    Graphics(Box<GraphicState>, f64),
    /// cell padding and cell margins only
    CellSpacing(CellPadding, CellMargin),
}

/// Gives access to the document while a checkpoint is held, and restores
/// the checkpoint when dropped, including on early returns
pub(crate) struct StateGuard<'a> {
    doc: &'a mut Document,
    checkpoint: Option<Checkpoint>,
}

impl<'a> StateGuard<'a> {
    pub(crate) fn new(doc: &'a mut Document, checkpoint: Checkpoint) -> StateGuard<'a> {
        StateGuard {
            doc,
            checkpoint: Some(checkpoint),
        }
    }
}

impl Deref for StateGuard<'_> {
    type Target = Document;

    fn deref(&self) -> &Self::Target {
        self.doc
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.doc
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        match self.checkpoint.take() {
            Some(Checkpoint::Graphics(gs, last_h)) => {
                self.doc.ctx.gs = *gs;
                self.doc.ctx.cursor.last_h = last_h;
            }
            Some(Checkpoint::CellSpacing(padding, margin)) => {
                self.doc.ctx.gs.cell_padding = padding;
                self.doc.ctx.gs.cell_margin = margin;
            }
            None => {}
        }
    }
}
