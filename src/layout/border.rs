//! Cell borders and line styles.

use crate::colour::Colour;
use crate::content::fmt_num;
use crate::layout::margins::CellPadding;

/// Which sides of a box are stroked
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Sides {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Sides {
    pub const ALL: Sides = Sides {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };

    /// Parse side letters, e.g. `"LTR"`. Unknown letters are ignored.
    pub fn parse(letters: &str) -> Sides {
        let mut sides = Sides::default();
        for c in letters.chars() {
            match c.to_ascii_uppercase() {
                'L' => sides.left = true,
                'T' => sides.top = true,
                'R' => sides.right = true,
                'B' => sides.bottom = true,
                _ => {}
            }
        }
        sides
    }

    pub fn count(&self) -> usize {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .filter(|&&s| s)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn without_top(self) -> Sides {
        Sides { top: false, ..self }
    }

    pub fn without_bottom(self) -> Sides {
        Sides {
            bottom: false,
            ..self
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// A dash pattern; an empty pattern draws solid lines
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dash {
    pub pattern: Vec<f64>,
    pub phase: f64,
}

impl Dash {
    pub fn solid() -> Dash {
        Dash::default()
    }

    fn operator(&self, k: f64) -> String {
        let pattern: Vec<String> = self.pattern.iter().map(|v| fmt_num(v * k)).collect();
        format!("[{}] {} d", pattern.join(" "), fmt_num(self.phase * k))
    }
}

/// The complete stroking state of the page
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// line width in user units
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub dash: Dash,
    pub colour: Colour,
}

impl LineStyle {
    pub fn new(width: f64) -> LineStyle {
        LineStyle {
            width,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            dash: Dash::solid(),
            colour: Colour::default(),
        }
    }

    /// Operators selecting this whole style
    pub fn operators(&self, k: f64) -> String {
        format!(
            "{} w {} J {} j {} {}",
            fmt_num(self.width * k),
            self.cap as u8,
            self.join as u8,
            self.dash.operator(k),
            self.colour.stroke_operator()
        )
    }
}

/// A partial line style; unset fields keep the page's current value
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BorderStyle {
    pub width: Option<f64>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub dash: Option<Dash>,
    pub colour: Option<Colour>,
}

impl BorderStyle {
    /// Square caps and mitred joins, the style plain side borders are drawn with
    pub fn square() -> BorderStyle {
        BorderStyle {
            cap: Some(LineCap::Square),
            join: Some(LineJoin::Miter),
            ..Default::default()
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }

    /// The effective style, inheriting from `current`
    pub fn resolve(&self, current: &LineStyle) -> LineStyle {
        LineStyle {
            width: self.width.unwrap_or(current.width),
            cap: self.cap.unwrap_or(current.cap),
            join: self.join.unwrap_or(current.join),
            dash: self.dash.clone().unwrap_or_else(|| current.dash.clone()),
            colour: self.colour.unwrap_or(current.colour),
        }
    }

    /// Operators for only the fields that are set
    fn operators(&self, k: f64) -> String {
        let mut ops: Vec<String> = Vec::new();
        if let Some(w) = self.width {
            ops.push(format!("{} w", fmt_num(w * k)));
        }
        if let Some(cap) = self.cap {
            ops.push(format!("{} J", cap as u8));
        }
        if let Some(join) = self.join {
            ops.push(format!("{} j", join as u8));
        }
        if let Some(dash) = &self.dash {
            ops.push(dash.operator(k));
        }
        if let Some(colour) = &self.colour {
            ops.push(colour.stroke_operator());
        }
        ops.join(" ")
    }
}

/// Where a border line sits relative to the cell edge
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum BorderMode {
    /// centred on the edge
    #[default]
    Normal,
    /// outside the cell
    Ext,
    /// inside the cell
    Int,
}

/// Which part of a paragraph box a piece of border belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SegmentPosition {
    Whole,
    Start,
    Middle,
    End,
}

/// How a cell is outlined
#[derive(Debug, Default, Clone, PartialEq)]
pub enum BorderSpec {
    #[default]
    None,
    /// all four sides, drawn as one rectangle
    Frame,
    /// some sides in the current line style
    Sides(Sides),
    /// groups of sides, each with their own style
    Styled {
        groups: Vec<(Sides, BorderStyle)>,
        mode: BorderMode,
    },
}

impl From<&str> for BorderSpec {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "0" => BorderSpec::None,
            "1" => BorderSpec::Frame,
            letters => BorderSpec::from(Sides::parse(letters)),
        }
    }
}

impl From<bool> for BorderSpec {
    fn from(frame: bool) -> Self {
        if frame {
            BorderSpec::Frame
        } else {
            BorderSpec::None
        }
    }
}

impl From<Sides> for BorderSpec {
    fn from(sides: Sides) -> Self {
        match sides.count() {
            0 => BorderSpec::None,
            4 => BorderSpec::Frame,
            _ => BorderSpec::Sides(sides),
        }
    }
}

/// Coordinates needed to turn a border into operators
#[derive(Debug, Clone, Copy)]
pub(crate) struct BorderGeometry<'a> {
    pub k: f64,
    pub page_height: f64,
    pub rtl: bool,
    pub current: &'a LineStyle,
}

impl BorderSpec {
    pub fn is_none(&self) -> bool {
        match self {
            BorderSpec::None => true,
            BorderSpec::Sides(s) => s.is_empty(),
            BorderSpec::Styled { groups, .. } => groups.iter().all(|(s, _)| s.is_empty()),
            BorderSpec::Frame => false,
        }
    }

    fn groups(&self) -> (Vec<(Sides, Option<BorderStyle>)>, BorderMode) {
        match self {
            BorderSpec::None => (Vec::new(), BorderMode::Normal),
            BorderSpec::Frame => (vec![(Sides::ALL, None)], BorderMode::Normal),
            BorderSpec::Sides(s) => (vec![(*s, Some(BorderStyle::square()))], BorderMode::Normal),
            BorderSpec::Styled { groups, mode } => (
                groups.iter().map(|(s, st)| (*s, Some(st.clone()))).collect(),
                *mode,
            ),
        }
    }

    /// The border for one page or column segment of a box that was split.
    /// Open cells leave the edges at a break undrawn; closed cells keep the
    /// full border on every segment.
    pub fn for_position(&self, position: SegmentPosition, open_cells: bool) -> BorderSpec {
        if !open_cells || self.is_none() || position == SegmentPosition::Whole {
            return self.clone();
        }
        let cut = |s: Sides| match position {
            SegmentPosition::Start => s.without_bottom(),
            SegmentPosition::Middle => s.without_bottom().without_top(),
            SegmentPosition::End => s.without_top(),
            SegmentPosition::Whole => s,
        };
        match self {
            BorderSpec::Frame => BorderSpec::Sides(cut(Sides::ALL)),
            BorderSpec::Sides(s) => BorderSpec::from(cut(*s)),
            BorderSpec::Styled { groups, mode } => BorderSpec::Styled {
                groups: groups
                    .iter()
                    .map(|(s, st)| (cut(*s), st.clone()))
                    .filter(|(s, _)| !s.is_empty())
                    .collect(),
                mode: *mode,
            },
            BorderSpec::None => BorderSpec::None,
        }
    }

    /// Raise `padding` so text clears the border lines
    pub fn adjust_padding(&self, padding: &mut CellPadding, line_width: f64) {
        let (groups, mode) = self.groups();
        for (sides, style) in groups {
            let width = style.and_then(|s| s.width).unwrap_or(line_width);
            let adj = match mode {
                BorderMode::Ext => 0.0,
                BorderMode::Int => width,
                BorderMode::Normal => width / 2.0,
            };
            if sides.top {
                padding.top = padding.top.max(adj);
            }
            if sides.right {
                padding.right = padding.right.max(adj);
            }
            if sides.bottom {
                padding.bottom = padding.bottom.max(adj);
            }
            if sides.left {
                padding.left = padding.left.max(adj);
            }
        }
    }

    /// Stroke operators for the border of the box at (`x`, `y`), `w` × `h`,
    /// in user units with y growing downward. Under right-to-left layout `x`
    /// is the right edge of the box.
    pub(crate) fn operators(&self, x: f64, y: f64, w: f64, h: f64, geo: BorderGeometry) -> String {
        let k = geo.k;
        let (xe_l, xe_r) = if geo.rtl {
            ((x - w) * k, x * k)
        } else {
            (x * k, (x + w) * k)
        };
        let ye_bottom = (geo.page_height - (y + h)) * k;
        let ye_top = (geo.page_height - y) * k;

        let (groups, mode) = self.groups();
        let mut s = String::new();
        for (sides, style) in groups {
            if sides.is_empty() {
                continue;
            }
            let line_width = match &style {
                Some(style) => {
                    s.push_str(&style.operators(k));
                    s.push('\n');
                    style.resolve(geo.current).width
                }
                None => geo.current.width,
            };

            let off = match mode {
                BorderMode::Normal => 0.0,
                BorderMode::Ext => line_width / 2.0 * k,
                BorderMode::Int => -line_width / 2.0 * k,
            };
            let grow = match mode {
                BorderMode::Normal => 0.0,
                BorderMode::Ext => line_width,
                BorderMode::Int => -line_width,
            };
            let (x_l, x_r) = (xe_l - off, xe_r + off);
            let (y_t, y_b) = (ye_top + off, ye_bottom - off);
            // corners: L = bottom-left, T = top-left, R = top-right, B = bottom-right
            let l = (x_l, y_b);
            let t = (x_l, y_t);
            let r = (x_r, y_t);
            let b = (x_r, y_b);

            let path = |points: &[(f64, f64)]| -> String {
                let mut p = String::new();
                for (i, (px, py)) in points.iter().enumerate() {
                    let op = if i == 0 { "m" } else { "l" };
                    p.push_str(&format!("{} {} {op} ", fmt_num(*px), fmt_num(*py)));
                }
                p.push_str("S ");
                p
            };

            let Sides {
                left,
                top,
                right,
                bottom,
            } = sides;
            match sides.count() {
                4 => s.push_str(&format!(
                    "{} {} {} {} re S ",
                    fmt_num(t.0),
                    fmt_num(t.1),
                    fmt_num((w + grow) * k),
                    fmt_num(-(h + grow) * k)
                )),
                3 if !bottom => s.push_str(&path(&[l, t, r, b])),
                3 if !left => s.push_str(&path(&[t, r, b, l])),
                3 if !top => s.push_str(&path(&[r, b, l, t])),
                3 => s.push_str(&path(&[b, l, t, r])),
                2 if left && top => s.push_str(&path(&[l, t, r])),
                2 if top && right => s.push_str(&path(&[t, r, b])),
                2 if right && bottom => s.push_str(&path(&[r, b, l])),
                2 if bottom && left => s.push_str(&path(&[b, l, t])),
                2 if left && right => {
                    s.push_str(&path(&[l, t]));
                    s.push_str(&path(&[r, b]));
                }
                2 => {
                    s.push_str(&path(&[t, r]));
                    s.push_str(&path(&[b, l]));
                }
                _ if left => s.push_str(&path(&[l, t])),
                _ if top => s.push_str(&path(&[t, r])),
                _ if right => s.push_str(&path(&[r, b])),
                _ => s.push_str(&path(&[b, l])),
            }

            if style.is_some() {
                s.push('\n');
                s.push_str(&geo.current.operators(k));
                s.push('\n');
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(current: &LineStyle) -> BorderGeometry<'_> {
        BorderGeometry {
            k: 1.0,
            page_height: 100.0,
            rtl: false,
            current,
        }
    }

    #[test]
    fn strings_convert_to_specs() {
        assert_eq!(BorderSpec::from(""), BorderSpec::None);
        assert_eq!(BorderSpec::from("1"), BorderSpec::Frame);
        assert_eq!(BorderSpec::from("BTRL"), BorderSpec::Frame);
        assert_eq!(
            BorderSpec::from("lt"),
            BorderSpec::Sides(Sides {
                left: true,
                top: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn split_frame_opens_at_the_break() {
        let frame = BorderSpec::Frame;
        assert_eq!(
            frame.for_position(SegmentPosition::Start, true),
            BorderSpec::Sides(Sides::parse("LTR"))
        );
        assert_eq!(
            frame.for_position(SegmentPosition::Middle, true),
            BorderSpec::Sides(Sides::parse("LR"))
        );
        assert_eq!(
            frame.for_position(SegmentPosition::End, true),
            BorderSpec::Sides(Sides::parse("LRB"))
        );
        assert_eq!(frame.for_position(SegmentPosition::Start, false), frame);
        assert_eq!(
            BorderSpec::from("T").for_position(SegmentPosition::Middle, true),
            BorderSpec::None
        );
    }

    #[test]
    fn three_sides_start_at_the_open_corner() {
        let current = LineStyle::new(1.0);
        let ops = BorderSpec::Sides(Sides::parse("LTR")).operators(10.0, 10.0, 20.0, 5.0, geo(&current));
        assert!(ops.contains(
            "10.000000 85.000000 m 10.000000 90.000000 l 30.000000 90.000000 l 30.000000 85.000000 l S "
        ));
        // style is restored afterwards
        assert!(ops.ends_with(&format!("\n{}\n", current.operators(1.0))));
    }

    #[test]
    fn opposite_sides_are_separate_paths() {
        let current = LineStyle::new(1.0);
        let ops = BorderSpec::Sides(Sides::parse("LR")).operators(0.0, 0.0, 10.0, 10.0, geo(&current));
        assert_eq!(ops.matches(" m ").count(), 2);
        assert_eq!(ops.matches("S ").count(), 2);
    }

    #[test]
    fn external_mode_grows_the_rectangle() {
        let current = LineStyle::new(2.0);
        let border = BorderSpec::Styled {
            groups: vec![(Sides::ALL, BorderStyle::default())],
            mode: BorderMode::Ext,
        };
        let ops = border.operators(10.0, 10.0, 20.0, 10.0, geo(&current));
        assert!(ops.contains("9.000000 91.000000 22.000000 -12.000000 re S"));
    }

    #[test]
    fn padding_clears_the_line() {
        let mut padding = CellPadding::symmetric(0.0, 1.0);
        BorderSpec::from("TB").adjust_padding(&mut padding, 0.5);
        assert_eq!(padding, CellPadding::trbl(0.25, 1.0, 0.25, 1.0));

        let mut padding = CellPadding::empty();
        let border = BorderSpec::Styled {
            groups: vec![(Sides::parse("L"), BorderStyle::default().width(2.0))],
            mode: BorderMode::Int,
        };
        border.adjust_padding(&mut padding, 0.5);
        assert_eq!(padding.left, 2.0);
        assert_eq!(padding.right, 0.0);
    }
}
