//! 2D transformation matrices and the stack of transformations active on a page.

use crate::content::fmt_num;
use crate::rect::Rect;

/// A transformation matrix, in PDF page space (points, origin at the bottom-left).
///
/// The matrix is represented as [a, b, c, d, e, f] corresponding to:
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (no transformation)
    pub fn identity() -> Self {
        Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Move by (`x`, `y`) points
    pub fn translate(x: f64, y: f64) -> Self {
        Transform {
            e: x,
            f: y,
            ..Self::identity()
        }
    }

    /// Scale by `sx`, `sy` around the point (`x`, `y`)
    pub fn scale_about(sx: f64, sy: f64, x: f64, y: f64) -> Self {
        Transform {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: x * (1.0 - sx),
            f: y * (1.0 - sy),
        }
    }

    /// Rotate counter-clockwise by `angle` radians around the point (`x`, `y`)
    pub fn rotate_about(angle: f64, x: f64, y: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Transform {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: x + sin * y - cos * x,
            f: y - cos * y - sin * x,
        }
    }

    /// Combine this transform with another (self * other): `self` applies first
    pub fn then(self, other: Transform) -> Self {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// The `cm` operator concatenating this matrix
    pub fn operator(&self) -> String {
        format!(
            "{} {} {} {} {} {} cm",
            fmt_num(self.a),
            fmt_num(self.b),
            fmt_num(self.c),
            fmt_num(self.d),
            fmt_num(self.e),
            fmt_num(self.f)
        )
    }
}

/// Nested transformation levels; each level collects the matrices applied
/// since the matching start of a transformation
#[derive(Debug, Default, Clone)]
pub struct TransformStack {
    levels: Vec<Vec<Transform>>,
}

impl TransformStack {
    pub fn push_level(&mut self) {
        self.levels.push(Vec::new());
    }

    /// Returns `false` when there was no level to close
    pub fn pop_level(&mut self) -> bool {
        self.levels.pop().is_some()
    }

    pub fn push(&mut self, transform: Transform) {
        match self.levels.last_mut() {
            Some(level) => level.push(transform),
            None => self.levels.push(vec![transform]),
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_identity(&self) -> bool {
        self.levels.iter().all(|l| l.is_empty())
    }

    /// The combined matrix mapping drawn coordinates to page coordinates
    pub fn ctm(&self) -> Transform {
        self.levels
            .iter()
            .flatten()
            .fold(Transform::identity(), |acc, t| t.then(acc))
    }

    /// Bounding box of a rectangle after transformation
    pub fn map_rect(&self, rect: Rect) -> Rect {
        if self.is_identity() {
            return rect;
        }
        let ctm = self.ctm();
        let corners = [
            ctm.apply(rect.x1.0, rect.y1.0),
            ctm.apply(rect.x2.0, rect.y1.0),
            ctm.apply(rect.x2.0, rect.y2.0),
            ctm.apply(rect.x1.0, rect.y2.0),
        ];
        Rect::bounding(&corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pt;

    #[test]
    fn later_transforms_apply_first() {
        let mut stack = TransformStack::default();
        stack.push_level();
        stack.push(Transform::translate(10.0, 0.0));
        stack.push(Transform::scale_about(2.0, 2.0, 0.0, 0.0));
        // drawn point is scaled by the inner matrix, then moved by the outer one
        let (x, y) = stack.ctm().apply(1.0, 1.0);
        assert!((x - 12.0).abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
        assert!(stack.pop_level());
        assert!(stack.is_identity());
        assert!(!stack.pop_level());
    }

    #[test]
    fn rotated_rect_maps_to_its_bounding_box() {
        let mut stack = TransformStack::default();
        stack.push(Transform::rotate_about(std::f64::consts::FRAC_PI_2, 0.0, 0.0));
        let r = stack.map_rect(Rect {
            x1: Pt(0.0),
            y1: Pt(0.0),
            x2: Pt(10.0),
            y2: Pt(5.0),
        });
        assert!((r.x1.0 + 5.0).abs() < 1e-9);
        assert!((r.x2.0).abs() < 1e-9);
        assert!((r.y2.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_about_a_point_keeps_it_fixed() {
        let t = Transform::rotate_about(0.7, 30.0, 40.0);
        let (x, y) = t.apply(30.0, 40.0);
        assert!((x - 30.0).abs() < 1e-9 && (y - 40.0).abs() < 1e-9);
    }
}
