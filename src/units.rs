//! Units of measure.
//!
//! PDF content is expressed in points (1/72 inch). Layout calls on a
//! [`Document`](crate::Document) are made in *user units*, chosen through [`Unit`];
//! the scale factor `k` converts user units to points.

use crate::PDFError;
use derive_more::{Add, AddAssign, Display, From, Into, MulAssign, Sub, Sum};
use std::ops::{Div, Mul, Neg};
use std::str::FromStr;

/// A length in PDF points
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, MulAssign, Sum, From, Into, Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f64);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, From, Into, Display)]
#[display("{_0}mm")]
pub struct Mm(pub f64);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, From, Into, Display)]
#[display("{_0}in")]
pub struct In(pub f64);

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * 72.0)
    }
}

impl From<Pt> for Mm {
    fn from(value: Pt) -> Self {
        Mm(value.0 * 25.4 / 72.0)
    }
}

impl From<Pt> for In {
    fn from(value: Pt) -> Self {
        In(value.0 / 72.0)
    }
}

impl Mul<f64> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f64) -> Self::Output {
        Pt(self.0 * rhs)
    }
}

impl Div<f64> for Pt {
    type Output = Pt;

    fn div(self, rhs: f64) -> Self::Output {
        Pt(self.0 / rhs)
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Self::Output {
        Pt(-self.0)
    }
}

impl From<Pt> for f32 {
    fn from(value: Pt) -> Self {
        value.0 as f32
    }
}

/// The user unit of measure of a document
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Unit {
    Point,
    #[default]
    Millimeter,
    Centimeter,
    Inch,
}

impl Unit {
    /// Number of points in one user unit
    pub fn scale_factor(self) -> f64 {
        match self {
            Unit::Point => 1.0,
            Unit::Millimeter => 72.0 / 25.4,
            Unit::Centimeter => 72.0 / 2.54,
            Unit::Inch => 72.0,
        }
    }

    /// Convert a length to user units
    pub fn from_pt<P: Into<Pt>>(self, value: P) -> f64 {
        value.into().0 / self.scale_factor()
    }

    /// Convert a value in user units to points
    pub fn to_pt(self, value: f64) -> Pt {
        Pt(value * self.scale_factor())
    }
}

impl FromStr for Unit {
    type Err = PDFError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" | "point" => Ok(Unit::Point),
            "mm" | "millimeter" => Ok(Unit::Millimeter),
            "cm" | "centimeter" => Ok(Unit::Centimeter),
            "in" | "inch" => Ok(Unit::Inch),
            _ => Err(PDFError::UnitFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_names_parse() {
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Millimeter);
        assert_eq!(" IN ".parse::<Unit>().unwrap(), Unit::Inch);
        assert!(matches!("px".parse::<Unit>(), Err(PDFError::UnitFormat(u)) if u == "px"));
    }

    #[test]
    fn conversions_agree_with_scale_factor() {
        let inch: Pt = In(1.0).into();
        assert_eq!(inch, Pt(72.0));
        let mm: Pt = Mm(25.4).into();
        assert!((mm.0 - 72.0).abs() < 1e-9);
        assert!((Unit::Millimeter.from_pt(Pt(72.0)) - 25.4).abs() < 1e-9);
        assert!((Unit::Centimeter.to_pt(1.0).0 - 28.346456).abs() < 1e-6);
    }
}
