use crate::content::fmt_num;

/// A colour, expressed in grey, RGB or CMYK device colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the Gray space, g ranges from 0 to 255
    pub fn grey(g: u8) -> Colour {
        Colour::Grey { g: g as f32 / 255.0 }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the CMYK space. c, m, y, and k are percentages from 0 to 100
    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK {
            c: c / 100.0,
            m: m / 100.0,
            y: y / 100.0,
            k: k / 100.0,
        }
    }

    fn components(&self) -> Vec<f32> {
        match *self {
            Colour::Grey { g } => vec![g],
            Colour::RGB { r, g, b } => vec![r, g, b],
            Colour::CMYK { c, m, y, k } => vec![c, m, y, k],
        }
    }

    fn operator(&self, fill: bool) -> String {
        let op = match (self, fill) {
            (Colour::Grey { .. }, true) => "g",
            (Colour::Grey { .. }, false) => "G",
            (Colour::RGB { .. }, true) => "rg",
            (Colour::RGB { .. }, false) => "RG",
            (Colour::CMYK { .. }, true) => "k",
            (Colour::CMYK { .. }, false) => "K",
        };
        let mut out: Vec<String> = self
            .components()
            .into_iter()
            .map(|c| fmt_num(c as f64))
            .collect();
        out.push(op.to_string());
        out.join(" ")
    }

    /// The content stream operator selecting this colour for filling (and text)
    pub fn fill_operator(&self) -> String {
        self.operator(true)
    }

    /// The content stream operator selecting this colour for stroking
    pub fn stroke_operator(&self) -> String {
        self.operator(false)
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour::rgb(c.0, c.1, c.2)
    }
}

impl From<u8> for Colour {
    fn from(g: u8) -> Self {
        Colour::grey(g)
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_follow_colour_space() {
        assert_eq!(colours::BLACK.fill_operator(), "0.000000 g");
        assert_eq!(colours::BLACK.stroke_operator(), "0.000000 G");
        assert_eq!(
            Colour::rgb(255, 0, 0).stroke_operator(),
            "1.000000 0.000000 0.000000 RG"
        );
        assert_eq!(
            Colour::cmyk(0.0, 100.0, 50.0, 0.0).fill_operator(),
            "0.000000 1.000000 0.500000 0.000000 k"
        );
    }
}
