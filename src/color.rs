use std::ops::{ Add, Mul };

use crate::feq;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Displayable
/// colors range from 0.0 to 1.0, but intermediate results (several lights
/// summed on one surface) are allowed to leave that range; clamping happens
/// only when a color is quantized for output.
///
/// # Examples
///
/// Parse a color from its hex representation:
///
/// ```
/// # use quadric_ray_tracer::color::Color;
/// let grey = Color::from_hex("#444444").unwrap();
/// assert_eq!(grey, Color::rgb(0.26667, 0.26667, 0.26667));
/// ```
///
/// Filter one color through another:
///
/// ```
/// # use quadric_ray_tracer::color::Color;
/// let yellow = Color::rgb(1.0, 1.0, 0.0);
/// let purple = Color::rgb(1.0, 0.0, 1.0);
/// assert_eq!(yellow * purple, Color::rgb(1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating point
/// error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

/// Conversion from a vector to a `Color`.
///
/// Takes the first three elements of a vector as `r`, `g` and `b`. Missing
/// elements default to zero.
impl From<&Vec<f64>> for Color {
    fn from(v: &Vec<f64>) -> Color {
        match v.len() {
            0 => Default::default(),
            1 => Color { r: v[0], ..Default::default() },
            2 => Color { r: v[0], g: v[1], ..Default::default() },
            _ => Color { r: v[0], g: v[1], b: v[2] }
        }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Creates a grey with all three channels set to `v`.
    pub const fn grey(v: f64) -> Color {
        Color { r: v, g: v, b: v }
    }

    /// Parses a color written as `#rrggbb`.
    ///
    /// Returns `None` if the string is not exactly a `#` followed by six hex
    /// digits.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .ok()
                .map(|v| v as f64 / 255.0)
        };

        Some(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// The color black.
    pub const fn black() -> Color {
        Color::grey(0.0)
    }

    /// The color white.
    pub const fn white() -> Color {
        Color::grey(1.0)
    }

    /// A dark purple, the default diffuse color of a material.
    pub const fn grape() -> Color {
        Color::rgb(0.435, 0.176, 0.659)
    }

    /// A blue-green.
    pub const fn teal() -> Color {
        Color::rgb(0.0, 0.502, 0.502)
    }

    /// A bluish light grey.
    pub const fn metal() -> Color {
        Color::rgb(0.6, 0.62, 0.66)
    }

    /// Computes the Hadamard product of two colors.
    ///
    /// Each channel of one color is multiplied by the same channel of the
    /// other: the fraction of light a surface reflects applied to the light
    /// arriving at it.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        let r = c1.r * c2.r;
        let g = c1.g * c2.g;
        let b = c1.b * c2.b;

        Color { r, g, b }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Quantizes the color to 8 bits per channel, clamping to `[0, 255]`.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let map = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        [map(self.r), map(self.g), map(self.b)]
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(2.0 * c1, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(c1 * Color::rgb(0.5, 0.0, 2.0), Color::rgb(0.1, 0.0, 0.8));
}

#[test]
fn parse_hex_colors() {
    assert_eq!(Color::from_hex("#ffffff"), Some(Color::white()));
    assert_eq!(Color::from_hex("#ff0000"), Some(Color::rgb(1.0, 0.0, 0.0)));
    assert_eq!(Color::from_hex("#002255"),
        Some(Color::rgb(0.0, 34.0 / 255.0, 85.0 / 255.0)));

    assert_eq!(Color::from_hex("ffffff"), None);
    assert_eq!(Color::from_hex("#fffff"), None);
    assert_eq!(Color::from_hex("#gg0000"), None);
}

#[test]
fn quantize_clamps_out_of_range_channels() {
    assert_eq!(Color::rgb(1.7, -0.2, 0.5).to_rgb8(), [255, 0, 128]);
    assert_eq!(Color::black().to_rgb8(), [0, 0, 0]);
}
