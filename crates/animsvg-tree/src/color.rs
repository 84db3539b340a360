// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// An 8-bit RGBA color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// Constructs a new opaque `Color` from RGB values.
    #[inline]
    pub const fn new_rgb(red: u8, green: u8, blue: u8) -> Color {
        Color::new_rgba(red, green, blue, 255)
    }

    /// Constructs a new `Color` from RGBA values.
    #[inline]
    pub const fn new_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Constructs a new `Color` set to black.
    #[inline]
    pub const fn black() -> Color {
        Color::new_rgb(0, 0, 0)
    }

    /// Constructs a new `Color` set to white.
    #[inline]
    pub const fn white() -> Color {
        Color::new_rgb(255, 255, 255)
    }

    /// Checks that the color is not fully transparent.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }
}

impl From<svgtypes::Color> for Color {
    fn from(c: svgtypes::Color) -> Self {
        Color::new_rgba(c.red, c.green, c.blue, c.alpha)
    }
}

impl std::str::FromStr for Color {
    type Err = svgtypes::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.parse::<svgtypes::Color>().map(Color::from)
    }
}

/// An unclamped color used as an interpolation accumulator.
///
/// Channels may leave the `0..=255` range while animations are summed up.
/// Only the final value is clamped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub struct ColorValue {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl From<Color> for ColorValue {
    fn from(c: Color) -> Self {
        ColorValue {
            r: i32::from(c.red),
            g: i32::from(c.green),
            b: i32::from(c.blue),
            a: i32::from(c.alpha),
        }
    }
}

impl ColorValue {
    /// `a + (b - a) * t`, rounded per channel.
    pub fn interpolate(t: f32, a: ColorValue, b: ColorValue) -> ColorValue {
        let f = |x: i32, y: i32| (x as f32 + (y - x) as f32 * t).round() as i32;
        ColorValue {
            r: f(a.r, b.r),
            g: f(a.g, b.g),
            b: f(a.b, b.b),
            a: f(a.a, b.a),
        }
    }

    /// `a + t * b`, rounded per channel.
    pub fn saxpy(t: f32, a: ColorValue, b: ColorValue) -> ColorValue {
        let f = |x: i32, y: i32| (x as f32 + t * y as f32).round() as i32;
        ColorValue {
            r: f(a.r, b.r),
            g: f(a.g, b.g),
            b: f(a.b, b.b),
            a: f(a.a, b.a),
        }
    }

    /// Channel-wise sum.
    pub fn add(a: ColorValue, b: ColorValue) -> ColorValue {
        ColorValue {
            r: a.r + b.r,
            g: a.g + b.g,
            b: a.b + b.b,
            a: a.a + b.a,
        }
    }

    /// Clamps into a displayable color.
    pub fn to_color(self) -> Color {
        let c = |n: i32| n.clamp(0, 255) as u8;
        Color::new_rgba(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}
