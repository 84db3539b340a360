// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Length, LengthUnit as Unit};

/// A font stretch property.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl Default for FontStretch {
    #[inline]
    fn default() -> Self {
        Self::Normal
    }
}

impl FontStretch {
    /// Returns the glyph width scale.
    pub fn percentage(self) -> f32 {
        match self {
            FontStretch::UltraCondensed => 0.5,
            FontStretch::ExtraCondensed => 0.625,
            FontStretch::Condensed => 0.75,
            FontStretch::SemiCondensed => 0.875,
            FontStretch::Normal => 1.0,
            FontStretch::SemiExpanded => 1.125,
            FontStretch::Expanded => 1.25,
            FontStretch::ExtraExpanded => 1.5,
            FontStretch::UltraExpanded => 2.0,
        }
    }
}

impl std::str::FromStr for FontStretch {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "ultra-condensed" => Ok(FontStretch::UltraCondensed),
            "extra-condensed" => Ok(FontStretch::ExtraCondensed),
            "condensed" | "narrower" => Ok(FontStretch::Condensed),
            "semi-condensed" => Ok(FontStretch::SemiCondensed),
            "normal" => Ok(FontStretch::Normal),
            "semi-expanded" => Ok(FontStretch::SemiExpanded),
            "expanded" | "wider" => Ok(FontStretch::Expanded),
            "extra-expanded" => Ok(FontStretch::ExtraExpanded),
            "ultra-expanded" => Ok(FontStretch::UltraExpanded),
            _ => Err("invalid"),
        }
    }
}

/// A font style property.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FontStyle {
    /// A face that is neither italic not obliqued.
    Normal,
    /// A form that is generally cursive in nature.
    Italic,
    /// A sloped version of the regular face, with an angle in degrees.
    Oblique(f32),
}

impl Default for FontStyle {
    #[inline]
    fn default() -> FontStyle {
        Self::Normal
    }
}

impl std::str::FromStr for FontStyle {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "normal" => Ok(FontStyle::Normal),
            "italic" => Ok(FontStyle::Italic),
            "oblique" => Ok(FontStyle::Oblique(14.0)),
            _ => {
                let angle = text.strip_prefix("oblique ").ok_or("invalid")?;
                let angle: svgtypes::Angle = angle.trim().parse().map_err(|_| "invalid")?;
                Ok(FontStyle::Oblique(angle.to_degrees() as f32))
            }
        }
    }
}

/// A `font-weight` value.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FontWeight {
    /// A weight in `1..=1000`.
    Number(u16),
    Normal,
    Bold,
    Bolder,
    Lighter,
}

impl FontWeight {
    /// Resolves the weight relative to the parent's one.
    pub fn resolve(self, parent: u16) -> u16 {
        match self {
            FontWeight::Number(n) => n.clamp(1, 1000),
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
            FontWeight::Bolder => {
                if parent < 350 {
                    400
                } else if parent < 550 {
                    700
                } else {
                    900
                }
            }
            FontWeight::Lighter => {
                if parent < 550 {
                    100
                } else if parent < 750 {
                    400
                } else {
                    700
                }
            }
        }
    }
}

impl std::str::FromStr for FontWeight {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "normal" => Ok(FontWeight::Normal),
            "bold" => Ok(FontWeight::Bold),
            "bolder" => Ok(FontWeight::Bolder),
            "lighter" => Ok(FontWeight::Lighter),
            _ => {
                let n: f32 = text.trim().parse().map_err(|_| "invalid")?;
                if !n.is_finite() {
                    return Err("invalid");
                }

                Ok(FontWeight::Number(n.round().clamp(1.0, 1000.0) as u16))
            }
        }
    }
}

/// A `font-size` value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FontSize {
    /// An explicit size. Relative units resolve against the parent's size.
    Length(Length),
    /// An absolute keyword, as a step from `medium`.
    ///
    /// `xx-small` is `-3` and `xx-large` is `3`.
    Absolute(i32),
    /// `smaller`.
    Smaller,
    /// `larger`.
    Larger,
}

impl FontSize {
    /// Resolves into pixels.
    ///
    /// `medium` is the document's default font size.
    pub fn resolve(self, parent: f32, medium: f32, dpi: f32) -> f32 {
        match self {
            FontSize::Length(length) => {
                let n = length.number as f32;
                match length.unit {
                    Unit::None | Unit::Px => n,
                    Unit::Em => n * parent,
                    Unit::Ex => n * parent / 2.0,
                    Unit::In => n * dpi,
                    Unit::Cm => n * dpi / 2.54,
                    Unit::Mm => n * dpi / 25.4,
                    Unit::Pt => n * dpi / 72.0,
                    Unit::Pc => n * dpi / 6.0,
                    // Percentages are relative to the parent's font size.
                    Unit::Percent => n * parent * 0.01,
                }
            }
            // 'On a computer screen a scaling factor of 1.2 is suggested between adjacent indexes.'
            FontSize::Absolute(factor) => medium * 1.2f32.powi(factor),
            FontSize::Smaller => parent / 1.2,
            FontSize::Larger => parent * 1.2,
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let factor = match text {
            "xx-small" => -3,
            "x-small" => -2,
            "small" => -1,
            "medium" => 0,
            "large" => 1,
            "x-large" => 2,
            "xx-large" => 3,
            "smaller" => return Ok(FontSize::Smaller),
            "larger" => return Ok(FontSize::Larger),
            _ => {
                let length: Length = text.parse().map_err(|_| "invalid")?;
                if length.number < 0.0 {
                    return Err("invalid");
                }

                return Ok(FontSize::Length(length));
            }
        };

        Ok(FontSize::Absolute(factor))
    }
}

/// Font attributes of a single element.
///
/// Unset fields are inherited.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FontSpec {
    /// `font-family` in SVG. Empty means unset.
    pub families: Vec<String>,
    /// `font-style` in SVG.
    pub style: Option<FontStyle>,
    /// `font-weight` in SVG.
    pub weight: Option<FontWeight>,
    /// `font-size` in SVG.
    pub size: Option<FontSize>,
    /// `font-size-adjust` in SVG.
    pub size_adjust: Option<f32>,
    /// `font-stretch` in SVG.
    pub stretch: Option<FontStretch>,
}

/// A fully resolved font.
#[derive(Clone, PartialEq, Debug)]
pub struct ResolvedFontSpec {
    /// Font families, by preference.
    pub families: Vec<String>,
    /// Font style.
    pub style: FontStyle,
    /// Font weight in `1..=1000`.
    pub weight: u16,
    /// Font size in pixels.
    pub size: f32,
    /// The aspect value of `font-size-adjust`.
    pub size_adjust: Option<f32>,
    /// Font stretch.
    pub stretch: FontStretch,
}

impl ResolvedFontSpec {
    /// Returns the font used at the document root.
    pub fn root(font_size: f32) -> Self {
        ResolvedFontSpec {
            families: vec!["serif".to_string()],
            style: FontStyle::Normal,
            weight: 400,
            size: font_size,
            size_adjust: None,
            stretch: FontStretch::Normal,
        }
    }

    /// Merges a child's font attributes into this one.
    ///
    /// `medium` is the document's default font size.
    #[must_use]
    pub fn derive(&self, child: &FontSpec, medium: f32, dpi: f32) -> Self {
        ResolvedFontSpec {
            families: if child.families.is_empty() {
                self.families.clone()
            } else {
                child.families.clone()
            },
            style: child.style.unwrap_or(self.style),
            weight: child.weight.map_or(self.weight, |w| w.resolve(self.weight)),
            size: child
                .size
                .map_or(self.size, |s| s.resolve(self.size, medium, dpi)),
            size_adjust: child.size_adjust.or(self.size_adjust),
            stretch: child.stretch.unwrap_or(self.stretch),
        }
    }

    /// Returns the size used for glyph metrics.
    ///
    /// With `font-size-adjust` the size is derived from the requested x-height.
    pub fn effective_size(&self) -> f32 {
        match self.size_adjust {
            Some(adjust) => self.size * adjust * 2.0,
            None => self.size,
        }
    }
}
