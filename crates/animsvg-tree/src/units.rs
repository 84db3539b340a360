// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Length, LengthUnit as Unit};

use crate::{Duration, Rect};

/// A percentage base of a length.
///
/// Percentages of `x`-like attributes are relative to the viewport width,
/// `y`-like ones to its height and everything else (radii, stroke widths)
/// to its normalized diagonal.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LengthKind {
    Width,
    Height,
    Diagonal,
    FontSize,
}

/// Everything needed to turn a length into user units.
///
/// Also carries the document timestamp, since animated values are resolved
/// against the same context.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MeasureContext {
    /// Viewport width in user units.
    pub view_width: f32,
    /// Viewport height in user units.
    pub view_height: f32,
    /// Current font size.
    pub em: f32,
    /// Current x-height.
    pub ex: f32,
    /// Absolute units conversion.
    pub dpi: f32,
    /// Document time.
    ///
    /// `None` disables animations: every animated value
    /// resolves to its initial value.
    pub timestamp: Option<Duration>,
}

impl MeasureContext {
    /// Creates a new context with a default font.
    pub fn new(view_width: f32, view_height: f32, timestamp: Option<Duration>) -> Self {
        MeasureContext {
            view_width,
            view_height,
            em: 12.0,
            ex: 6.0,
            dpi: 96.0,
            timestamp,
        }
    }

    /// Returns `sqrt((w² + h²) / 2)`.
    #[inline]
    pub fn normed_diagonal(&self) -> f32 {
        ((self.view_width * self.view_width + self.view_height * self.view_height) / 2.0).sqrt()
    }

    /// Returns a copy with a viewport matching `rect`.
    ///
    /// Used to resolve lengths relative to a reference box.
    #[must_use]
    pub fn derive_for_rect(&self, rect: Rect) -> Self {
        MeasureContext {
            view_width: rect.width(),
            view_height: rect.height(),
            ..*self
        }
    }

    /// Returns a copy with new font metrics.
    #[must_use]
    pub fn derive_for_font(&self, em: f32, ex: f32) -> Self {
        MeasureContext { em, ex, ..*self }
    }

    /// Converts a length into user units.
    pub fn resolve(&self, length: Length, kind: LengthKind) -> f32 {
        let n = length.number as f32;
        match length.unit {
            Unit::None | Unit::Px => n,
            Unit::Em => n * self.em,
            Unit::Ex => n * self.ex,
            Unit::In => n * self.dpi,
            Unit::Cm => n * self.dpi / 2.54,
            Unit::Mm => n * self.dpi / 25.4,
            Unit::Pt => n * self.dpi / 72.0,
            Unit::Pc => n * self.dpi / 6.0,
            Unit::Percent => {
                let base = match kind {
                    LengthKind::Width => self.view_width,
                    LengthKind::Height => self.view_height,
                    LengthKind::Diagonal => self.normed_diagonal(),
                    LengthKind::FontSize => self.em,
                };

                base * n / 100.0
            }
        }
    }

    /// Converts an `x`-like length.
    #[inline]
    pub fn resolve_width(&self, length: Length) -> f32 {
        self.resolve(length, LengthKind::Width)
    }

    /// Converts a `y`-like length.
    #[inline]
    pub fn resolve_height(&self, length: Length) -> f32 {
        self.resolve(length, LengthKind::Height)
    }

    /// Converts a radius-like length.
    #[inline]
    pub fn resolve_diagonal(&self, length: Length) -> f32 {
        self.resolve(length, LengthKind::Diagonal)
    }
}

/// Checks that a length does not depend on the viewport or font.
pub fn is_absolute(length: Length) -> bool {
    !matches!(length.unit, Unit::Percent | Unit::Em | Unit::Ex)
}
