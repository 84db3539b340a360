// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgtypes::Length;

use crate::{Color, MeshGradient, Node, NormalizedF32, Opacity, Transform, Units, ViewBox};

/// A spread method.
///
/// `spreadMethod` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

impl Default for SpreadMethod {
    fn default() -> Self {
        Self::Pad
    }
}

impl std::str::FromStr for SpreadMethod {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "pad" => Ok(SpreadMethod::Pad),
            "reflect" => Ok(SpreadMethod::Reflect),
            "repeat" => Ok(SpreadMethod::Repeat),
            _ => Err("invalid"),
        }
    }
}

/// A generic gradient.
#[derive(Clone, Debug)]
pub struct BaseGradient {
    /// Element's ID.
    pub id: String,

    /// Coordinate system units.
    ///
    /// `gradientUnits` in SVG.
    pub units: Units,

    /// Gradient transform.
    ///
    /// `gradientTransform` in SVG.
    pub transform: Transform,

    /// Gradient spreading method.
    ///
    /// `spreadMethod` in SVG.
    pub spread_method: SpreadMethod,

    /// A list of `stop` elements.
    pub stops: Vec<Stop>,
}

impl Default for BaseGradient {
    fn default() -> Self {
        BaseGradient {
            id: String::new(),
            units: Units::ObjectBoundingBox,
            transform: Transform::default(),
            spread_method: SpreadMethod::default(),
            stops: Vec::new(),
        }
    }
}

/// A linear gradient.
///
/// `linearGradient` element in SVG.
///
/// Coordinates are kept as lengths, since percentages resolve against
/// the viewport in `userSpaceOnUse` units.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct LinearGradient {
    /// Base gradient data.
    pub base: BaseGradient,

    pub x1: Length,
    pub y1: Length,
    pub x2: Length,
    pub y2: Length,
}

impl std::ops::Deref for LinearGradient {
    type Target = BaseGradient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

/// A radial gradient.
///
/// `radialGradient` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct RadialGradient {
    /// Base gradient data.
    pub base: BaseGradient,

    pub cx: Length,
    pub cy: Length,
    pub r: Length,
    pub fx: Length,
    pub fy: Length,
}

impl std::ops::Deref for RadialGradient {
    type Target = BaseGradient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

/// Gradient's stop element.
///
/// `stop` element in SVG.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stop {
    /// Gradient stop offset.
    pub offset: NormalizedF32,

    /// Gradient stop color.
    pub color: Color,

    /// Gradient stop opacity.
    pub opacity: Opacity,
}

impl Stop {
    /// Creates an opaque stop.
    pub fn new(offset: f32, color: Color) -> Self {
        Stop {
            offset: NormalizedF32::new_clamped(offset),
            color,
            opacity: Opacity::ONE,
        }
    }
}

/// A pattern element.
///
/// `pattern` element in SVG.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Element's ID.
    pub id: String,

    /// Coordinate system units.
    ///
    /// `patternUnits` in SVG.
    pub units: Units,

    /// Content coordinate system units.
    ///
    /// `patternContentUnits` in SVG. Ignored when `view_box` is set.
    pub content_units: Units,

    /// Pattern transform.
    ///
    /// `patternTransform` in SVG.
    pub transform: Transform,

    /// `x` in SVG.
    pub x: Length,
    /// `y` in SVG.
    pub y: Length,
    /// `width` in SVG.
    pub width: Length,
    /// `height` in SVG.
    pub height: Length,

    /// Pattern viewbox.
    pub view_box: Option<ViewBox>,

    /// Pattern children.
    pub children: Vec<Node>,
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern {
            id: String::new(),
            units: Units::ObjectBoundingBox,
            content_units: Units::UserSpaceOnUse,
            transform: Transform::default(),
            x: Length::zero(),
            y: Length::zero(),
            width: Length::zero(),
            height: Length::zero(),
            view_box: None,
            children: Vec::new(),
        }
    }
}

/// A paint style.
///
/// `paint` value type in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Paint {
    None,
    /// An explicit `inherit`, which is replaced by the parent's paint.
    Inherit,
    /// `currentColor`, resolved by the paint context.
    CurrentColor,
    Color(Color),
    LinearGradient(Arc<LinearGradient>),
    RadialGradient(Arc<RadialGradient>),
    MeshGradient(Arc<MeshGradient>),
    Pattern(Arc<Pattern>),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::None
    }
}

impl Paint {
    /// Returns the color of a solid paint.
    #[inline]
    pub fn solid_color(&self) -> Option<Color> {
        match self {
            Paint::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Checks that the paint draws nothing.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    /// Returns paint server units.
    ///
    /// Returns `None` for non-server paints.
    #[inline]
    pub fn units(&self) -> Option<Units> {
        match self {
            Self::LinearGradient(ref lg) => Some(lg.units),
            Self::RadialGradient(ref rg) => Some(rg.units),
            Self::MeshGradient(ref mg) => Some(mg.units),
            Self::Pattern(ref patt) => Some(patt.units),
            _ => None,
        }
    }
}

impl PartialEq for Paint {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Inherit, Self::Inherit) => true,
            (Self::CurrentColor, Self::CurrentColor) => true,
            (Self::Color(lc), Self::Color(rc)) => lc == rc,
            (Self::LinearGradient(ref lg1), Self::LinearGradient(ref lg2)) => Arc::ptr_eq(lg1, lg2),
            (Self::RadialGradient(ref rg1), Self::RadialGradient(ref rg2)) => Arc::ptr_eq(rg1, rg2),
            (Self::MeshGradient(ref mg1), Self::MeshGradient(ref mg2)) => Arc::ptr_eq(mg1, mg2),
            (Self::Pattern(ref p1), Self::Pattern(ref p2)) => Arc::ptr_eq(p1, p2),
            _ => false,
        }
    }
}

impl std::str::FromStr for Paint {
    type Err = svgtypes::Error;

    /// Parses a paint without a funcIRI.
    ///
    /// Paint servers are linked by the tree builder.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match svgtypes::Paint::from_str(text)? {
            svgtypes::Paint::None => Ok(Paint::None),
            svgtypes::Paint::Inherit => Ok(Paint::Inherit),
            svgtypes::Paint::CurrentColor => Ok(Paint::CurrentColor),
            svgtypes::Paint::Color(c) => Ok(Paint::Color(c.into())),
            svgtypes::Paint::FuncIRI(_, fallback) => match fallback {
                Some(svgtypes::PaintFallback::Color(c)) => Ok(Paint::Color(c.into())),
                Some(svgtypes::PaintFallback::CurrentColor) => Ok(Paint::CurrentColor),
                _ => Ok(Paint::None),
            },
            svgtypes::Paint::ContextFill | svgtypes::Paint::ContextStroke => Ok(Paint::None),
        }
    }
}
