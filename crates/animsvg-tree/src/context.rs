// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::Length;

use crate::{
    Color, FloatValue, LengthKind, LengthValue, MeasureContext, Paint, PaintValue,
};

/// A fill rule.
///
/// `fill-rule` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
    /// An explicit `inherit`. Always replaced by the parent's rule.
    Inherit,
}

impl Default for FillRule {
    fn default() -> Self {
        Self::NonZero
    }
}

impl std::str::FromStr for FillRule {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "nonzero" => Ok(FillRule::NonZero),
            "evenodd" => Ok(FillRule::EvenOdd),
            "inherit" => Ok(FillRule::Inherit),
            _ => Err("invalid"),
        }
    }
}

/// A line cap.
///
/// `stroke-linecap` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        Self::Butt
    }
}

impl std::str::FromStr for LineCap {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            _ => Err("invalid"),
        }
    }
}

/// A line join.
///
/// `stroke-linejoin` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineJoin {
    Miter,
    MiterClip,
    Round,
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        Self::Miter
    }
}

impl std::str::FromStr for LineJoin {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "miter" => Ok(LineJoin::Miter),
            "miter-clip" => Ok(LineJoin::MiterClip),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err("invalid"),
        }
    }
}

/// Representation of the [`paint-order`] property.
///
/// Markers are not rendered, therefore only `fill` and `stroke`
/// variants are provided.
///
/// [`paint-order`]: https://www.w3.org/TR/SVG2/painting.html#PaintOrder
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum PaintOrder {
    FillAndStroke,
    StrokeAndFill,
}

impl Default for PaintOrder {
    fn default() -> Self {
        Self::FillAndStroke
    }
}

impl From<svgtypes::PaintOrder> for PaintOrder {
    fn from(order: svgtypes::PaintOrder) -> Self {
        match (order.order[0], order.order[1]) {
            (svgtypes::PaintOrderKind::Stroke, _) => PaintOrder::StrokeAndFill,
            (svgtypes::PaintOrderKind::Markers, svgtypes::PaintOrderKind::Stroke) => {
                PaintOrder::StrokeAndFill
            }
            _ => PaintOrder::FillAndStroke,
        }
    }
}

impl std::str::FromStr for PaintOrder {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.parse::<svgtypes::PaintOrder>()
            .map(PaintOrder::from)
            .map_err(|_| "invalid")
    }
}

/// Stroke attributes of an element.
///
/// Every field is optional: an unset field is inherited.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StrokeContext {
    /// `stroke-width` in SVG.
    pub width: Option<LengthValue>,
    /// `stroke-linecap` in SVG.
    pub line_cap: Option<LineCap>,
    /// `stroke-linejoin` in SVG.
    pub line_join: Option<LineJoin>,
    /// `stroke-miterlimit` in SVG.
    pub miter_limit: Option<f32>,
    dash_pattern: Option<Vec<Length>>,
    /// `stroke-dashoffset` in SVG.
    pub dash_offset: Option<LengthValue>,
}

impl StrokeContext {
    /// Creates a new stroke context.
    ///
    /// A dash pattern with a negative entry or only zeros
    /// is replaced by an empty one, which disables dashing.
    pub fn new(
        width: Option<LengthValue>,
        line_cap: Option<LineCap>,
        line_join: Option<LineJoin>,
        miter_limit: Option<f32>,
        dash_pattern: Option<Vec<Length>>,
        dash_offset: Option<LengthValue>,
    ) -> Self {
        StrokeContext {
            width,
            line_cap,
            line_join,
            miter_limit,
            dash_pattern: dash_pattern.map(validate_dash_pattern),
            dash_offset,
        }
    }

    /// Returns the stroke used at the document root.
    pub fn root() -> Self {
        StrokeContext::new(
            Some(LengthValue::from(1.0)),
            Some(LineCap::Butt),
            Some(LineJoin::Miter),
            Some(4.0),
            Some(Vec::new()),
            Some(LengthValue::from(0.0)),
        )
    }

    /// `stroke-dasharray` in SVG.
    ///
    /// An empty pattern means a solid line.
    #[inline]
    pub fn dash_pattern(&self) -> Option<&[Length]> {
        self.dash_pattern.as_deref()
    }

    /// Checks that no field is set.
    pub fn is_trivial(&self) -> bool {
        self.width.is_none()
            && self.line_cap.is_none()
            && self.line_join.is_none()
            && self.miter_limit.is_none()
            && self.dash_pattern.is_none()
            && self.dash_offset.is_none()
    }

    /// Merges a child's stroke attributes into this one.
    #[must_use]
    pub fn derive(&self, child: Option<&StrokeContext>) -> StrokeContext {
        let child = match child {
            Some(c) if !c.is_trivial() => c,
            _ => return self.clone(),
        };

        StrokeContext {
            width: derive_length(self.width.as_ref(), child.width.as_ref()),
            line_cap: child.line_cap.or(self.line_cap),
            line_join: child.line_join.or(self.line_join),
            miter_limit: child.miter_limit.or(self.miter_limit),
            dash_pattern: child
                .dash_pattern
                .clone()
                .or_else(|| self.dash_pattern.clone()),
            dash_offset: derive_length(self.dash_offset.as_ref(), child.dash_offset.as_ref()),
        }
    }

    /// Converts into a `tiny_skia_path::Stroke`.
    ///
    /// Returns `None` for a non-positive width.
    pub fn to_stroke(&self, ctx: &MeasureContext) -> Option<tiny_skia_path::Stroke> {
        let width = self
            .width
            .as_ref()
            .map_or(1.0, |w| w.resolve(ctx, LengthKind::Diagonal));
        if !(width > 0.0 && width.is_finite()) {
            return None;
        }

        let mut stroke = tiny_skia_path::Stroke {
            width,
            miter_limit: self.miter_limit.unwrap_or(4.0).max(1.0),
            line_cap: match self.line_cap.unwrap_or_default() {
                LineCap::Butt => tiny_skia_path::LineCap::Butt,
                LineCap::Round => tiny_skia_path::LineCap::Round,
                LineCap::Square => tiny_skia_path::LineCap::Square,
            },
            line_join: match self.line_join.unwrap_or_default() {
                LineJoin::Miter => tiny_skia_path::LineJoin::Miter,
                LineJoin::MiterClip => tiny_skia_path::LineJoin::MiterClip,
                LineJoin::Round => tiny_skia_path::LineJoin::Round,
                LineJoin::Bevel => tiny_skia_path::LineJoin::Bevel,
            },
            dash: None,
        };

        if let Some(pattern) = self.dash_pattern() {
            if !pattern.is_empty() {
                let mut list: Vec<f32> = pattern
                    .iter()
                    .map(|l| ctx.resolve(*l, LengthKind::Diagonal))
                    .collect();

                // An odd list is repeated to get an even one.
                if list.len() % 2 != 0 {
                    list.extend_from_within(..);
                }

                let offset = self
                    .dash_offset
                    .as_ref()
                    .map_or(0.0, |o| o.resolve(ctx, LengthKind::Diagonal));
                stroke.dash = tiny_skia_path::StrokeDash::new(list, offset);
            }
        }

        Some(stroke)
    }
}

fn validate_dash_pattern(pattern: Vec<Length>) -> Vec<Length> {
    if pattern.iter().any(|l| l.number < 0.0) || pattern.iter().all(|l| l.number == 0.0) {
        if !pattern.is_empty() {
            log::warn!("Invalid stroke-dasharray. Dashing is disabled.");
        }
        return Vec::new();
    }

    pattern
}

fn derive_length(parent: Option<&LengthValue>, child: Option<&LengthValue>) -> Option<LengthValue> {
    match (parent, child) {
        (Some(p), Some(c)) => Some(c.derive(p)),
        (None, Some(c)) => Some(c.clone()),
        (p, None) => p.cloned(),
    }
}

fn derive_paint(parent: Option<&PaintValue>, child: Option<&PaintValue>) -> Option<PaintValue> {
    match (parent, child) {
        (Some(p), Some(c)) => Some(c.derive(p)),
        (None, Some(c)) => Some(c.clone()),
        (p, None) => p.cloned(),
    }
}

fn derive_float(parent: Option<&FloatValue>, child: Option<&FloatValue>) -> Option<FloatValue> {
    match (parent, child) {
        (Some(p), Some(c)) => Some(c.derive(p)),
        (None, Some(c)) => Some(c.clone()),
        (p, None) => p.cloned(),
    }
}

/// Paint attributes of an element.
///
/// An unset field is inherited from the parent. Defaults are applied only
/// once, by [`PaintContext::root`].
#[derive(Clone, PartialEq, Debug)]
pub struct PaintContext {
    /// `color` in SVG. The value of `currentColor`.
    pub color: Option<PaintValue>,
    /// `fill` in SVG.
    pub fill: Option<PaintValue>,
    /// `fill-opacity` in SVG.
    pub fill_opacity: Option<FloatValue>,
    /// `stroke` in SVG.
    pub stroke: Option<PaintValue>,
    /// `stroke-opacity` in SVG.
    pub stroke_opacity: Option<FloatValue>,
    /// `opacity` in SVG.
    ///
    /// Not inherited, but multiplied along the tree.
    pub opacity: FloatValue,
    /// `paint-order` in SVG.
    pub paint_order: Option<PaintOrder>,
    stroke_context: Option<StrokeContext>,
    /// `fill-rule` in SVG.
    pub fill_rule: Option<FillRule>,
}

impl Default for PaintContext {
    fn default() -> Self {
        PaintContext {
            color: None,
            fill: None,
            fill_opacity: None,
            stroke: None,
            stroke_opacity: None,
            opacity: FloatValue::Constant(1.0),
            paint_order: None,
            stroke_context: None,
            fill_rule: None,
        }
    }
}

impl PaintContext {
    /// Returns the context used at the document root.
    pub fn root() -> Self {
        PaintContext {
            color: Some(PaintValue::from(Paint::Color(Color::black()))),
            fill: Some(PaintValue::from(Paint::Color(Color::black()))),
            fill_opacity: Some(FloatValue::from(1.0)),
            stroke: Some(PaintValue::from(Paint::None)),
            stroke_opacity: Some(FloatValue::from(1.0)),
            opacity: FloatValue::from(1.0),
            paint_order: Some(PaintOrder::default()),
            stroke_context: Some(StrokeContext::root()),
            fill_rule: Some(FillRule::NonZero),
        }
    }

    /// Returns the stroke attributes.
    ///
    /// A context without any stroke attribute returns `None`.
    #[inline]
    pub fn stroke_context(&self) -> Option<&StrokeContext> {
        self.stroke_context.as_ref()
    }

    /// Sets the stroke attributes.
    pub fn set_stroke_context(&mut self, stroke: StrokeContext) {
        self.stroke_context = if stroke.is_trivial() {
            None
        } else {
            Some(stroke)
        };
    }

    /// Merges a child's attributes into this context.
    #[must_use]
    pub fn derive(&self, child: &PaintContext) -> PaintContext {
        let stroke_context = match self.stroke_context {
            Some(ref s) => Some(s.derive(child.stroke_context.as_ref())),
            None => child.stroke_context.clone(),
        };

        PaintContext {
            color: derive_paint(self.color.as_ref(), child.color.as_ref()),
            fill: derive_paint(self.fill.as_ref(), child.fill.as_ref()),
            fill_opacity: derive_float(self.fill_opacity.as_ref(), child.fill_opacity.as_ref()),
            stroke: derive_paint(self.stroke.as_ref(), child.stroke.as_ref()),
            stroke_opacity: derive_float(
                self.stroke_opacity.as_ref(),
                child.stroke_opacity.as_ref(),
            ),
            opacity: self.opacity.multiply(&child.opacity),
            paint_order: child.paint_order.or(self.paint_order),
            stroke_context: stroke_context.filter(|s| !s.is_trivial()),
            fill_rule: match child.fill_rule {
                Some(rule) if rule != FillRule::Inherit => Some(rule),
                _ => self.fill_rule,
            },
        }
    }

    /// Resolves `color`.
    pub fn current_color(&self, ctx: &MeasureContext) -> Color {
        self.color
            .as_ref()
            .and_then(|c| c.get(ctx).solid_color())
            .unwrap_or_else(Color::black)
    }

    /// Resolves the fill paint. `currentColor` is replaced by `color`.
    pub fn fill_paint(&self, ctx: &MeasureContext) -> Paint {
        self.resolve_paint(self.fill.as_ref(), ctx)
    }

    /// Resolves the stroke paint. `currentColor` is replaced by `color`.
    pub fn stroke_paint(&self, ctx: &MeasureContext) -> Paint {
        self.resolve_paint(self.stroke.as_ref(), ctx)
    }

    fn resolve_paint(&self, paint: Option<&PaintValue>, ctx: &MeasureContext) -> Paint {
        match paint.map(|p| p.get(ctx)) {
            Some(Paint::CurrentColor) => Paint::Color(self.current_color(ctx)),
            Some(Paint::Inherit) | None => Paint::None,
            Some(paint) => paint,
        }
    }

    /// Resolves `fill-opacity`.
    pub fn fill_opacity(&self, ctx: &MeasureContext) -> f32 {
        resolve_opacity(self.fill_opacity.as_ref(), ctx)
    }

    /// Resolves `stroke-opacity`.
    pub fn stroke_opacity(&self, ctx: &MeasureContext) -> f32 {
        resolve_opacity(self.stroke_opacity.as_ref(), ctx)
    }

    /// Resolves the accumulated `opacity`.
    pub fn opacity(&self, ctx: &MeasureContext) -> f32 {
        resolve_opacity(Some(&self.opacity), ctx)
    }

    /// Resolves the fill rule.
    pub fn fill_rule(&self) -> FillRule {
        match self.fill_rule {
            Some(FillRule::EvenOdd) => FillRule::EvenOdd,
            _ => FillRule::NonZero,
        }
    }
}

fn resolve_opacity(value: Option<&FloatValue>, ctx: &MeasureContext) -> f32 {
    value.map_or(1.0, |v| v.get(ctx)).clamp(0.0, 1.0)
}
