// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{Length, MeasureContext, Paint, Units};

use crate::OptionLog;

/// Converts a paint into a shader.
///
/// Mesh gradients and patterns are not shaders and return `None`.
/// `object_bbox` is required by `objectBoundingBox` units.
pub fn convert(
    paint: &Paint,
    object_bbox: Option<tiny_skia::NonZeroRect>,
    m: &MeasureContext,
) -> Option<tiny_skia::Shader<'static>> {
    match paint {
        Paint::Color(c) => {
            let c = tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha);
            Some(tiny_skia::Shader::SolidColor(c))
        }
        Paint::LinearGradient(ref lg) => convert_linear_gradient(lg, object_bbox, m),
        Paint::RadialGradient(ref rg) => convert_radial_gradient(rg, object_bbox, m),
        Paint::None
        | Paint::Inherit
        | Paint::CurrentColor
        | Paint::MeshGradient(_)
        | Paint::Pattern(_) => None,
    }
}

/// Resolves the `x`, `y`, `width` and `height` of a mask or pattern.
///
/// In `objectBoundingBox` units the lengths are fractions of `object_bbox`.
pub fn resolve_rect(
    units: Units,
    [x, y, width, height]: [Length; 4],
    object_bbox: Option<tiny_skia::NonZeroRect>,
    m: &MeasureContext,
) -> Option<tiny_skia::NonZeroRect> {
    if units == Units::ObjectBoundingBox {
        let bbox = object_bbox?;
        let m = m.derive_for_rect(tiny_skia::Rect::from_xywh(0.0, 0.0, 1.0, 1.0)?);
        tiny_skia::NonZeroRect::from_xywh(
            bbox.x() + m.resolve_width(x) * bbox.width(),
            bbox.y() + m.resolve_height(y) * bbox.height(),
            m.resolve_width(width) * bbox.width(),
            m.resolve_height(height) * bbox.height(),
        )
    } else {
        tiny_skia::NonZeroRect::from_xywh(
            m.resolve_width(x),
            m.resolve_height(y),
            m.resolve_width(width),
            m.resolve_height(height),
        )
    }
}

fn convert_linear_gradient(
    gradient: &animsvg_tree::LinearGradient,
    object_bbox: Option<tiny_skia::NonZeroRect>,
    m: &MeasureContext,
) -> Option<tiny_skia::Shader<'static>> {
    let (mode, transform, points, m) = convert_base_gradient(gradient, object_bbox, m)?;

    tiny_skia::LinearGradient::new(
        (m.resolve_width(gradient.x1), m.resolve_height(gradient.y1)).into(),
        (m.resolve_width(gradient.x2), m.resolve_height(gradient.y2)).into(),
        points,
        mode,
        transform,
    )
}

fn convert_radial_gradient(
    gradient: &animsvg_tree::RadialGradient,
    object_bbox: Option<tiny_skia::NonZeroRect>,
    m: &MeasureContext,
) -> Option<tiny_skia::Shader<'static>> {
    let (mode, transform, points, m) = convert_base_gradient(gradient, object_bbox, m)?;

    let r = m.resolve_diagonal(gradient.r);
    if !(r > 0.0) {
        return None;
    }

    tiny_skia::RadialGradient::new(
        (m.resolve_width(gradient.fx), m.resolve_height(gradient.fy)).into(),
        (m.resolve_width(gradient.cx), m.resolve_height(gradient.cy)).into(),
        r,
        points,
        mode,
        transform,
    )
}

/// Resolves what linear and radial gradients share.
///
/// Also returns a context that resolves the gradient's coordinates.
/// In `objectBoundingBox` units percentages are relative to the unit square.
fn convert_base_gradient(
    gradient: &animsvg_tree::BaseGradient,
    object_bbox: Option<tiny_skia::NonZeroRect>,
    m: &MeasureContext,
) -> Option<(
    tiny_skia::SpreadMode,
    tiny_skia::Transform,
    Vec<tiny_skia::GradientStop>,
    MeasureContext,
)> {
    let mode = match gradient.spread_method {
        animsvg_tree::SpreadMethod::Pad => tiny_skia::SpreadMode::Pad,
        animsvg_tree::SpreadMethod::Reflect => tiny_skia::SpreadMode::Reflect,
        animsvg_tree::SpreadMethod::Repeat => tiny_skia::SpreadMode::Repeat,
    };

    let (transform, m) = if gradient.units == Units::ObjectBoundingBox {
        let bbox =
            object_bbox.log_none(|| log::warn!("Gradient on zero-sized shapes is not allowed."))?;
        let ts = tiny_skia::Transform::from_bbox(bbox);
        let unit = tiny_skia::Rect::from_xywh(0.0, 0.0, 1.0, 1.0)?;
        (ts.pre_concat(gradient.transform), m.derive_for_rect(unit))
    } else {
        (gradient.transform, *m)
    };

    let mut points = Vec::with_capacity(gradient.stops.len());
    for stop in &gradient.stops {
        let alpha = f32::from(stop.color.alpha) / 255.0 * stop.opacity.get();
        let color = tiny_skia::Color::from_rgba8(
            stop.color.red,
            stop.color.green,
            stop.color.blue,
            (alpha * 255.0 + 0.5) as u8,
        );
        points.push(tiny_skia::GradientStop::new(stop.offset.get(), color))
    }

    Some((mode, transform, points, m))
}
