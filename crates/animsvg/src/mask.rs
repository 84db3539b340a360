// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{Mask, MaskType, Units};
use tiny_skia::{NonZeroRect, Transform};

use crate::context::RenderContext;
use crate::output::{Area, Output, ShapeOutput};
use crate::OptionLog;

/// Masks `output` by a mask element.
///
/// The sink is clipped to the geometry of the mask content, so the shape
/// accumulator sees masked bounds. Sinks with color support also get the
/// luminance or alpha values of the rendered content.
///
/// Returns `None` when nothing is left visible.
pub fn apply(
    mask: &Mask,
    object_bbox: Option<NonZeroRect>,
    ctx: &RenderContext,
    output: &mut dyn Output,
) -> Option<()> {
    let region = crate::paint_server::resolve_rect(
        mask.units,
        [mask.x, mask.y, mask.width, mask.height],
        object_bbox,
        ctx.measure(),
    )
    .log_none(|| log::warn!("Mask '{}' has an invalid region.", mask.id))?;

    let content_ts = if mask.content_units == Units::ObjectBoundingBox {
        let bbox = object_bbox
            .log_none(|| log::warn!("Masking of zero-sized shapes is not allowed."))?;
        Transform::from_bbox(bbox)
    } else {
        Transform::identity()
    };

    if let Some(ref inner) = mask.mask {
        apply(inner, object_bbox, ctx, output)?;
    }

    let region = Area::from_rect(region.to_rect());
    let content_ctx = ctx.for_resource(ctx.user_space().pre_concat(content_ts));
    let area = content_area(mask, content_ts, &content_ctx).intersect(&region);
    if area.is_empty() {
        return None;
    }

    if output.supports_colors() {
        let mask_type = match mask.kind {
            MaskType::Luminance => tiny_skia::MaskType::Luminance,
            MaskType::Alpha => tiny_skia::MaskType::Alpha,
        };

        output.apply_clip(&region);
        output.apply_mask(mask_type, &mut |layer: &mut dyn Output| {
            layer.apply_transform(content_ts);
            crate::render::render_nodes(&mask.children, &content_ctx, layer);
        });
    } else {
        output.apply_clip(&area);
    }

    output.clip_bounds().map(|_| ())
}

fn content_area(mask: &Mask, content_ts: Transform, ctx: &RenderContext) -> Area {
    let mut area = Area::default();
    {
        let mut output = ShapeOutput::new(&mut area);
        output.set_transform(content_ts);
        crate::render::render_nodes(&mask.children, ctx, &mut output);
        output.dispose();
    }

    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use animsvg_tree::{Color, Duration, Length, LengthUnit, Node, Paint, PaintValue, Path, Shape, Size};

    use crate::{FontCache, Options};

    fn with_ctx(f: impl FnOnce(&RenderContext)) {
        let options = Options::default();
        let fonts = FontCache::default();
        let ctx = RenderContext::root(
            &options,
            &fonts,
            Size::from_wh(100.0, 100.0).unwrap(),
            Duration::ZERO,
            Transform::identity(),
        );
        f(&ctx)
    }

    fn white_rect(x: f32, y: f32, w: f32, h: f32) -> Node {
        let mut path = Path::new(Shape::rect(x, y, w, h));
        path.paint.fill = Some(PaintValue::from(Paint::Color(Color::white())));
        Node::Path(Box::new(path))
    }

    fn user_space_mask(children: Vec<Node>) -> Mask {
        Mask {
            units: Units::UserSpaceOnUse,
            x: Length::zero(),
            y: Length::zero(),
            width: Length::new(100.0, LengthUnit::Percent),
            height: Length::new(100.0, LengthUnit::Percent),
            children,
            ..Mask::default()
        }
    }

    #[test]
    fn bounds_follow_the_content() {
        with_ctx(|ctx| {
            let mut shapes = Area::default();
            {
                let mut output = ShapeOutput::new(&mut shapes);
                let mask = user_space_mask(vec![white_rect(10.0, 10.0, 20.0, 30.0)]);
                assert!(apply(&mask, None, ctx, &mut output).is_some());
                assert_eq!(output.clip_bounds(), tiny_skia::Rect::from_xywh(10.0, 10.0, 20.0, 30.0));
            }
        });
    }

    #[test]
    fn empty_mask_hides() {
        with_ctx(|ctx| {
            let mut shapes = Area::default();
            let mut output = ShapeOutput::new(&mut shapes);
            assert!(apply(&user_space_mask(Vec::new()), None, ctx, &mut output).is_none());
        });
    }

    #[test]
    fn region_limits_the_content() {
        with_ctx(|ctx| {
            let mut shapes = Area::default();
            let mut output = ShapeOutput::new(&mut shapes);
            let mut mask = user_space_mask(vec![white_rect(-50.0, -50.0, 100.0, 100.0)]);
            mask.width = Length::new_number(10.0);
            mask.height = Length::new_number(10.0);
            assert!(apply(&mask, None, ctx, &mut output).is_some());
            assert_eq!(output.clip_bounds(), tiny_skia::Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        });
    }

    #[test]
    fn bbox_units_require_bbox() {
        with_ctx(|ctx| {
            let mut shapes = Area::default();
            let mut output = ShapeOutput::new(&mut shapes);
            let mask = Mask {
                children: vec![white_rect(0.0, 0.0, 100.0, 100.0)],
                ..Mask::default()
            };
            assert!(apply(&mask, None, ctx, &mut output).is_none());

            let bbox = NonZeroRect::from_xywh(10.0, 10.0, 10.0, 10.0);
            assert!(apply(&mask, bbox, ctx, &mut output).is_some());
        });
    }
}
