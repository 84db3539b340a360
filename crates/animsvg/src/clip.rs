// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{ClipPath, Units};
use tiny_skia::Rect;

use crate::context::RenderContext;
use crate::output::{Area, Output, ShapeOutput};
use crate::OptionLog;

/// Computes the area of a clip path in the clipped element's user space.
///
/// `object_bbox` is required by `objectBoundingBox` units.
pub fn area(clip: &ClipPath, object_bbox: Option<Rect>, ctx: &RenderContext) -> Option<Area> {
    let mut transform = clip.transform;

    if clip.units == Units::ObjectBoundingBox {
        let object_bbox = object_bbox
            .and_then(|r| r.to_non_zero_rect())
            .log_none(|| log::warn!("Clipping of zero-sized shapes is not allowed."))?;

        let ts = tiny_skia::Transform::from_bbox(object_bbox);
        transform = ts.pre_concat(transform);
    }

    let ctx = ctx.for_geometry().concat_user_space(transform);
    let mut area = Area::default();
    {
        let mut output = ShapeOutput::new(&mut area);
        output.set_transform(transform);
        crate::render::render_nodes(&clip.children, &ctx, &mut output);
        output.dispose();
    }

    Some(area)
}

/// Clips `output` by a clip path.
///
/// Returns `None` when nothing is left visible.
pub fn apply(
    clip: &ClipPath,
    object_bbox: Option<Rect>,
    ctx: &RenderContext,
    output: &mut dyn Output,
) -> Option<()> {
    let clip_area = area(clip, object_bbox, ctx)?;
    if clip_area.is_empty() {
        log::warn!("Clip path '{}' is empty.", clip.id);
        return None;
    }

    output.apply_clip(&clip_area);
    output.clip_bounds().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use animsvg_tree::{Duration, Node, Path, Shape, Size};
    use tiny_skia::Transform;

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

    fn clip(units: Units) -> ClipPath {
        ClipPath {
            units,
            children: vec![Node::Path(Box::new(Path::new(Shape::rect(0.0, 0.0, 0.5, 0.5))))],
            ..ClipPath::default()
        }
    }

    #[test]
    fn user_space_clip() {
        with_ctx(|ctx| {
            let a = area(&clip(Units::UserSpaceOnUse), None, ctx).unwrap();
            assert_eq!(a.bounds(), Rect::from_xywh(0.0, 0.0, 0.5, 0.5));
        });
    }

    #[test]
    fn bbox_clip() {
        with_ctx(|ctx| {
            let bbox = Rect::from_xywh(10.0, 10.0, 40.0, 20.0);
            let a = area(&clip(Units::ObjectBoundingBox), bbox, ctx).unwrap();
            assert_eq!(a.bounds(), Rect::from_xywh(10.0, 10.0, 20.0, 10.0));
            assert!(area(&clip(Units::ObjectBoundingBox), None, ctx).is_none());
        });
    }

    #[test]
    fn empty_clip_hides() {
        with_ctx(|ctx| {
            let mut shapes = Area::default();
            let mut output = ShapeOutput::new(&mut shapes);
            assert!(apply(&ClipPath::default(), None, ctx, &mut output).is_none());
        });
    }
}
