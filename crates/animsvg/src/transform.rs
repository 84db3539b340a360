// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{has_area, TransformBox, Transformable};
use tiny_skia::Transform;

use crate::bounds::ElementBounds;
use crate::context::RenderContext;

/// Resolves a node's transform, including `transform-origin`.
///
/// Returns `None` when no transform is set.
/// A fill or stroke reference box without an area produces an identity transform.
pub fn effective_transform(
    transformable: &Transformable,
    ctx: &RenderContext,
    bounds: &ElementBounds,
) -> Option<Transform> {
    let value = transformable.transform.as_ref()?;
    let origin = transformable.origin;

    let reference = match transformable.transform_box {
        TransformBox::ViewBox => None,
        TransformBox::FillBox => Some(bounds.geometry_box()),
        TransformBox::StrokeBox => Some(bounds.stroke_box()),
    };

    let (ts, ox, oy) = match reference {
        None => {
            let m = ctx.measure();
            (value.get(m), m.resolve_width(origin.x), m.resolve_height(origin.y))
        }
        Some(rect) => {
            let rect = match rect.filter(has_area) {
                Some(r) => r,
                None => return Some(Transform::identity()),
            };

            let m = ctx.measure().derive_for_rect(rect);
            (
                value.get(&m),
                rect.x() + m.resolve_width(origin.x),
                rect.y() + m.resolve_height(origin.y),
            )
        }
    };

    if ox == 0.0 && oy == 0.0 {
        return Some(ts);
    }

    Some(
        Transform::from_translate(ox, oy)
            .pre_concat(ts)
            .pre_translate(-ox, -oy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use animsvg_tree::{
        Duration, Length, LengthUnit, Node, Path, Shape, Size, TransformOrigin, TransformPart,
        TransformValue,
    };

    use crate::{FontCache, Options};

    fn resolve(transformable: Transformable, shape: Shape) -> Option<Transform> {
        let options = Options::default();
        let fonts = FontCache::default();
        let root = RenderContext::root(
            &options,
            &fonts,
            Size::from_wh(200.0, 100.0).unwrap(),
            Duration::ZERO,
            Transform::identity(),
        );

        let mut path = Path::new(shape);
        path.transformable = transformable;
        let node = Node::Path(Box::new(path));
        let ctx = root.derive(&node);
        let bounds = ElementBounds::new(&node, &ctx);
        effective_transform(node.transformable(), &ctx, &bounds)
    }

    fn percent(n: f64) -> Length {
        Length::new(n, LengthUnit::Percent)
    }

    fn scale2() -> Option<TransformValue> {
        Some(TransformValue::from(vec![TransformPart::scale(2.0, 2.0)]))
    }

    #[test]
    fn no_transform() {
        assert!(resolve(Transformable::default(), Shape::rect(0.0, 0.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn fill_box_origin() {
        let ts = resolve(
            Transformable {
                transform: scale2(),
                origin: TransformOrigin { x: percent(50.0), y: percent(50.0) },
                transform_box: TransformBox::FillBox,
            },
            Shape::rect(0.0, 0.0, 10.0, 20.0),
        )
        .unwrap();

        assert_eq!(ts, Transform::from_row(2.0, 0.0, 0.0, 2.0, -5.0, -10.0));
    }

    #[test]
    fn fill_box_offset() {
        let ts = resolve(
            Transformable {
                transform: scale2(),
                origin: TransformOrigin::default(),
                transform_box: TransformBox::FillBox,
            },
            Shape::rect(10.0, 10.0, 10.0, 10.0),
        )
        .unwrap();

        // Scaled around the box corner.
        assert_eq!(ts, Transform::from_row(2.0, 0.0, 0.0, 2.0, -10.0, -10.0));
    }

    #[test]
    fn view_box_origin() {
        let ts = resolve(
            Transformable {
                transform: scale2(),
                origin: TransformOrigin { x: percent(50.0), y: percent(50.0) },
                transform_box: TransformBox::ViewBox,
            },
            Shape::rect(0.0, 0.0, 10.0, 20.0),
        )
        .unwrap();

        assert_eq!(ts, Transform::from_row(2.0, 0.0, 0.0, 2.0, -100.0, -50.0));
    }

    #[test]
    fn degenerate_box_is_identity() {
        let ts = resolve(
            Transformable {
                transform: scale2(),
                origin: TransformOrigin::default(),
                transform_box: TransformBox::FillBox,
            },
            Shape::rect(0.0, 0.0, 0.0, 10.0),
        );

        assert_eq!(ts, Some(Transform::identity()));
    }
}
