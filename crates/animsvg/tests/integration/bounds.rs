use std::sync::Arc;

use animsvg::animsvg_tree::{
    ClipPath, Color, Duration, LengthValue, Mask, Node, Paint, PaintValue, Shape, Size,
    StrokeContext, TransformPart, TransformValue, Tree,
};
use animsvg::Options;

use crate::{blue, filled, group, red, tree, FONTS};

fn measure(tree: &Tree) -> Option<tiny_skia::Rect> {
    animsvg::measure_bounds(tree, &Options::default(), &FONTS, tree.size, Duration::ZERO)
}

fn assert_rect(rect: tiny_skia::Rect, l: f32, t: f32, r: f32, b: f32) {
    let eq = |a: f32, b: f32| (a - b).abs() < 0.01;
    assert!(
        eq(rect.left(), l) && eq(rect.top(), t) && eq(rect.right(), r) && eq(rect.bottom(), b),
        "{:?}",
        rect
    );
}

#[test]
fn single_rect() {
    let tree = tree(100.0, 100.0, vec![crate::rect(10.0, 20.0, 30.0, 40.0, red())]);
    assert_rect(measure(&tree).unwrap(), 10.0, 20.0, 40.0, 60.0);
}

#[test]
fn transformed_group() {
    let mut g = group(vec![crate::rect(0.0, 0.0, 10.0, 10.0, red())]);
    g.transformable.transform = Some(TransformValue::from(vec![
        TransformPart::translate(5.0, 5.0),
        TransformPart::scale(2.0, 2.0),
    ]));

    let tree = tree(100.0, 100.0, vec![Node::Group(Box::new(g))]);
    assert_rect(measure(&tree).unwrap(), 5.0, 5.0, 25.0, 25.0);
}

#[test]
fn stroke_is_included() {
    let mut path = filled(Shape::rect(10.0, 10.0, 20.0, 20.0), red());
    path.paint.stroke = Some(PaintValue::from(Paint::Color(blue())));
    path.paint.set_stroke_context(StrokeContext::new(
        Some(LengthValue::from(4.0f32)),
        None,
        None,
        None,
        None,
        None,
    ));

    let tree = tree(100.0, 100.0, vec![Node::Path(Box::new(path))]);
    assert_rect(measure(&tree).unwrap(), 8.0, 8.0, 32.0, 32.0);
}

#[test]
fn unpainted_shapes_are_skipped() {
    let mut path = filled(Shape::rect(50.0, 50.0, 20.0, 20.0), red());
    path.paint.fill = Some(PaintValue::from(Paint::None));

    let tree = tree(
        100.0,
        100.0,
        vec![crate::rect(0.0, 0.0, 10.0, 10.0, red()), Node::Path(Box::new(path))],
    );
    assert_rect(measure(&tree).unwrap(), 0.0, 0.0, 10.0, 10.0);
}

#[test]
fn viewport_scaling() {
    let tree = tree(100.0, 100.0, vec![crate::rect(10.0, 10.0, 10.0, 10.0, red())]);
    let viewport = Size::from_wh(200.0, 200.0).unwrap();
    let bbox = animsvg::measure_bounds(&tree, &Options::default(), &FONTS, viewport, Duration::ZERO)
        .unwrap();
    assert_rect(bbox, 20.0, 20.0, 40.0, 40.0);
}

#[test]
fn empty_tree() {
    let tree = tree(100.0, 100.0, Vec::new());
    assert!(measure(&tree).is_none());
}

fn circle_clipped(child: Node) -> Tree {
    let clip = ClipPath {
        children: vec![Node::Path(Box::new(filled(Shape::circle(0.0, 0.0, 10.0), red())))],
        ..ClipPath::default()
    };

    let mut g = group(vec![child]);
    g.clip_path = Some(Arc::new(clip));
    tree(100.0, 100.0, vec![Node::Group(Box::new(g))])
}

#[test]
fn clipped_out_by_curved_clip() {
    // Within the circle's bounding box, outside of the circle.
    let tree = circle_clipped(crate::rect(8.0, 8.0, 2.0, 2.0, red()));
    assert!(measure(&tree).is_none());
}

#[test]
fn curved_clip_shrinks_bounds() {
    let tree = circle_clipped(crate::rect(5.0, 5.0, 10.0, 10.0, red()));
    let bbox = measure(&tree).unwrap();
    let edge = 75.0f32.sqrt();
    assert!((bbox.left() - 5.0).abs() < 0.01 && (bbox.top() - 5.0).abs() < 0.01, "{:?}", bbox);
    assert!((bbox.right() - edge).abs() < 0.05, "{:?}", bbox);
    assert!((bbox.bottom() - edge).abs() < 0.05, "{:?}", bbox);
}

#[test]
fn mask_content_limits_bounds() {
    let mask = Mask {
        children: vec![crate::rect(0.0, 0.0, 10.0, 10.0, Color::white())],
        ..Mask::default()
    };

    let mut g = group(vec![crate::rect(0.0, 0.0, 40.0, 40.0, red())]);
    g.mask = Some(Arc::new(mask));
    let tree = tree(100.0, 100.0, vec![Node::Group(Box::new(g))]);
    assert_rect(measure(&tree).unwrap(), 0.0, 0.0, 10.0, 10.0);
}
