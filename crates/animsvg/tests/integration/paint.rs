use std::sync::Arc;

use animsvg::animsvg_tree::{
    BaseGradient, Color, Duration, FloatValue, Length, LengthUnit, LengthValue, LinearGradient,
    MeshGradient, MeshStop, Node, Paint, PaintOrder, PaintValue, Pattern, Shape, Stop,
    StrokeContext, Tree, Units, Visibility,
};
use animsvg::Options;

use crate::{alpha, blue, filled, group, pixel, red, render, tree, FONTS};

fn stroked(order: PaintOrder) -> Node {
    let mut path = filled(Shape::rect(10.0, 10.0, 20.0, 20.0), red());
    path.paint.stroke = Some(PaintValue::from(Paint::Color(blue())));
    path.paint.paint_order = Some(order);
    path.paint.set_stroke_context(StrokeContext::new(
        Some(LengthValue::from(4.0f32)),
        None,
        None,
        None,
        None,
        None,
    ));
    Node::Path(Box::new(path))
}

#[test]
fn solid_fill() {
    let pixmap = render(&tree(20.0, 20.0, vec![crate::rect(0.0, 0.0, 10.0, 20.0, red())]));
    assert_eq!(pixel(&pixmap, 5, 10), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 15, 10), 0);
}

#[test]
fn default_fill_is_black() {
    let path = animsvg::animsvg_tree::Path::new(Shape::rect(0.0, 0.0, 10.0, 10.0));
    let pixmap = render(&tree(10.0, 10.0, vec![Node::Path(Box::new(path))]));
    assert_eq!(pixel(&pixmap, 5, 5), (0, 0, 0, 255));
}

#[test]
fn stroke_over_fill() {
    let pixmap = render(&tree(40.0, 40.0, vec![stroked(PaintOrder::FillAndStroke)]));
    assert_eq!(pixel(&pixmap, 11, 20), (0, 0, 255, 255));
    assert_eq!(pixel(&pixmap, 20, 20), (255, 0, 0, 255));
}

#[test]
fn fill_over_stroke() {
    let pixmap = render(&tree(40.0, 40.0, vec![stroked(PaintOrder::StrokeAndFill)]));
    assert_eq!(pixel(&pixmap, 11, 20), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 9, 20), (0, 0, 255, 255));
}

#[test]
fn current_color() {
    let mut path = animsvg::animsvg_tree::Path::new(Shape::rect(0.0, 0.0, 10.0, 10.0));
    path.paint.fill = Some(PaintValue::from(Paint::CurrentColor));

    let mut g = group(vec![Node::Path(Box::new(path))]);
    g.paint.color = Some(PaintValue::from(Paint::Color(blue())));

    let pixmap = render(&tree(10.0, 10.0, vec![Node::Group(Box::new(g))]));
    assert_eq!(pixel(&pixmap, 5, 5), (0, 0, 255, 255));
}

#[test]
fn fill_inherited_from_group() {
    let path = animsvg::animsvg_tree::Path::new(Shape::rect(0.0, 0.0, 10.0, 10.0));
    let mut g = group(vec![Node::Path(Box::new(path))]);
    g.paint.fill = Some(PaintValue::from(Paint::Color(red())));

    let pixmap = render(&tree(10.0, 10.0, vec![Node::Group(Box::new(g))]));
    assert_eq!(pixel(&pixmap, 5, 5), (255, 0, 0, 255));
}

#[test]
fn opacity_is_multiplied_along_the_tree() {
    let mut inner = group(vec![crate::rect(0.0, 0.0, 10.0, 10.0, red())]);
    inner.paint.opacity = FloatValue::from(0.5);
    let mut outer = group(vec![Node::Group(Box::new(inner))]);
    outer.paint.opacity = FloatValue::from(0.5);

    let pixmap = render(&tree(10.0, 10.0, vec![Node::Group(Box::new(outer))]));
    let a = alpha(&pixmap, 5, 5);
    assert!((63..=65).contains(&a), "{}", a);
}

#[test]
fn fill_opacity() {
    let mut path = filled(Shape::rect(0.0, 0.0, 10.0, 10.0), red());
    path.paint.fill_opacity = Some(FloatValue::from(0.5));
    let pixmap = render(&tree(10.0, 10.0, vec![Node::Path(Box::new(path))]));
    let a = alpha(&pixmap, 5, 5);
    assert!((127..=128).contains(&a), "{}", a);
}

#[test]
fn hidden_nodes() {
    let mut path = filled(Shape::rect(0.0, 0.0, 10.0, 10.0), red());
    path.visibility = Visibility::Hidden;
    let mut g = group(vec![crate::rect(0.0, 0.0, 10.0, 10.0, red())]);
    g.visibility = Visibility::Collapse;

    let pixmap = render(&tree(
        10.0,
        10.0,
        vec![Node::Path(Box::new(path)), Node::Group(Box::new(g))],
    ));
    assert_eq!(alpha(&pixmap, 5, 5), 0);
}

fn linear_gradient(units: Units) -> Paint {
    let x2 = match units {
        Units::ObjectBoundingBox => Length::new_number(1.0),
        Units::UserSpaceOnUse => Length::new(100.0, LengthUnit::Percent),
    };

    Paint::LinearGradient(Arc::new(LinearGradient {
        base: BaseGradient {
            units,
            stops: vec![Stop::new(0.0, red()), Stop::new(1.0, blue())],
            ..BaseGradient::default()
        },
        x1: Length::zero(),
        y1: Length::zero(),
        x2,
        y2: Length::zero(),
    }))
}

#[test]
fn bbox_linear_gradient() {
    let mut path = animsvg::animsvg_tree::Path::new(Shape::rect(50.0, 0.0, 50.0, 10.0));
    path.paint.fill = Some(PaintValue::from(linear_gradient(Units::ObjectBoundingBox)));
    let pixmap = render(&tree(100.0, 10.0, vec![Node::Path(Box::new(path))]));

    let (r, _, b, _) = pixel(&pixmap, 51, 5);
    assert!(r > 240 && b < 15);
    let (r, _, b, _) = pixel(&pixmap, 98, 5);
    assert!(r < 15 && b > 240);
}

#[test]
fn user_space_linear_gradient() {
    let mut path = animsvg::animsvg_tree::Path::new(Shape::rect(50.0, 0.0, 50.0, 10.0));
    path.paint.fill = Some(PaintValue::from(linear_gradient(Units::UserSpaceOnUse)));
    let pixmap = render(&tree(100.0, 10.0, vec![Node::Path(Box::new(path))]));

    // The gradient spans the whole viewport, so the shape starts mid-way.
    let (r, _, b, _) = pixel(&pixmap, 50, 5);
    assert!((115..=140).contains(&r), "{}", r);
    assert!((115..=140).contains(&b), "{}", b);
}

fn mesh_stop(edge: &str, color: Color) -> MeshStop {
    MeshStop {
        edge: edge.parse().unwrap(),
        color,
    }
}

#[test]
fn mesh_gradient() {
    let mesh = MeshGradient::new(
        String::new(),
        Units::UserSpaceOnUse,
        Length::zero(),
        Length::zero(),
        animsvg::tiny_skia::Transform::identity(),
        &[vec![vec![
            mesh_stop("l 40 0", red()),
            mesh_stop("l 0 40", red()),
            mesh_stop("l -40 0", blue()),
            mesh_stop("l 0 -40", blue()),
        ]]],
    )
    .unwrap();

    let mut path = animsvg::animsvg_tree::Path::new(Shape::rect(0.0, 0.0, 40.0, 40.0));
    path.paint.fill = Some(PaintValue::from(Paint::MeshGradient(Arc::new(mesh))));
    let pixmap = render(&tree(40.0, 40.0, vec![Node::Path(Box::new(path))]));

    let (r, _, b, a) = pixel(&pixmap, 20, 2);
    assert_eq!(a, 255);
    assert!(r > 220 && b < 35, "{} {}", r, b);

    let (r, _, b, _) = pixel(&pixmap, 20, 37);
    assert!(r < 35 && b > 220, "{} {}", r, b);
}

fn red_mesh() -> Paint {
    let mesh = MeshGradient::new(
        String::new(),
        Units::UserSpaceOnUse,
        Length::zero(),
        Length::zero(),
        animsvg::tiny_skia::Transform::identity(),
        &[vec![vec![
            mesh_stop("l 40 0", red()),
            mesh_stop("l 0 40", red()),
            mesh_stop("l -40 0", red()),
            mesh_stop("l 0 -40", red()),
        ]]],
    )
    .unwrap();

    Paint::MeshGradient(Arc::new(mesh))
}

fn mesh_filled_half() -> Tree {
    let mut path = animsvg::animsvg_tree::Path::new(Shape::rect(0.0, 0.0, 20.0, 40.0));
    path.paint.fill = Some(PaintValue::from(red_mesh()));
    tree(40.0, 40.0, vec![Node::Path(Box::new(path))])
}

#[test]
fn mesh_gradient_is_clipped_to_the_shape() {
    let pixmap = render(&mesh_filled_half());
    assert_eq!(pixel(&pixmap, 10, 20), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 30, 20), 0);
}

#[test]
fn mesh_filled_shape_has_bounds() {
    let tree = mesh_filled_half();
    let bbox =
        animsvg::measure_bounds(&tree, &Options::default(), &FONTS, tree.size, Duration::ZERO)
            .unwrap();
    assert_eq!(bbox, animsvg::tiny_skia::Rect::from_xywh(0.0, 0.0, 20.0, 40.0).unwrap());
}

fn pattern_filled(pattern: Pattern) -> Tree {
    let mut path = animsvg::animsvg_tree::Path::new(Shape::rect(0.0, 0.0, 40.0, 10.0));
    path.paint.fill = Some(PaintValue::from(Paint::Pattern(Arc::new(pattern))));
    tree(40.0, 10.0, vec![Node::Path(Box::new(path))])
}

#[test]
fn pattern_tile_repeats() {
    let pattern = Pattern {
        units: Units::UserSpaceOnUse,
        width: Length::new_number(10.0),
        height: Length::new_number(10.0),
        children: vec![crate::rect(0.0, 0.0, 5.0, 10.0, red())],
        ..Pattern::default()
    };

    let pixmap = render(&pattern_filled(pattern));
    for x in [2, 12, 32] {
        assert!(alpha(&pixmap, x, 5) >= 250, "{}", x);
        assert!(pixel(&pixmap, x, 5).0 >= 250, "{}", x);
    }
    for x in [7, 17, 37] {
        assert!(alpha(&pixmap, x, 5) <= 5, "{}", x);
    }
}

#[test]
fn bbox_pattern_tile() {
    let pattern = Pattern {
        width: Length::new_number(0.5),
        height: Length::new_number(1.0),
        children: vec![crate::rect(0.0, 0.0, 10.0, 10.0, blue())],
        ..Pattern::default()
    };

    // The tile is half of the 40 px wide shape.
    let pixmap = render(&pattern_filled(pattern));
    assert!(alpha(&pixmap, 5, 5) >= 250);
    assert!(alpha(&pixmap, 15, 5) <= 5);
    assert!(alpha(&pixmap, 25, 5) >= 250);
    assert!(alpha(&pixmap, 35, 5) <= 5);
}
