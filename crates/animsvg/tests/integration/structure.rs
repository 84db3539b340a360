use std::sync::Arc;

use animsvg::animsvg_tree::{
    AspectRatio, ClipPath, Color, FloatValue, FontSize, FontSpec, Image, ImageKind, Length,
    LengthUnit, LengthValue, Mask, MaskType, Node, PaintContext, Shape, TransformBox,
    TransformOrigin, TransformPart, TransformValue, Transformable, Units, ViewBox, Visibility,
};

use crate::{alpha, filled, group, pixel, red, render, shared_tree, tree};

fn clipped(clip: ClipPath, children: Vec<Node>) -> Node {
    let mut g = group(children);
    g.clip_path = Some(Arc::new(clip));
    Node::Group(Box::new(g))
}

#[test]
fn user_space_clip_path() {
    let clip = ClipPath {
        children: vec![crate::rect(0.0, 0.0, 10.0, 20.0, red())],
        ..ClipPath::default()
    };

    let pixmap = render(&tree(
        20.0,
        20.0,
        vec![clipped(clip, vec![crate::rect(0.0, 0.0, 20.0, 20.0, red())])],
    ));
    assert_eq!(pixel(&pixmap, 5, 10), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 15, 10), 0);
}

#[test]
fn bbox_clip_path() {
    let clip = ClipPath {
        units: Units::ObjectBoundingBox,
        children: vec![crate::rect(0.0, 0.0, 0.5, 1.0, red())],
        ..ClipPath::default()
    };

    let pixmap = render(&tree(
        40.0,
        20.0,
        vec![clipped(clip, vec![crate::rect(10.0, 0.0, 20.0, 20.0, red())])],
    ));
    assert_eq!(alpha(&pixmap, 5, 10), 0);
    assert_eq!(pixel(&pixmap, 15, 10), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 25, 10), 0);
}

#[test]
fn empty_clip_path_hides_the_group() {
    let pixmap = render(&tree(
        20.0,
        20.0,
        vec![clipped(ClipPath::default(), vec![crate::rect(0.0, 0.0, 20.0, 20.0, red())])],
    ));
    assert_eq!(alpha(&pixmap, 10, 10), 0);
}

#[test]
fn clip_path_ignores_paint() {
    let mut invisible = filled(Shape::rect(0.0, 0.0, 10.0, 20.0), red());
    invisible.paint = PaintContext::default();
    invisible.paint.fill_opacity = Some(FloatValue::from(0.0));

    let clip = ClipPath {
        children: vec![Node::Path(Box::new(invisible))],
        ..ClipPath::default()
    };

    let pixmap = render(&tree(
        20.0,
        20.0,
        vec![clipped(clip, vec![crate::rect(0.0, 0.0, 20.0, 20.0, red())])],
    ));
    assert_eq!(alpha(&pixmap, 5, 10), 255);
}

fn masked(mask: Mask, children: Vec<Node>) -> Node {
    let mut g = group(children);
    g.mask = Some(Arc::new(mask));
    Node::Group(Box::new(g))
}

fn half_white_mask() -> Mask {
    Mask {
        children: vec![
            crate::rect(0.0, 0.0, 10.0, 10.0, Color::white()),
            crate::rect(10.0, 0.0, 10.0, 10.0, Color::black()),
        ],
        ..Mask::default()
    }
}

#[test]
fn luminance_mask() {
    let pixmap = render(&tree(
        20.0,
        10.0,
        vec![masked(half_white_mask(), vec![crate::rect(0.0, 0.0, 20.0, 10.0, red())])],
    ));
    assert!(alpha(&pixmap, 5, 5) >= 254);
    assert_eq!(alpha(&pixmap, 15, 5), 0);
}

#[test]
fn alpha_mask_ignores_colors() {
    let mask = Mask {
        kind: MaskType::Alpha,
        ..half_white_mask()
    };

    let pixmap = render(&tree(
        30.0,
        10.0,
        vec![masked(mask, vec![crate::rect(0.0, 0.0, 30.0, 10.0, red())])],
    ));
    assert_eq!(alpha(&pixmap, 5, 5), 255);
    assert_eq!(alpha(&pixmap, 15, 5), 255);
    assert_eq!(alpha(&pixmap, 25, 5), 0);
}

#[test]
fn mask_region_clips_the_content() {
    let mask = Mask {
        units: Units::UserSpaceOnUse,
        x: Length::zero(),
        y: Length::zero(),
        width: Length::new_number(4.0),
        height: Length::new_number(10.0),
        ..half_white_mask()
    };

    let pixmap = render(&tree(
        20.0,
        10.0,
        vec![masked(mask, vec![crate::rect(0.0, 0.0, 20.0, 10.0, red())])],
    ));
    assert!(alpha(&pixmap, 2, 5) >= 254);
    assert_eq!(alpha(&pixmap, 6, 5), 0);
}

#[test]
fn empty_mask_hides_the_group() {
    let pixmap = render(&tree(
        20.0,
        10.0,
        vec![masked(Mask::default(), vec![crate::rect(0.0, 0.0, 20.0, 10.0, red())])],
    ));
    assert_eq!(alpha(&pixmap, 5, 5), 0);
}

#[test]
fn hidden_group_hides_children() {
    let child = filled(Shape::rect(0.0, 0.0, 10.0, 10.0), red());
    let mut g = group(vec![Node::Path(Box::new(child))]);
    g.visibility = Visibility::Hidden;

    let pixmap = render(&tree(10.0, 10.0, vec![Node::Group(Box::new(g))]));
    assert_eq!(alpha(&pixmap, 5, 5), 0);
}

fn half_scale(transform_box: TransformBox) -> Transformable {
    Transformable {
        transform: Some(TransformValue::from(vec![TransformPart::scale(0.5, 0.5)])),
        origin: TransformOrigin {
            x: Length::new(50.0, LengthUnit::Percent),
            y: Length::new(50.0, LengthUnit::Percent),
        },
        transform_box,
    }
}

#[test]
fn fill_box_transform_origin() {
    let mut path = filled(Shape::rect(10.0, 10.0, 20.0, 20.0), red());
    path.transformable = half_scale(TransformBox::FillBox);

    let pixmap = render(&tree(40.0, 40.0, vec![Node::Path(Box::new(path))]));
    assert_eq!(pixel(&pixmap, 20, 20), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 12, 12), 0);
    assert_eq!(alpha(&pixmap, 27, 27), 0);
}

#[test]
fn view_box_transform_origin() {
    let mut path = filled(Shape::rect(0.0, 0.0, 40.0, 40.0), red());
    path.transformable = half_scale(TransformBox::ViewBox);

    // Scaled around the viewport center, so the rect covers 20..40.
    let pixmap = render(&tree(80.0, 80.0, vec![Node::Path(Box::new(path))]));
    assert_eq!(alpha(&pixmap, 15, 15), 0);
    assert_eq!(pixel(&pixmap, 30, 30), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 45, 45), 0);
}

#[test]
fn font_relative_lengths() {
    let em = |n: f64| LengthValue::from(Length::new(n, LengthUnit::Em));
    let mut path = filled(Shape::rect(0.0, 0.0, 0.0, 10.0), red());
    if let Shape::Rect { ref mut width, .. } = path.shape {
        *width = em(1.0);
    }

    let mut g = group(vec![Node::Path(Box::new(path))]);
    g.font = Some(FontSpec {
        size: Some(FontSize::Length(Length::new_number(20.0))),
        ..FontSpec::default()
    });

    let pixmap = render(&tree(40.0, 10.0, vec![Node::Group(Box::new(g))]));
    assert_eq!(pixel(&pixmap, 15, 5), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 25, 5), 0);
}

#[test]
fn view_box_mapping() {
    let mut tree = tree(20.0, 20.0, vec![crate::rect(0.0, 0.0, 5.0, 5.0, red())]);
    tree.view_box = ViewBox {
        rect: tiny_skia::NonZeroRect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap(),
        aspect: AspectRatio::default(),
    };

    let pixmap = render(&tree);
    assert_eq!(pixel(&pixmap, 8, 8), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 12, 12), 0);
}

fn image(kind: ImageKind, size: f32) -> Node {
    Node::Image(Box::new(Image {
        id: String::new(),
        visibility: Visibility::Visible,
        transformable: Transformable::default(),
        paint: PaintContext::default(),
        x: LengthValue::from(0.0f32),
        y: LengthValue::from(0.0f32),
        width: LengthValue::from(size),
        height: LengthValue::from(size),
        aspect: AspectRatio::default(),
        kind,
    }))
}

#[test]
fn raster_image() {
    let data = [255, 0, 0, 255].repeat(4);
    let kind = ImageKind::Rgba {
        width: 2,
        height: 2,
        data: Arc::new(data),
    };

    let pixmap = render(&tree(30.0, 30.0, vec![image(kind, 20.0)]));
    assert_eq!(pixel(&pixmap, 10, 10), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 25, 25), 0);
}

#[test]
fn nested_svg_image() {
    let inner = shared_tree(tree(10.0, 10.0, vec![crate::rect(0.0, 0.0, 5.0, 10.0, red())]));
    let pixmap = render(&tree(30.0, 30.0, vec![image(ImageKind::Svg(inner), 20.0)]));

    assert_eq!(pixel(&pixmap, 5, 10), (255, 0, 0, 255));
    assert_eq!(alpha(&pixmap, 15, 10), 0);
    assert_eq!(alpha(&pixmap, 25, 25), 0);
}

#[test]
fn image_opacity() {
    let inner = shared_tree(tree(10.0, 10.0, vec![crate::rect(0.0, 0.0, 10.0, 10.0, red())]));
    let mut node = image(ImageKind::Svg(inner), 10.0);
    if let Node::Image(ref mut image) = node {
        image.paint.opacity = FloatValue::from(0.5);
    }

    let pixmap = render(&tree(10.0, 10.0, vec![node]));
    let a = alpha(&pixmap, 5, 5);
    assert!((127..=128).contains(&a), "{}", a);
}
