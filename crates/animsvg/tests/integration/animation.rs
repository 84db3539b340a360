use std::sync::Arc;

use animsvg::animsvg_tree::{
    Additive, Animated, Duration, Fill, FloatValue, Interval, Keyframes, LengthValue, Node,
    Shape, Track,
};
use animsvg::Options;

use crate::{alpha, filled, red, render_with, tree};

fn track(fill: Fill) -> Track {
    let i = Interval::new(Duration::ZERO, Duration::from_millis(1000)).unwrap();
    Track::new(vec![i], 1.0, fill).unwrap()
}

fn fade_in(fill: Fill) -> animsvg::animsvg_tree::Tree {
    let a = Animated::new(
        track(fill),
        Keyframes::FromTo(0.0, 1.0),
        Additive::Replace,
        Some(FloatValue::from(1.0)),
    )
    .unwrap();

    let mut path = filled(Shape::rect(0.0, 0.0, 10.0, 10.0), red());
    path.paint.opacity = FloatValue::Animated(Arc::new(a));
    tree(10.0, 10.0, vec![Node::Path(Box::new(path))])
}

fn alpha_at(tree: &animsvg::animsvg_tree::Tree, options: &Options, ms: i64) -> u8 {
    let pixmap = render_with(tree, options, Duration::from_millis(ms));
    alpha(&pixmap, 5, 5)
}

#[test]
fn opacity_is_interpolated() {
    let tree = fade_in(Fill::Freeze);
    let options = Options::default();

    assert_eq!(alpha_at(&tree, &options, 0), 0);
    let a = alpha_at(&tree, &options, 500);
    assert!((126..=129).contains(&a), "{}", a);
    assert_eq!(alpha_at(&tree, &options, 1000), 255);
    assert_eq!(alpha_at(&tree, &options, 5000), 255);
}

#[test]
fn removed_animation_restores_the_static_value() {
    let tree = fade_in(Fill::Remove);
    let options = Options::default();

    let a = alpha_at(&tree, &options, 250);
    assert!((62..=66).contains(&a), "{}", a);
    assert_eq!(alpha_at(&tree, &options, 2000), 255);
}

#[test]
fn static_rendering() {
    let tree = fade_in(Fill::Freeze);
    let options = Options {
        animated: false,
        ..Options::default()
    };

    assert_eq!(alpha_at(&tree, &options, 500), 255);
    assert!(animsvg::animation_period(&tree, &options).is_none());
}

#[test]
fn period() {
    let tree = fade_in(Fill::Freeze);
    let period = animsvg::animation_period(&tree, &Options::default()).unwrap();
    assert_eq!(period.start(), Duration::ZERO);
    assert_eq!(period.end(), Duration::from_millis(1000));
    assert!(period.freezes());
}

#[test]
fn static_document_has_no_period() {
    let tree = tree(10.0, 10.0, vec![crate::rect(0.0, 0.0, 10.0, 10.0, red())]);
    assert!(animsvg::animation_period(&tree, &Options::default()).is_none());
}

#[test]
fn animated_geometry() {
    let a = Animated::new(
        track(Fill::Freeze),
        Keyframes::FromTo(
            animsvg::animsvg_tree::Length::new_number(0.0),
            animsvg::animsvg_tree::Length::new_number(10.0),
        ),
        Additive::Replace,
        Some(LengthValue::from(0.0f32)),
    )
    .unwrap();

    let mut path = filled(Shape::rect(0.0, 0.0, 10.0, 10.0), red());
    if let Shape::Rect { ref mut x, .. } = path.shape {
        *x = LengthValue::Animated(Arc::new(a));
    }

    let tree = tree(20.0, 10.0, vec![Node::Path(Box::new(path))]);
    let options = Options::default();

    let start = render_with(&tree, &options, Duration::ZERO);
    assert_eq!(alpha(&start, 2, 5), 255);
    assert_eq!(alpha(&start, 15, 5), 0);

    let end = render_with(&tree, &options, Duration::from_millis(1000));
    assert_eq!(alpha(&end, 2, 5), 0);
    assert_eq!(alpha(&end, 15, 5), 255);
}
