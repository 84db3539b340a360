use std::sync::Arc;

use animsvg::animsvg_tree::{
    Color, Duration, Group, Node, Paint, PaintValue, Path, Shape, Size, Tree,
};
use animsvg::{FontCache, Options};
use once_cell::sync::Lazy;

mod animation;
mod bounds;
mod paint;
mod structure;

static FONTS: Lazy<FontCache> = Lazy::new(FontCache::default);

pub fn red() -> Color {
    Color::new_rgb(255, 0, 0)
}

pub fn blue() -> Color {
    Color::new_rgb(0, 0, 255)
}

pub fn filled(shape: Shape, color: Color) -> Path {
    let mut path = Path::new(shape);
    path.paint.fill = Some(PaintValue::from(Paint::Color(color)));
    path
}

pub fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> Node {
    Node::Path(Box::new(filled(Shape::rect(x, y, w, h), color)))
}

pub fn group(children: Vec<Node>) -> Group {
    Group::with_children(children)
}

pub fn tree(width: f32, height: f32, children: Vec<Node>) -> Tree {
    Tree::new(Size::from_wh(width, height).unwrap(), group(children))
}

pub fn render_with(tree: &Tree, options: &Options, timestamp: Duration) -> tiny_skia::Pixmap {
    let mut pixmap = tiny_skia::Pixmap::new(
        tree.size.width().ceil() as u32,
        tree.size.height().ceil() as u32,
    )
    .unwrap();

    animsvg::render_to_pixmap(
        tree,
        options,
        &FONTS,
        timestamp,
        tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    pixmap
}

pub fn render(tree: &Tree) -> tiny_skia::Pixmap {
    render_with(tree, &Options::default(), Duration::ZERO)
}

/// Returns a demultiplied RGBA pixel.
pub fn pixel(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let c = pixmap.pixel(x, y).unwrap().demultiply();
    (c.red(), c.green(), c.blue(), c.alpha())
}

pub fn alpha(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> u8 {
    pixmap.pixel(x, y).unwrap().alpha()
}

pub fn shared_tree(tree: Tree) -> Arc<Tree> {
    Arc::new(tree)
}
