// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`animsvg` is a runtime render engine for animated SVG trees.

Attributes are resolved at render time against a document timestamp,
so the same [`animsvg_tree::Tree`] can be rendered at any point of its animation.

Rendering goes through an [`Output`] sink. [`RasterOutput`] paints onto
a `tiny_skia` pixmap and [`ShapeOutput`] only collects geometry,
which is how [`measure_bounds`] works.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::identity_op)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub use animsvg_tree;
pub use tiny_skia;

mod bounds;
mod clip;
mod context;
mod font;
mod image;
mod mask;
mod mesh;
mod options;
mod output;
mod paint_server;
mod path;
mod pattern;
mod render;
mod transform;

use animsvg_tree::{AnimationPeriod, Duration, Size, Tree};

pub use crate::context::RenderContext;
pub use crate::font::{FontCache, FontMetrics, FontMetricsProvider, SimpleFontMetrics};
pub use crate::options::Options;
pub use crate::output::{Area, AreaPiece, Output, RasterOutput, ShapeOutput};

/// Renders a tree into a sink.
///
/// The tree's view box is mapped onto `viewport`, starting at the sink's
/// current transform. The sink state itself is left untouched.
pub fn render(
    tree: &Tree,
    options: &Options,
    fonts: &FontCache,
    output: &mut dyn Output,
    viewport: Size,
    timestamp: Duration,
) {
    let mut output = output.create_child();
    output.apply_transform(tree.view_box.to_transform(viewport));

    let root = RenderContext::root(
        options,
        fonts,
        tree.view_box.rect.size(),
        timestamp,
        output.transform(),
    );

    // The root element's transform and clip path are not applied.
    let ctx = root.derive_group(&tree.root);
    render::render_nodes(&tree.root.children, &ctx, output.as_mut());
    output.dispose();
}

/// Returns the bounds of everything a tree would draw.
///
/// Uses the same traversal as [`render`], with a [`ShapeOutput`].
/// Returns `None` when nothing is drawn.
pub fn measure_bounds(
    tree: &Tree,
    options: &Options,
    fonts: &FontCache,
    viewport: Size,
    timestamp: Duration,
) -> Option<tiny_skia::Rect> {
    let mut area = Area::default();
    {
        let mut output = ShapeOutput::new(&mut area);
        render(tree, options, fonts, &mut output, viewport, timestamp);
    }

    area.bounds()
}

/// Renders a tree onto a pixmap.
///
/// `transform` will be used as a root transform.
/// Can be used to position SVG inside the `pixmap`.
pub fn render_to_pixmap(
    tree: &Tree,
    options: &Options,
    fonts: &FontCache,
    timestamp: Duration,
    transform: tiny_skia::Transform,
    pixmap: &mut tiny_skia::PixmapMut,
) {
    let mut output = RasterOutput::new(pixmap, options.anti_alias);
    output.set_transform(transform);
    render(tree, options, fonts, &mut output, tree.size, timestamp);
    output.dispose();
}

/// Returns the time window covered by the document's animations.
///
/// Returns `None` for a static document or when animations are disabled.
pub fn animation_period(tree: &Tree, options: &Options) -> Option<AnimationPeriod> {
    if !options.animated {
        return None;
    }

    tree.animation_period()
}

pub(crate) trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}
