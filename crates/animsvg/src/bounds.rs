// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{LengthKind, Node};
use once_cell::unsync::OnceCell;
use tiny_skia::Rect;

use crate::context::RenderContext;
use crate::output::{Area, Output, ShapeOutput};

/// Lazily computed, untransformed bounds of a node.
///
/// Most nodes never need their bounds, so nothing is computed upfront.
pub struct ElementBounds<'a> {
    node: &'a Node,
    ctx: &'a RenderContext<'a>,
    geometry: OnceCell<Option<Rect>>,
    stroke: OnceCell<Option<Rect>>,
}

impl<'a> ElementBounds<'a> {
    /// Creates bounds of `node`. `ctx` is the node's own context.
    pub fn new(node: &'a Node, ctx: &'a RenderContext<'a>) -> Self {
        ElementBounds {
            node,
            ctx,
            geometry: OnceCell::new(),
            stroke: OnceCell::new(),
        }
    }

    /// Returns the fill box.
    ///
    /// Used by `objectBoundingBox` units and `transform-box: fill-box`.
    pub fn geometry_box(&self) -> Option<Rect> {
        *self.geometry.get_or_init(|| self.compute_geometry())
    }

    /// Returns the stroke box.
    ///
    /// Same as the fill box for nodes without a stroke.
    pub fn stroke_box(&self) -> Option<Rect> {
        *self.stroke.get_or_init(|| self.compute_stroke())
    }

    fn compute_geometry(&self) -> Option<Rect> {
        let m = self.ctx.measure();
        match self.node {
            Node::Path(ref path) => path.shape.bounds(m),
            Node::Image(ref image) => Rect::from_xywh(
                image.x.resolve(m, LengthKind::Width),
                image.y.resolve(m, LengthKind::Height),
                image.width.resolve(m, LengthKind::Width),
                image.height.resolve(m, LengthKind::Height),
            ),
            Node::Group(ref group) => {
                group_bounds(&group.children, &self.ctx.for_geometry())
            }
        }
    }

    fn compute_stroke(&self) -> Option<Rect> {
        let m = self.ctx.measure();
        match self.node {
            Node::Path(ref path) => {
                let geometry = self.geometry_box();
                let paint = self.ctx.paint();
                if paint.stroke_paint(m).is_none() {
                    return geometry;
                }

                let stroke = paint.stroke_context().and_then(|s| s.to_stroke(m));
                let outline = stroke.and_then(|stroke| {
                    let path = path.shape.to_path(m)?;
                    path.stroke(&stroke, 1.0).map(|p| p.bounds())
                });

                match (geometry, outline) {
                    (Some(a), Some(b)) => animsvg_tree::BBox::from(a).expand(b).to_rect(),
                    (a, b) => a.or(b),
                }
            }
            Node::Image(_) => self.geometry_box(),
            Node::Group(ref group) => group_bounds(&group.children, self.ctx),
        }
    }
}

impl std::fmt::Debug for ElementBounds<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ElementBounds")
            .field("id", &self.node.id())
            .field("geometry", &self.geometry.get())
            .field("stroke", &self.stroke.get())
            .finish()
    }
}

fn group_bounds(children: &[Node], ctx: &RenderContext) -> Option<Rect> {
    let mut area = Area::default();
    {
        let mut output = ShapeOutput::new(&mut area);
        crate::render::render_nodes(children, ctx, &mut output);
        output.dispose();
    }

    area.bounds()
}
