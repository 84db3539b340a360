// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{Node, Visibility};

use crate::bounds::ElementBounds;
use crate::context::RenderContext;
use crate::output::Output;

/// Renders nodes in document order.
pub fn render_nodes(children: &[Node], ctx: &RenderContext, output: &mut dyn Output) {
    for node in children {
        render_node(node, ctx, output);
    }
}

/// Renders a single node.
///
/// `parent` is the context of the node's parent.
pub fn render_node(node: &Node, parent: &RenderContext, output: &mut dyn Output) -> Option<()> {
    if node.visibility() != Visibility::Visible {
        return None;
    }

    let ctx = parent.derive(node);
    let bounds = ElementBounds::new(node, &ctx);
    let transform = crate::transform::effective_transform(node.transformable(), &ctx, &bounds);

    let mut output = output.create_child();
    if let Some(ts) = transform {
        output.apply_transform(ts);
    }

    let local = match transform {
        Some(ts) => ctx.concat_user_space(ts),
        None => ctx.clone(),
    };

    if let Node::Group(ref group) = node {
        if let Some(ref clip) = group.clip_path {
            if crate::clip::apply(clip, bounds.geometry_box(), &local, output.as_mut()).is_none() {
                output.dispose();
                return None;
            }
        }

        if let Some(ref mask) = group.mask {
            let object_bbox = bounds.geometry_box().and_then(|r| r.to_non_zero_rect());
            if crate::mask::apply(mask, object_bbox, &local, output.as_mut()).is_none() {
                output.dispose();
                return None;
            }
        }
    }

    match node {
        Node::Group(ref group) => {
            render_nodes(&group.children, &local, output.as_mut());
        }
        Node::Path(ref path) => {
            crate::path::render(path, &local, &bounds, output.as_mut());
        }
        Node::Image(ref image) => {
            crate::image::render(image, &local, output.as_mut());
        }
    }

    output.dispose();
    Some(())
}
