// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{Paint, PaintOrder};

use crate::bounds::ElementBounds;
use crate::context::RenderContext;
use crate::output::Output;

pub fn render(
    path: &animsvg_tree::Path,
    ctx: &RenderContext,
    bounds: &ElementBounds,
    output: &mut dyn Output,
) -> Option<()> {
    let shape = path.shape.to_path(ctx.measure())?;
    let rule = convert_rule(ctx.paint().fill_rule());

    if ctx.is_geometry_only() {
        output.fill_shape(&shape, rule);
        return Some(());
    }

    if ctx.paint().paint_order.unwrap_or_default() == PaintOrder::FillAndStroke {
        fill_path(&shape, rule, ctx, bounds, output);
        stroke_path(&shape, ctx, bounds, output);
    } else {
        stroke_path(&shape, ctx, bounds, output);
        fill_path(&shape, rule, ctx, bounds, output);
    }

    Some(())
}

pub fn convert_rule(rule: animsvg_tree::FillRule) -> tiny_skia::FillRule {
    match rule {
        animsvg_tree::FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        _ => tiny_skia::FillRule::Winding,
    }
}

fn fill_path(
    path: &tiny_skia::Path,
    rule: tiny_skia::FillRule,
    ctx: &RenderContext,
    bounds: &ElementBounds,
    output: &mut dyn Output,
) -> Option<()> {
    let m = ctx.measure();
    let paint = ctx.paint().fill_paint(m);
    if paint.is_none() {
        return None;
    }

    // Horizontal and vertical lines cannot be filled. Skip.
    if path.bounds().width() == 0.0 || path.bounds().height() == 0.0 {
        return None;
    }

    let object_bbox = bounds.geometry_box().and_then(|r| r.to_non_zero_rect());
    let opacity = ctx.paint().fill_opacity(m) * ctx.paint().opacity(m);

    let mut output = output.create_child();
    output.apply_opacity(opacity);
    match paint {
        Paint::MeshGradient(ref mesh) => {
            crate::mesh::fill(mesh, path, rule, object_bbox, ctx, output.as_mut());
        }
        Paint::Pattern(ref pattern) => {
            if crate::pattern::prepare(pattern, object_bbox, ctx, output.as_mut()).is_some() {
                output.fill_shape(path, rule);
            }
        }
        ref paint => {
            if let Some(shader) = crate::paint_server::convert(paint, object_bbox, m) {
                output.set_paint(shader);
                output.fill_shape(path, rule);
            }
        }
    }

    output.dispose();
    Some(())
}

fn stroke_path(
    path: &tiny_skia::Path,
    ctx: &RenderContext,
    bounds: &ElementBounds,
    output: &mut dyn Output,
) -> Option<()> {
    let m = ctx.measure();
    let paint = ctx.paint().stroke_paint(m);
    if paint.is_none() {
        return None;
    }

    let stroke = ctx.paint().stroke_context()?.to_stroke(m)?;
    let object_bbox = bounds.geometry_box().and_then(|r| r.to_non_zero_rect());
    let opacity = ctx.paint().stroke_opacity(m) * ctx.paint().opacity(m);

    let mut output = output.create_child();
    output.apply_opacity(opacity);
    match paint {
        Paint::MeshGradient(ref mesh) => {
            let res_scale = tiny_skia::PathStroker::compute_resolution_scale(&output.transform());
            if let Some(outline) = path.stroke(&stroke, res_scale) {
                crate::mesh::fill(
                    mesh,
                    &outline,
                    tiny_skia::FillRule::Winding,
                    object_bbox,
                    ctx,
                    output.as_mut(),
                );
            }
        }
        Paint::Pattern(ref pattern) => {
            if crate::pattern::prepare(pattern, object_bbox, ctx, output.as_mut()).is_some() {
                output.set_stroke(stroke);
                output.draw_shape(path);
            }
        }
        ref paint => {
            if let Some(shader) = crate::paint_server::convert(paint, object_bbox, m) {
                output.set_paint(shader);
                output.set_stroke(stroke);
                output.draw_shape(path);
            }
        }
    }

    output.dispose();
    Some(())
}
