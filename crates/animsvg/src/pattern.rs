// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{utils::view_box_to_transform, Pattern, Units};
use tiny_skia::{NonZeroRect, Transform};

use crate::context::RenderContext;
use crate::output::{Output, RasterOutput};
use crate::OptionLog;

/// Renders a pattern tile and sets it as the paint of `output`.
///
/// The tile is rendered at the device resolution of `output`.
/// Sinks without color support only need geometry and keep their paint.
///
/// Returns `None` when the pattern draws nothing.
pub fn prepare(
    pattern: &Pattern,
    object_bbox: Option<NonZeroRect>,
    ctx: &RenderContext,
    output: &mut dyn Output,
) -> Option<()> {
    if pattern.children.is_empty() {
        return None;
    }

    if !output.supports_colors() {
        return Some(());
    }

    let rect = crate::paint_server::resolve_rect(
        pattern.units,
        [pattern.x, pattern.y, pattern.width, pattern.height],
        object_bbox,
        ctx.measure(),
    )
    .log_none(|| log::warn!("Pattern '{}' has an invalid tile.", pattern.id))?;

    let content_transform =
        if pattern.content_units == Units::ObjectBoundingBox && pattern.view_box.is_none() {
            let bbox = object_bbox
                .log_none(|| log::warn!("Pattern on zero-sized shapes is not allowed."))?;

            // No need to shift patterns.
            Transform::from_scale(bbox.width(), bbox.height())
        } else {
            Transform::identity()
        };

    let (sx, sy) = output.transform().pre_concat(pattern.transform).get_scale();
    let tile_size = tiny_skia::IntSize::from_wh(
        (rect.width() * sx).round() as u32,
        (rect.height() * sy).round() as u32,
    )?;
    let mut tile = tiny_skia::Pixmap::new(tile_size.width(), tile_size.height())?;

    let mut transform = Transform::from_scale(sx, sy);
    if let Some(vbox) = pattern.view_box {
        transform = transform.pre_concat(view_box_to_transform(vbox.rect, vbox.aspect, rect.size()));
    }
    transform = transform.pre_concat(content_transform);

    {
        let mut tile = tile.as_mut();
        let mut tile_output = RasterOutput::new(&mut tile, ctx.options().anti_alias);
        tile_output.set_transform(transform);
        crate::render::render_nodes(&pattern.children, &ctx.for_resource(transform), &mut tile_output);
    }

    let ts = pattern
        .transform
        .pre_translate(rect.x(), rect.y())
        .pre_scale(1.0 / sx, 1.0 / sy);
    output.set_pattern(tile, ts);
    Some(())
}
