// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{Duration, ImageKind, LengthKind};
use tiny_skia::Transform;

use crate::context::RenderContext;
use crate::output::{Area, Output};
use crate::OptionLog;

pub fn render(
    image: &animsvg_tree::Image,
    ctx: &RenderContext,
    output: &mut dyn Output,
) -> Option<()> {
    let m = ctx.measure();
    let rect = tiny_skia::NonZeroRect::from_xywh(
        image.x.resolve(m, LengthKind::Width),
        image.y.resolve(m, LengthKind::Height),
        image.width.resolve(m, LengthKind::Width),
        image.height.resolve(m, LengthKind::Height),
    )
    .log_none(|| log::warn!("Image '{}' has an invalid size. Skipped.", image.id))?;

    let size = image.kind.size()?;
    let view_box = size.to_non_zero_rect(0.0, 0.0);
    let ts = Transform::from_translate(rect.x(), rect.y()).pre_concat(
        animsvg_tree::utils::view_box_to_transform(view_box, image.aspect, rect.size()),
    );

    let mut output = output.create_child();
    output.apply_opacity(ctx.paint().opacity(m));
    if image.aspect.slice {
        output.apply_clip(&Area::from_rect(rect.to_rect()));
    }

    match image.kind {
        ImageKind::Rgba {
            width,
            height,
            ref data,
        } => {
            let pixmap = rgba_to_pixmap(width, height, data)
                .log_none(|| log::warn!("Image '{}' has invalid pixel data.", image.id));
            if let Some(pixmap) = pixmap {
                output.draw_image(pixmap.as_ref(), ts);
            }
        }
        ImageKind::Svg(ref tree) => {
            output.apply_transform(ts);
            output.apply_clip(&Area::from_rect(view_box.to_rect()));
            crate::render(
                tree,
                ctx.options(),
                ctx.fonts(),
                output.as_mut(),
                tree.size,
                ctx.timestamp().unwrap_or(Duration::ZERO),
            );
        }
    }

    output.dispose();
    Some(())
}

/// Converts straight RGBA into a premultiplied pixmap.
fn rgba_to_pixmap(width: u32, height: u32, data: &[u8]) -> Option<tiny_skia::Pixmap> {
    use rgb::FromSlice;

    if data.len() != width as usize * height as usize * tiny_skia::BYTES_PER_PIXEL {
        return None;
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)?;
    let mut i = 0;
    let dst = pixmap.data_mut();
    for p in data.as_rgba() {
        let a = p.a as f64 / 255.0;
        dst[i + 0] = (p.r as f64 * a + 0.5) as u8;
        dst[i + 1] = (p.g as f64 * a + 0.5) as u8;
        dst[i + 2] = (p.b as f64 * a + 0.5) as u8;
        dst[i + 3] = p.a;

        i += tiny_skia::BYTES_PER_PIXEL;
    }

    Some(pixmap)
}
