// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use animsvg_tree::intersect_rects;
use tiny_skia::{FillRule, Mask, Path, Rect, Transform};

use super::{combine_masks, multiply, Area, Output};
use crate::OptionLog;

#[derive(Clone)]
enum PaintSource {
    Shader(tiny_skia::Shader<'static>),
    Pattern(Rc<tiny_skia::Pixmap>, Transform),
}

/// A sink that paints onto a `tiny_skia` pixmap.
///
/// Children draw onto the same pixmap, but own a copy of the state.
pub struct RasterOutput<'a, 'p> {
    pixmap: &'a mut tiny_skia::PixmapMut<'p>,
    transform: Transform,
    paint: Option<PaintSource>,
    stroke: tiny_skia::Stroke,
    opacity: f32,
    anti_alias: bool,
    mask: Option<Mask>,
    clip_rect: Option<Rect>,
    clipped_out: bool,
}

impl<'a, 'p> RasterOutput<'a, 'p> {
    /// Creates a new sink with an identity transform and no clip.
    pub fn new(pixmap: &'a mut tiny_skia::PixmapMut<'p>, anti_alias: bool) -> Self {
        RasterOutput {
            pixmap,
            transform: Transform::identity(),
            paint: None,
            stroke: tiny_skia::Stroke::default(),
            opacity: 1.0,
            anti_alias,
            mask: None,
            clip_rect: None,
            clipped_out: false,
        }
    }

    fn pixmap_rect(&self) -> Option<Rect> {
        Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        )
    }

    fn area_to_mask(&self, area: &Area) -> Option<Mask> {
        area.to_mask(
            self.pixmap.width(),
            self.pixmap.height(),
            self.transform,
            self.anti_alias,
        )
    }
}

fn prepare_paint(
    source: Option<&PaintSource>,
    opacity: f32,
    anti_alias: bool,
) -> Option<tiny_skia::Paint<'_>> {
    if !(opacity > 0.0) {
        return None;
    }

    let mut paint = tiny_skia::Paint::default();
    match source {
        Some(PaintSource::Shader(shader)) => paint.shader = shader.clone(),
        Some(PaintSource::Pattern(tile, ts)) => {
            paint.shader = tiny_skia::Pattern::new(
                tiny_skia::Pixmap::as_ref(tile),
                tiny_skia::SpreadMode::Repeat,
                tiny_skia::FilterQuality::Bicubic,
                1.0,
                *ts,
            );
        }
        None => {}
    }

    if opacity < 1.0 {
        paint.shader.apply_opacity(opacity);
    }

    paint.anti_alias = anti_alias;
    Some(paint)
}

impl std::fmt::Debug for RasterOutput<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RasterOutput")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("transform", &self.transform)
            .field("opacity", &self.opacity)
            .field("clip_rect", &self.clip_rect)
            .finish()
    }
}

impl Output for RasterOutput<'_, '_> {
    fn fill_shape(&mut self, path: &Path, rule: FillRule) {
        if let Some(paint) = prepare_paint(self.paint.as_ref(), self.opacity, self.anti_alias) {
            self.pixmap
                .fill_path(path, &paint, rule, self.transform, self.mask.as_ref());
        }
    }

    fn draw_shape(&mut self, path: &Path) {
        if let Some(paint) = prepare_paint(self.paint.as_ref(), self.opacity, self.anti_alias) {
            self.pixmap.stroke_path(
                path,
                &paint,
                &self.stroke,
                self.transform,
                self.mask.as_ref(),
            );
        }
    }

    fn draw_image(&mut self, image: tiny_skia::PixmapRef, transform: Transform) {
        if !(self.opacity > 0.0) {
            return;
        }

        let paint = tiny_skia::PixmapPaint {
            opacity: self.opacity,
            quality: tiny_skia::FilterQuality::Bicubic,
            ..tiny_skia::PixmapPaint::default()
        };

        self.pixmap.draw_pixmap(
            0,
            0,
            image,
            &paint,
            self.transform.pre_concat(transform),
            self.mask.as_ref(),
        );
    }

    fn set_paint(&mut self, shader: tiny_skia::Shader<'static>) {
        self.paint = Some(PaintSource::Shader(shader));
    }

    fn set_pattern(&mut self, tile: tiny_skia::Pixmap, transform: Transform) {
        self.paint = Some(PaintSource::Pattern(Rc::new(tile), transform));
    }

    fn set_stroke(&mut self, stroke: tiny_skia::Stroke) {
        self.stroke = stroke;
    }

    fn stroke(&self) -> &tiny_skia::Stroke {
        &self.stroke
    }

    fn apply_clip(&mut self, area: &Area) {
        let mask = match self
            .area_to_mask(area)
            .log_none(|| log::warn!("Failed to allocate a clip mask."))
        {
            Some(v) => v,
            None => return,
        };

        let bounds = area
            .transform(self.transform)
            .bounds()
            .and_then(|r| intersect_rects(r, self.clip_rect.or_else(|| self.pixmap_rect())?));

        match self.mask {
            Some(ref mut old) => combine_masks(old, &mask, multiply),
            None => self.mask = Some(mask),
        }

        match bounds {
            Some(r) => self.clip_rect = Some(r),
            None => self.clipped_out = true,
        }
    }

    fn apply_mask(
        &mut self,
        mask_type: tiny_skia::MaskType,
        content: &mut dyn FnMut(&mut dyn Output),
    ) {
        let mut layer = match tiny_skia::Pixmap::new(self.pixmap.width(), self.pixmap.height())
            .log_none(|| log::warn!("Failed to allocate a mask layer."))
        {
            Some(v) => v,
            None => return,
        };

        {
            let mut layer = layer.as_mut();
            let mut output = RasterOutput::new(&mut layer, self.anti_alias);
            output.set_transform(self.transform);
            content(&mut output);
        }

        let mask = Mask::from_pixmap(layer.as_ref(), mask_type);
        match self.mask {
            Some(ref mut old) => combine_masks(old, &mask, multiply),
            None => self.mask = Some(mask),
        }
    }

    fn clip_bounds(&self) -> Option<Rect> {
        if self.clipped_out {
            return None;
        }

        self.clip_rect.or_else(|| self.pixmap_rect())
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, ts: Transform) {
        self.transform = ts;
    }

    fn current_opacity(&self) -> f32 {
        self.opacity
    }

    fn apply_opacity(&mut self, opacity: f32) {
        self.opacity *= opacity.clamp(0.0, 1.0);
    }

    fn set_anti_alias(&mut self, anti_alias: bool) {
        self.anti_alias = anti_alias;
    }

    fn create_child(&mut self) -> Box<dyn Output + '_> {
        Box::new(RasterOutput {
            pixmap: &mut *self.pixmap,
            transform: self.transform,
            paint: self.paint.clone(),
            stroke: self.stroke.clone(),
            opacity: self.opacity,
            anti_alias: self.anti_alias,
            mask: self.mask.clone(),
            clip_rect: self.clip_rect,
            clipped_out: self.clipped_out,
        })
    }

    fn dispose(&mut self) {
        self.paint = None;
        self.mask = None;
    }

    fn supports_filters(&self) -> bool {
        true
    }

    fn supports_colors(&self) -> bool {
        true
    }
}

impl Drop for RasterOutput<'_, '_> {
    fn drop(&mut self) {
        self.dispose();
    }
}
