// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tiny_skia::{FillRule, Path, PathBuilder, Rect, Transform};

use super::{Area, Output};

/// A sink that records geometry instead of pixels.
///
/// Every fill, stroke and image operation adds its outline, transformed
/// and clipped, to a shared [`Area`]. Strokes are converted into outlines.
/// Paints and opacities are ignored.
pub struct ShapeOutput<'a> {
    area: &'a mut Area,
    transform: Transform,
    stroke: tiny_skia::Stroke,
    clip: Option<Area>,
}

impl<'a> ShapeOutput<'a> {
    /// Creates a new sink with an identity transform and no clip.
    pub fn new(area: &'a mut Area) -> Self {
        ShapeOutput {
            area,
            transform: Transform::identity(),
            stroke: tiny_skia::Stroke::default(),
            clip: None,
        }
    }

    fn append(&mut self, path: Path, rule: FillRule, ts: Transform) {
        let path = match path.transform(ts) {
            Some(v) => v,
            None => return,
        };

        match self.clip {
            Some(ref clip) => self.area.add_clipped(path, rule, clip),
            None => self.area.add(path, rule),
        }
    }
}

impl std::fmt::Debug for ShapeOutput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ShapeOutput")
            .field("transform", &self.transform)
            .field("clip", &self.clip)
            .finish()
    }
}

impl Output for ShapeOutput<'_> {
    fn fill_shape(&mut self, path: &Path, rule: FillRule) {
        self.append(path.clone(), rule, self.transform);
    }

    fn draw_shape(&mut self, path: &Path) {
        let res_scale = tiny_skia::PathStroker::compute_resolution_scale(&self.transform);
        if let Some(outline) = path.stroke(&self.stroke, res_scale) {
            self.append(outline, FillRule::Winding, self.transform);
        }
    }

    fn draw_image(&mut self, image: tiny_skia::PixmapRef, transform: Transform) {
        let rect = match Rect::from_xywh(0.0, 0.0, image.width() as f32, image.height() as f32) {
            Some(v) => v,
            None => return,
        };

        let ts = self.transform.pre_concat(transform);
        self.append(PathBuilder::from_rect(rect), FillRule::Winding, ts);
    }

    fn set_paint(&mut self, _: tiny_skia::Shader<'static>) {}

    fn set_pattern(&mut self, _: tiny_skia::Pixmap, _: Transform) {}

    fn set_stroke(&mut self, stroke: tiny_skia::Stroke) {
        self.stroke = stroke;
    }

    fn stroke(&self) -> &tiny_skia::Stroke {
        &self.stroke
    }

    fn apply_clip(&mut self, area: &Area) {
        let area = area.transform(self.transform);
        self.clip = Some(match self.clip.take() {
            Some(clip) => area.intersect(&clip),
            None => area,
        });
    }

    fn clip_bounds(&self) -> Option<Rect> {
        const LARGE: f32 = f32::MAX / 4.0;
        match self.clip {
            Some(ref clip) => clip.bounds(),
            None => Rect::from_xywh(-LARGE, -LARGE, 2.0 * LARGE, 2.0 * LARGE),
        }
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, ts: Transform) {
        self.transform = ts;
    }

    fn current_opacity(&self) -> f32 {
        1.0
    }

    fn apply_opacity(&mut self, _: f32) {}

    fn create_child(&mut self) -> Box<dyn Output + '_> {
        Box::new(ShapeOutput {
            area: &mut *self.area,
            transform: self.transform,
            stroke: self.stroke.clone(),
            clip: self.clip.clone(),
        })
    }

    fn dispose(&mut self) {}

    fn supports_filters(&self) -> bool {
        false
    }

    fn supports_colors(&self) -> bool {
        false
    }
}
