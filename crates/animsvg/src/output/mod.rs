// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{intersect_rects, BBox};
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Rect, Transform};

mod raster;
mod shape;

pub use raster::RasterOutput;
pub use shape::ShapeOutput;

/// A drawing sink driven by the render traversal.
///
/// Every operation is expressed in the sink's local coordinates.
/// The sink applies its current transform before compositing.
pub trait Output {
    /// Fills a path with the current paint.
    fn fill_shape(&mut self, path: &Path, rule: FillRule);

    /// Strokes a path with the current paint and stroke.
    fn draw_shape(&mut self, path: &Path);

    /// Draws an image placed at `(0, 0)` with its intrinsic size.
    ///
    /// `transform` is applied on top of the current one.
    fn draw_image(&mut self, image: tiny_skia::PixmapRef, transform: Transform);

    /// Sets the paint used by the following fill and stroke operations.
    fn set_paint(&mut self, shader: tiny_skia::Shader<'static>);

    /// Sets a repeating image tile as the paint.
    ///
    /// `transform` maps the tile into local coordinates.
    /// Replaced by the next [`Output::set_paint`] call.
    fn set_pattern(&mut self, tile: tiny_skia::Pixmap, transform: Transform);

    /// Sets the stroke used by [`Output::draw_shape`].
    fn set_stroke(&mut self, stroke: tiny_skia::Stroke);

    /// Returns the current stroke.
    fn stroke(&self) -> &tiny_skia::Stroke;

    /// Intersects the current clip with an area in local coordinates.
    fn apply_clip(&mut self, area: &Area);

    /// Multiplies the clip by a mask drawn by `content`.
    ///
    /// `content` draws onto an empty layer through a sink that starts with
    /// this sink's transform. Sinks without color support ignore masks.
    fn apply_mask(
        &mut self,
        _mask_type: tiny_skia::MaskType,
        _content: &mut dyn FnMut(&mut dyn Output),
    ) {
    }

    /// Returns the clip bounds in device coordinates.
    ///
    /// Returns `None` when everything is clipped out.
    fn clip_bounds(&self) -> Option<Rect>;

    /// Returns the current transform.
    fn transform(&self) -> Transform;

    /// Replaces the current transform.
    fn set_transform(&mut self, ts: Transform);

    /// Appends a transform to the current one.
    fn apply_transform(&mut self, ts: Transform) {
        let ts = self.transform().pre_concat(ts);
        self.set_transform(ts);
    }

    /// Appends a translation.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.apply_transform(Transform::from_translate(tx, ty));
    }

    /// Appends a scale.
    fn scale(&mut self, sx: f32, sy: f32) {
        self.apply_transform(Transform::from_scale(sx, sy));
    }

    /// Appends a rotation. The angle is in degrees.
    fn rotate(&mut self, angle: f32) {
        self.apply_transform(Transform::from_rotate(angle));
    }

    /// Returns the opacity multiplier applied to every operation.
    fn current_opacity(&self) -> f32;

    /// Multiplies the current opacity.
    fn apply_opacity(&mut self, opacity: f32);

    /// Enables or disables shape anti-aliasing.
    fn set_anti_alias(&mut self, _anti_alias: bool) {}

    /// Creates a sink that starts with a copy of this sink's state.
    ///
    /// Changes to the child's transform, clip, stroke, paint or opacity
    /// are not visible to the parent.
    fn create_child(&mut self) -> Box<dyn Output + '_>;

    /// Releases the resources acquired by this sink.
    ///
    /// Calling it twice is allowed.
    fn dispose(&mut self);

    /// Checks that filter effects can be applied.
    fn supports_filters(&self) -> bool;

    /// Checks that paints produce colors.
    ///
    /// A sink without color support only records geometry.
    fn supports_colors(&self) -> bool;
}

/// Resolution of the grid used to measure clipped coverage.
const COVERAGE_RESOLUTION: f32 = 256.0;

/// A single shape of an [`Area`].
#[derive(Clone, Debug)]
pub struct AreaPiece {
    path: Path,
    rule: FillRule,
    clips: Vec<Area>,
    bounds: Rect,
}

impl AreaPiece {
    /// Creates a piece restricted by every area in `clips`.
    ///
    /// Returns `None` when the clips leave nothing of the outline.
    fn new(path: Path, rule: FillRule, clips: Vec<Area>) -> Option<Self> {
        let mut piece = AreaPiece {
            bounds: path.bounds(),
            path,
            rule,
            clips,
        };

        if !piece.clips.is_empty() {
            piece.bounds = piece.coverage_bounds()?;
        }

        Some(piece)
    }

    /// Returns the piece outline.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the outline fill rule.
    #[inline]
    pub fn rule(&self) -> FillRule {
        self.rule
    }

    /// Returns the areas the outline is restricted to.
    #[inline]
    pub fn clips(&self) -> &[Area] {
        &self.clips
    }

    /// Returns the covered bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn to_mask(&self, width: u32, height: u32, ts: Transform, anti_alias: bool) -> Option<Mask> {
        let mut mask = Mask::new(width, height)?;
        mask.fill_path(&self.path, self.rule, anti_alias, ts);
        for clip in &self.clips {
            let clip_mask = clip.to_mask(width, height, ts, anti_alias)?;
            combine_masks(&mut mask, &clip_mask, multiply);
        }

        Some(mask)
    }

    // Rasterizes the clipped outline over the analytic intersection
    // and shrinks it to the covered pixels.
    fn coverage_bounds(&self) -> Option<Rect> {
        let mut rect = self.path.bounds();
        for clip in &self.clips {
            rect = intersect_rects(rect, clip.bounds()?)?;
        }

        if !(rect.width() > 0.0 && rect.height() > 0.0) {
            return None;
        }

        let scale = COVERAGE_RESOLUTION / rect.width().max(rect.height());
        let grid_w = rect.width() * scale;
        let grid_h = rect.height() * scale;
        let ts = Transform::from_scale(scale, scale).pre_translate(-rect.x(), -rect.y());
        let mask = match self.to_mask(grid_w.ceil() as u32, grid_h.ceil() as u32, ts, true) {
            Some(v) => v,
            None => return Some(rect),
        };

        let width = mask.width() as usize;
        let mut covered: Option<(usize, usize, usize, usize)> = None;
        for (i, _) in mask.data().iter().enumerate().filter(|(_, a)| **a != 0) {
            let (x, y) = (i % width, i / width);
            covered = Some(match covered {
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                None => (x, y, x, y),
            });
        }

        let (x0, y0, x1, y1) = covered?;

        // Edges within half a grid cell snap back to the analytic rect.
        let edge = |cell: usize, origin: f32, far: f32, limit: f32| {
            let cell = cell as f32;
            if cell <= 0.5 {
                origin
            } else if cell >= limit - 0.5 {
                far
            } else {
                origin + cell / scale
            }
        };

        Rect::from_ltrb(
            edge(x0, rect.left(), rect.right(), grid_w),
            edge(y0, rect.top(), rect.bottom(), grid_h),
            edge(x1 + 1, rect.left(), rect.right(), grid_w),
            edge(y1 + 1, rect.top(), rect.bottom(), grid_h),
        )
    }

    fn transform(&self, ts: Transform) -> Option<Self> {
        AreaPiece::new(
            self.path.clone().transform(ts)?,
            self.rule,
            self.clips.iter().map(|c| c.transform(ts)).collect(),
        )
    }
}

/// A union of shapes.
///
/// Intersections keep the clipping areas next to each piece,
/// so the covered region follows the real outlines.
#[derive(Clone, Default, Debug)]
pub struct Area {
    pieces: Vec<AreaPiece>,
}

impl Area {
    /// Creates an area from a single path.
    pub fn from_path(path: Path, rule: FillRule) -> Self {
        let mut area = Area::default();
        area.add(path, rule);
        area
    }

    /// Creates a rectangular area.
    pub fn from_rect(rect: Rect) -> Self {
        Area::from_path(PathBuilder::from_rect(rect), FillRule::Winding)
    }

    /// Adds a shape.
    pub fn add(&mut self, path: Path, rule: FillRule) {
        if let Some(piece) = AreaPiece::new(path, rule, Vec::new()) {
            self.pieces.push(piece);
        }
    }

    /// Adds a shape restricted by `clip`.
    ///
    /// Nothing is added when the shape lies outside of `clip`.
    pub fn add_clipped(&mut self, path: Path, rule: FillRule, clip: &Area) {
        if clip.is_empty() {
            return;
        }

        if let Some(piece) = AreaPiece::new(path, rule, vec![clip.clone()]) {
            self.pieces.push(piece);
        }
    }

    /// Checks that nothing was added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the area pieces.
    #[inline]
    pub fn pieces(&self) -> &[AreaPiece] {
        &self.pieces
    }

    /// Returns the bounds of the whole area.
    pub fn bounds(&self) -> Option<Rect> {
        self.pieces
            .iter()
            .fold(BBox::default(), |bbox, p| bbox.expand(p.bounds()))
            .to_rect()
    }

    /// Returns a transformed copy.
    ///
    /// Pieces that cannot be transformed are skipped.
    #[must_use]
    pub fn transform(&self, ts: Transform) -> Area {
        Area {
            pieces: self.pieces.iter().filter_map(|p| p.transform(ts)).collect(),
        }
    }

    /// Returns a copy restricted to `other`.
    #[must_use]
    pub fn intersect(&self, other: &Area) -> Area {
        if other.is_empty() {
            return Area::default();
        }

        Area {
            pieces: self
                .pieces
                .iter()
                .filter_map(|p| {
                    let mut clips = p.clips.clone();
                    clips.push(other.clone());
                    AreaPiece::new(p.path.clone(), p.rule, clips)
                })
                .collect(),
        }
    }

    /// Renders the area coverage into a new mask.
    pub(crate) fn to_mask(
        &self,
        width: u32,
        height: u32,
        ts: Transform,
        anti_alias: bool,
    ) -> Option<Mask> {
        let mut mask = Mask::new(width, height)?;
        for piece in &self.pieces {
            if piece.clips.is_empty() {
                mask.fill_path(&piece.path, piece.rule, anti_alias, ts);
            } else {
                let piece_mask = piece.to_mask(width, height, ts, anti_alias)?;
                combine_masks(&mut mask, &piece_mask, u8::max);
            }
        }

        Some(mask)
    }
}

pub(crate) fn multiply(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

pub(crate) fn combine_masks(dst: &mut Mask, src: &Mask, f: fn(u8, u8) -> u8) {
    for (d, s) in dst.data_mut().iter_mut().zip(src.data()) {
        *d = f(*d, *s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_xywh(x, y, w, h).unwrap()
    }

    #[test]
    fn area_bounds() {
        let mut area = Area::from_rect(rect(0.0, 0.0, 10.0, 10.0));
        area.add(PathBuilder::from_rect(rect(20.0, 5.0, 5.0, 20.0)), FillRule::EvenOdd);
        assert_eq!(area.bounds().unwrap(), rect(0.0, 0.0, 25.0, 25.0));
        assert!(Area::default().bounds().is_none());
    }

    #[test]
    fn clipped_piece() {
        let clip = Area::from_rect(rect(5.0, 5.0, 10.0, 10.0));
        let mut area = Area::default();
        area.add_clipped(PathBuilder::from_rect(rect(0.0, 0.0, 10.0, 10.0)), FillRule::Winding, &clip);
        area.add_clipped(PathBuilder::from_rect(rect(50.0, 50.0, 1.0, 1.0)), FillRule::Winding, &clip);
        assert_eq!(area.pieces().len(), 1);
        assert_eq!(area.bounds().unwrap(), rect(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn transformed_area() {
        let area = Area::from_rect(rect(1.0, 1.0, 2.0, 2.0)).transform(Transform::from_scale(2.0, 3.0));
        assert_eq!(area.bounds().unwrap(), rect(2.0, 3.0, 4.0, 6.0));
    }

    #[test]
    fn curved_clip() {
        let circle = PathBuilder::from_circle(0.0, 0.0, 10.0).unwrap();
        let clip = Area::from_path(circle, FillRule::Winding);

        // Inside the circle bounds, but outside of the circle itself.
        let mut area = Area::default();
        area.add_clipped(PathBuilder::from_rect(rect(8.0, 8.0, 2.0, 2.0)), FillRule::Winding, &clip);
        assert!(area.is_empty());
        assert!(Area::from_rect(rect(8.0, 8.0, 2.0, 2.0)).intersect(&clip).bounds().is_none());

        // The corner of the circle's quadrant ends at sqrt(100 - 25).
        let area = Area::from_rect(rect(5.0, 5.0, 10.0, 10.0)).intersect(&clip);
        let bounds = area.bounds().unwrap();
        let edge = 75.0f32.sqrt();
        assert_eq!((bounds.left(), bounds.top()), (5.0, 5.0));
        assert!((bounds.right() - edge).abs() < 0.05, "{:?}", bounds);
        assert!((bounds.bottom() - edge).abs() < 0.05, "{:?}", bounds);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Area::from_rect(rect(0.0, 0.0, 1.0, 1.0));
        let b = Area::from_rect(rect(5.0, 5.0, 1.0, 1.0));
        assert!(a.intersect(&b).is_empty());
        assert!(a.intersect(&Area::default()).is_empty());
    }
}
