// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub use tiny_skia_path::{NonZeroRect, Point, Rect, Size, Transform};

use crate::AspectRatio;

/// Tolerance used by interpolation to snap a progress to the segment ends.
pub const PROGRESS_EPSILON: f32 = 1.0e-4;

/// Checks that two numbers differ by less than [`PROGRESS_EPSILON`].
#[inline]
pub fn approximately_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < PROGRESS_EPSILON
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + (b - a) * t
}

/// View box.
#[derive(Clone, Copy, Debug)]
pub struct ViewBox {
    /// Value of the `viewBox` attribute.
    pub rect: NonZeroRect,

    /// Value of the `preserveAspectRatio` attribute.
    pub aspect: AspectRatio,
}

impl ViewBox {
    /// Returns a transform that maps the view box onto a viewport of `size`.
    pub fn to_transform(&self, size: Size) -> Transform {
        utils::view_box_to_transform(self.rect, self.aspect, size)
    }
}

/// A bounding box accumulator.
///
/// Unlike `Rect`, starts as an "empty" box that any expansion overrides.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BBox {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl From<Rect> for BBox {
    fn from(r: Rect) -> Self {
        Self {
            left: r.left(),
            top: r.top(),
            right: r.right(),
            bottom: r.bottom(),
        }
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self {
            left: f32::MAX,
            top: f32::MAX,
            right: f32::MIN,
            bottom: f32::MIN,
        }
    }
}

impl BBox {
    /// Checks that nothing was accumulated yet.
    pub fn is_default(&self) -> bool {
        self.left == f32::MAX
            && self.top == f32::MAX
            && self.right == f32::MIN
            && self.bottom == f32::MIN
    }

    /// Expands the bounding box to the specified rectangle.
    #[must_use]
    pub fn expand(&self, r: Rect) -> Self {
        Self {
            left: self.left.min(r.left()),
            top: self.top.min(r.top()),
            right: self.right.max(r.right()),
            bottom: self.bottom.max(r.bottom()),
        }
    }

    /// Converts into a [`Rect`].
    ///
    /// Returns `None` when nothing was accumulated.
    pub fn to_rect(&self) -> Option<Rect> {
        if !self.is_default() {
            Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
        } else {
            None
        }
    }
}

/// Intersects two rectangles, allowing zero-sized results.
///
/// `tiny_skia_path::Rect::intersect` rejects touching rectangles,
/// which is not what clipping of a degenerate shape needs.
pub fn intersect_rects(a: Rect, b: Rect) -> Option<Rect> {
    let left = a.left().max(b.left());
    let top = a.top().max(b.top());
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    if left > right || top > bottom {
        return None;
    }

    Rect::from_ltrb(left, top, right, bottom)
}

/// Checks that a rectangle encloses a non-zero area.
pub fn has_area(r: &Rect) -> bool {
    r.width() > 0.0 && r.height() > 0.0 && r.width().is_finite() && r.height().is_finite()
}

/// Some useful utilities.
pub mod utils {
    use super::*;
    use crate::Align;

    /// Converts `viewBox` to `Transform`.
    pub fn view_box_to_transform(
        view_box: NonZeroRect,
        aspect: AspectRatio,
        img_size: Size,
    ) -> Transform {
        let vr = view_box;

        let sx = img_size.width() / vr.width();
        let sy = img_size.height() / vr.height();

        let (sx, sy) = if aspect.align == Align::None {
            (sx, sy)
        } else {
            let s = if aspect.slice { sx.max(sy) } else { sx.min(sy) };
            (s, s)
        };

        let x = -vr.x() * sx;
        let y = -vr.y() * sy;
        let w = img_size.width() - vr.width() * sx;
        let h = img_size.height() - vr.height() * sy;

        let (tx, ty) = aligned_pos(aspect.align, x, y, w, h);
        Transform::from_row(sx, 0.0, 0.0, sy, tx, ty)
    }

    /// Returns object aligned position.
    pub fn aligned_pos(align: Align, x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
        match align {
            Align::None => (x, y),
            Align::XMinYMin => (x, y),
            Align::XMidYMin => (x + w / 2.0, y),
            Align::XMaxYMin => (x + w, y),
            Align::XMinYMid => (x, y + h / 2.0),
            Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
            Align::XMaxYMid => (x + w, y + h / 2.0),
            Align::XMinYMax => (x, y + h),
            Align::XMidYMax => (x + w / 2.0, y + h),
            Align::XMaxYMax => (x + w, y + h),
        }
    }
}
