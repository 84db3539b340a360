// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{Additive, CombinationMode};
use crate::geom::{approximately_equal, lerp};
use crate::{ColorValue, Paint};

/// Combines keyframe values.
///
/// `initial` is always the element's own, non-animated value.
/// For `by` and `to` animations the `from` keyframe is a placeholder
/// and is never read.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Interpolator {
    mode: CombinationMode,
    additive: Additive,
}

impl Interpolator {
    /// Creates a new interpolator.
    ///
    /// `by` and `from-by` animations are always additive.
    pub fn new(mode: CombinationMode, additive: Additive) -> Self {
        let additive = if mode.end_is_by() {
            Additive::Sum
        } else {
            additive
        };

        Interpolator { mode, additive }
    }

    /// Returns the combination mode.
    #[inline]
    pub fn mode(&self) -> CombinationMode {
        self.mode
    }

    /// Returns the accumulation mode.
    #[inline]
    pub fn additive(&self) -> Additive {
        self.additive
    }

    /// Interpolates a number.
    pub fn float(&self, initial: f32, a: f32, b: f32, t: f32) -> f32 {
        match self.mode {
            CombinationMode::FromBy => a + b * t,
            CombinationMode::By => initial + b * t,
            CombinationMode::To => initial + (b - initial) * t,
            CombinationMode::FromTo | CombinationMode::Values => {
                let v = lerp(t, a, b);
                if self.additive == Additive::Sum {
                    v + initial
                } else {
                    v
                }
            }
        }
    }

    /// Interpolates a list of numbers.
    ///
    /// Lists of different lengths are animated discretely,
    /// except for deltas, which repeat the shorter list.
    pub fn float_list(&self, initial: &[f32], a: &[f32], b: Option<&[f32]>, t: f32) -> Vec<f32> {
        match self.mode {
            CombinationMode::FromBy => saxpy(a, b, t),
            CombinationMode::By => saxpy(initial, b, t),
            CombinationMode::To => list_lerp(initial, b, t),
            CombinationMode::FromTo | CombinationMode::Values => {
                let v = list_lerp(a, b, t);
                if self.additive == Additive::Sum {
                    saxpy(&v, Some(initial), 1.0)
                } else {
                    v
                }
            }
        }
    }

    /// Interpolates colors.
    ///
    /// Returns `None` when the initial color is required but missing.
    pub fn color(
        &self,
        initial: Option<ColorValue>,
        a: ColorValue,
        b: ColorValue,
        t: f32,
    ) -> Option<ColorValue> {
        match self.mode {
            CombinationMode::FromBy => Some(ColorValue::saxpy(t, a, b)),
            CombinationMode::By => Some(ColorValue::saxpy(t, initial?, b)),
            CombinationMode::To => Some(ColorValue::interpolate(t, initial?, b)),
            CombinationMode::FromTo | CombinationMode::Values => {
                let v = ColorValue::interpolate(t, a, b);
                if self.additive == Additive::Sum {
                    Some(ColorValue::add(initial?, v))
                } else {
                    Some(v)
                }
            }
        }
    }

    /// Interpolates paints.
    ///
    /// Only solid colors are blended. Everything else is animated discretely.
    pub fn paint(&self, initial: &Paint, a: &Paint, b: &Paint, t: f32) -> Paint {
        let (ca, cb) = match (a.solid_color(), b.solid_color()) {
            (Some(ca), Some(cb)) => (ColorValue::from(ca), ColorValue::from(cb)),
            _ => return self.discrete_paint(initial, a, b, t),
        };

        let ci = initial.solid_color().map(ColorValue::from);
        match self.color(ci, ca, cb, t) {
            Some(c) => Paint::Color(c.to_color()),
            None => initial.clone(),
        }
    }

    fn discrete_paint(&self, initial: &Paint, a: &Paint, b: &Paint, t: f32) -> Paint {
        // A delta of a non-color paint has no meaning.
        if self.mode == CombinationMode::By {
            return initial.clone();
        }

        if self.mode == CombinationMode::To {
            return if approximately_equal(t, 1.0) {
                b.clone()
            } else {
                initial.clone()
            };
        }

        if approximately_equal(t, 1.0) {
            b.clone()
        } else {
            a.clone()
        }
    }
}

/// `from + (to - from) * t`, or a discrete jump when lengths differ.
fn list_lerp(from: &[f32], to: Option<&[f32]>, t: f32) -> Vec<f32> {
    let to = match to {
        Some(to) => to,
        None => return from.to_vec(),
    };

    let is_end = approximately_equal(t, 1.0);
    let t = if from.len() != to.len() && !is_end {
        0.0
    } else {
        t
    };

    if approximately_equal(t, 0.0) {
        from.to_vec()
    } else if is_end {
        to.to_vec()
    } else {
        from.iter().zip(to).map(|(a, b)| lerp(t, *a, *b)).collect()
    }
}

/// `base_i + t * x_i`, where `x` is repeated when shorter than `base`.
fn saxpy(base: &[f32], x: Option<&[f32]>, t: f32) -> Vec<f32> {
    let x = match x {
        Some(x) if !x.is_empty() => x,
        _ => return base.to_vec(),
    };

    base.iter()
        .zip(x.iter().cycle())
        .map(|(b, x)| b + t * x)
        .collect()
}
