// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgtypes::Length;

use super::{Additive, CombinationMode, Interpolator, Track};
use crate::geom::lerp;
use crate::{LengthKind, MeasureContext, Paint, Transform, TransformPart};

/// Keyframes of an animation, as declared by its attributes.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Keyframes<T> {
    Values(Vec<T>),
    FromTo(T, T),
    FromBy(T, T),
    By(T),
    To(T),
}

/// An animation bound to a single attribute.
///
/// `T` is the keyframe type and `I` is the type of the element's
/// own, non-animated value.
#[derive(Clone, PartialEq, Debug)]
pub struct Animated<T, I> {
    track: Track,
    interpolator: Interpolator,
    values: Vec<T>,
    initial: Option<I>,
}

impl<T: Clone, I: Clone> Animated<T, I> {
    /// Creates a new animation.
    ///
    /// `initial` is the element's static value. `None` marks a value
    /// inherited from the parent element, which is filled in by `derive`.
    ///
    /// Returns `None` for an empty `values` list.
    pub fn new(
        track: Track,
        keyframes: Keyframes<T>,
        additive: Additive,
        initial: Option<I>,
    ) -> Option<Self> {
        let (mode, values) = match keyframes {
            Keyframes::Values(values) => (CombinationMode::Values, values),
            Keyframes::FromTo(a, b) => (CombinationMode::FromTo, vec![a, b]),
            Keyframes::FromBy(a, b) => (CombinationMode::FromBy, vec![a, b]),
            // The first keyframe is a placeholder for the initial value.
            Keyframes::By(b) => (CombinationMode::By, vec![b.clone(), b]),
            Keyframes::To(b) => (CombinationMode::To, vec![b.clone(), b]),
        };

        if values.is_empty() {
            return None;
        }

        Some(Animated {
            track,
            interpolator: Interpolator::new(mode, additive),
            values,
            initial,
        })
    }

    /// Returns the animation timing.
    #[inline]
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Returns the value combination rules.
    #[inline]
    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    /// Returns the keyframes.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the element's static value.
    #[inline]
    pub fn initial(&self) -> Option<&I> {
        self.initial.as_ref()
    }

    /// Returns a copy that uses `parent` as its initial value
    /// when the own initial value is inherited.
    pub fn derive(&self, parent: &I) -> Option<Self> {
        if self.initial.is_some() {
            return None;
        }

        Some(Animated {
            initial: Some(parent.clone()),
            ..self.clone()
        })
    }

    /// Returns the keyframe pair active in `ctx` and the blend factor.
    ///
    /// `None` means that the initial value must be used.
    pub fn segment(&self, ctx: &MeasureContext) -> Option<(&T, &T, f32)> {
        let timestamp = ctx.timestamp?;
        let progress = self.track.progress(timestamp, self.values.len());
        let (i, j, t) = progress.segment(self.values.len())?;
        Some((&self.values[i], &self.values[j], t))
    }
}

/// A possibly animated length.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum LengthValue {
    Constant(Length),
    Animated(Arc<Animated<Length, LengthValue>>),
}

impl Default for LengthValue {
    fn default() -> Self {
        LengthValue::Constant(Length::zero())
    }
}

impl From<Length> for LengthValue {
    fn from(l: Length) -> Self {
        LengthValue::Constant(l)
    }
}

impl From<f32> for LengthValue {
    fn from(n: f32) -> Self {
        LengthValue::Constant(Length::new_number(f64::from(n)))
    }
}

impl LengthValue {
    /// Resolves into user units.
    pub fn resolve(&self, ctx: &MeasureContext, kind: LengthKind) -> f32 {
        match self {
            LengthValue::Constant(l) => ctx.resolve(*l, kind),
            LengthValue::Animated(a) => {
                let initial = a.initial().map_or(0.0, |v| v.resolve(ctx, kind));
                match a.segment(ctx) {
                    Some((from, to, t)) => a.interpolator().float(
                        initial,
                        ctx.resolve(*from, kind),
                        ctx.resolve(*to, kind),
                        t,
                    ),
                    None => initial,
                }
            }
        }
    }

    /// Checks that the value is a constant zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, LengthValue::Constant(l) if l.number == 0.0)
    }

    /// Fills in an inherited initial value.
    #[must_use]
    pub fn derive(&self, parent: &LengthValue) -> LengthValue {
        match self {
            LengthValue::Animated(a) => match a.derive(parent) {
                Some(a) => LengthValue::Animated(Arc::new(a)),
                None => self.clone(),
            },
            LengthValue::Constant(_) => self.clone(),
        }
    }

    /// Calls `f` for every track the value depends on.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        if let LengthValue::Animated(a) = self {
            f(a.track());
            if let Some(v) = a.initial() {
                v.visit_tracks(f);
            }
        }
    }
}

/// A possibly animated number, like an opacity.
#[derive(Clone, PartialEq, Debug)]
pub enum FloatValue {
    /// A static number.
    Constant(f32),
    /// An animated number.
    Animated(Arc<Animated<f32, FloatValue>>),
    /// A product of two values.
    ///
    /// Used to multiply opacities along the tree.
    Product(Arc<(FloatValue, FloatValue)>),
}

impl Default for FloatValue {
    fn default() -> Self {
        FloatValue::Constant(0.0)
    }
}

impl From<f32> for FloatValue {
    fn from(n: f32) -> Self {
        FloatValue::Constant(n)
    }
}

impl FloatValue {
    /// Resolves the current number.
    pub fn get(&self, ctx: &MeasureContext) -> f32 {
        match self {
            FloatValue::Constant(n) => *n,
            FloatValue::Animated(a) => {
                let initial = a.initial().map_or(0.0, |v| v.get(ctx));
                match a.segment(ctx) {
                    Some((from, to, t)) => a.interpolator().float(initial, *from, *to, t),
                    None => initial,
                }
            }
            FloatValue::Product(p) => p.0.get(ctx) * p.1.get(ctx),
        }
    }

    /// Multiplies two values.
    ///
    /// Constants are folded and a constant `1` is skipped.
    #[must_use]
    pub fn multiply(&self, other: &FloatValue) -> FloatValue {
        match (self, other) {
            (FloatValue::Constant(a), FloatValue::Constant(b)) => FloatValue::Constant(a * b),
            (_, FloatValue::Constant(b)) if *b == 1.0 => self.clone(),
            (FloatValue::Constant(a), _) if *a == 1.0 => other.clone(),
            _ => FloatValue::Product(Arc::new((self.clone(), other.clone()))),
        }
    }

    /// Fills in an inherited initial value.
    #[must_use]
    pub fn derive(&self, parent: &FloatValue) -> FloatValue {
        match self {
            FloatValue::Animated(a) => match a.derive(parent) {
                Some(a) => FloatValue::Animated(Arc::new(a)),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Calls `f` for every track the value depends on.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        match self {
            FloatValue::Constant(_) => {}
            FloatValue::Animated(a) => {
                f(a.track());
                if let Some(v) = a.initial() {
                    v.visit_tracks(f);
                }
            }
            FloatValue::Product(p) => {
                p.0.visit_tracks(f);
                p.1.visit_tracks(f);
            }
        }
    }
}

/// A possibly animated list of numbers, like polyline points.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum FloatListValue {
    Constant(Vec<f32>),
    Animated(Arc<Animated<Vec<f32>, FloatListValue>>),
}

impl FloatListValue {
    /// Resolves the current list.
    pub fn get(&self, ctx: &MeasureContext) -> Vec<f32> {
        match self {
            FloatListValue::Constant(list) => list.clone(),
            FloatListValue::Animated(a) => {
                let initial = a.initial().map(|v| v.get(ctx)).unwrap_or_default();
                match a.segment(ctx) {
                    Some((from, to, t)) => {
                        a.interpolator()
                            .float_list(&initial, from, Some(to.as_slice()), t)
                    }
                    None => initial,
                }
            }
        }
    }

    /// Calls `f` for every track the value depends on.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        if let FloatListValue::Animated(a) = self {
            f(a.track());
            if let Some(v) = a.initial() {
                v.visit_tracks(f);
            }
        }
    }
}

/// A possibly animated paint.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum PaintValue {
    Constant(Paint),
    Animated(Arc<Animated<Paint, PaintValue>>),
}

impl From<Paint> for PaintValue {
    fn from(p: Paint) -> Self {
        PaintValue::Constant(p)
    }
}

impl PaintValue {
    /// Resolves the current paint.
    pub fn get(&self, ctx: &MeasureContext) -> Paint {
        match self {
            PaintValue::Constant(p) => p.clone(),
            PaintValue::Animated(a) => {
                let initial = a.initial().map_or(Paint::None, |v| v.get(ctx));
                match a.segment(ctx) {
                    Some((from, to, t)) => a.interpolator().paint(&initial, from, to, t),
                    None => initial,
                }
            }
        }
    }

    /// Checks that the value is an explicit `inherit`.
    pub fn is_inherit(&self) -> bool {
        matches!(self, PaintValue::Constant(Paint::Inherit))
    }

    /// Replaces `inherit` markers with the parent's value.
    ///
    /// Animations whose initial value is inherited are re-wrapped around
    /// the parent's value, so an animated ancestor is not lost.
    #[must_use]
    pub fn derive(&self, parent: &PaintValue) -> PaintValue {
        match self {
            PaintValue::Constant(Paint::Inherit) => parent.clone(),
            PaintValue::Constant(_) => self.clone(),
            PaintValue::Animated(a) => {
                if let Some(a) = a.derive(parent) {
                    return PaintValue::Animated(Arc::new(a));
                }

                match a.initial() {
                    Some(initial) if initial.is_inherit() => {
                        let mut a = Animated::clone(a);
                        a.initial = Some(parent.clone());
                        PaintValue::Animated(Arc::new(a))
                    }
                    _ => self.clone(),
                }
            }
        }
    }

    /// Calls `f` for every track the value depends on.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        if let PaintValue::Animated(a) = self {
            f(a.track());
            if let Some(v) = a.initial() {
                v.visit_tracks(f);
            }
        }
    }
}

/// A possibly animated transform.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum TransformValue {
    Constant(Vec<TransformPart>),
    Animated(Arc<Animated<TransformPart, TransformValue>>),
}

impl From<Vec<TransformPart>> for TransformValue {
    fn from(parts: Vec<TransformPart>) -> Self {
        TransformValue::Constant(parts)
    }
}

impl TransformValue {
    /// Resolves the current transform.
    pub fn get(&self, ctx: &MeasureContext) -> Transform {
        match self {
            TransformValue::Constant(parts) => parts
                .iter()
                .fold(Transform::identity(), |ts, p| ts.pre_concat(p.to_transform(ctx))),
            TransformValue::Animated(a) => {
                let initial = a.initial().map_or(Transform::identity(), |v| v.get(ctx));
                let (from, to, t) = match a.segment(ctx) {
                    Some(segment) => segment,
                    None => return initial,
                };

                let mode = a.interpolator().mode();
                if mode == CombinationMode::To {
                    return lerp_transform(initial, to.to_transform(ctx), t);
                }

                let part = TransformPart::interpolate(mode, from, to, t, ctx);
                let ts = part.to_transform(ctx);
                if a.interpolator().additive() == Additive::Sum {
                    initial.pre_concat(ts)
                } else {
                    ts
                }
            }
        }
    }

    /// Calls `f` for every track the value depends on.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        if let TransformValue::Animated(a) = self {
            f(a.track());
            if let Some(v) = a.initial() {
                v.visit_tracks(f);
            }
        }
    }
}

// Blends matrices component-wise.
fn lerp_transform(a: Transform, b: Transform, t: f32) -> Transform {
    Transform::from_row(
        lerp(t, a.sx, b.sx),
        lerp(t, a.ky, b.ky),
        lerp(t, a.kx, b.kx),
        lerp(t, a.sy, b.sy),
        lerp(t, a.tx, b.tx),
        lerp(t, a.ty, b.ty),
    )
}
