// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::Length;

use crate::animation::{Additive, CombinationMode, Interpolator};
use crate::geom::approximately_equal;
use crate::{MeasureContext, Transform, TransformValue};

/// A single transform function.
///
/// Angles are in degrees.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TransformPart {
    Matrix([f32; 6]),
    Translate(Length, Length),
    Scale(f32, f32),
    Rotate {
        angle: f32,
        center: Option<(Length, Length)>,
    },
    SkewX(f32),
    SkewY(f32),
}

impl TransformPart {
    /// Creates a translation in user units.
    pub fn translate(tx: f32, ty: f32) -> Self {
        TransformPart::Translate(
            Length::new_number(f64::from(tx)),
            Length::new_number(f64::from(ty)),
        )
    }

    /// Creates a scale.
    pub fn scale(sx: f32, sy: f32) -> Self {
        TransformPart::Scale(sx, sy)
    }

    /// Creates a rotation around the origin.
    pub fn rotate(angle: f32) -> Self {
        TransformPart::Rotate {
            angle,
            center: None,
        }
    }

    /// Resolves into a matrix.
    pub fn to_transform(&self, ctx: &MeasureContext) -> Transform {
        match *self {
            TransformPart::Matrix([a, b, c, d, e, f]) => Transform::from_row(a, b, c, d, e, f),
            TransformPart::Translate(x, y) => {
                Transform::from_translate(ctx.resolve_width(x), ctx.resolve_height(y))
            }
            TransformPart::Scale(sx, sy) => Transform::from_scale(sx, sy),
            TransformPart::Rotate { angle, center } => match center {
                Some((cx, cy)) => {
                    let cx = ctx.resolve_width(cx);
                    let cy = ctx.resolve_height(cy);
                    Transform::from_translate(cx, cy)
                        .pre_concat(Transform::from_rotate(angle))
                        .pre_translate(-cx, -cy)
                }
                None => Transform::from_rotate(angle),
            },
            TransformPart::SkewX(angle) => {
                Transform::from_row(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
            }
            TransformPart::SkewY(angle) => {
                Transform::from_row(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
            }
        }
    }

    /// Blends two transform functions of the same kind.
    ///
    /// Components are combined like numbers, with the identity transform
    /// standing in for the element's base value. Accumulation happens on
    /// the resulting matrix, not on components. [`TransformValue`] blends
    /// `to` animations from the resolved base matrix instead.
    ///
    /// Different kinds and matrices are animated discretely.
    pub fn interpolate(
        mode: CombinationMode,
        from: &TransformPart,
        to: &TransformPart,
        t: f32,
        ctx: &MeasureContext,
    ) -> TransformPart {
        let interp = Interpolator::new(mode, Additive::Replace);
        let f = |identity: f32, a: f32, b: f32| {
            // Accumulation is applied to the matrix.
            match mode {
                CombinationMode::By | CombinationMode::FromBy => {
                    let base = if mode == CombinationMode::By { identity } else { a };
                    base + b * t
                }
                _ => interp.float(identity, a, b, t),
            }
        };

        match (*from, *to) {
            (TransformPart::Translate(ax, ay), TransformPart::Translate(bx, by)) => {
                let x = f(0.0, ctx.resolve_width(ax), ctx.resolve_width(bx));
                let y = f(0.0, ctx.resolve_height(ay), ctx.resolve_height(by));
                TransformPart::translate(x, y)
            }
            (TransformPart::Scale(ax, ay), TransformPart::Scale(bx, by)) => {
                TransformPart::Scale(f(1.0, ax, bx), f(1.0, ay, by))
            }
            (
                TransformPart::Rotate {
                    angle: a,
                    center: ac,
                },
                TransformPart::Rotate {
                    angle: b,
                    center: bc,
                },
            ) => {
                let angle = f(0.0, a, b);
                let center = match (ac, bc) {
                    (Some((ax, ay)), Some((bx, by))) => {
                        let x = f(0.0, ctx.resolve_width(ax), ctx.resolve_width(bx));
                        let y = f(0.0, ctx.resolve_height(ay), ctx.resolve_height(by));
                        Some((
                            Length::new_number(f64::from(x)),
                            Length::new_number(f64::from(y)),
                        ))
                    }
                    (None, None) => None,
                    _ => {
                        if approximately_equal(t, 1.0) {
                            bc
                        } else {
                            ac
                        }
                    }
                };
                TransformPart::Rotate { angle, center }
            }
            (TransformPart::SkewX(a), TransformPart::SkewX(b)) => TransformPart::SkewX(f(0.0, a, b)),
            (TransformPart::SkewY(a), TransformPart::SkewY(b)) => TransformPart::SkewY(f(0.0, a, b)),
            _ => {
                if approximately_equal(t, 1.0) {
                    *to
                } else {
                    *from
                }
            }
        }
    }
}

/// Parses a `transform` attribute.
pub fn parse_transform_list(text: &str) -> Result<Vec<TransformPart>, svgtypes::Error> {
    let mut parts = Vec::new();
    for token in svgtypes::TransformListParser::from(text) {
        let part = match token? {
            svgtypes::TransformListToken::Matrix { a, b, c, d, e, f } => TransformPart::Matrix([
                a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
            ]),
            svgtypes::TransformListToken::Translate { tx, ty } => {
                TransformPart::translate(tx as f32, ty as f32)
            }
            svgtypes::TransformListToken::Scale { sx, sy } => {
                TransformPart::Scale(sx as f32, sy as f32)
            }
            svgtypes::TransformListToken::Rotate { angle } => TransformPart::rotate(angle as f32),
            svgtypes::TransformListToken::SkewX { angle } => TransformPart::SkewX(angle as f32),
            svgtypes::TransformListToken::SkewY { angle } => TransformPart::SkewY(angle as f32),
        };
        parts.push(part);
    }

    Ok(parts)
}

/// A reference box for `transform-origin`.
///
/// `transform-box` attribute in SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransformBox {
    ViewBox,
    FillBox,
    StrokeBox,
}

impl Default for TransformBox {
    fn default() -> Self {
        Self::ViewBox
    }
}

impl std::str::FromStr for TransformBox {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view-box" => Ok(TransformBox::ViewBox),
            "fill-box" | "content-box" => Ok(TransformBox::FillBox),
            "stroke-box" | "border-box" => Ok(TransformBox::StrokeBox),
            _ => Err("invalid"),
        }
    }
}

/// A `transform-origin` value.
///
/// The `x` offset is relative to the reference box width
/// and the `y` offset to its height.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TransformOrigin {
    /// Horizontal offset.
    pub x: Length,
    /// Vertical offset.
    pub y: Length,
}

impl Default for TransformOrigin {
    fn default() -> Self {
        TransformOrigin {
            x: Length::zero(),
            y: Length::zero(),
        }
    }
}

impl From<svgtypes::TransformOrigin> for TransformOrigin {
    fn from(o: svgtypes::TransformOrigin) -> Self {
        TransformOrigin {
            x: o.x_offset,
            y: o.y_offset,
        }
    }
}

impl std::str::FromStr for TransformOrigin {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.parse::<svgtypes::TransformOrigin>()
            .map(TransformOrigin::from)
            .map_err(|_| "invalid")
    }
}

/// Transform-related attributes shared by every node.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Transformable {
    /// `transform` in SVG.
    ///
    /// `None` means identity.
    pub transform: Option<TransformValue>,
    /// `transform-origin` in SVG.
    pub origin: TransformOrigin,
    /// `transform-box` in SVG.
    pub transform_box: TransformBox,
}
