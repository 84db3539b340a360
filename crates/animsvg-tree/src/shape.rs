// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use tiny_skia_path::{Path, PathBuilder};

use crate::animation::Track;
use crate::{FloatListValue, LengthKind, LengthValue, MeasureContext, Rect};

/// A basic shape or a raw path.
///
/// Geometry is kept unresolved, since it depends on the viewport, the font
/// and the current time.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
    Rect {
        x: LengthValue,
        y: LengthValue,
        width: LengthValue,
        height: LengthValue,
        rx: Option<LengthValue>,
        ry: Option<LengthValue>,
    },
    Circle {
        cx: LengthValue,
        cy: LengthValue,
        r: LengthValue,
    },
    Ellipse {
        cx: LengthValue,
        cy: LengthValue,
        rx: LengthValue,
        ry: LengthValue,
    },
    Line {
        x1: LengthValue,
        y1: LengthValue,
        x2: LengthValue,
        y2: LengthValue,
    },
    /// A list of `x y` pairs.
    Polyline(FloatListValue),
    /// A list of `x y` pairs.
    Polygon(FloatListValue),
    Path(Arc<Path>),
}

impl Shape {
    /// Creates a rectangle in user units.
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Rect {
            x: x.into(),
            y: y.into(),
            width: width.into(),
            height: height.into(),
            rx: None,
            ry: None,
        }
    }

    /// Creates a circle in user units.
    pub fn circle(cx: f32, cy: f32, r: f32) -> Self {
        Shape::Circle {
            cx: cx.into(),
            cy: cy.into(),
            r: r.into(),
        }
    }

    /// Builds the shape outline.
    ///
    /// Returns `None` for degenerate shapes, which must not be rendered.
    pub fn to_path(&self, ctx: &MeasureContext) -> Option<Path> {
        match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                let width = width.resolve(ctx, LengthKind::Width);
                let height = height.resolve(ctx, LengthKind::Height);
                if !(width > 0.0 && height > 0.0) {
                    return None;
                }

                let x = x.resolve(ctx, LengthKind::Width);
                let y = y.resolve(ctx, LengthKind::Height);
                let rx = rx
                    .as_ref()
                    .map(|v| v.resolve(ctx, LengthKind::Width))
                    .filter(|n| *n >= 0.0);
                let ry = ry
                    .as_ref()
                    .map(|v| v.resolve(ctx, LengthKind::Height))
                    .filter(|n| *n >= 0.0);
                let (rx, ry) = match (rx, ry) {
                    (None, None) => (0.0, 0.0),
                    (Some(rx), None) => (rx, rx),
                    (None, Some(ry)) => (ry, ry),
                    (Some(rx), Some(ry)) => (rx, ry),
                };

                rect_to_path(x, y, width, height, rx.min(width / 2.0), ry.min(height / 2.0))
            }
            Shape::Circle { cx, cy, r } => {
                let r = r.resolve(ctx, LengthKind::Diagonal);
                ellipse_to_path(
                    cx.resolve(ctx, LengthKind::Width),
                    cy.resolve(ctx, LengthKind::Height),
                    r,
                    r,
                )
            }
            Shape::Ellipse { cx, cy, rx, ry } => ellipse_to_path(
                cx.resolve(ctx, LengthKind::Width),
                cy.resolve(ctx, LengthKind::Height),
                rx.resolve(ctx, LengthKind::Width),
                ry.resolve(ctx, LengthKind::Height),
            ),
            Shape::Line { x1, y1, x2, y2 } => {
                let mut builder = PathBuilder::new();
                builder.move_to(
                    x1.resolve(ctx, LengthKind::Width),
                    y1.resolve(ctx, LengthKind::Height),
                );
                builder.line_to(
                    x2.resolve(ctx, LengthKind::Width),
                    y2.resolve(ctx, LengthKind::Height),
                );
                builder.finish()
            }
            Shape::Polyline(points) => points_to_path(&points.get(ctx), false),
            Shape::Polygon(points) => points_to_path(&points.get(ctx), true),
            Shape::Path(path) => Some(Path::clone(path)),
        }
    }

    /// Returns the untransformed geometry bounds.
    pub fn bounds(&self, ctx: &MeasureContext) -> Option<Rect> {
        self.to_path(ctx).map(|p| p.bounds())
    }

    /// Calls `f` for every track the geometry depends on.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                for v in [x, y, width, height] {
                    v.visit_tracks(f);
                }
                for v in [rx, ry].into_iter().flatten() {
                    v.visit_tracks(f);
                }
            }
            Shape::Circle { cx, cy, r } => {
                for v in [cx, cy, r] {
                    v.visit_tracks(f);
                }
            }
            Shape::Ellipse { cx, cy, rx, ry } => {
                for v in [cx, cy, rx, ry] {
                    v.visit_tracks(f);
                }
            }
            Shape::Line { x1, y1, x2, y2 } => {
                for v in [x1, y1, x2, y2] {
                    v.visit_tracks(f);
                }
            }
            Shape::Polyline(points) | Shape::Polygon(points) => points.visit_tracks(f),
            Shape::Path(_) => {}
        }
    }
}

fn rect_to_path(x: f32, y: f32, width: f32, height: f32, rx: f32, ry: f32) -> Option<Path> {
    if rx <= 0.0 || ry <= 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(x, y, width, height)?));
    }

    let mut builder = PathBuilder::new();
    builder.move_to(x + rx, y);

    builder.line_to(x + width - rx, y);
    builder.arc_to(rx, ry, x + width, y + ry);

    builder.line_to(x + width, y + height - ry);
    builder.arc_to(rx, ry, x + width - rx, y + height);

    builder.line_to(x + rx, y + height);
    builder.arc_to(rx, ry, x, y + height - ry);

    builder.line_to(x, y + ry);
    builder.arc_to(rx, ry, x + rx, y);

    builder.close();
    builder.finish()
}

fn ellipse_to_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    if !(rx > 0.0 && ry > 0.0) {
        return None;
    }

    let mut builder = PathBuilder::new();
    builder.move_to(cx + rx, cy);
    builder.arc_to(rx, ry, cx, cy + ry);
    builder.arc_to(rx, ry, cx - rx, cy);
    builder.arc_to(rx, ry, cx, cy - ry);
    builder.arc_to(rx, ry, cx + rx, cy);
    builder.close();
    builder.finish()
}

fn points_to_path(points: &[f32], close: bool) -> Option<Path> {
    // At least two points are required.
    if points.len() < 4 {
        return None;
    }

    let mut builder = PathBuilder::new();
    for (i, p) in points.chunks_exact(2).enumerate() {
        if i == 0 {
            builder.move_to(p[0], p[1]);
        } else {
            builder.line_to(p[0], p[1]);
        }
    }

    if close {
        builder.close();
    }

    builder.finish()
}

trait PathBuilderExt {
    /// Appends a clockwise quarter-ish elliptical arc.
    fn arc_to(&mut self, rx: f32, ry: f32, x: f32, y: f32);
}

impl PathBuilderExt for PathBuilder {
    fn arc_to(&mut self, rx: f32, ry: f32, x: f32, y: f32) {
        let prev = match self.last_point() {
            Some(v) => v,
            None => return,
        };

        let svg_arc = kurbo::SvgArc {
            from: kurbo::Point::new(prev.x as f64, prev.y as f64),
            to: kurbo::Point::new(x as f64, y as f64),
            radii: kurbo::Vec2::new(rx as f64, ry as f64),
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
        };

        match kurbo::Arc::from_svg_arc(&svg_arc) {
            Some(arc) => {
                arc.to_cubic_beziers(0.1, |p1, p2, p| {
                    self.cubic_to(
                        p1.x as f32,
                        p1.y as f32,
                        p2.x as f32,
                        p2.y as f32,
                        p.x as f32,
                        p.y as f32,
                    );
                });
            }
            None => {
                self.line_to(x, y);
            }
        }
    }
}
