// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Length, PathParser, PathSegment};

use crate::{Color, Error, Point, Transform, Units};

/// A cubic Bézier curve from `a` to `d`.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bezier {
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub d: Point,
}

impl Bezier {
    /// Creates a new curve.
    #[inline]
    pub fn new(a: Point, b: Point, c: Point, d: Point) -> Self {
        Bezier { a, b, c, d }
    }

    /// Creates a straight line with evenly spaced control points.
    pub fn straight_line(a: Point, d: Point) -> Self {
        Bezier {
            a,
            b: lerp_point(1.0 / 3.0, a, d),
            c: lerp_point(2.0 / 3.0, a, d),
            d,
        }
    }

    /// Returns the same curve going from `d` to `a`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Bezier::new(self.d, self.c, self.b, self.a)
    }

    /// Splits the curve in half using De Casteljau's algorithm.
    pub fn split(&self) -> (Bezier, Bezier) {
        let ab = mid_point(self.a, self.b);
        let bc = mid_point(self.b, self.c);
        let cd = mid_point(self.c, self.d);
        let abbc = mid_point(ab, bc);
        let bccd = mid_point(bc, cd);
        let mid = mid_point(abbc, bccd);
        (
            Bezier::new(self.a, ab, abbc, mid),
            Bezier::new(mid, bccd, cd, self.d),
        )
    }

    /// Returns `b1 + b2 - b3` control point wise.
    pub fn combine(b1: &Bezier, b2: &Bezier, b3: &Bezier) -> Bezier {
        let f = |p1: Point, p2: Point, p3: Point| {
            Point::from_xy(p1.x + p2.x - p3.x, p1.y + p2.y - p3.y)
        };

        Bezier::new(
            f(b1.a, b2.a, b3.a),
            f(b1.b, b2.b, b3.b),
            f(b1.c, b2.c, b3.c),
            f(b1.d, b2.d, b3.d),
        )
    }

    /// Estimates how many times the curve has to be halved
    /// to look flat at the given scale.
    ///
    /// The amount of segments grows with the square root of the control polygon
    /// size, so the result is a number of octaves, not of segments.
    pub fn estimate_step_count(&self, sx: f32, sy: f32) -> u32 {
        let steps = distance_squared(self.a, self.b, sx, sy)
            .max(distance_squared(self.c, self.d, sx, sy))
            .max(distance_squared(self.a, self.c, sx, sy) / 4.0)
            .max(distance_squared(self.b, self.d, sx, sy) / 4.0);
        let steps = (steps * 18.0).max(1.0);
        if !steps.is_finite() {
            return 0;
        }

        (steps.log2().floor() as u32 + 1) / 2
    }
}

/// Returns the middle of a segment.
#[inline]
pub fn mid_point(a: Point, b: Point) -> Point {
    Point::from_xy((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[inline]
fn lerp_point(t: f32, a: Point, b: Point) -> Point {
    Point::from_xy(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Squared distance after scaling each axis.
#[inline]
pub fn distance_squared(a: Point, b: Point, sx: f32, sy: f32) -> f32 {
    let dx = (b.x - a.x) * sx;
    let dy = (b.y - a.y) * sy;
    dx * dx + dy * dy
}

/// An edge of a mesh patch.
///
/// `path` attribute of a mesh `stop`. Always starts at the end
/// of the previous edge.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum MeshEdge {
    Line {
        abs: bool,
        x: f32,
        y: f32,
    },
    Curve {
        abs: bool,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    },
}

impl MeshEdge {
    /// Builds a curve starting at `start`.
    pub fn to_bezier(&self, start: Point) -> Bezier {
        let abs_point = |abs: bool, x: f32, y: f32| {
            if abs {
                Point::from_xy(x, y)
            } else {
                Point::from_xy(start.x + x, start.y + y)
            }
        };

        match *self {
            MeshEdge::Line { abs, x, y } => Bezier::straight_line(start, abs_point(abs, x, y)),
            MeshEdge::Curve {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => Bezier::new(
                start,
                abs_point(abs, x1, y1),
                abs_point(abs, x2, y2),
                abs_point(abs, x, y),
            ),
        }
    }
}

impl std::str::FromStr for MeshEdge {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let err = || Error::InvalidMeshEdge(text.to_string());

        // An edge is a path without a `moveto`.
        let path = format!("M 0 0 {}", text);
        let mut segments = PathParser::from(path.as_str()).skip(1);
        let edge = match segments.next() {
            Some(Ok(segment)) => match segment {
                PathSegment::LineTo { abs, x, y } => MeshEdge::Line {
                    abs,
                    x: x as f32,
                    y: y as f32,
                },
                PathSegment::HorizontalLineTo { abs: false, x } => MeshEdge::Line {
                    abs: false,
                    x: x as f32,
                    y: 0.0,
                },
                PathSegment::VerticalLineTo { abs: false, y } => MeshEdge::Line {
                    abs: false,
                    x: 0.0,
                    y: y as f32,
                },
                PathSegment::CurveTo {
                    abs,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => MeshEdge::Curve {
                    abs,
                    x1: x1 as f32,
                    y1: y1 as f32,
                    x2: x2 as f32,
                    y2: y2 as f32,
                    x: x as f32,
                    y: y as f32,
                },
                _ => return Err(err()),
            },
            _ => return Err(err()),
        };

        if segments.next().is_some() {
            return Err(err());
        }

        Ok(edge)
    }
}

/// A mesh gradient stop.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MeshStop {
    /// The edge that ends at this stop's corner.
    pub edge: MeshEdge,
    /// The corner color, with `stop-opacity` already applied.
    pub color: Color,
}

/// Index of the north-west corner in [`MeshPatch::colors`].
pub const NORTH_WEST: usize = 0;
/// Index of the north-east corner in [`MeshPatch::colors`].
pub const NORTH_EAST: usize = 1;
/// Index of the south-east corner in [`MeshPatch::colors`].
pub const SOUTH_EAST: usize = 2;
/// Index of the south-west corner in [`MeshPatch::colors`].
pub const SOUTH_WEST: usize = 3;

/// A fully resolved patch of a mesh.
///
/// Edges go clockwise: `north` from the north-west corner to the north-east
/// one, `east` downwards, `south` leftwards and `west` upwards.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MeshPatch {
    pub north: Bezier,
    pub east: Bezier,
    pub south: Bezier,
    pub west: Bezier,
    /// Corner colors, indexed by `NORTH_WEST`, `NORTH_EAST`, `SOUTH_EAST`
    /// and `SOUTH_WEST`.
    pub colors: [Color; 4],
}

/// A mesh gradient.
///
/// `meshgradient` element in SVG.
#[derive(Clone, Debug)]
pub struct MeshGradient {
    /// Element's ID.
    pub id: String,

    /// Coordinate system units.
    ///
    /// `gradientUnits` in SVG.
    pub units: Units,

    /// Mesh origin. Patches are placed relative to it.
    pub x: Length,
    /// Mesh origin. Patches are placed relative to it.
    pub y: Length,

    /// `transform` in SVG.
    pub transform: Transform,

    rows: usize,
    columns: usize,
    patches: Vec<MeshPatch>,
}

impl MeshGradient {
    /// Builds a mesh from `meshrow` elements.
    ///
    /// Each row is a list of patches and each patch is a list of stops.
    /// Patches after the first row and after the first column share
    /// edges and corner colors with their neighbours, so they need
    /// fewer stops. Extra stops are ignored.
    pub fn new(
        id: String,
        units: Units,
        x: Length,
        y: Length,
        transform: Transform,
        rows: &[Vec<Vec<MeshStop>>],
    ) -> Result<Self, Error> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut patches: Vec<MeshPatch> = Vec::with_capacity(rows.len() * columns);
        let mut start = Point::zero();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(Error::MeshRowMismatch {
                    row: row_idx,
                    expected: columns,
                    actual: row.len(),
                });
            }

            for (patch_idx, stops) in row.iter().enumerate() {
                let required = match (row_idx > 0, patch_idx > 0) {
                    (false, false) => 4,
                    (true, true) => 2,
                    _ => 3,
                };

                if stops.len() < required {
                    return Err(Error::NotEnoughMeshStops {
                        row: row_idx,
                        patch: patch_idx,
                        expected: required,
                    });
                }

                let offset = if row_idx > 0 { 1 } else { 0 };
                let above = if row_idx > 0 {
                    Some(patches[(row_idx - 1) * columns + patch_idx])
                } else {
                    None
                };
                let left = if patch_idx > 0 {
                    Some(patches[row_idx * columns + patch_idx - 1])
                } else {
                    None
                };
                let shares_left = offset + required < 4;

                let mut north = None;
                let mut east = None;
                let mut south = None;
                let mut west = None;
                let mut colors = [None; 4];

                if let Some(above) = above {
                    north = Some(above.south.inverse());
                    colors[NORTH_WEST] = Some(above.colors[SOUTH_WEST]);
                }

                if shares_left {
                    if let Some(left) = left {
                        west = Some(left.east.inverse());
                        colors[SOUTH_WEST] = Some(left.colors[SOUTH_EAST]);
                    }
                }

                for (i, stop) in stops.iter().take(required).enumerate() {
                    match i + offset {
                        0 => {
                            let edge = stop.edge.to_bezier(start);
                            start = edge.d;
                            north = Some(edge);
                            colors[NORTH_WEST] =
                                Some(left.map_or(stop.color, |l| l.colors[NORTH_EAST]));
                        }
                        1 => {
                            let from = north.map_or(start, |b| b.d);
                            east = Some(stop.edge.to_bezier(from));
                            colors[NORTH_EAST] =
                                Some(above.map_or(stop.color, |a| a.colors[SOUTH_EAST]));
                        }
                        2 => {
                            let from = east.map_or(start, |b| b.d);
                            south = Some(stop.edge.to_bezier(from));
                            colors[SOUTH_EAST] = Some(stop.color);
                        }
                        _ => {
                            let from = south.map_or(start, |b| b.d);
                            let mut edge = stop.edge.to_bezier(from);
                            if let Some(north) = north {
                                edge.d = north.a;
                            }
                            west = Some(edge);
                            colors[SOUTH_WEST] = Some(stop.color);
                        }
                    }
                }

                if shares_left {
                    if let (Some(left), Some(south)) = (left, south.as_mut()) {
                        south.d = left.east.d;
                    }
                }

                let patch = match (north, east, south, west, colors) {
                    (
                        Some(north),
                        Some(east),
                        Some(south),
                        Some(west),
                        [Some(nw), Some(ne), Some(se), Some(sw)],
                    ) => MeshPatch {
                        north,
                        east,
                        south,
                        west,
                        colors: [nw, ne, se, sw],
                    },
                    _ => {
                        return Err(Error::NotEnoughMeshStops {
                            row: row_idx,
                            patch: patch_idx,
                            expected: required,
                        })
                    }
                };

                patches.push(patch);
            }
        }

        Ok(MeshGradient {
            id,
            units,
            x,
            y,
            transform,
            rows: rows.len(),
            columns,
            patches,
        })
    }

    /// Returns the amount of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the amount of patches in a row.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns all patches, row by row.
    #[inline]
    pub fn patches(&self) -> &[MeshPatch] {
        &self.patches
    }

    /// Returns a patch at the specified position.
    pub fn patch(&self, row: usize, column: usize) -> Option<&MeshPatch> {
        if column >= self.columns {
            return None;
        }

        self.patches.get(row * self.columns + column)
    }
}
