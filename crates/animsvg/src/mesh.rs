// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{
    distance_squared, lerp, mid_point, Bezier, Color, MeshGradient, MeshPatch, Point, Units,
    NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST,
};
use tiny_skia::{FillRule, Path, PathBuilder, Transform};

use crate::context::RenderContext;
use crate::output::{Area, Output};
use crate::OptionLog;

/// Subdivision stops once both patch diagonals in weight space are
/// shorter than this, squared and multiplied.
const MIN_WEIGHT_AREA: f32 = 1.0e-6;

/// A Coons patch with bilinear color weights at its corners.
///
/// A weight is a position in the unit square of the original patch.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CoonPatch {
    pub north: Bezier,
    pub east: Bezier,
    pub south: Bezier,
    pub west: Bezier,
    /// North-west, north-east, south-east and south-west weights.
    pub weights: [Point; 4],
}

impl CoonPatch {
    /// Creates a patch covering the whole unit square.
    pub fn new(patch: &MeshPatch) -> Self {
        CoonPatch {
            north: patch.north,
            east: patch.east,
            south: patch.south,
            west: patch.west,
            weights: [
                Point::from_xy(0.0, 0.0),
                Point::from_xy(1.0, 0.0),
                Point::from_xy(1.0, 1.0),
                Point::from_xy(0.0, 1.0),
            ],
        }
    }

    /// Splits the patch into north-west, north-east, south-east
    /// and south-west quarters.
    pub fn subdivide(&self) -> [CoonPatch; 4] {
        let (north, east, south, west) = (&self.north, &self.east, &self.south, &self.west);

        let mid_north_linear = mid_point(north.a, north.d);
        let mid_south_linear = mid_point(south.d, south.a);
        let mid_west_linear = mid_point(north.a, south.d);
        let mid_east_linear = mid_point(north.d, south.a);

        let (north_left, north_right) = north.split();
        let (south_right, south_left) = south.split();
        let (west_bottom, west_top) = west.split();
        let (east_top, east_bottom) = east.split();

        let mid_north_south = Bezier::new(
            mid_point(north.a, south.d),
            mid_point(north.b, south.c),
            mid_point(north.c, south.b),
            mid_point(north.d, south.a),
        );
        let mid_east_west = Bezier::new(
            mid_point(east.a, west.d),
            mid_point(east.b, west.c),
            mid_point(east.c, west.b),
            mid_point(east.d, west.a),
        );

        let split_ns = Bezier::combine(
            &mid_east_west,
            &Bezier::straight_line(north_left.d, south_left.a),
            &Bezier::straight_line(mid_north_linear, mid_south_linear),
        )
        .split();

        let split_we = Bezier::combine(
            &mid_north_south,
            &Bezier::straight_line(west_top.a, east_top.d),
            &Bezier::straight_line(mid_west_linear, mid_east_linear),
        )
        .split();

        let [n, e, s, w] = self.weights;
        let mid_n = mid_point(n, e);
        let mid_w = mid_point(n, w);
        let mid_s = mid_point(w, s);
        let mid_e = mid_point(e, s);
        let grid = mid_point(mid_s, mid_n);

        [
            CoonPatch {
                north: north_left,
                east: split_ns.0,
                south: split_we.0.inverse(),
                west: west_top,
                weights: [n, mid_n, grid, mid_w],
            },
            CoonPatch {
                north: north_right,
                east: east_top,
                south: split_we.1.inverse(),
                west: split_ns.0.inverse(),
                weights: [mid_n, e, mid_e, grid],
            },
            CoonPatch {
                north: split_we.1,
                east: east_bottom,
                south: south_right,
                west: split_ns.1.inverse(),
                weights: [grid, mid_e, s, mid_s],
            },
            CoonPatch {
                north: split_we.0,
                east: split_ns.1,
                south: south_left,
                west: west_bottom,
                weights: [mid_w, grid, mid_s, w],
            },
        ]
    }

    /// Returns the patch outline.
    pub fn to_path(&self) -> Option<Path> {
        let mut pb = PathBuilder::new();
        pb.move_to(self.north.a.x, self.north.a.y);
        for b in [&self.north, &self.east, &self.south, &self.west] {
            pb.cubic_to(b.b.x, b.b.y, b.c.x, b.c.y, b.d.x, b.d.y);
        }
        pb.close();
        pb.finish()
    }

    /// Returns the bilinear interpolation of the corner weights at `(u, v)`.
    pub fn weight_at(&self, u: f32, v: f32) -> Point {
        let [nw, ne, se, sw] = self.weights;
        Point::from_xy(
            lerp(v, lerp(u, nw.x, ne.x), lerp(u, sw.x, se.x)),
            lerp(v, lerp(u, nw.y, ne.y), lerp(u, sw.y, se.y)),
        )
    }

    fn depth(&self, sx: f32, sy: f32) -> u32 {
        [&self.north, &self.east, &self.south, &self.west]
            .iter()
            .map(|b| b.estimate_step_count(sx, sy))
            .max()
            .unwrap_or(0)
    }

    fn is_small(&self) -> bool {
        let [n, e, s, w] = self.weights;
        distance_squared(n, s, 1.0, 1.0) * distance_squared(e, w, 1.0, 1.0) < MIN_WEIGHT_AREA
    }
}

/// Fills `path` with a mesh gradient.
///
/// Sinks that do not support colors get a plain fill.
pub fn fill(
    mesh: &MeshGradient,
    path: &Path,
    rule: FillRule,
    object_bbox: Option<tiny_skia::NonZeroRect>,
    ctx: &RenderContext,
    output: &mut dyn Output,
) -> Option<()> {
    if !output.supports_colors() {
        output.fill_shape(path, rule);
        return Some(());
    }

    let m = ctx.measure();
    let mut ts = if mesh.units == Units::ObjectBoundingBox {
        let bbox = object_bbox
            .log_none(|| log::warn!("Mesh gradient on zero-sized shapes is not allowed."))?;
        Transform::from_bbox(bbox)
    } else {
        Transform::identity()
    };
    ts = ts
        .pre_concat(mesh.transform)
        .pre_translate(m.resolve_width(mesh.x), m.resolve_height(mesh.y));

    let mut output = output.create_child();
    output.apply_clip(&Area::from_path(path.clone(), rule));
    output.apply_transform(ts);
    output.set_anti_alias(false);

    let (sx, sy) = ctx.user_space().pre_concat(ts).get_scale();
    let max_depth = ctx.options().mesh_max_depth;
    for patch in mesh.patches() {
        let coon = CoonPatch::new(patch);
        let depth = coon.depth(sx, sy).min(max_depth);
        render_patch(&coon, &patch.colors, depth, output.as_mut());
    }

    output.dispose();
    Some(())
}

fn render_patch(patch: &CoonPatch, colors: &[Color; 4], depth: u32, output: &mut dyn Output) {
    if depth == 0 || patch.is_small() {
        let w = patch.weight_at(0.5, 0.5);
        output.set_paint(tiny_skia::Shader::SolidColor(patch_color(colors, w.x, w.y)));

        if let Some(path) = patch.to_path() {
            // Filling the bounds hides seams between neighbouring patches.
            output.fill_shape(&PathBuilder::from_rect(path.bounds()), FillRule::Winding);
        }
        return;
    }

    for child in patch.subdivide().iter() {
        render_patch(child, colors, depth - 1, output);
    }
}

fn patch_color(colors: &[Color; 4], u: f32, v: f32) -> tiny_skia::Color {
    let channel = |f: fn(&Color) -> u8| {
        let c = |i: usize| f32::from(f(&colors[i]));
        let n = lerp(
            v,
            lerp(u, c(NORTH_WEST), c(NORTH_EAST)),
            lerp(u, c(SOUTH_WEST), c(SOUTH_EAST)),
        );
        n.clamp(0.0, 255.0) as u8
    };

    tiny_skia::Color::from_rgba8(
        channel(|c| c.red),
        channel(|c| c.green),
        channel(|c| c.blue),
        channel(|c| c.alpha),
    )
}
