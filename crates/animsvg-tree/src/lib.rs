// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`animsvg-tree` is a resolved, animatable [SVG] element tree used by [animsvg].

Unlike a static render tree, attributes are kept unresolved: lengths, paints,
opacities and transforms may be animated and are evaluated against
a measurement context and a document timestamp at render time.

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
[animsvg]: https://github.com/RazrFalcon/resvg
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::derivable_impls)]

mod animation;
mod color;
mod context;
mod error;
mod font;
mod geom;
mod mesh;
mod paint;
mod shape;
mod transform;
mod units;

use std::sync::Arc;

pub use strict_num::{self, NormalizedF32, PositiveF32};
pub use svgtypes::{Align, AspectRatio, Length, LengthUnit};

pub use tiny_skia_path;

pub use crate::animation::*;
pub use crate::color::*;
pub use crate::context::*;
pub use crate::error::*;
pub use crate::font::*;
pub use crate::geom::*;
pub use crate::mesh::*;
pub use crate::paint::*;
pub use crate::shape::*;
pub use crate::transform::*;
pub use crate::units::*;

/// An alias to `NormalizedF32`.
pub type Opacity = NormalizedF32;

/// An element units.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Units {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

// `Units` cannot have a default value, because it changes depending on an element.

impl std::str::FromStr for Units {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "userSpaceOnUse" => Ok(Units::UserSpaceOnUse),
            "objectBoundingBox" => Ok(Units::ObjectBoundingBox),
            _ => Err("invalid"),
        }
    }
}

/// A visibility property.
///
/// `visibility` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Visible
    }
}

impl std::str::FromStr for Visibility {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "visible" => Ok(Visibility::Visible),
            "hidden" => Ok(Visibility::Hidden),
            "collapse" => Ok(Visibility::Collapse),
            _ => Err("invalid"),
        }
    }
}

/// An SVG document.
#[derive(Clone, Debug)]
pub struct Tree {
    /// Image size.
    ///
    /// Size of an image that should be created to fit the SVG.
    ///
    /// `width` and `height` in SVG.
    pub size: Size,

    /// SVG viewbox.
    ///
    /// Specifies which part of the SVG image should be rendered.
    ///
    /// `viewBox` and `preserveAspectRatio` in SVG.
    pub view_box: ViewBox,

    /// The root element of the SVG tree.
    pub root: Group,
}

impl Tree {
    /// Creates a tree with an identity view box.
    pub fn new(size: Size, root: Group) -> Self {
        Tree {
            size,
            view_box: ViewBox {
                rect: size.to_non_zero_rect(0.0, 0.0),
                aspect: AspectRatio::default(),
            },
            root,
        }
    }

    /// Returns the time window covered by all animations in the document.
    ///
    /// Returns `None` for a static document.
    pub fn animation_period(&self) -> Option<AnimationPeriod> {
        let mut period: Option<AnimationPeriod> = None;
        self.root.visit_tracks(&mut |track| {
            period = Some(match period {
                Some(p) => p.derive(track),
                None => AnimationPeriod::new(
                    track.begin(),
                    track.end(),
                    track.fill() == Fill::Freeze,
                ),
            });
        });

        period
    }
}

/// Node's kind.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Node {
    Group(Box<Group>),
    Path(Box<Path>),
    Image(Box<Image>),
}

impl Node {
    /// Returns node's ID.
    ///
    /// If a current node doesn't support ID, an empty string
    /// will be returned.
    pub fn id(&self) -> &str {
        match self {
            Node::Group(ref e) => e.id.as_str(),
            Node::Path(ref e) => e.id.as_str(),
            Node::Image(ref e) => e.id.as_str(),
        }
    }

    /// Returns node's visibility.
    pub fn visibility(&self) -> Visibility {
        match self {
            Node::Group(ref e) => e.visibility,
            Node::Path(ref e) => e.visibility,
            Node::Image(ref e) => e.visibility,
        }
    }

    /// Returns node's transform attributes.
    pub fn transformable(&self) -> &Transformable {
        match self {
            Node::Group(ref e) => &e.transformable,
            Node::Path(ref e) => &e.transformable,
            Node::Image(ref e) => &e.transformable,
        }
    }

    /// Returns node's own, non-cascaded paint attributes.
    pub fn paint(&self) -> &PaintContext {
        match self {
            Node::Group(ref e) => &e.paint,
            Node::Path(ref e) => &e.paint,
            Node::Image(ref e) => &e.paint,
        }
    }

    /// Calls `f` for every animation track of this node and its descendants.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        visit_paint_tracks(self.paint(), f);
        if let Some(ref ts) = self.transformable().transform {
            ts.visit_tracks(f);
        }

        match self {
            Node::Group(ref g) => g.visit_children_tracks(f),
            Node::Path(ref p) => p.shape.visit_tracks(f),
            Node::Image(ref i) => {
                for v in [&i.x, &i.y, &i.width, &i.height] {
                    v.visit_tracks(f);
                }
            }
        }
    }
}

fn visit_paint_tracks(paint: &PaintContext, f: &mut dyn FnMut(&Track)) {
    for v in [&paint.color, &paint.fill, &paint.stroke].into_iter().flatten() {
        v.visit_tracks(f);
    }

    for v in [&paint.fill_opacity, &paint.stroke_opacity].into_iter().flatten() {
        v.visit_tracks(f);
    }

    paint.opacity.visit_tracks(f);

    for v in [&paint.fill, &paint.stroke].into_iter().flatten() {
        if let PaintValue::Constant(Paint::Pattern(ref pattern)) = v {
            for child in &pattern.children {
                child.visit_tracks(f);
            }
        }
    }

    if let Some(stroke) = paint.stroke_context() {
        for v in [&stroke.width, &stroke.dash_offset].into_iter().flatten() {
            v.visit_tracks(f);
        }
    }
}

/// A group container.
///
/// The root element of the SVG tree and the only element that can have child nodes.
///
/// `g` element in SVG.
#[derive(Clone, Debug, Default)]
pub struct Group {
    /// Element's ID.
    pub id: String,

    /// Element visibility.
    ///
    /// A group that is not visible is not rendered, including its children.
    pub visibility: Visibility,

    /// Transform attributes.
    pub transformable: Transformable,

    /// Paint attributes, as declared on the element.
    pub paint: PaintContext,

    /// Font attributes, as declared on the element.
    pub font: Option<FontSpec>,

    /// Element's clip path.
    pub clip_path: Option<Arc<ClipPath>>,

    /// Element's mask.
    pub mask: Option<Arc<Mask>>,

    /// Group's children.
    pub children: Vec<Node>,
}

impl Group {
    /// Creates an empty group with the specified children.
    pub fn with_children(children: Vec<Node>) -> Self {
        Group {
            children,
            ..Group::default()
        }
    }

    /// Calls `f` for every animation track of this group and its descendants.
    pub fn visit_tracks(&self, f: &mut dyn FnMut(&Track)) {
        visit_paint_tracks(&self.paint, f);
        if let Some(ref ts) = self.transformable.transform {
            ts.visit_tracks(f);
        }

        self.visit_children_tracks(f);
    }

    fn visit_children_tracks(&self, f: &mut dyn FnMut(&Track)) {
        for child in &self.children {
            child.visit_tracks(f);
        }

        if let Some(ref clip) = self.clip_path {
            for child in &clip.children {
                child.visit_tracks(f);
            }
        }

        let mut mask = self.mask.as_ref();
        while let Some(m) = mask {
            for child in &m.children {
                child.visit_tracks(f);
            }
            mask = m.mask.as_ref();
        }
    }
}

/// A path element.
///
/// Also used for basic shapes.
#[derive(Clone, Debug)]
pub struct Path {
    /// Element's ID.
    pub id: String,

    /// Element visibility.
    pub visibility: Visibility,

    /// Transform attributes.
    pub transformable: Transformable,

    /// Paint attributes, as declared on the element.
    pub paint: PaintContext,

    /// Element's geometry.
    pub shape: Shape,
}

impl Path {
    /// Creates a visible path without own paint attributes.
    pub fn new(shape: Shape) -> Self {
        Path {
            id: String::new(),
            visibility: Visibility::default(),
            transformable: Transformable::default(),
            paint: PaintContext::default(),
            shape,
        }
    }
}

/// An embedded image kind.
#[derive(Clone)]
pub enum ImageKind {
    /// Decoded, non-premultiplied RGBA8 pixels.
    Rgba {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Pixel data.
        data: Arc<Vec<u8>>,
    },
    /// A nested SVG document.
    Svg(Arc<Tree>),
}

impl std::fmt::Debug for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ImageKind::Rgba { width, height, .. } => {
                write!(f, "ImageKind::Rgba({}x{})", width, height)
            }
            ImageKind::Svg(_) => f.write_str("ImageKind::Svg(..)"),
        }
    }
}

impl ImageKind {
    /// Returns the intrinsic size.
    pub fn size(&self) -> Option<Size> {
        match self {
            ImageKind::Rgba { width, height, .. } => Size::from_wh(*width as f32, *height as f32),
            ImageKind::Svg(ref tree) => Some(tree.size),
        }
    }
}

/// A raster or vector image element.
///
/// `image` element in SVG.
#[derive(Clone, Debug)]
pub struct Image {
    /// Element's ID.
    pub id: String,

    /// Element visibility.
    pub visibility: Visibility,

    /// Transform attributes.
    pub transformable: Transformable,

    /// Paint attributes. Only `opacity` is used.
    pub paint: PaintContext,

    /// `x` in SVG.
    pub x: LengthValue,
    /// `y` in SVG.
    pub y: LengthValue,
    /// `width` in SVG.
    pub width: LengthValue,
    /// `height` in SVG.
    pub height: LengthValue,

    /// An image rendering aspect.
    ///
    /// `preserveAspectRatio` in SVG.
    pub aspect: AspectRatio,

    /// Image data.
    pub kind: ImageKind,
}

/// A clip-path element.
///
/// `clipPath` element in SVG.
#[derive(Clone, Debug)]
pub struct ClipPath {
    /// Element's ID.
    pub id: String,

    /// Coordinate system units.
    ///
    /// `clipPathUnits` in SVG.
    pub units: Units,

    /// Clip path transform.
    ///
    /// `transform` in SVG.
    pub transform: Transform,

    /// Clip path children.
    pub children: Vec<Node>,
}

impl Default for ClipPath {
    fn default() -> Self {
        ClipPath {
            id: String::new(),
            units: Units::UserSpaceOnUse,
            transform: Transform::default(),
            children: Vec::new(),
        }
    }
}

/// A mask type.
///
/// `mask-type` property in SVG.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MaskType {
    /// Indicates that the luminance values of the mask should be used.
    Luminance,
    /// Indicates that the alpha values of the mask should be used.
    Alpha,
}

impl Default for MaskType {
    fn default() -> Self {
        Self::Luminance
    }
}

/// A mask element.
///
/// `mask` element in SVG.
#[derive(Clone, Debug)]
pub struct Mask {
    /// Element's ID.
    pub id: String,

    /// Coordinate system units.
    ///
    /// `maskUnits` in SVG.
    pub units: Units,

    /// Content coordinate system units.
    ///
    /// `maskContentUnits` in SVG.
    pub content_units: Units,

    /// `x` in SVG.
    pub x: Length,
    /// `y` in SVG.
    pub y: Length,
    /// `width` in SVG.
    pub width: Length,
    /// `height` in SVG.
    pub height: Length,

    /// Mask type.
    ///
    /// `mask-type` in SVG.
    pub kind: MaskType,

    /// Additional mask.
    ///
    /// `mask` in SVG.
    pub mask: Option<Arc<Mask>>,

    /// Mask children.
    pub children: Vec<Node>,
}

impl Default for Mask {
    fn default() -> Self {
        Mask {
            id: String::new(),
            units: Units::ObjectBoundingBox,
            content_units: Units::UserSpaceOnUse,
            x: Length::new(-10.0, LengthUnit::Percent),
            y: Length::new(-10.0, LengthUnit::Percent),
            width: Length::new(120.0, LengthUnit::Percent),
            height: Length::new(120.0, LengthUnit::Percent),
            kind: MaskType::default(),
            mask: None,
            children: Vec::new(),
        }
    }
}
