// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use animsvg_tree::{Duration, Group, MeasureContext, Node, PaintContext, ResolvedFontSpec, Size};
use tiny_skia::Transform;

use crate::{FontCache, Options};

/// Everything a node needs to resolve its attributes.
///
/// Every node derives a new context from its parent's one.
/// Contexts are never changed in place.
#[derive(Clone, Debug)]
pub struct RenderContext<'a> {
    options: &'a Options,
    fonts: &'a FontCache,
    paint: PaintContext,
    font: ResolvedFontSpec,
    measure: MeasureContext,
    user_space: Transform,
    geometry_only: bool,
}

impl<'a> RenderContext<'a> {
    /// Creates the context of a document root.
    ///
    /// `view_size` is the size of the view box and `user_space`
    /// the transform that maps it onto the device.
    pub fn root(
        options: &'a Options,
        fonts: &'a FontCache,
        view_size: Size,
        timestamp: Duration,
        user_space: Transform,
    ) -> Self {
        let font = ResolvedFontSpec::root(options.font_size);
        let metrics = fonts.metrics(&font);

        let mut measure = MeasureContext::new(
            view_size.width(),
            view_size.height(),
            options.animated.then_some(timestamp),
        );
        measure.em = metrics.em;
        measure.ex = metrics.ex;
        measure.dpi = options.dpi;

        RenderContext {
            options,
            fonts,
            paint: PaintContext::root(),
            font,
            measure,
            user_space,
            geometry_only: false,
        }
    }

    /// Returns the context visible to `node` and its children.
    #[must_use]
    pub fn derive(&self, node: &Node) -> Self {
        match node {
            Node::Group(ref group) => self.derive_group(group),
            _ => {
                let mut ctx = self.clone();
                ctx.paint = self.paint.derive(node.paint());
                ctx
            }
        }
    }

    /// Returns the context visible to a group's children.
    #[must_use]
    pub fn derive_group(&self, group: &Group) -> Self {
        let mut ctx = self.clone();
        ctx.paint = self.paint.derive(&group.paint);

        if let Some(ref spec) = group.font {
            ctx.font = self
                .font
                .derive(spec, self.options.font_size, self.options.dpi);
            let metrics = self.fonts.metrics(&ctx.font);
            ctx.measure = ctx.measure.derive_for_font(metrics.em, metrics.ex);
        }

        ctx
    }

    /// Returns a context that only produces fill geometry.
    ///
    /// Used to render clip paths.
    #[must_use]
    pub fn for_geometry(&self) -> Self {
        RenderContext {
            geometry_only: true,
            ..self.clone()
        }
    }

    /// Returns the context of a resource's content, like mask or pattern children.
    ///
    /// Paint and font attributes restart from the root values.
    /// The viewport, timestamp and geometry-only flag are kept.
    #[must_use]
    pub fn for_resource(&self, user_space: Transform) -> Self {
        let font = ResolvedFontSpec::root(self.options.font_size);
        let metrics = self.fonts.metrics(&font);
        RenderContext {
            paint: PaintContext::root(),
            measure: self.measure.derive_for_font(metrics.em, metrics.ex),
            font,
            user_space,
            ..self.clone()
        }
    }

    /// Returns a copy with a user space extended by `ts`.
    #[must_use]
    pub fn concat_user_space(&self, ts: Transform) -> Self {
        RenderContext {
            user_space: self.user_space.pre_concat(ts),
            ..self.clone()
        }
    }

    /// Returns rendering options.
    #[inline]
    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// Returns the font metrics cache.
    #[inline]
    pub fn fonts(&self) -> &'a FontCache {
        self.fonts
    }

    /// Returns the cascaded paint attributes.
    #[inline]
    pub fn paint(&self) -> &PaintContext {
        &self.paint
    }

    /// Returns the cascaded font.
    #[inline]
    pub fn font(&self) -> &ResolvedFontSpec {
        &self.font
    }

    /// Returns the measurement context.
    #[inline]
    pub fn measure(&self) -> &MeasureContext {
        &self.measure
    }

    /// Returns the transform from the current user space to the device.
    #[inline]
    pub fn user_space(&self) -> Transform {
        self.user_space
    }

    /// Checks that only fill geometry should be produced.
    #[inline]
    pub fn is_geometry_only(&self) -> bool {
        self.geometry_only
    }

    /// Returns the document timestamp.
    ///
    /// `None` when animations are disabled.
    #[inline]
    pub fn timestamp(&self) -> Option<Duration> {
        self.measure.timestamp
    }
}
