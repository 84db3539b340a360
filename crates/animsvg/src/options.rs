// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Rendering options.
#[derive(Clone, Debug)]
pub struct Options {
    /// A default font size.
    ///
    /// Will be used when no `font-size` attribute is set in the SVG.
    /// Also the base of absolute font size keywords.
    ///
    /// Default: 12
    pub font_size: f32,

    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96.0
    pub dpi: f32,

    /// Maximum subdivision depth of a mesh gradient patch.
    ///
    /// Default: 10
    pub mesh_max_depth: u32,

    /// Enables shape anti-aliasing.
    ///
    /// Default: true
    pub anti_alias: bool,

    /// Enables animations.
    ///
    /// When disabled, every animated attribute uses its static value.
    ///
    /// Default: true
    pub animated: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            font_size: 12.0,
            dpi: 96.0,
            mesh_max_depth: 10,
            anti_alias: true,
            animated: true,
        }
    }
}
