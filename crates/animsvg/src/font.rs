// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::sync::RwLock;

use animsvg_tree::{FontStyle, ResolvedFontSpec};

/// Font metrics used to resolve `em` and `ex` units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FontMetrics {
    /// The font size.
    pub em: f32,
    /// The x-height.
    pub ex: f32,
}

/// A source of font metrics.
///
/// Implemented by the font loading layer.
pub trait FontMetricsProvider: Send + Sync {
    /// Returns metrics of a resolved font.
    fn metrics(&self, font: &ResolvedFontSpec) -> FontMetrics;
}

/// A provider that does not look at any font data.
///
/// The x-height is assumed to be half of the font size.
#[derive(Clone, Copy, Default, Debug)]
pub struct SimpleFontMetrics;

impl FontMetricsProvider for SimpleFontMetrics {
    fn metrics(&self, font: &ResolvedFontSpec) -> FontMetrics {
        FontMetrics {
            em: font.size,
            ex: font.effective_size() / 2.0,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct FontKey {
    families: Vec<String>,
    style: (u8, u32),
    weight: u16,
    size: u32,
    size_adjust: Option<u32>,
    stretch: u32,
}

impl FontKey {
    fn new(font: &ResolvedFontSpec) -> Self {
        FontKey {
            families: font.families.clone(),
            style: match font.style {
                FontStyle::Normal => (0, 0),
                FontStyle::Italic => (1, 0),
                FontStyle::Oblique(angle) => (2, angle.to_bits()),
            },
            weight: font.weight,
            size: font.size.to_bits(),
            size_adjust: font.size_adjust.map(f32::to_bits),
            stretch: font.stretch.percentage().to_bits(),
        }
    }
}

/// A shared font metrics cache.
///
/// Can be used by multiple renders of the same document at once.
pub struct FontCache {
    provider: Box<dyn FontMetricsProvider>,
    cache: RwLock<HashMap<FontKey, FontMetrics>>,
}

impl FontCache {
    /// Creates a new cache on top of a provider.
    pub fn new(provider: Box<dyn FontMetricsProvider>) -> Self {
        FontCache {
            provider,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns metrics of a resolved font.
    pub fn metrics(&self, font: &ResolvedFontSpec) -> FontMetrics {
        let key = FontKey::new(font);
        if let Ok(cache) = self.cache.read() {
            if let Some(metrics) = cache.get(&key) {
                return *metrics;
            }
        }

        let metrics = self.provider.metrics(font);
        match self.cache.write() {
            Ok(mut cache) => {
                cache.insert(key, metrics);
            }
            Err(_) => log::warn!("Font metrics cache is poisoned."),
        }

        metrics
    }

    /// Returns the amount of cached fonts.
    pub fn len(&self) -> usize {
        self.cache.read().map_or(0, |c| c.len())
    }

    /// Checks that nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all cached metrics.
    pub fn clear(&self) {
        match self.cache.write() {
            Ok(mut cache) => cache.clear(),
            Err(e) => e.into_inner().clear(),
        }
    }
}

impl Default for FontCache {
    fn default() -> Self {
        FontCache::new(Box::new(SimpleFontMetrics))
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("len", &self.len())
            .finish()
    }
}
