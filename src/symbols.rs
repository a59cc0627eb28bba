use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::{
    assets::{self, Raster},
    error::{CardwrightError, CardwrightResult},
};

/// Identifiers the resolver knows how to load: tap, the five colors,
/// colorless, and the generic digits.
pub const KNOWN_SYMBOLS: [&str; 16] = [
    "T", "W", "U", "B", "R", "G", "C", "1", "2", "3", "4", "5", "6", "7", "8", "9",
];

/// One inline symbol, rasterized from its SVG source exactly once.
///
/// The cached raster keeps the source's intrinsic size; [`Glyph::resized`] is
/// a pure resampling of it and never touches the cache entry.
#[derive(Clone, Debug)]
pub struct Glyph {
    identifier: &'static str,
    source: Raster,
}

impl Glyph {
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    pub fn source(&self) -> &Raster {
        &self.source
    }

    /// Resample the cached source into a `target_px` square.
    pub fn resized(&self, target_px: u32) -> CardwrightResult<Raster> {
        if target_px == 0 {
            return Err(CardwrightError::validation("glyph target size must be > 0"));
        }
        let img = image::RgbaImage::from_raw(
            self.source.width,
            self.source.height,
            self.source.rgba8_premul.as_ref().clone(),
        )
        .ok_or_else(|| CardwrightError::render("glyph source buffer size mismatch"))?;

        // Resampling happens in the premultiplied domain so transparent
        // borders do not bleed dark fringes into the symbol.
        let resized =
            image::imageops::resize(&img, target_px, target_px, image::imageops::FilterType::Lanczos3);
        Ok(Raster {
            width: target_px,
            height: target_px,
            rgba8_premul: Arc::new(resized.into_raw()),
        })
    }
}

/// Process-wide symbol cache over a directory of SVG sources.
///
/// Population is lazy: the first `resolve` of an identifier rasterizes
/// `<root>/<id>.svg` under the write lock, later hits share the read lock and
/// clone the `Arc`. Safe to share across render threads.
pub struct SymbolResolver {
    root: PathBuf,
    cache: RwLock<HashMap<&'static str, Arc<Glyph>>>,
}

impl SymbolResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical (uppercase) form of `identifier`, if it is a known symbol.
    pub fn canonical(identifier: &str) -> Option<&'static str> {
        KNOWN_SYMBOLS
            .into_iter()
            .find(|s| s.eq_ignore_ascii_case(identifier))
    }

    /// Look up a symbol glyph, matching case-insensitively.
    ///
    /// `Ok(None)` for identifiers outside the known set — never an error, the
    /// caller picks the fallback. `Err` only when a known identifier's
    /// backing SVG cannot be loaded, which is an asset-staging fault.
    pub fn resolve(&self, identifier: &str) -> CardwrightResult<Option<Arc<Glyph>>> {
        let Some(canonical) = Self::canonical(identifier) else {
            return Ok(None);
        };

        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(glyph) = cache.get(canonical) {
                return Ok(Some(glyph.clone()));
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // A racing caller may have populated the entry between the locks.
        if let Some(glyph) = cache.get(canonical) {
            return Ok(Some(glyph.clone()));
        }

        let glyph = Arc::new(self.load(canonical)?);
        tracing::debug!(symbol = canonical, "populated symbol cache");
        cache.insert(canonical, glyph.clone());
        Ok(Some(glyph))
    }

    /// Eagerly populate the whole known set at startup.
    pub fn preload_known(&self) -> CardwrightResult<()> {
        for id in KNOWN_SYMBOLS {
            self.resolve(id)?;
        }
        Ok(())
    }

    fn load(&self, canonical: &'static str) -> CardwrightResult<Glyph> {
        let path = self
            .root
            .join(format!("{}.svg", canonical.to_ascii_lowercase()));
        let bytes = std::fs::read(&path).map_err(|e| {
            CardwrightError::asset(format!(
                "symbol '{canonical}' source '{}': {e}",
                path.display()
            ))
        })?;
        let tree = assets::parse_svg(&bytes).map_err(|e| {
            CardwrightError::asset(format!(
                "symbol '{canonical}' source '{}': {e}",
                path.display()
            ))
        })?;

        let width = (tree.size().width().ceil() as u32).max(1);
        let height = (tree.size().height().ceil() as u32).max(1);
        let rgba8_premul = assets::rasterize_svg(&tree, width, height)?;

        Ok(Glyph {
            identifier: canonical,
            source: Raster {
                width,
                height,
                rgba8_premul: Arc::new(rgba8_premul),
            },
        })
    }
}

impl std::fmt::Debug for SymbolResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .read()
            .map(|c| c.len())
            .unwrap_or_else(|e| e.into_inner().len());
        f.debug_struct("SymbolResolver")
            .field("root", &self.root)
            .field("cached", &cached)
            .finish()
    }
}
