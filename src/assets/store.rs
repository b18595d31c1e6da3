use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{bundle::SkinBundle, decode},
    foundation::core::Rgba8,
    foundation::error::{SkinampError, SkinampResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded skin bitmap in straight RGBA8 form.
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major RGBA8, tightly packed.
    pub rgba8: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Sample one pixel; `None` outside the bitmap.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8.get(idx..idx + 4)?;
        Some(Rgba8::new(px[0], px[1], px[2], px[3]))
    }
}

/// Skin asset store: the bundle plus a decode cache that lives as long as the store.
///
/// Every sprite that references the same file name shares one `Arc<Bitmap>`;
/// a file is decoded at most once.
#[derive(Debug)]
pub struct AssetStore {
    bundle: SkinBundle,
    cache: HashMap<String, Arc<Bitmap>>,
    decodes: HashMap<String, u32>,
}

impl AssetStore {
    pub fn new(bundle: SkinBundle) -> Self {
        Self {
            bundle,
            cache: HashMap::new(),
            decodes: HashMap::new(),
        }
    }

    pub fn bundle(&self) -> &SkinBundle {
        &self.bundle
    }

    /// Return the decoded bitmap for `name`, decoding and caching it on first use.
    ///
    /// The cache is keyed by the reference exactly as the caller spelled it; the
    /// bundle lookup itself is case-insensitive.
    pub fn load(&mut self, name: &str) -> SkinampResult<Arc<Bitmap>> {
        if let Some(hit) = self.cache.get(name) {
            tracing::debug!(file = name, "bitmap cache hit");
            return Ok(Arc::clone(hit));
        }

        let bytes = self.bundle.bytes(name)?;
        let bitmap = decode::decode_bitmap(bytes).map_err(|e| match e {
            SkinampError::Decode(msg) => SkinampError::decode(format!("'{name}': {msg}")),
            other => other,
        })?;
        tracing::debug!(
            file = name,
            width = bitmap.width,
            height = bitmap.height,
            "decoded bitmap"
        );

        let bitmap = Arc::new(bitmap);
        self.cache.insert(name.to_string(), Arc::clone(&bitmap));
        *self.decodes.entry(name.to_string()).or_insert(0) += 1;
        Ok(bitmap)
    }

    /// Number of times `name` went through the decoder.
    pub fn decode_count(&self, name: &str) -> u32 {
        self.decodes.get(name).copied().unwrap_or(0)
    }

    /// Number of distinct cached bitmaps.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
