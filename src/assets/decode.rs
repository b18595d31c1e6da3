use std::sync::Arc;

use crate::{
    assets::store::Bitmap,
    foundation::error::{SkinampError, SkinampResult},
};

/// Decode encoded image bytes (BMP, PNG, ...) into straight RGBA8.
///
/// No color-space work happens here: whatever the `image` decoder yields is kept.
pub fn decode_bitmap(bytes: &[u8]) -> SkinampResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SkinampError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Bitmap {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
