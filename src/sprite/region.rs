use std::sync::Arc;

use crate::{
    assets::store::{AssetStore, Bitmap},
    foundation::core::Rgba8,
    foundation::error::SkinampResult,
    sprite::model::SpriteDecl,
};

/// A static rectangular region of a shared skin bitmap.
#[derive(Clone, Debug)]
pub struct Sprite {
    file: String,
    offset_x: u32,
    offset_y: u32,
    width: u32,
    height: u32,
    bitmap: Arc<Bitmap>,
}

impl Sprite {
    /// Resolve a declaration against the asset store (decoding the file if needed).
    pub fn load(decl: &SpriteDecl, store: &mut AssetStore) -> SkinampResult<Self> {
        let bitmap = store.load(&decl.file)?;
        Ok(Self::from_bitmap(
            decl.file.clone(),
            bitmap,
            decl.sprite_position_x,
            decl.sprite_position_y,
            decl.sprite_width,
            decl.sprite_height,
        ))
    }

    pub fn from_bitmap(
        file: impl Into<String>,
        bitmap: Arc<Bitmap>,
        offset_x: u32,
        offset_y: u32,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            file: file.into(),
            offset_x,
            offset_y,
            width,
            height,
            bitmap,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bitmap(&self) -> &Arc<Bitmap> {
        &self.bitmap
    }

    /// Sample at region-local coordinates. `None` outside the region or the bitmap.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Rgba8> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.bitmap_color_at(x, y)
    }

    /// Like [`Sprite::color_at`] but bounded only by the bitmap, not the region.
    pub fn bitmap_color_at(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.bitmap.pixel(
            i64::from(self.offset_x) + i64::from(x),
            i64::from(self.offset_y) + i64::from(y),
        )
    }
}
