use std::sync::Arc;

use crate::{
    assets::store::{AssetStore, Bitmap},
    foundation::core::{PixelRect, PixelSource, Rgba8},
    foundation::error::{SkinampError, SkinampResult},
    text::atlas::{GlyphAtlas, GlyphCell, atlas_for},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Declarative description of one bitmap-font text field.
pub struct TextSpriteConfig {
    /// Initial text.
    pub text: String,
    /// Font bitmap inside the skin (`text.bmp` or `numbers.bmp`).
    pub file: String,
    /// Use the 9x13 digit font instead of the 5x6 alphanumeric one.
    pub numeric: bool,
    /// Empty pixels between two glyph cells.
    pub char_spacing: u32,
    /// Number of visible cells.
    pub str_len: usize,
    /// Scroll long text. Stored only; no scrolling is performed.
    pub marquee: bool,
    /// Placement, left edge.
    pub x: i32,
    /// Placement, top edge.
    pub y: i32,
}

/// Fixed-width text field drawn from a glyph bitmap.
///
/// Layout is lazy: changing the text marks the field dirty and the cell list
/// is rebuilt on the next sample.
#[derive(Clone, Debug)]
pub struct TextSprite {
    id: String,
    text: String,
    text_chars: usize,
    str_len: usize,
    numeric: bool,
    char_spacing: u32,
    x: i32,
    y: i32,
    marquee: bool,
    bitmap: Arc<Bitmap>,
    cells: Vec<GlyphCell>,
    dirty: bool,
}

impl TextSprite {
    pub fn new(id: impl Into<String>, bitmap: Arc<Bitmap>, numeric: bool, str_len: usize) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            text_chars: 0,
            str_len,
            numeric,
            char_spacing: 0,
            x: 0,
            y: 0,
            marquee: false,
            bitmap,
            cells: Vec::new(),
            dirty: true,
        }
    }

    /// Build from a config, decoding the font bitmap through `store`.
    pub fn load(
        id: impl Into<String>,
        config: &TextSpriteConfig,
        store: &mut AssetStore,
    ) -> SkinampResult<Self> {
        let id = id.into();
        if config.str_len == 0 {
            return Err(SkinampError::validation(format!(
                "text sprite '{id}' must have str_len > 0"
            )));
        }
        let bitmap = store.load(&config.file)?;
        let mut sprite = Self::new(id, bitmap, config.numeric, config.str_len)
            .with_position(config.x, config.y)
            .with_spacing(config.char_spacing);
        sprite.marquee = config.marquee;
        sprite.set(&config.text);
        Ok(sprite)
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.char_spacing = spacing;
        self.dirty = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn str_len(&self) -> usize {
        self.str_len
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    pub fn is_marquee(&self) -> bool {
        self.marquee
    }

    fn atlas(&self) -> &'static GlyphAtlas {
        atlas_for(self.numeric)
    }

    /// Replace the text. Setting the current value again keeps the laid-out cells.
    pub fn set(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        self.text_chars = text.chars().count();
        self.dirty = true;
        true
    }

    pub fn needs_layout(&self) -> bool {
        self.dirty
    }

    /// Resolve the first `str_len` characters into glyph cells.
    ///
    /// Unmapped characters and padding render as the blank glyph; the
    /// alphanumeric font always ends in the ellipsis glyph.
    pub fn layout(&mut self) {
        if !self.dirty {
            return;
        }
        let atlas = self.atlas();
        let mut cells = vec![atlas.blank(); self.str_len];
        for (slot, c) in cells.iter_mut().zip(self.text.chars()) {
            *slot = atlas.lookup(c).unwrap_or(atlas.blank());
        }
        if let (Some(last), Some(ellipsis)) = (cells.last_mut(), atlas.ellipsis()) {
            *last = ellipsis;
        }
        tracing::trace!(sprite = %self.id, text = %self.text, "text laid out");
        self.cells = cells;
        self.dirty = false;
    }

    /// Laid-out cells, if the text has not changed since the last layout.
    pub fn cells(&self) -> Option<&[GlyphCell]> {
        (!self.dirty).then_some(self.cells.as_slice())
    }

    /// Field rectangle at its placement: `str_len` cells wide, one glyph tall.
    pub fn rect(&self) -> PixelRect {
        let atlas = self.atlas();
        let width = u32::try_from(self.str_len)
            .unwrap_or(u32::MAX)
            .saturating_mul(atlas.advance(self.char_spacing));
        PixelRect::new(self.x, self.y, width, atlas.glyph_height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect().contains(x, y)
    }

    /// Sample in skin coordinates. `None` past the text, in the spacing gap,
    /// or outside the glyph rows.
    pub fn color_at(&mut self, x: i32, y: i32) -> Option<Rgba8> {
        self.layout();
        let atlas = self.atlas();
        let (lx, ly) = (x - self.x, y - self.y);
        if lx < 0 || ly < 0 || ly as u32 >= atlas.glyph_height {
            return None;
        }
        let advance = atlas.advance(self.char_spacing);
        let index = (lx as u32 / advance) as usize;
        if index >= self.str_len || index >= self.text_chars {
            return None;
        }
        let in_cell = lx as u32 - index as u32 * advance;
        if in_cell >= atlas.glyph_width {
            return None;
        }
        let cell = self.cells.get(index)?;
        self.bitmap.pixel(
            i64::from(cell.x) + i64::from(in_cell),
            i64::from(cell.y) + i64::from(ly),
        )
    }
}

impl PixelSource for TextSprite {
    fn bounds(&self) -> PixelRect {
        self.rect()
    }

    fn color_at(&mut self, x: i32, y: i32) -> Option<Rgba8> {
        TextSprite::color_at(self, x, y)
    }
}

/// Ordered set of text fields. The first field containing a point answers for it.
#[derive(Clone, Debug, Default)]
pub struct TextLayer {
    sprites: Vec<TextSprite>,
}

impl TextLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sprite: TextSprite) {
        self.sprites.push(sprite);
    }

    pub fn get(&self, id: &str) -> Option<&TextSprite> {
        self.sprites.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TextSprite> {
        self.sprites.iter_mut().find(|s| s.id() == id)
    }

    pub fn sprites(&self) -> &[TextSprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn color_at(&mut self, x: i32, y: i32) -> Option<Rgba8> {
        self.sprites
            .iter_mut()
            .find(|s| s.contains(x, y))
            .and_then(|s| s.color_at(x, y))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/sprite.rs"]
mod tests;
