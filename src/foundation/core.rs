/// Straight-alpha RGBA8 color, exactly as supplied by the bitmap decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self::default()
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Color model reported by pixel sources. Only straight RGBA8 exists today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// 8 bits per channel, non-premultiplied alpha.
    Rgba8,
}

/// Integer rectangle in skin pixel space. Containment is half-open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn max_y(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// `x in [self.x, self.x + width)` and `y in [self.y, self.y + height)`.
    pub fn contains(self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        i64::from(self.x) <= x && x < self.max_x() && i64::from(self.y) <= y && y < self.max_y()
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pull-based pixel sampler consulted by the embedding toolkit on every repaint.
///
/// `color_at` returns `None` where the source has nothing to draw; callers fall
/// back to whatever lies underneath. Sampling takes `&mut self` because text
/// sources lay out lazily on first access.
pub trait PixelSource {
    /// Color representation of sampled pixels.
    fn color_model(&self) -> ColorModel {
        ColorModel::Rgba8
    }

    /// Rectangle covered by this source.
    fn bounds(&self) -> PixelRect;

    /// Sample one pixel in skin coordinates.
    fn color_at(&mut self, x: i32, y: i32) -> Option<Rgba8>;
}
