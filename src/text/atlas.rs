/// Top-left corner of one glyph inside a font bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphCell {
    pub x: u32,
    pub y: u32,
}

impl GlyphCell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Fixed-cell bitmap font layout: glyph size plus the character table.
#[derive(Clone, Copy, Debug)]
pub struct GlyphAtlas {
    pub glyph_width: u32,
    pub glyph_height: u32,
    table: &'static [(char, GlyphCell)],
    blank: GlyphCell,
    ellipsis: Option<GlyphCell>,
}

impl GlyphAtlas {
    /// Cell for `c`. Letters are matched case-insensitively.
    pub fn lookup(&self, c: char) -> Option<GlyphCell> {
        let find = |c: char| self.table.iter().find(|(k, _)| *k == c).map(|(_, v)| *v);
        find(c).or_else(|| find(c.to_ascii_uppercase()))
    }

    /// Cell used for padding and for characters the font lacks.
    pub fn blank(&self) -> GlyphCell {
        self.blank
    }

    /// Truncation marker; only the alphanumeric font has one.
    pub fn ellipsis(&self) -> Option<GlyphCell> {
        self.ellipsis
    }

    /// Horizontal advance of one cell.
    pub fn advance(&self, spacing: u32) -> u32 {
        self.glyph_width + spacing
    }
}

const fn cell(x: u32, y: u32) -> GlyphCell {
    GlyphCell::new(x, y)
}

const ELLIPSIS: char = '…';

const ALPHANUMERIC_TABLE: &[(char, GlyphCell)] = &[
    ('A', cell(0, 0)),
    ('B', cell(5, 0)),
    ('C', cell(10, 0)),
    ('D', cell(15, 0)),
    ('E', cell(20, 0)),
    ('F', cell(25, 0)),
    ('G', cell(30, 0)),
    ('H', cell(35, 0)),
    ('I', cell(40, 0)),
    ('J', cell(45, 0)),
    ('K', cell(50, 0)),
    ('L', cell(55, 0)),
    ('M', cell(60, 0)),
    ('N', cell(65, 0)),
    ('O', cell(70, 0)),
    ('P', cell(75, 0)),
    ('Q', cell(80, 0)),
    ('R', cell(85, 0)),
    ('S', cell(90, 0)),
    ('T', cell(95, 0)),
    ('U', cell(100, 0)),
    ('V', cell(105, 0)),
    ('W', cell(110, 0)),
    ('X', cell(115, 0)),
    ('Y', cell(120, 0)),
    ('Z', cell(125, 0)),
    ('"', cell(130, 0)),
    ('@', cell(135, 0)),
    (' ', cell(145, 0)),
    ('0', cell(0, 6)),
    ('1', cell(5, 6)),
    ('2', cell(10, 6)),
    ('3', cell(15, 6)),
    ('4', cell(20, 6)),
    ('5', cell(25, 6)),
    ('6', cell(30, 6)),
    ('7', cell(35, 6)),
    ('8', cell(40, 6)),
    ('9', cell(45, 6)),
    (ELLIPSIS, cell(50, 6)),
    ('.', cell(55, 6)),
    (':', cell(60, 6)),
    ('(', cell(65, 6)),
    (')', cell(70, 6)),
    ('-', cell(75, 6)),
    ('\'', cell(80, 6)),
    ('!', cell(85, 6)),
    ('_', cell(90, 6)),
    ('+', cell(95, 6)),
    ('\\', cell(100, 6)),
    ('/', cell(105, 6)),
    ('[', cell(110, 6)),
    (']', cell(115, 6)),
    ('^', cell(120, 6)),
    ('&', cell(125, 6)),
    ('%', cell(130, 6)),
    (',', cell(135, 6)),
    ('=', cell(140, 6)),
    ('$', cell(145, 6)),
];

const NUMERIC_TABLE: &[(char, GlyphCell)] = &[
    ('0', cell(0, 0)),
    ('1', cell(9, 0)),
    ('2', cell(18, 0)),
    ('3', cell(27, 0)),
    ('4', cell(36, 0)),
    ('5', cell(45, 0)),
    ('6', cell(54, 0)),
    ('7', cell(63, 0)),
    ('8', cell(72, 0)),
    ('9', cell(81, 0)),
    (' ', cell(90, 0)),
];

/// `text.bmp`: 5x6 glyphs, letters on row 0, digits and punctuation on row 1.
pub const ALPHANUMERIC: GlyphAtlas = GlyphAtlas {
    glyph_width: 5,
    glyph_height: 6,
    table: ALPHANUMERIC_TABLE,
    blank: cell(145, 0),
    ellipsis: Some(cell(50, 6)),
};

/// `numbers.bmp`: 9x13 digits followed by a blank.
pub const NUMERIC: GlyphAtlas = GlyphAtlas {
    glyph_width: 9,
    glyph_height: 13,
    table: NUMERIC_TABLE,
    blank: cell(90, 0),
    ellipsis: None,
};

pub fn atlas_for(numeric: bool) -> &'static GlyphAtlas {
    if numeric { &NUMERIC } else { &ALPHANUMERIC }
}
