use crate::foundation::core::Point;
use crate::foundation::error::{TowerError, TowerResult};
use std::collections::{BTreeMap, HashMap};

/// Name of the font every renderer ships with.
pub const BUILTIN_FONT: &str = "3x5";

/// Widest glyph a row mask can describe.
pub const MAX_GLYPH_WIDTH: u32 = u8::BITS;

/// Monochrome fixed-height bitmap font. Each glyph row is a bit mask, most significant of
/// `width` bits on the left.
#[derive(Clone, Debug)]
pub struct BitmapFont {
    pub width: u32,
    pub height: u32,
    /// Blank columns between glyphs.
    pub spacing: u32,
    /// Row at which glyph tops are placed.
    pub top: i32,
    glyphs: HashMap<char, Vec<u8>>,
}

/// Text rasterized into glyph coverage, relative to its own left edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRun {
    pub points: Vec<Point>,
    pub width: u32,
}

impl BitmapFont {
    /// Fails with `Validation` unless `1 <= width <= MAX_GLYPH_WIDTH`.
    pub fn new(width: u32, height: u32, spacing: u32, top: i32) -> TowerResult<Self> {
        if width == 0 || width > MAX_GLYPH_WIDTH {
            return Err(TowerError::validation(format!(
                "font glyph width {width} must be in 1..={MAX_GLYPH_WIDTH}"
            )));
        }
        Ok(Self::sized(width, height, spacing, top))
    }

    fn sized(width: u32, height: u32, spacing: u32, top: i32) -> Self {
        Self {
            width,
            height,
            spacing,
            top,
            glyphs: HashMap::new(),
        }
    }

    pub fn with_glyph(mut self, ch: char, rows: &[u8]) -> Self {
        self.glyphs.insert(ch, rows.to_vec());
        self
    }

    fn glyph(&self, ch: char) -> Option<&[u8]> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.glyphs.get(&ch.to_ascii_uppercase()))
            .map(Vec::as_slice)
    }

    /// Unknown characters advance like a blank glyph.
    pub fn rasterize(&self, text: &str) -> TextRun {
        let mut run = TextRun::default();
        let advance = self.width + self.spacing;
        let mut pen = 0u32;
        for (i, ch) in text.chars().enumerate() {
            if i > 0 {
                pen += advance;
            }
            let Some(rows) = self.glyph(ch) else {
                continue;
            };
            for (row, bits) in rows.iter().enumerate().take(self.height as usize) {
                for col in 0..self.width {
                    let lit = bits
                        .checked_shr(self.width - 1 - col)
                        .is_some_and(|b| b & 1 != 0);
                    if lit {
                        run.points.push(Point::new(
                            (pen + col) as i32,
                            self.top + row as i32,
                        ));
                    }
                }
            }
        }
        if !text.is_empty() {
            run.width = pen + self.width;
        }
        run
    }

    /// 3x5 uppercase font sized for an 8-row tower.
    pub fn builtin() -> Self {
        const GLYPHS: &[(char, [u8; 5])] = &[
            ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
            ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
            ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
            ('3', [0b111, 0b001, 0b111, 0b001, 0b111]),
            ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
            ('5', [0b111, 0b100, 0b111, 0b001, 0b111]),
            ('6', [0b111, 0b100, 0b111, 0b101, 0b111]),
            ('7', [0b111, 0b001, 0b001, 0b001, 0b001]),
            ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
            ('9', [0b111, 0b101, 0b111, 0b001, 0b111]),
            ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
            ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
            ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
            ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
            ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
            ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
            ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
            ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
            ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
            ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
            ('K', [0b101, 0b101, 0b110, 0b101, 0b101]),
            ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
            ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
            ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
            ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
            ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
            ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
            ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
            ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
            ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
            ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
            ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
            ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
            ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
            ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
            ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
            ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
            (',', [0b000, 0b000, 0b000, 0b010, 0b100]),
            ('!', [0b010, 0b010, 0b010, 0b000, 0b010]),
            ('?', [0b110, 0b001, 0b010, 0b000, 0b010]),
            (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
            ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
            ('+', [0b000, 0b010, 0b111, 0b010, 0b000]),
            ('=', [0b000, 0b111, 0b000, 0b111, 0b000]),
            ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
            ('\'', [0b010, 0b010, 0b000, 0b000, 0b000]),
        ];

        GLYPHS
            .iter()
            .fold(Self::sized(3, 5, 1, 1), |font, (ch, rows)| {
                font.with_glyph(*ch, rows)
            })
    }
}

/// Fonts a renderer can resolve by name.
#[derive(Clone, Debug)]
pub struct FontBook {
    fonts: BTreeMap<String, BitmapFont>,
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            fonts: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, font: BitmapFont) {
        self.fonts.insert(name.into(), font);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> TowerResult<&BitmapFont> {
        self.fonts
            .get(name)
            .ok_or_else(|| TowerError::unknown_font(name))
    }
}

impl Default for FontBook {
    fn default() -> Self {
        let mut book = Self::empty();
        book.insert(BUILTIN_FONT, BitmapFont::builtin());
        book
    }
}
