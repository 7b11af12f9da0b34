//! Fixtures shared by the unit tests.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

/// Big-endian table writer.
#[derive(Default)]
struct Table(Vec<u8>);

impl Table {
    fn u16(mut self, value: u16) -> Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn i16(mut self, value: i16) -> Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u32(mut self, value: u32) -> Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u64(mut self, value: u64) -> Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u8(mut self, value: u8) -> Self {
        self.0.push(value);
        self
    }
}

/// A TrueType font with a single glyph: a filled 500x700 box on a 1000 unit em.
///
/// There is no `cmap`, so every character maps to that glyph.
pub(crate) fn block_font() -> Vec<u8> {
    let glyf = Table::default()
        .i16(1) // contours
        .i16(0)
        .i16(0)
        .i16(500)
        .i16(700)
        .u16(3) // last point of the contour
        .u16(0) // no instructions
        .u8(1)
        .u8(1)
        .u8(1)
        .u8(1)
        .i16(0)
        .i16(500)
        .i16(0)
        .i16(-500)
        .i16(0)
        .i16(0)
        .i16(700)
        .i16(0);
    let head = Table::default()
        .u32(0x0001_0000)
        .u32(0x0001_0000)
        .u32(0)
        .u32(0x5F0F_3CF5)
        .u16(0)
        .u16(1000) // units per em
        .u64(0)
        .u64(0)
        .i16(0)
        .i16(0)
        .i16(500)
        .i16(700)
        .u16(0)
        .u16(8)
        .i16(2)
        .i16(0) // short loca offsets
        .i16(0);
    let hhea = Table::default()
        .u32(0x0001_0000)
        .i16(800) // ascender
        .i16(-200) // descender
        .i16(0)
        .u16(600)
        .i16(0)
        .i16(100)
        .i16(500)
        .i16(1)
        .i16(0)
        .i16(0)
        .i16(0)
        .i16(0)
        .i16(0)
        .i16(0)
        .i16(0)
        .u16(1); // horizontal metrics
    let hmtx = Table::default().u16(600).i16(0);
    let glyf_len = u16::try_from(glyf.0.len()).unwrap_or(u16::MAX);
    let loca = Table::default().u16(0).u16(glyf_len / 2);
    let maxp = Table::default().u32(0x0000_5000).u16(1);

    // tables must be sorted by tag
    let tables: [(&[u8; 4], Vec<u8>); 6] = [
        (b"glyf", glyf.0),
        (b"head", head.0),
        (b"hhea", hhea.0),
        (b"hmtx", hmtx.0),
        (b"loca", loca.0),
        (b"maxp", maxp.0),
    ];

    let header_len = 12 + 16 * tables.len();
    let mut directory = Table::default()
        .u32(0x0001_0000)
        .u16(6)
        .u16(64)
        .u16(2)
        .u16(32);
    let mut data = Vec::new();
    for (tag, body) in &tables {
        let offset = u32::try_from(header_len + data.len()).unwrap_or(u32::MAX);
        let length = u32::try_from(body.len()).unwrap_or(u32::MAX);
        directory.0.extend_from_slice(*tag);
        directory = directory.u32(0).u32(offset).u32(length);
        data.extend_from_slice(body);
        while data.len() % 4 != 0 {
            data.push(0);
        }
    }

    let mut font = directory.0;
    font.extend_from_slice(&data);
    font
}

/// A solid black JPEG.
pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut output = Cursor::new(Vec::new());
    RgbImage::new(width, height)
        .write_to(&mut output, ImageFormat::Jpeg)
        .expect("encode jpeg");
    output.into_inner()
}

#[test]
fn block_font_parses() {
    use ab_glyph::{Font, FontVec};

    let font = FontVec::try_from_vec(block_font()).expect("parse font");
    let glyph = font.glyph_id('a').with_scale(16.0);
    assert!(font.outline_glyph(glyph).is_some());
}
