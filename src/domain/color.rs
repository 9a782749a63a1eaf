/// Color codec: 24-bit RGB to the display's native 16-bit pixels.
///
/// The native format is RGB565 with the two bytes swapped, because the
/// panel consumes big-endian words. The game palette (14 entries) can be
/// backed by an inline RGB table or a packed byte buffer; both decode to
/// the same `Palette` at startup.

use palette::Srgb;

use super::button::Button;

/// One pixel in the display's native encoding.
pub type NativeColor = u16;

pub const BLACK: NativeColor = 0x0000;
pub const WHITE: NativeColor = 0xFFFF;

pub const PALETTE_LEN: usize = 14;

/// 0-3 dim cells, 4-7 lit cells, 8-11 cell frames, 12 ring, 13 disc.
const GAME_RGB: [u32; PALETTE_LEN] = [
    0x00cc00, 0xcccc00, 0xcc0000, 0x0000cc,
    0x00ff00, 0xffff00, 0xff0000, 0x0000ff,
    0x008800, 0x888800, 0x880000, 0x000088,
    0x880088, 0xff00ff,
];

/// The same palette as three bytes (R, G, B) per entry.
const GAME_PACKED: [u8; PALETTE_LEN * 3] = [
    0x00, 0xcc, 0x00,  0xcc, 0xcc, 0x00,  0xcc, 0x00, 0x00,  0x00, 0x00, 0xcc,
    0x00, 0xff, 0x00,  0xff, 0xff, 0x00,  0xff, 0x00, 0x00,  0x00, 0x00, 0xff,
    0x00, 0x88, 0x00,  0x88, 0x88, 0x00,  0x88, 0x00, 0x00,  0x00, 0x00, 0x88,
    0x88, 0x00, 0x88,  0xff, 0x00, 0xff,
];

// ── Codec ──

/// Split a `0xRRGGBB` literal into channels.
pub fn rgb(c: u32) -> Srgb<u8> {
    Srgb::new((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

pub fn encode(color: Srgb<u8>) -> NativeColor {
    let r = (color.red >> 3) as u16;
    let g = (color.green >> 2) as u16;
    let b = (color.blue >> 3) as u16;
    ((r << 11) | (g << 5) | b).swap_bytes()
}

/// Inverse of `encode`, widening each channel back to 8 bits.
pub fn decode(native: NativeColor) -> Srgb<u8> {
    let v = native.swap_bytes();
    let r = ((v >> 11) & 0x1f) as u8;
    let g = ((v >> 5) & 0x3f) as u8;
    let b = (v & 0x1f) as u8;
    Srgb::new((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

// ── Palette backing stores ──

/// Where palette entries come from before encoding.
pub trait PaletteSource {
    fn len(&self) -> usize;
    fn rgb(&self, index: usize) -> Option<Srgb<u8>>;
}

pub struct InlineTable(pub &'static [u32]);

impl PaletteSource for InlineTable {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn rgb(&self, index: usize) -> Option<Srgb<u8>> {
        self.0.get(index).map(|&c| rgb(c))
    }
}

pub struct PackedBytes(pub &'static [u8]);

impl PaletteSource for PackedBytes {
    fn len(&self) -> usize {
        self.0.len() / 3
    }

    fn rgb(&self, index: usize) -> Option<Srgb<u8>> {
        let chunk = self.0.chunks_exact(3).nth(index)?;
        Some(Srgb::new(chunk[0], chunk[1], chunk[2]))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PaletteKind {
    #[default]
    Inline,
    Packed,
}

impl PaletteKind {
    pub fn from_name(s: &str) -> Option<PaletteKind> {
        match s.to_lowercase().as_str() {
            "inline" | "table" => Some(PaletteKind::Inline),
            "packed" | "bytes" => Some(PaletteKind::Packed),
            _ => None,
        }
    }
}

// ── Palette ──

/// The game palette, pre-encoded to native pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: [NativeColor; PALETTE_LEN],
}

impl Palette {
    pub fn encode_from(source: &dyn PaletteSource) -> Self {
        let mut entries = [BLACK; PALETTE_LEN];
        for (i, slot) in entries.iter_mut().enumerate().take(source.len()) {
            if let Some(c) = source.rgb(i) {
                *slot = encode(c);
            }
        }
        Palette { entries }
    }

    pub fn load(kind: PaletteKind) -> Self {
        match kind {
            PaletteKind::Inline => Self::encode_from(&InlineTable(&GAME_RGB)),
            PaletteKind::Packed => Self::encode_from(&PackedBytes(&GAME_PACKED)),
        }
    }

    pub fn get(&self, index: usize) -> NativeColor {
        self.entries.get(index).copied().unwrap_or(BLACK)
    }

    /// Inset color of a cell, lit or dim.
    pub fn cell(&self, button: Button, active: bool) -> NativeColor {
        self.get(button.index() + 4 * active as usize)
    }

    pub fn frame(&self, button: Button) -> NativeColor {
        self.get(button.index() + 8)
    }

    pub fn ring(&self) -> NativeColor {
        self.get(12)
    }

    pub fn disc(&self) -> NativeColor {
        self.get(13)
    }

    /// Title screen background (lit yellow).
    pub fn title_background(&self) -> NativeColor {
        self.get(5)
    }

    /// Title heading (dim red).
    pub fn title_heading(&self) -> NativeColor {
        self.get(2)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::load(PaletteKind::Inline)
    }
}
