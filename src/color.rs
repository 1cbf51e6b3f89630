/// A 16-bit packed color: 5 bits red, 6 bits green, 5 bits blue.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const CYAN: Self = Self(0x07FF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const GRAY: Self = Self(0x7BEF);
    pub const DARK_GRAY: Self = Self(0x39E7);
    pub const DARK_GREEN: Self = Self(0x03E0);

    /// Packs 8-bit channels, dropping the low bits of each channel.
    #[must_use]
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 >> 3) << 11;
        let g = (g as u16 >> 2) << 5;
        let b = b as u16 >> 3;
        Self(r | g | b)
    }

    /// Expands back to 8-bit channels. The dropped low bits come back as zero.
    #[must_use]
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) << 3) as u8;
        let g = (((self.0 >> 5) & 0x3F) << 2) as u8;
        let b = ((self.0 & 0x1F) << 3) as u8;
        (r, g, b)
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    #[must_use]
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::from_rgb888(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}
