//! Color codec and style state.
//!
//! Colors travel through the app as canonical `#RRGGBB` hex strings (uppercase,
//! zero-padded). The codec never raises: malformed input yields `None` and the
//! caller treats it as a no-op.

/// Parse a 6-hex-digit color, with or without a leading `#`, case-insensitive.
/// Returns `None` for anything else.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Format an RGB triple as `#RRGGBB`, uppercase.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// Normalize a color string to canonical hex. Accepts `#RRGGBB` / `RRGGBB`
/// (any case) and `rgb(r, g, b)` with decimal components.
pub fn normalize_color(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some(rgb) = hex_to_rgb(input) {
        return Some(rgb_to_hex(rgb));
    }
    let inner = input.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.splitn(3, ',');
    let mut channel = || -> Option<u8> { parts.next()?.trim().parse().ok() };
    let rgb = [channel()?, channel()?, channel()?];
    Some(rgb_to_hex(rgb))
}

/// Current stroke color, brush width, and background color.
///
/// Mutated only through the setters; read by every drawing operation.
#[derive(Clone, Debug)]
pub struct StyleState {
    color: [u8; 3],
    background: [u8; 3],
    pub brush_size: u32,
}

impl Default for StyleState {
    fn default() -> Self {
        // The original app's defaults: light grey ink on a black canvas.
        Self {
            color: [0xCC, 0xCC, 0xCC],
            background: [0x00, 0x00, 0x00],
            brush_size: 4,
        }
    }
}

impl StyleState {
    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn color_hex(&self) -> String {
        rgb_to_hex(self.color)
    }

    pub fn background(&self) -> [u8; 3] {
        self.background
    }

    /// Set the stroke color from any accepted string form. Returns `false`
    /// (leaving the state untouched) when the string does not parse.
    pub fn set_color(&mut self, input: &str) -> bool {
        match normalize_color(input).as_deref().and_then(hex_to_rgb) {
            Some(rgb) => {
                self.color = rgb;
                true
            }
            None => false,
        }
    }

    pub fn set_color_rgb(&mut self, rgb: [u8; 3]) {
        self.color = rgb;
    }
}
