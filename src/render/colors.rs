use vello::peniko::Color;

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// 8-bit channels plus a 0..1 alpha, the way CSS `rgba()` writes it.
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert to vello's peniko Color (AlphaColor<Srgb>).
    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }

    /// Channels as RGBA8, alpha included.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Parse a CSS-like color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` or one of a few names.
pub fn parse_color(s: &str) -> Option<AppColor> {
    let s = s.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            3 => {
                let short = |i: usize| Some(u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()? * 17);
                Some(AppColor::rgba8(short(0)?, short(1)?, short(2)?, 1.0))
            }
            6 => Some(AppColor::rgba8(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(AppColor::rgba8(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)? as f32 / 255.0,
            )),
            _ => None,
        };
    }

    if let Some(args) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
        let args = args.strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let byte = |p: &str| p.parse::<u8>().ok();
        return match parts.as_slice() {
            [r, g, b] => Some(AppColor::rgba8(byte(r)?, byte(g)?, byte(b)?, 1.0)),
            [r, g, b, a] => {
                let a = a.parse::<f32>().ok()?;
                if !(0.0..=1.0).contains(&a) {
                    return None;
                }
                Some(AppColor::rgba8(byte(r)?, byte(g)?, byte(b)?, a))
            }
            _ => None,
        };
    }

    match s.as_str() {
        "black" => Some(AppColor::new(0.0, 0.0, 0.0)),
        "white" => Some(AppColor::new(1.0, 1.0, 1.0)),
        "red" => Some(AppColor::rgba8(255, 0, 0, 1.0)),
        "green" => Some(AppColor::rgba8(0, 128, 0, 1.0)),
        "blue" => Some(AppColor::rgba8(0, 0, 255, 1.0)),
        "gray" | "grey" => Some(AppColor::rgba8(128, 128, 128, 1.0)),
        "transparent" => Some(AppColor::new(0.0, 0.0, 0.0).with_alpha(0.0)),
        _ => None,
    }
}
