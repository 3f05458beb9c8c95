//! Hex color parsing and HSL lightening for the glow tint.

use crate::foundation::core::Rgb8;

/// Hue, saturation and lightness, each in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Decode a `#rrggbb` string.
///
/// Never fails: a channel whose two digits are missing or not hex decodes as 0, so
/// malformed input still yields a deterministic color.
pub fn parse_hex(hex: &str) -> Rgb8 {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let channel = |i: usize| -> u8 {
        digits
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0)
    };
    Rgb8::new(channel(0), channel(2), channel(4))
}

/// `#rrggbbaa` with `aa = round(amount * 255)`.
pub fn hex_with_alpha(hex: &str, amount: f64) -> String {
    let c = parse_hex(hex);
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        c.r,
        c.g,
        c.b,
        crate::foundation::core::alpha_u8(amount)
    )
}

pub fn rgb_to_hsl(c: Rgb8) -> Hsl {
    let r = f64::from(c.r) / 255.0;
    let g = f64::from(c.g) / 255.0;
    let b = f64::from(c.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb8 {
    let Hsl { h, s, l } = hsl;
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let to_u8 = |v: f64| -> u8 { (v * 255.0).round().clamp(0.0, 255.0) as u8 };
    Rgb8::new(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Add `amount` to the HSL lightness of `hex`, saturating at white.
///
/// Out-of-contract amounts (negative, NaN) are tolerated: lightness is clamped
/// into [0, 1] after the addition.
pub fn lighten(hex: &str, amount: f64) -> Rgb8 {
    let mut hsl = rgb_to_hsl(parse_hex(hex));
    let amount = if amount.is_finite() { amount } else { 0.0 };
    hsl.l = (hsl.l + amount).clamp(0.0, 1.0);
    hsl_to_rgb(hsl)
}

#[cfg(test)]
#[path = "../../tests/unit/color/hsl.rs"]
mod tests;
