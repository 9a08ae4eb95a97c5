use crate::{
    color::Rgb,
    math8::{blend8, scale8},
};

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Scale every channel of a color by `scale` (0-255 = 0.0-1.0)
#[inline]
pub fn scale_color(color: Rgb, scale: u8) -> Rgb {
    if scale == 255 {
        return color;
    }
    Rgb {
        r: scale8(color.r, scale),
        g: scale8(color.g, scale),
        b: scale8(color.b, scale),
    }
}

/// Collapse a resolved color back to a 3-bit on/off mask
///
/// Used by outputs that can only switch channels, not dim them: any lit
/// channel drives its pin on.
pub fn threshold_mask(color: Rgb) -> u8 {
    let mut mask = 0;
    if color.r > 0 {
        mask |= 0b001;
    }
    if color.g > 0 {
        mask |= 0b010;
    }
    if color.b > 0 {
        mask |= 0b100;
    }
    mask
}
