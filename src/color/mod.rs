mod palette;
mod utils;

use smart_leds::RGB8;

pub use palette::PaletteColor;
pub use utils::{blend_colors, scale_color, threshold_mask};

pub type Rgb = RGB8;

/// Black as a resolved color
pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
