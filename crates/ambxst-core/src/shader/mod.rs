//! mpv user-shader generation from a wallpaper color palette.

mod generator;
mod palette;

pub use generator::{
    generate_shader, generate_shader_opt, tint_pixel, write_shader, DISTRIBUTION_SHARPNESS,
    PASSTHROUGH_SHADER,
};
pub use palette::{Palette, PaletteColor};
