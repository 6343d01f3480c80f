//! wgpu rendering shell for the explosion visualizer: orbit camera,
//! point-cloud and shockwave-shell renderers, and the bloom chain.

pub mod assets;
pub mod bloom;
pub mod camera;
pub mod particles;
pub mod shell;
pub mod sphere;

pub use assets::*;
pub use bloom::*;
pub use camera::*;
pub use particles::*;
pub use shell::*;
pub use sphere::*;

/// Scene clear color: Catppuccin Mocha "crust", converted to linear.
pub fn clear_color() -> wgpu::Color {
    let rgb = catppuccin::PALETTE.mocha.colors.crust.rgb;
    let to_linear = |c: u8| {
        let s = c as f64 / 255.0;
        if s <= 0.04045 {
            s / 12.92
        } else {
            ((s + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: to_linear(rgb.r),
        g: to_linear(rgb.g),
        b: to_linear(rgb.b),
        a: 1.0,
    }
}
