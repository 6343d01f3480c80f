//! Shader assets fetched by path at startup.
//!
//! A missing or unreadable program is logged and leaves the dependent
//! visual permanently unrendered; there is no retry and no fallback
//! shader. The worst case is a blank frame, which is acceptable for a
//! cosmetic visualizer.

use std::path::Path;

/// Load a WGSL program from `dir/file` and compile it.
///
/// Returns `None` on a failed fetch, after logging the error.
pub fn load_shader(device: &wgpu::Device, dir: &Path, file: &str) -> Option<wgpu::ShaderModule> {
    let path = dir.join(file);
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            log::error!("failed to load shader {}: {err}", path.display());
            return None;
        }
    };

    log::info!("loaded shader {}", path.display());
    Some(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(file),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}
