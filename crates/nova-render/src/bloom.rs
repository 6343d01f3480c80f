//! Bloom post-process: bright-pass, separable blur, composite.
//!
//! The scene renders into an offscreen HDR target; pixels above the
//! luminance threshold are extracted at half resolution, blurred
//! horizontally then vertically, and added back on top of the scene
//! scaled by the intensity knob.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::assets;

/// Offscreen scene format used whenever the bloom chain is active.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct BloomUniforms {
    intensity: f32,
    threshold: f32,
    smoothing: f32,
    _padding: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct BlurUniforms {
    direction: [f32; 2],
    _padding: [f32; 2],
}

struct BloomTargets {
    scene_view: wgpu::TextureView,
    bright_view: wgpu::TextureView,
    blur_a_view: wgpu::TextureView,
    blur_b_view: wgpu::TextureView,
    bright_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
    composite_bind_group: wgpu::BindGroup,
}

pub struct BloomPass {
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    bright_layout: wgpu::BindGroupLayout,
    blur_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bloom_uniform_buffer: wgpu::Buffer,
    blur_h_buffer: wgpu::Buffer,
    blur_v_buffer: wgpu::Buffer,
    targets: BloomTargets,
}

impl BloomPass {
    /// Returns `None` when the bloom shader cannot be fetched; the
    /// caller then renders the scene straight to the surface.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shader_dir: &Path,
    ) -> Option<Self> {
        let shader = assets::load_shader(device, shader_dir, "bloom.wgsl")?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bloom_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Bloom Uniform Buffer"),
            size: std::mem::size_of::<BloomUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let blur_buffer = |label, direction| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[BlurUniforms {
                    direction,
                    _padding: [0.0; 2],
                }]),
                usage: wgpu::BufferUsages::UNIFORM,
            })
        };
        let blur_h_buffer = blur_buffer("Blur H Uniform Buffer", [1.0, 0.0]);
        let blur_v_buffer = blur_buffer("Blur V Uniform Buffer", [0.0, 1.0]);

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bright_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bright Pass Layout"),
            entries: &[texture_entry(0), sampler_entry, uniform_entry(2)],
        });
        let blur_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blur Pass Layout"),
            entries: &[texture_entry(0), sampler_entry, uniform_entry(3)],
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Pass Layout"),
            entries: &[
                texture_entry(0),
                sampler_entry,
                uniform_entry(2),
                texture_entry(4),
            ],
        });

        let make_pipeline = |label: &str,
                             layout: &wgpu::BindGroupLayout,
                             entry: &str,
                             format: wgpu::TextureFormat| {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[layout],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_fullscreen"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let bright_pipeline =
            make_pipeline("Bright Pipeline", &bright_layout, "fs_bright", HDR_FORMAT);
        let blur_pipeline = make_pipeline("Blur Pipeline", &blur_layout, "fs_blur", HDR_FORMAT);
        let composite_pipeline = make_pipeline(
            "Composite Pipeline",
            &composite_layout,
            "fs_composite",
            surface_format,
        );

        let targets = Self::create_targets(
            device,
            &bright_layout,
            &blur_layout,
            &composite_layout,
            &sampler,
            &bloom_uniform_buffer,
            &blur_h_buffer,
            &blur_v_buffer,
            width,
            height,
        );

        Some(Self {
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            bright_layout,
            blur_layout,
            composite_layout,
            sampler,
            bloom_uniform_buffer,
            blur_h_buffer,
            blur_v_buffer,
            targets,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn create_targets(
        device: &wgpu::Device,
        bright_layout: &wgpu::BindGroupLayout,
        blur_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        bloom_uniform_buffer: &wgpu::Buffer,
        blur_h_buffer: &wgpu::Buffer,
        blur_v_buffer: &wgpu::Buffer,
        width: u32,
        height: u32,
    ) -> BloomTargets {
        let make_texture = |label: &str, w: u32, h: u32| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: w.max(1),
                        height: h.max(1),
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: HDR_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let scene_view = make_texture("Scene HDR Texture", width, height);
        // Blur chain runs at half resolution.
        let (hw, hh) = (width / 2, height / 2);
        let bright_view = make_texture("Bright Texture", hw, hh);
        let blur_a_view = make_texture("Blur A Texture", hw, hh);
        let blur_b_view = make_texture("Blur B Texture", hw, hh);

        let bright_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bright Bind Group"),
            layout: bright_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: bloom_uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let blur_group = |label, source: &wgpu::TextureView, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: blur_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let blur_h_bind_group = blur_group("Blur H Bind Group", &bright_view, blur_h_buffer);
        let blur_v_bind_group = blur_group("Blur V Bind Group", &blur_a_view, blur_v_buffer);

        let composite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: bloom_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&blur_b_view),
                },
            ],
        });

        BloomTargets {
            scene_view,
            bright_view,
            blur_a_view,
            blur_b_view,
            bright_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
            composite_bind_group,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets = Self::create_targets(
            device,
            &self.bright_layout,
            &self.blur_layout,
            &self.composite_layout,
            &self.sampler,
            &self.bloom_uniform_buffer,
            &self.blur_h_buffer,
            &self.blur_v_buffer,
            width,
            height,
        );
    }

    /// Offscreen HDR view the scene passes should render into.
    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.targets.scene_view
    }

    pub fn update(&self, queue: &wgpu::Queue, intensity: f32, threshold: f32, smoothing: f32) {
        queue.write_buffer(
            &self.bloom_uniform_buffer,
            0,
            bytemuck::cast_slice(&[BloomUniforms {
                intensity,
                threshold,
                smoothing,
                _padding: 0.0,
            }]),
        );
    }

    /// Encode bright-pass, blur and composite into `surface_view`.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let steps: [(&wgpu::RenderPipeline, &wgpu::BindGroup, &wgpu::TextureView); 4] = [
            (
                &self.bright_pipeline,
                &self.targets.bright_bind_group,
                &self.targets.bright_view,
            ),
            (
                &self.blur_pipeline,
                &self.targets.blur_h_bind_group,
                &self.targets.blur_a_view,
            ),
            (
                &self.blur_pipeline,
                &self.targets.blur_v_bind_group,
                &self.targets.blur_b_view,
            ),
            (
                &self.composite_pipeline,
                &self.targets.composite_bind_group,
                surface_view,
            ),
        ];

        for (pipeline, bind_group, target) in steps {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Bloom Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }
}
