mod camera;
mod shader;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

pub use camera::Camera;
pub use shader::{Uniforms, PARTICLE_SHADER};

use crate::config::BackdropConfig;
use crate::error::GpuError;
use crate::field::ParticleBuffer;
use crate::host::RenderSurface;
use crate::render_loop::FrameParams;
use crate::viewport::ViewportState;

/// Per-field vertex buffers, one `Float32x3` stream each.
struct FieldBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
}

/// wgpu-backed surface drawing the field as additive point sprites.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    field: Option<FieldBuffers>,
    /// Multisampled color target, resolved into the surface texture.
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    camera: Camera,
    aspect: f32,
    point_size: f32,
    clear_color: wgpu::Color,
}

impl GpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        viewport: &ViewportState,
        settings: &BackdropConfig,
    ) -> Result<Self, GpuError> {
        let (width, height) = viewport.backing_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Backdrop Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| GpuError::Unsupported("surface reports no formats".to_string()))?;
        let alpha_mode = if settings.transparent {
            [
                wgpu::CompositeAlphaMode::PreMultiplied,
                wgpu::CompositeAlphaMode::PostMultiplied,
            ]
            .into_iter()
            .find(|mode| surface_caps.alpha_modes.contains(mode))
            .unwrap_or_else(|| {
                log::warn!("Surface cannot composite alpha, background will be opaque");
                wgpu::CompositeAlphaMode::Auto
            })
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let sample_flags = adapter.get_texture_format_features(surface_format).flags;
        let sample_count = if settings.sample_count == 4
            && !sample_flags.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4)
        {
            log::warn!("4x MSAA unsupported for {:?}, rendering without it", surface_format);
            1
        } else {
            settings.sample_count
        };
        log::debug!("MSAA sample count: {}x", sample_count);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let msaa_view = create_msaa_view(&device, &config, sample_count);

        let camera = Camera::from_config(settings);
        let uniforms = Uniforms {
            view_proj: camera
                .model_view_proj(viewport.aspect, glam::Vec3::ZERO)
                .to_cols_array_2d(),
            aspect: viewport.aspect,
            point_size: settings.point_size,
            _padding: [0.0; 2],
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let render_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let vec3_stride = (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

        // Additive: overlapping sprites brighten, depth is neither tested nor written
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: vec3_stride,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // position
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: vec3_stride,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3, // color
                        }],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let [r, g, b, a] = settings.background();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            uniform_buffer,
            uniform_bind_group,
            field: None,
            msaa_view,
            sample_count,
            camera,
            aspect: viewport.aspect,
            point_size: settings.point_size,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.msaa_view = create_msaa_view(&self.device, &self.config, self.sample_count);
    }

    fn update_uniforms(&mut self, frame: &FrameParams) {
        let uniforms = Uniforms {
            view_proj: self
                .camera
                .model_view_proj(self.aspect, frame.rotation)
                .to_cols_array_2d(),
            aspect: self.aspect,
            point_size: self.point_size,
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

impl RenderSurface for GpuRenderer {
    fn upload_field(&mut self, field: &ParticleBuffer) {
        let positions = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Positions"),
                contents: bytemuck::cast_slice(field.positions()),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let colors = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Colors"),
                contents: bytemuck::cast_slice(field.colors()),
                usage: wgpu::BufferUsages::VERTEX,
            });

        if let Some(old) = self.field.replace(FieldBuffers {
            positions,
            colors,
            count: field.len() as u32,
        }) {
            old.positions.destroy();
            old.colors.destroy();
        }
    }

    fn resize(&mut self, viewport: &ViewportState) {
        let (width, height) = viewport.backing_size();
        self.config.width = width;
        self.config.height = height;
        self.aspect = viewport.aspect;
        self.reconfigure();
    }

    fn draw(&mut self, frame: &FrameParams) {
        self.update_uniforms(frame);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => return,
            Err(e) => {
                log::error!("Render error: {:?}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (target, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(&view)),
                None => (&view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(field) = &self.field {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, field.positions.slice(..));
                render_pass.set_vertex_buffer(1, field.colors.slice(..));
                render_pass.draw(0..6, 0..field.count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn release(self) {
        if let Some(field) = &self.field {
            field.positions.destroy();
            field.colors.destroy();
        }
        self.uniform_buffer.destroy();
        // Remaining handles drop in declaration order: surface before device.
    }
}

/// Multisampled render target matching the surface, or `None` without MSAA.
fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Target"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
