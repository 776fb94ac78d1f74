use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::bytes_of;
use glam::{Mat4, Vec3};
use log::info;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use super::common::{CameraParams, GlobalUniform, LightParams, ObjectConstants};
use super::shaders::{model_shader, skybox_shader};
use crate::assets::ExerciseAssets;
use crate::obj::{MeshData, VertexLayout};
use crate::scene::SceneConfig;
use crate::skybox::skybox_mesh;
use crate::texture::{CubemapImages, TextureImage};

/// GPU renderer backed by wgpu that draws one exercise model, optionally inside a skybox.
pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material_bind_group: Option<wgpu::BindGroup>,
    mesh: MeshBuffers,
    skybox: Option<SkyboxPass>,
    clear_color: wgpu::Color,
    // Dropped after the surface that borrows it.
    window: Arc<Window>,
}

impl Renderer {
    /// Initializes the GPU renderer for the window and uploads the exercise's assets.
    pub async fn new(
        window: Arc<Window>,
        scene: &SceneConfig,
        assets: &ExerciseAssets,
    ) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        // SAFETY: the window is owned by the renderer and outlives the surface.
        let surface = unsafe { instance.create_surface(window.as_ref()) }?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;
        info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("renderer-device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let global_layout = uniform_layout::<GlobalUniform>(&device, "global-bind-layout");
        let object_layout = uniform_layout::<ObjectConstants>(&device, "object-bind-layout");

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let constants = ObjectConstants::new(scene.transform.matrix(), scene.color.extend(1.0));
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object-uniform"),
            contents: bytes_of(&constants),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object-bind-group"),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        let layout = assets.mesh.layout;
        let blend = scene.blending.then_some(wgpu::BlendState::ALPHA_BLENDING);
        let (pipeline, material_bind_group) = if layout == VertexLayout::Position {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("flat-pipeline-layout"),
                bind_group_layouts: &[&global_layout, &object_layout],
                push_constant_ranges: &[],
            });
            let pipeline = create_pipeline(
                &device,
                &pipeline_layout,
                &model_shader(layout),
                layout,
                surface_format,
                PassState::model(blend),
            );
            (pipeline, None)
        } else {
            let material_layout = material_layout(&device);
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("material-pipeline-layout"),
                bind_group_layouts: &[&global_layout, &object_layout, &material_layout],
                push_constant_ranges: &[],
            });
            let pipeline = create_pipeline(
                &device,
                &pipeline_layout,
                &model_shader(layout),
                layout,
                surface_format,
                PassState::model(blend),
            );
            let bind_group = material_bind_group(&device, &queue, &material_layout, assets);
            (pipeline, Some(bind_group))
        };

        let mesh = MeshBuffers::from_mesh(&device, &assets.mesh, "model");
        let skybox = assets
            .skybox
            .as_ref()
            .map(|faces| SkyboxPass::new(&device, &queue, &global_layout, surface_format, faces));

        let clear = scene.clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipeline,
            global_buffer,
            global_bind_group,
            object_buffer,
            object_bind_group,
            material_bind_group,
            mesh,
            skybox,
            clear_color: wgpu::Color {
                r: clear.x as f64,
                g: clear.y as f64,
                b: clear.z as f64,
                a: 1.0,
            },
            window,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Updates the camera and lighting uniforms before rendering.
    pub fn update_globals(&self, camera: &CameraParams, light: Option<&LightParams>) {
        let uniform = GlobalUniform::new(camera, light);
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
    }

    /// Updates the model matrix and tint of the drawn mesh.
    pub fn update_object(&self, model: Mat4, color: Vec3) {
        let constants = ObjectConstants::new(model, color.extend(1.0));
        self.queue
            .write_buffer(&self.object_buffer, 0, bytes_of(&constants));
    }

    /// Draws the skybox, if any, followed by the model.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("renderer-encoder"),
            });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("main-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: true,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: true,
                }),
                stencil_ops: None,
            }),
        });

        if let Some(skybox) = &self.skybox {
            pass.set_pipeline(&skybox.pipeline);
            pass.set_bind_group(0, &self.global_bind_group, &[]);
            pass.set_bind_group(1, &skybox.bind_group, &[]);
            skybox.mesh.draw(&mut pass);
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        if let Some(material) = &self.material_bind_group {
            pass.set_bind_group(2, material, &[]);
        }
        self.mesh.draw(&mut pass);

        drop(pass);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Depth and blending configuration of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PassState {
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
    blend: Option<wgpu::BlendState>,
}

impl PassState {
    fn model(blend: Option<wgpu::BlendState>) -> Self {
        Self {
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
            blend,
        }
    }

    /// Drawn behind everything at the far plane without touching the depth buffer.
    fn skybox() -> Self {
        Self {
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            blend: None,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    source: &str,
    vertex_layout: VertexLayout,
    format: wgpu::TextureFormat,
    state: PassState,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("renderer-shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let attributes = vertex_attributes(vertex_layout);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("renderer-pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: vertex_layout.stride(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: state.depth_write,
            depth_compare: state.depth_compare,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: state.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}

/// Vertex attributes for the interleaved layout: position, normal, uv, tangent, bitangent.
fn vertex_attributes(layout: VertexLayout) -> Vec<wgpu::VertexAttribute> {
    use wgpu::VertexFormat::{Float32x2, Float32x3};

    let formats: &[wgpu::VertexFormat] = match layout {
        VertexLayout::Position => &[Float32x3],
        VertexLayout::PositionNormalUv => &[Float32x3, Float32x3, Float32x2],
        VertexLayout::PositionNormalUvTangent => {
            &[Float32x3, Float32x3, Float32x2, Float32x3, Float32x3]
        }
    };
    let mut offset = 0;
    formats
        .iter()
        .enumerate()
        .map(|(location, &format)| {
            let attribute = wgpu::VertexAttribute {
                format,
                offset,
                shader_location: location as u32,
            };
            offset += format.size();
            attribute
        })
        .collect()
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

fn texture_entry(binding: u32, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("material-bind-layout"),
        entries: &[
            texture_entry(0, wgpu::TextureViewDimension::D2),
            texture_entry(1, wgpu::TextureViewDimension::D2),
            sampler_entry(2),
        ],
    })
}

/// Binds the diffuse texture and normal map, substituting white and a flat normal when absent.
fn material_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    assets: &ExerciseAssets,
) -> wgpu::BindGroup {
    let white = TextureImage::solid([255; 4]);
    let flat = TextureImage::flat_normal();
    let diffuse = upload_texture(
        device,
        queue,
        assets.texture.as_ref().unwrap_or(&white),
        wgpu::TextureFormat::Rgba8UnormSrgb,
        "diffuse-texture",
    );
    let normal = upload_texture(
        device,
        queue,
        assets.normal_map.as_ref().unwrap_or(&flat),
        wgpu::TextureFormat::Rgba8Unorm,
        "normal-texture",
    );
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("material-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    let diffuse_view = diffuse.create_view(&wgpu::TextureViewDescriptor::default());
    let normal_view = normal.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("material-bind-group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&normal_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &TextureImage,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_layer(queue, &texture, image, 0);
    texture
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, image: &TextureImage, layer: u32) {
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(image.bytes_per_row()),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}

struct SkyboxPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    mesh: MeshBuffers,
}

impl SkyboxPass {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        global_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
        faces: &CubemapImages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("skybox-texture"),
            size: wgpu::Extent3d {
                width: faces.size,
                height: faces.size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (layer, face) in faces.faces.iter().enumerate() {
            write_layer(queue, &texture, face, layer as u32);
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("skybox-view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("skybox-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox-bind-layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::Cube),
                sampler_entry(1),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox-bind-group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("skybox-pipeline-layout"),
            bind_group_layouts: &[global_layout, &layout],
            push_constant_ranges: &[],
        });
        let pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &skybox_shader(),
            VertexLayout::Position,
            format,
            PassState::skybox(),
        );

        Self {
            pipeline,
            bind_group,
            mesh: MeshBuffers::from_mesh(device, &skybox_mesh(), "skybox"),
        }
    }
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_mesh(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex.slice(..));
        pass.set_index_buffer(self.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_cover_the_stride() {
        for layout in [
            VertexLayout::Position,
            VertexLayout::PositionNormalUv,
            VertexLayout::PositionNormalUvTangent,
        ] {
            let attributes = vertex_attributes(layout);
            let last = attributes.last().unwrap();
            assert_eq!(
                last.offset + last.format.size(),
                layout.stride(),
                "{layout:?}"
            );
        }
    }

    #[test]
    fn tangent_layout_uses_five_locations() {
        let attributes = vertex_attributes(VertexLayout::PositionNormalUvTangent);
        let locations: Vec<u32> = attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2, 3, 4]);
        assert_eq!(attributes[2].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attributes[3].offset, 32);
    }

    #[test]
    fn skybox_never_writes_depth() {
        let sky = PassState::skybox();
        assert!(!sky.depth_write);
        assert_eq!(sky.depth_compare, wgpu::CompareFunction::LessEqual);
        assert!(PassState::model(None).depth_write);
    }
}
