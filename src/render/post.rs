use super::helpers;
use super::targets::RenderTargets;
use crate::constants::HDR_FORMAT;
use wavefield_core::RenderPipeline;

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    time: f32,
    damp: f32,
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    bloom_radius: f32,
    focus: f32,
    aperture: f32,
    max_blur: f32,
    grain: f32,
    aspect: f32,
    _pad: [f32; 2],
}

impl PostUniforms {
    /// Fill from the session's stage settings.
    pub(crate) fn from_pipeline(pipeline: &RenderPipeline, time: f32, aspect: f32) -> Self {
        let (w, h) = pipeline.size();
        let bloom = pipeline.bloom().unwrap_or_default();
        let dof = pipeline.depth_of_field().unwrap_or_default();
        Self {
            resolution: [w as f32, h as f32],
            time,
            damp: pipeline.afterimage_damp().unwrap_or(0.0),
            blur_dir: [0.0, 0.0],
            bloom_strength: bloom.strength,
            threshold: bloom.threshold,
            bloom_radius: bloom.radius,
            focus: dof.focus,
            aperture: dof.aperture,
            max_blur: dof.max_blur,
            grain: pipeline.film_grain().unwrap_or(0.0),
            aspect,
            _pad: [0.0; 2],
        }
    }

    pub(crate) fn with_blur(mut self, dir: [f32; 2], resolution: (u32, u32)) -> Self {
        self.blur_dir = dir;
        self.resolution = [resolution.0 as f32, resolution.1 as f32];
        self
    }
}

/// Pipelines and uniform buffers for every fullscreen pass.
///
/// Each blur direction gets its own uniform buffer: all passes are recorded
/// into one encoder, so a buffer rewritten between passes would only ever
/// show its last value.
pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) uniforms: wgpu::Buffer,
    pub(crate) blur_h_uniforms: wgpu::Buffer,
    pub(crate) blur_v_uniforms: wgpu::Buffer,
    pub(crate) afterimage_pipeline: wgpu::RenderPipeline,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) bloom_composite_pipeline: wgpu::RenderPipeline,
    pub(crate) dof_pipeline: wgpu::RenderPipeline,
    pub(crate) film_pipeline: wgpu::RenderPipeline,
}

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<PostUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let [tex, sampler] = helpers::texture_sampler_entries();
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            tex,
            sampler,
            helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &helpers::texture_sampler_entries(),
    });
    let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_single"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_pair = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_pair"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let make = |label, layout, entry, format| {
        helpers::make_post_pipeline(device, label, layout, post_shader, entry, format)
    };

    PostResources {
        uniforms: uniform_buffer(device, "post_uniforms"),
        blur_h_uniforms: uniform_buffer(device, "post_uniforms_blur_h"),
        blur_v_uniforms: uniform_buffer(device, "post_uniforms_blur_v"),
        afterimage_pipeline: make("afterimage", &pl_pair, "fs_afterimage", HDR_FORMAT),
        bright_pipeline: make("bloom_bright", &pl_single, "fs_bright", HDR_FORMAT),
        blur_pipeline: make("bloom_blur", &pl_single, "fs_blur", HDR_FORMAT),
        bloom_composite_pipeline: make(
            "bloom_composite",
            &pl_pair,
            "fs_bloom_composite",
            HDR_FORMAT,
        ),
        dof_pipeline: make("depth_of_field", &pl_pair, "fs_dof", HDR_FORMAT),
        film_pipeline: make("film_grain", &pl_single, "fs_film", swap_format),
        bgl0,
        bgl1,
    }
}

/// Bind groups over the current render targets; rebuilt on resize.
pub(crate) struct PostBindGroups {
    pub(crate) scene_color: wgpu::BindGroup,
    pub(crate) history: wgpu::BindGroup,
    pub(crate) afterimage: wgpu::BindGroup,
    pub(crate) bloom_a_blur_h: wgpu::BindGroup,
    pub(crate) bloom_b_blur_v: wgpu::BindGroup,
    pub(crate) bloom_a_aux: wgpu::BindGroup,
    pub(crate) bloom_out: wgpu::BindGroup,
    pub(crate) view_z_aux: wgpu::BindGroup,
    pub(crate) dof_out: wgpu::BindGroup,
}

impl PostBindGroups {
    pub(crate) fn new(
        device: &wgpu::Device,
        post: &PostResources,
        sampler: &wgpu::Sampler,
        targets: &RenderTargets,
    ) -> Self {
        let with_uniforms = |label, view: &wgpu::TextureView, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &post.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let aux = |label, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &post.bgl1,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        };
        Self {
            scene_color: with_uniforms("bg_scene_color", &targets.scene_color, &post.uniforms),
            history: aux("bg_history", &targets.history),
            afterimage: with_uniforms("bg_afterimage", &targets.afterimage, &post.uniforms),
            bloom_a_blur_h: with_uniforms("bg_bloom_a_blur_h", &targets.bloom_a, &post.blur_h_uniforms),
            bloom_b_blur_v: with_uniforms("bg_bloom_b_blur_v", &targets.bloom_b, &post.blur_v_uniforms),
            bloom_a_aux: aux("bg_bloom_a_aux", &targets.bloom_a),
            bloom_out: with_uniforms("bg_bloom_out", &targets.bloom_out, &post.uniforms),
            view_z_aux: aux("bg_view_z", &targets.scene_view_z),
            dof_out: with_uniforms("bg_dof_out", &targets.dof_out, &post.uniforms),
        }
    }
}

pub(crate) fn write_post_uniforms(queue: &wgpu::Queue, buffer: &wgpu::Buffer, u: &PostUniforms) {
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(u));
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
