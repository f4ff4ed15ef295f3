use crate::constants::VIEW_Z_CLEAR;
use wavefield_core::{Error, Hsl, Session};
use web_sys as web;

mod helpers;
mod lines;
mod post;
mod targets;

use lines::{create_lines_resources, LinesResources};
use post::{create_post_resources, PostBindGroups, PostResources, PostUniforms};
use targets::RenderTargets;

// Shaders bundled as string constants
static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");
static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    // sRGB view of the swapchain; the post chain works in linear colour
    view_format: wgpu::TextureFormat,
    lines: LinesResources,
    post: PostResources,
    targets: RenderTargets,
    bind_groups: PostBindGroups,
    linear_sampler: wgpu::Sampler,
}

impl GpuState {
    /// Acquire a WebGPU device for `canvas` and build every pass for the session.
    ///
    /// Any failure here means the host cannot render the field at all.
    pub async fn new(canvas: &web::HtmlCanvasElement, session: &Session) -> anyhow::Result<Self> {
        let (width, height) = session.pipeline.size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| Error::RenderingUnavailable(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::RenderingUnavailable("no WebGPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| Error::RenderingUnavailable(format!("request_device: {e}")))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| Error::RenderingUnavailable("surface has no formats".into()))?;
        let view_format = format.add_srgb_suffix();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: if view_format == format {
                vec![]
            } else {
                vec![view_format]
            },
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] adapter={} surface={:?} view={:?} size={}x{}",
            adapter.get_info().name,
            format,
            view_format,
            width,
            height
        );

        let lines_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lines_shader"),
            source: wgpu::ShaderSource::Wgsl(LINES_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let lines = create_lines_resources(&device, &lines_shader, &session.field);
        let post = create_post_resources(&device, &post_shader, view_format);
        let targets = RenderTargets::new(&device, width, height);
        let bind_groups = PostBindGroups::new(&device, &post, &linear_sampler, &targets);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            view_format,
            lines,
            post,
            targets,
            bind_groups,
            linear_sampler,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            // Recreate offscreen render targets and dependent bind groups
            self.targets = RenderTargets::new(&self.device, width, height);
            self.bind_groups =
                PostBindGroups::new(&self.device, &self.post, &self.linear_sampler, &self.targets);
            log::debug!("[gpu] resized targets to {}x{}", width, height);
        }
    }

    /// Reconfigure after the surface was lost or went stale.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame: lines, then every post stage in pipeline order.
    pub fn render(&mut self, session: &Session, time: f32) -> Result<(), wgpu::SurfaceError> {
        let (width, height) = session.pipeline.size();
        self.resize_if_needed(width, height);

        self.lines.write(&self.queue, &session.camera, &session.field);
        let base = PostUniforms::from_pipeline(&session.pipeline, time, session.camera.aspect);
        let bloom_size = self.targets.bloom_size();
        post::write_post_uniforms(&self.queue, &self.post.uniforms, &base);
        post::write_post_uniforms(
            &self.queue,
            &self.post.blur_h_uniforms,
            &base.with_blur([1.0, 0.0], bloom_size),
        );
        post::write_post_uniforms(
            &self.queue,
            &self.post.blur_v_uniforms,
            &base.with_blur([0.0, 1.0], bloom_size),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: lines over the fading background, colour + view z
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.scene_color,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear_color(session.background())),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.scene_view_z,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(VIEW_Z_CLEAR),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                ],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.lines.draw(&mut rpass);
        }

        let bg = &self.bind_groups;
        let p = &self.post;
        let t = &self.targets;

        // Pass 2: afterimage blend against last frame, then keep it as history
        post::blit(
            &mut encoder,
            "afterimage",
            &t.afterimage,
            &p.afterimage_pipeline,
            &bg.scene_color,
            Some(&bg.history),
        );
        t.copy_afterimage_to_history(&mut encoder);

        // Pass 3: bloom = bright pass, separable blur, additive composite
        post::blit(
            &mut encoder,
            "bloom_bright",
            &t.bloom_a,
            &p.bright_pipeline,
            &bg.afterimage,
            None,
        );
        post::blit(
            &mut encoder,
            "bloom_blur_h",
            &t.bloom_b,
            &p.blur_pipeline,
            &bg.bloom_a_blur_h,
            None,
        );
        post::blit(
            &mut encoder,
            "bloom_blur_v",
            &t.bloom_a,
            &p.blur_pipeline,
            &bg.bloom_b_blur_v,
            None,
        );
        post::blit(
            &mut encoder,
            "bloom_composite",
            &t.bloom_out,
            &p.bloom_composite_pipeline,
            &bg.afterimage,
            Some(&bg.bloom_a_aux),
        );

        // Pass 4: depth of field driven by view z
        post::blit(
            &mut encoder,
            "depth_of_field",
            &t.dof_out,
            &p.dof_pipeline,
            &bg.bloom_out,
            Some(&bg.view_z_aux),
        );

        // Pass 5: film grain to the swapchain
        post::blit(
            &mut encoder,
            "film_grain",
            &view,
            &p.film_pipeline,
            &bg.dof_out,
            None,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Background as a linear clear colour for the HDR scene target.
fn clear_color(background: Hsl) -> wgpu::Color {
    let [r, g, b] = background.to_rgb().map(srgb_to_linear);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
