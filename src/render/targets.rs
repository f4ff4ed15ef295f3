use super::helpers;
use crate::constants::{BLOOM_DOWNSAMPLE, HDR_FORMAT, VIEW_Z_FORMAT};

const SAMPLED: wgpu::TextureUsages = wgpu::TextureUsages::TEXTURE_BINDING;
const ATTACHMENT: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT;

/// Offscreen targets for the post-processing chain.
///
/// - `scene_*` hold the line pass output: colour and view-space z.
/// - `afterimage` is the blended frame; it is copied into `history` after
///   every frame so the next blend can read it.
/// - `bloom_a`/`bloom_b` are reduced-size ping-pong buffers for the bright
///   pass and blur.
/// - `bloom_out` and `dof_out` are full-size results feeding the next pass.
pub(crate) struct RenderTargets {
    _textures: Vec<wgpu::Texture>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) scene_color: wgpu::TextureView,
    pub(crate) scene_view_z: wgpu::TextureView,
    pub(crate) afterimage_tex: wgpu::Texture,
    pub(crate) afterimage: wgpu::TextureView,
    pub(crate) history_tex: wgpu::Texture,
    pub(crate) history: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::TextureView,
    pub(crate) bloom_out: wgpu::TextureView,
    pub(crate) dof_out: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (scene_color_tex, scene_color) = helpers::create_color_texture(
            device,
            "scene_color",
            width,
            height,
            HDR_FORMAT,
            ATTACHMENT | SAMPLED,
        );
        let (scene_view_z_tex, scene_view_z) = helpers::create_color_texture(
            device,
            "scene_view_z",
            width,
            height,
            VIEW_Z_FORMAT,
            ATTACHMENT | SAMPLED,
        );
        let (afterimage_tex, afterimage) = helpers::create_color_texture(
            device,
            "afterimage",
            width,
            height,
            HDR_FORMAT,
            ATTACHMENT | SAMPLED | wgpu::TextureUsages::COPY_SRC,
        );
        let (history_tex, history) = helpers::create_color_texture(
            device,
            "afterimage_history",
            width,
            height,
            HDR_FORMAT,
            SAMPLED | wgpu::TextureUsages::COPY_DST,
        );
        let bw = (width / BLOOM_DOWNSAMPLE).max(1);
        let bh = (height / BLOOM_DOWNSAMPLE).max(1);
        let (bloom_a_tex, bloom_a) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT, ATTACHMENT | SAMPLED);
        let (bloom_b_tex, bloom_b) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT, ATTACHMENT | SAMPLED);
        let (bloom_out_tex, bloom_out) = helpers::create_color_texture(
            device,
            "bloom_out",
            width,
            height,
            HDR_FORMAT,
            ATTACHMENT | SAMPLED,
        );
        let (dof_out_tex, dof_out) = helpers::create_color_texture(
            device,
            "dof_out",
            width,
            height,
            HDR_FORMAT,
            ATTACHMENT | SAMPLED,
        );
        Self {
            _textures: vec![
                scene_color_tex,
                scene_view_z_tex,
                bloom_a_tex,
                bloom_b_tex,
                bloom_out_tex,
                dof_out_tex,
            ],
            width: width.max(1),
            height: height.max(1),
            scene_color,
            scene_view_z,
            afterimage_tex,
            afterimage,
            history_tex,
            history,
            bloom_a,
            bloom_b,
            bloom_out,
            dof_out,
        }
    }

    pub(crate) fn bloom_size(&self) -> (u32, u32) {
        (
            (self.width / BLOOM_DOWNSAMPLE).max(1),
            (self.height / BLOOM_DOWNSAMPLE).max(1),
        )
    }

    /// Carry this frame's blended output over as the next frame's history.
    pub(crate) fn copy_afterimage_to_history(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_texture(
            self.afterimage_tex.as_image_copy(),
            self.history_tex.as_image_copy(),
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}
