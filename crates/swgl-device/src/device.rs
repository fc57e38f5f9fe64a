//! The device context: render state, target bindings and shader constants on top of a
//! [`Pipeline`].

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::binder::TargetBindings;
use crate::blit::{self, CopyFlags};
use crate::config::DeviceConfig;
use crate::constants::ShaderConstants;
use crate::error::DeviceError;
use crate::format::Format;
use crate::pipeline::{Pipeline, PipelineViewport, ShaderProgram, ShaderStage};
use crate::rect::{Rect, SliceRect};
use crate::state::{
    AddressAxis, AddressMode, ClipFlags, ColorWriteMask, DrawType, FilterType, MipmapFilter,
    RenderState, SamplerState, SamplerType, Viewport, MAX_CLIP_PLANES,
};
use crate::stats::{BlitStats, BlitStatsSnapshot};
use crate::surface::{Surface, SurfaceDesc};

#[derive(Debug)]
pub struct Device<P: Pipeline> {
    pipeline: P,
    config: DeviceConfig,
    state: RenderState,
    bindings: TargetBindings,
    constants: ShaderConstants,
    stats: BlitStats,
}

impl<P: Pipeline> Device<P> {
    pub fn new(pipeline: P) -> Self {
        Self::with_config(pipeline, DeviceConfig::default())
    }

    pub fn with_config(pipeline: P, config: DeviceConfig) -> Self {
        debug!(?config, "creating device");
        Self {
            pipeline,
            config,
            state: RenderState::default(),
            bindings: TargetBindings::new(),
            constants: ShaderConstants::new(),
            stats: BlitStats::new(),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// Direct access to the fixed-function state. Every field is a plain value, so edits here
    /// take effect on the next draw.
    pub fn render_state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    pub fn bindings(&self) -> &TargetBindings {
        &self.bindings
    }

    pub fn constants(&self) -> &ShaderConstants {
        &self.constants
    }

    pub fn blit_stats(&self) -> BlitStatsSnapshot {
        self.stats.snapshot()
    }

    // ---------------------------------------------------------------------
    // Viewport, scissor, samplers, clip planes
    // ---------------------------------------------------------------------

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    pub fn set_scissor_enable(&mut self, enable: bool) {
        self.state.scissor_enable = enable;
    }

    pub fn set_scissor_rect(&mut self, rect: Rect) {
        self.state.scissor_rect = rect;
    }

    pub fn sampler_state(
        &self,
        kind: SamplerType,
        index: usize,
    ) -> Result<&SamplerState, DeviceError> {
        self.state
            .samplers(kind)
            .get(index)
            .ok_or(DeviceError::SamplerIndexOutOfRange {
                kind: kind.name(),
                index,
                max: kind.count() - 1,
            })
    }

    fn sampler_mut(
        &mut self,
        kind: SamplerType,
        index: usize,
    ) -> Result<&mut SamplerState, DeviceError> {
        self.state
            .samplers_mut(kind)
            .get_mut(index)
            .ok_or(DeviceError::SamplerIndexOutOfRange {
                kind: kind.name(),
                index,
                max: kind.count() - 1,
            })
            .inspect_err(|err| warn!(%err, "sampler state rejected"))
    }

    pub fn set_address_mode(
        &mut self,
        kind: SamplerType,
        index: usize,
        axis: AddressAxis,
        mode: AddressMode,
    ) -> Result<(), DeviceError> {
        self.sampler_mut(kind, index)?.set_address_mode(axis, mode);
        Ok(())
    }

    pub fn set_texture_filter(
        &mut self,
        kind: SamplerType,
        index: usize,
        filter: FilterType,
    ) -> Result<(), DeviceError> {
        self.sampler_mut(kind, index)?.filter = filter;
        Ok(())
    }

    pub fn set_mipmap_filter(
        &mut self,
        kind: SamplerType,
        index: usize,
        filter: MipmapFilter,
    ) -> Result<(), DeviceError> {
        self.sampler_mut(kind, index)?.mipmap_filter = filter;
        Ok(())
    }

    pub fn set_mipmap_lod(
        &mut self,
        kind: SamplerType,
        index: usize,
        bias: f32,
    ) -> Result<(), DeviceError> {
        self.sampler_mut(kind, index)?.mipmap_lod = bias;
        Ok(())
    }

    /// `color` is packed `0xAARRGGBB`.
    pub fn set_border_color(
        &mut self,
        kind: SamplerType,
        index: usize,
        color: u32,
    ) -> Result<(), DeviceError> {
        self.sampler_mut(kind, index)?.border_color = color;
        Ok(())
    }

    pub fn set_clip_flags(&mut self, flags: ClipFlags) {
        self.state.clip_flags = flags;
    }

    pub fn set_clip_plane(&mut self, index: usize, plane: [f32; 4]) -> Result<(), DeviceError> {
        let slot = self
            .state
            .clip_planes
            .get_mut(index)
            .ok_or(DeviceError::ClipPlaneIndexOutOfRange {
                index,
                max: MAX_CLIP_PLANES - 1,
            })
            .inspect_err(|err| warn!(%err, "clip plane rejected"))?;
        *slot = plane;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Targets
    // ---------------------------------------------------------------------

    pub fn set_render_target(
        &mut self,
        index: usize,
        surface: Option<&Arc<Surface>>,
    ) -> Result<(), DeviceError> {
        self.bindings
            .set_render_target(index, surface)
            .inspect_err(|err| warn!(%err, "render target rejected"))?;
        self.pipeline.set_render_target(index, surface.cloned());
        Ok(())
    }

    pub fn set_depth_buffer(&mut self, surface: Option<&Arc<Surface>>) {
        if self.bindings.set_depth_buffer(surface) {
            self.pipeline.set_depth_buffer(surface.cloned());
        }
    }

    pub fn set_stencil_buffer(&mut self, surface: Option<&Arc<Surface>>) {
        if self.bindings.set_stencil_buffer(surface) {
            self.pipeline.set_stencil_buffer(surface.cloned());
        }
    }

    // ---------------------------------------------------------------------
    // Shaders
    // ---------------------------------------------------------------------

    pub fn set_pixel_shader(&mut self, shader: Option<Arc<dyn ShaderProgram>>) {
        self.constants
            .stage_mut(ShaderStage::Pixel)
            .set_shader(shader);
    }

    pub fn set_vertex_shader(&mut self, shader: Option<Arc<dyn ShaderProgram>>) {
        self.constants
            .stage_mut(ShaderStage::Vertex)
            .set_shader(shader);
    }

    pub fn set_pixel_shader_constants(&mut self, start: usize, vectors: &[[f32; 4]]) {
        self.constants
            .stage_mut(ShaderStage::Pixel)
            .set_constants(start, vectors);
    }

    pub fn set_vertex_shader_constants(&mut self, start: usize, vectors: &[[f32; 4]]) {
        self.constants
            .stage_mut(ShaderStage::Vertex)
            .set_constants(start, vectors);
    }

    // ---------------------------------------------------------------------
    // Draws
    // ---------------------------------------------------------------------

    /// Push the clip rectangle, viewport and dirty shader state to the pipeline.
    ///
    /// Returns `false` when the viewport or enabled scissor has no area; nothing is forwarded
    /// in that case.
    pub fn bind_resources(&mut self) -> bool {
        let Some(clip) = self.bindings.resolve_clip_rectangle(&self.state) else {
            debug!(viewport = ?self.state.viewport, "zero-area target region, skipping draw");
            return false;
        };

        self.pipeline.set_scissor(clip);
        let vp = &self.state.viewport;
        self.pipeline.set_viewport(PipelineViewport {
            x0: vp.x0 as f32,
            y0: vp.y0 as f32,
            width: vp.width as f32,
            height: vp.height as f32,
            min_z: vp.min_z,
            max_z: vp.max_z,
        });
        self.constants.flush(&mut self.pipeline);
        true
    }

    pub fn draw_indexed_primitive(
        &mut self,
        draw_type: DrawType,
        index_offset: u32,
        primitive_count: u32,
    ) {
        if !self.bind_resources() || primitive_count == 0 {
            return;
        }
        debug!(%draw_type, index_offset, primitive_count, "draw indexed");
        self.pipeline
            .draw(&self.state, draw_type, index_offset, primitive_count);
    }

    pub fn draw_primitive(&mut self, draw_type: DrawType, primitive_count: u32) {
        if !self.bind_resources() || primitive_count == 0 {
            return;
        }
        self.pipeline.clear_index_buffer();
        debug!(%draw_type, primitive_count, "draw");
        self.pipeline.draw(&self.state, draw_type, 0, primitive_count);
    }

    // ---------------------------------------------------------------------
    // Clears
    // ---------------------------------------------------------------------

    fn scissored(&self, rect: Rect) -> Rect {
        if self.state.scissor_enable {
            rect.intersect(&self.state.scissor_rect)
        } else {
            rect
        }
    }

    /// Fill every bound color target with `rgba`, restricted to the scissor when enabled.
    pub fn clear_color(&mut self, rgba: [f32; 4], mask: ColorWriteMask) {
        if mask.is_empty() {
            return;
        }
        for (index, target) in self.bindings.render_targets() {
            let rect = self.scissored(target.rect());
            debug!(index, %rect, ?mask, "clear color");
            self.pipeline.clear(rgba, target, rect, mask);
        }
    }

    /// Fill the depth target with `z`, clamped to `[0, 1]`.
    pub fn clear_depth(&mut self, z: f32) {
        let Some(target) = self.bindings.depth_buffer() else {
            return;
        };
        let z = z.clamp(0.0, 1.0);
        let rect = self.scissored(target.rect());
        debug!(z, %rect, "clear depth");
        target.clear_depth(z, rect);
    }

    /// Replace the stencil bits selected by `mask` with `value`. Only the low 8 bits are used.
    pub fn clear_stencil(&mut self, value: u32, mask: u32) {
        let Some(target) = self.bindings.stencil_buffer() else {
            return;
        };
        let rect = self.scissored(target.rect());
        debug!(value, mask, %rect, "clear stencil");
        target.clear_stencil(value as u8, mask as u8, rect);
    }

    // ---------------------------------------------------------------------
    // Surfaces
    // ---------------------------------------------------------------------

    fn check_surface_size(&self, width: u32, height: u32) -> Result<(), DeviceError> {
        if height <= self.config.max_surface_height {
            return Ok(());
        }
        let err = DeviceError::SurfaceTooLarge {
            width,
            height,
            max_height: self.config.max_surface_height,
        };
        warn!(%err, "surface creation rejected");
        Err(err)
    }

    fn allocate(desc: SurfaceDesc) -> Result<Arc<Surface>, DeviceError> {
        match Surface::new(desc) {
            Ok(surface) => Ok(Arc::new(surface)),
            Err(err @ DeviceError::OutOfMemory { .. }) => {
                error!(%err, ?desc, "surface allocation failed");
                Err(err)
            }
            Err(err) => {
                warn!(%err, ?desc, "surface creation rejected");
                Err(err)
            }
        }
    }

    pub fn create_render_target(
        &self,
        width: u32,
        height: u32,
        format: Format,
        samples: u32,
        lockable: bool,
    ) -> Result<Arc<Surface>, DeviceError> {
        self.check_surface_size(width, height)?;
        let desc = SurfaceDesc::new(width, height, format)
            .with_samples(samples)
            .with_lockable(lockable);
        let surface = Self::allocate(desc)?;
        debug!(width, height, ?format, samples, lockable, "created render target");
        Ok(surface)
    }

    /// Create a depth and/or stencil surface. Lockability follows from the format.
    ///
    /// `discard` only affects logging; contents of a fresh surface are always zero.
    pub fn create_depth_stencil_surface(
        &self,
        width: u32,
        height: u32,
        format: Format,
        samples: u32,
        discard: bool,
    ) -> Result<Arc<Surface>, DeviceError> {
        self.check_surface_size(width, height)?;
        if format.is_color() {
            let err = DeviceError::NotDepthStencil(format);
            warn!(%err, "depth-stencil creation rejected");
            return Err(err);
        }

        let lockable = format.depth_stencil_lockable();
        let desc = SurfaceDesc::new(width, height, format)
            .with_samples(samples)
            .with_lockable(lockable);
        let surface = Self::allocate(desc)?;
        debug!(
            width,
            height,
            ?format,
            samples,
            lockable,
            discard,
            "created depth-stencil surface"
        );
        Ok(surface)
    }

    // ---------------------------------------------------------------------
    // Copies
    // ---------------------------------------------------------------------

    /// Copy a rectangle between two surfaces, clamping, flipping, scaling and converting as
    /// needed. Inverted rectangle edges request a mirror on that axis. A missing rectangle
    /// means the whole surface at slice 0.
    ///
    /// Nothing is written unless the whole copy validates.
    pub fn copy_region(
        &mut self,
        source: Option<&Surface>,
        source_rect: Option<SliceRect>,
        dest: Option<&Surface>,
        dest_rect: Option<SliceRect>,
        flags: CopyFlags,
    ) -> Result<(), DeviceError> {
        blit::copy_region(
            &mut self.pipeline,
            &self.config,
            &self.stats,
            source,
            source_rect,
            dest,
            dest_rect,
            flags,
        )
    }

    /// Copy every slice of a color volume, resampling when the extents differ.
    pub fn copy_volume(
        &mut self,
        source: Option<&Surface>,
        dest: Option<&Surface>,
    ) -> Result<(), DeviceError> {
        blit::copy_volume(&mut self.pipeline, &self.config, &self.stats, source, dest)
    }

    /// Block until the pipeline has finished all submitted work.
    pub fn finish(&mut self) {
        self.pipeline.synchronize();
    }
}
