//! Interface to the rasterizer core the device drives.
//!
//! The device never rasterizes. It keeps state, resolves bindings, and forwards everything a draw
//! needs through [`Pipeline`]. The generic blit entry points have default implementations backed
//! by [`SoftwareBlitter`], so a pipeline only overrides them when it has a faster converter.

use std::fmt;
use std::sync::Arc;

use crate::blit::software::SoftwareBlitter;
use crate::rect::{Rect, SliceRect, SliceRectF};
use crate::state::{ColorWriteMask, DrawType, RenderState};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

/// A compiled shader as seen by the device.
pub trait ShaderProgram: fmt::Debug + Send + Sync {
    /// Number of leading constant registers the shader defines at compile time.
    ///
    /// Binding the shader re-asserts those registers, so they count as dirty for the next flush.
    fn defined_constants(&self) -> usize;
}

/// Float viewport forwarded to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineViewport {
    pub x0: f32,
    pub y0: f32,
    pub width: f32,
    pub height: f32,
    pub min_z: f32,
    pub max_z: f32,
}

pub trait Pipeline {
    fn set_render_target(&mut self, index: usize, surface: Option<Arc<Surface>>);
    fn set_depth_buffer(&mut self, surface: Option<Arc<Surface>>);
    fn set_stencil_buffer(&mut self, surface: Option<Arc<Surface>>);

    fn set_viewport(&mut self, viewport: PipelineViewport);
    fn set_scissor(&mut self, rect: Rect);

    fn set_shader(&mut self, stage: ShaderStage, shader: Option<Arc<dyn ShaderProgram>>);
    fn set_shader_constants(&mut self, stage: ShaderStage, start: usize, vectors: &[[f32; 4]]);

    fn clear_index_buffer(&mut self);
    fn draw(
        &mut self,
        state: &RenderState,
        draw_type: DrawType,
        index_offset: u32,
        primitive_count: u32,
    );

    /// Block until all previously submitted work has completed.
    fn synchronize(&mut self);

    /// Format-converting, optionally filtered blit. `dest` edges may be swapped to request a
    /// flip on that axis.
    fn blit(
        &mut self,
        source: &Surface,
        source_rect: SliceRectF,
        dest: &Surface,
        dest_rect: SliceRect,
        filter: bool,
        stencil: bool,
    ) {
        SoftwareBlitter.blit(source, source_rect, dest, dest_rect, filter, stencil);
    }

    /// Whole-volume blit between surfaces of possibly different extents and formats.
    fn blit_3d(&mut self, source: &Surface, dest: &Surface) {
        SoftwareBlitter.blit_3d(source, dest);
    }

    /// Fill `rect` of `dest` with `rgba`, converted to the surface format, writing only the
    /// channels in `mask`.
    fn clear(&mut self, rgba: [f32; 4], dest: &Surface, rect: Rect, mask: ColorWriteMask) {
        SoftwareBlitter.clear(rgba, dest, rect, mask);
    }
}
