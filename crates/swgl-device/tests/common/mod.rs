#![allow(dead_code)]

use std::sync::{Arc, Once};

use swgl_device::state::{ColorWriteMask, DrawType, RenderState};
use swgl_device::{
    Format, Pipeline, PipelineViewport, Rect, ShaderProgram, ShaderStage, SliceRect, SliceRectF,
    SoftwareBlitter, Surface, SurfaceDesc,
};

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug)]
pub struct TestShader {
    pub defined: usize,
}

impl TestShader {
    pub fn new(defined: usize) -> Arc<dyn ShaderProgram> {
        Arc::new(Self { defined })
    }
}

impl ShaderProgram for TestShader {
    fn defined_constants(&self) -> usize {
        self.defined
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetRenderTarget { index: usize, bound: bool },
    SetDepthBuffer { bound: bool },
    SetStencilBuffer { bound: bool },
    SetViewport(PipelineViewport),
    SetScissor(Rect),
    SetShader { stage: ShaderStage, bound: bool },
    SetConstants { stage: ShaderStage, start: usize, count: usize },
    ClearIndexBuffer,
    Draw {
        draw_type: DrawType,
        index_offset: u32,
        primitive_count: u32,
    },
    Synchronize,
    Blit { dest: SliceRect, filter: bool, stencil: bool },
    Blit3d,
    Clear { rect: Rect, mask: ColorWriteMask },
}

/// Pipeline that records every call and performs blits and clears with the software blitter.
#[derive(Debug, Default)]
pub struct RecordingPipeline {
    pub calls: Vec<Call>,
}

impl RecordingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn constant_uploads(&self, stage: ShaderStage) -> Vec<(usize, usize)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetConstants {
                    stage: s,
                    start,
                    count,
                } if *s == stage => Some((*start, *count)),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Draw { .. }))
            .count()
    }
}

impl Pipeline for RecordingPipeline {
    fn set_render_target(&mut self, index: usize, surface: Option<Arc<Surface>>) {
        self.calls.push(Call::SetRenderTarget {
            index,
            bound: surface.is_some(),
        });
    }

    fn set_depth_buffer(&mut self, surface: Option<Arc<Surface>>) {
        self.calls.push(Call::SetDepthBuffer {
            bound: surface.is_some(),
        });
    }

    fn set_stencil_buffer(&mut self, surface: Option<Arc<Surface>>) {
        self.calls.push(Call::SetStencilBuffer {
            bound: surface.is_some(),
        });
    }

    fn set_viewport(&mut self, viewport: PipelineViewport) {
        self.calls.push(Call::SetViewport(viewport));
    }

    fn set_scissor(&mut self, rect: Rect) {
        self.calls.push(Call::SetScissor(rect));
    }

    fn set_shader(&mut self, stage: ShaderStage, shader: Option<Arc<dyn ShaderProgram>>) {
        self.calls.push(Call::SetShader {
            stage,
            bound: shader.is_some(),
        });
    }

    fn set_shader_constants(&mut self, stage: ShaderStage, start: usize, vectors: &[[f32; 4]]) {
        self.calls.push(Call::SetConstants {
            stage,
            start,
            count: vectors.len(),
        });
    }

    fn clear_index_buffer(&mut self) {
        self.calls.push(Call::ClearIndexBuffer);
    }

    fn draw(
        &mut self,
        _state: &RenderState,
        draw_type: DrawType,
        index_offset: u32,
        primitive_count: u32,
    ) {
        self.calls.push(Call::Draw {
            draw_type,
            index_offset,
            primitive_count,
        });
    }

    fn synchronize(&mut self) {
        self.calls.push(Call::Synchronize);
    }

    fn blit(
        &mut self,
        source: &Surface,
        source_rect: SliceRectF,
        dest: &Surface,
        dest_rect: SliceRect,
        filter: bool,
        stencil: bool,
    ) {
        self.calls.push(Call::Blit {
            dest: dest_rect,
            filter,
            stencil,
        });
        SoftwareBlitter.blit(source, source_rect, dest, dest_rect, filter, stencil);
    }

    fn blit_3d(&mut self, source: &Surface, dest: &Surface) {
        self.calls.push(Call::Blit3d);
        SoftwareBlitter.blit_3d(source, dest);
    }

    fn clear(&mut self, rgba: [f32; 4], dest: &Surface, rect: Rect, mask: ColorWriteMask) {
        self.calls.push(Call::Clear { rect, mask });
        SoftwareBlitter.clear(rgba, dest, rect, mask);
    }
}

pub fn surface(width: u32, height: u32, format: Format) -> Arc<Surface> {
    Arc::new(Surface::new(SurfaceDesc::new(width, height, format)).unwrap())
}

/// Surface whose internal plane holds a byte pattern unique per position.
pub fn patterned(width: u32, height: u32, format: Format) -> Arc<Surface> {
    let s = surface(width, height, format);
    s.internal()
        .write(swgl_device::LockMode::WriteOnly, |bytes| {
            for (i, b) in bytes.iter_mut().enumerate() {
                *b = (i * 7 + 3) as u8;
            }
        });
    s
}
