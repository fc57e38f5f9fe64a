//! Per-stage shader constant banks with lazy upload.
//!
//! Each stage keeps its float4 registers on the device side plus a dirty high-water mark. A
//! flush pushes `[0, mark)` to the pipeline only when the stage is [`StageSync::Dirty`], then
//! resets the mark to the number of constants the bound shader defines itself, since binding
//! the shader overwrites those registers in the pipeline.

use std::sync::Arc;

use tracing::trace;

use crate::pipeline::{Pipeline, ShaderProgram, ShaderStage};

/// Pixel-stage float4 registers.
pub const FRAGMENT_UNIFORM_VECTORS: usize = 224;
/// Vertex-stage float4 registers.
pub const VERTEX_UNIFORM_VECTORS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSync {
    Clean,
    Dirty,
}

#[derive(Debug)]
pub struct StageConstants {
    stage: ShaderStage,
    values: Vec<[f32; 4]>,
    dirty_mark: usize,
    sync: StageSync,
    shader: Option<Arc<dyn ShaderProgram>>,
}

impl StageConstants {
    /// Zeroed bank sized for `stage`. Every register counts as written, so the first flush
    /// uploads the whole bank.
    pub fn new(stage: ShaderStage) -> Self {
        let capacity = match stage {
            ShaderStage::Pixel => FRAGMENT_UNIFORM_VECTORS,
            ShaderStage::Vertex => VERTEX_UNIFORM_VECTORS,
        };
        let mut bank = Self {
            stage,
            values: Vec::with_capacity(capacity),
            dirty_mark: 0,
            sync: StageSync::Clean,
            shader: None,
        };
        bank.values.resize(capacity, [0.0; 4]);
        let zeros = vec![[0.0; 4]; capacity];
        bank.set_constants(0, &zeros);
        bank
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[[f32; 4]] {
        &self.values
    }

    /// The bank as raw native-endian bytes, 16 per register.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }

    pub fn dirty_mark(&self) -> usize {
        self.dirty_mark
    }

    pub fn sync(&self) -> StageSync {
        self.sync
    }

    pub fn shader(&self) -> Option<&Arc<dyn ShaderProgram>> {
        self.shader.as_ref()
    }

    /// Write `vectors` starting at register `start`. Registers past the bank are dropped.
    pub fn set_constants(&mut self, start: usize, vectors: &[[f32; 4]]) {
        let capacity = self.values.len();
        let end = start.saturating_add(vectors.len()).min(capacity);
        if start < end {
            self.values[start..end].copy_from_slice(&vectors[..end - start]);
        }
        self.dirty_mark = self.dirty_mark.max(end);
        self.sync = StageSync::Dirty;
    }

    /// Bind `shader` (or unbind with `None`). Stored register values are kept either way.
    pub fn set_shader(&mut self, shader: Option<Arc<dyn ShaderProgram>>) {
        self.shader = shader;
        self.sync = StageSync::Dirty;
    }

    pub fn flush<P: Pipeline + ?Sized>(&mut self, pipeline: &mut P) {
        if self.sync == StageSync::Clean {
            return;
        }

        match &self.shader {
            Some(shader) => {
                if self.dirty_mark > 0 {
                    trace!(
                        stage = ?self.stage,
                        count = self.dirty_mark,
                        "uploading shader constants"
                    );
                    pipeline.set_shader_constants(self.stage, 0, &self.values[..self.dirty_mark]);
                }
                pipeline.set_shader(self.stage, Some(Arc::clone(shader)));
                self.dirty_mark = shader.defined_constants().min(self.values.len());
            }
            None => pipeline.set_shader(self.stage, None),
        }

        self.sync = StageSync::Clean;
    }
}

/// Constant banks for both programmable stages.
#[derive(Debug)]
pub struct ShaderConstants {
    pixel: StageConstants,
    vertex: StageConstants,
}

impl Default for ShaderConstants {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderConstants {
    pub fn new() -> Self {
        Self {
            pixel: StageConstants::new(ShaderStage::Pixel),
            vertex: StageConstants::new(ShaderStage::Vertex),
        }
    }

    pub fn stage(&self, stage: ShaderStage) -> &StageConstants {
        match stage {
            ShaderStage::Pixel => &self.pixel,
            ShaderStage::Vertex => &self.vertex,
        }
    }

    pub fn stage_mut(&mut self, stage: ShaderStage) -> &mut StageConstants {
        match stage {
            ShaderStage::Pixel => &mut self.pixel,
            ShaderStage::Vertex => &mut self.vertex,
        }
    }

    pub fn flush<P: Pipeline + ?Sized>(&mut self, pipeline: &mut P) {
        self.pixel.flush(pipeline);
        self.vertex.flush(pipeline);
    }
}
