//! Render-target, depth and stencil slots.
//!
//! Every slot holds a strong reference to its surface. While a surface is bound, the slot
//! accounts for exactly one strong count on it; an empty slot accounts for none.

use std::sync::Arc;

use tracing::debug;

use crate::error::DeviceError;
use crate::rect::Rect;
use crate::state::RenderState;
use crate::surface::Surface;

/// Number of simultaneous color render targets.
pub const RENDER_TARGETS: usize = 8;

#[derive(Debug, Default)]
pub struct TargetBindings {
    render_targets: [Option<Arc<Surface>>; RENDER_TARGETS],
    depth: Option<Arc<Surface>>,
    stencil: Option<Arc<Surface>>,
}

impl TargetBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `surface` to color slot `index`.
    ///
    /// Color slots are re-applied even when the surface is already bound there.
    pub fn set_render_target(
        &mut self,
        index: usize,
        surface: Option<&Arc<Surface>>,
    ) -> Result<(), DeviceError> {
        let slot = self.render_targets.get_mut(index).ok_or(
            DeviceError::RenderTargetIndexOutOfRange {
                index,
                max: RENDER_TARGETS - 1,
            },
        )?;
        debug!(index, bound = surface.is_some(), "set render target");
        rebind(slot, surface);
        Ok(())
    }

    /// Bind the depth target. Returns `false` if `surface` is already bound there.
    pub fn set_depth_buffer(&mut self, surface: Option<&Arc<Surface>>) -> bool {
        if same_binding(self.depth.as_ref(), surface) {
            return false;
        }
        debug!(bound = surface.is_some(), "set depth buffer");
        rebind(&mut self.depth, surface);
        true
    }

    /// Bind the stencil target. Returns `false` if `surface` is already bound there.
    pub fn set_stencil_buffer(&mut self, surface: Option<&Arc<Surface>>) -> bool {
        if same_binding(self.stencil.as_ref(), surface) {
            return false;
        }
        debug!(bound = surface.is_some(), "set stencil buffer");
        rebind(&mut self.stencil, surface);
        true
    }

    pub fn render_target(&self, index: usize) -> Option<&Arc<Surface>> {
        self.render_targets.get(index).and_then(Option::as_ref)
    }

    pub fn depth_buffer(&self) -> Option<&Arc<Surface>> {
        self.depth.as_ref()
    }

    pub fn stencil_buffer(&self) -> Option<&Arc<Surface>> {
        self.stencil.as_ref()
    }

    /// Bound color targets with their slot index.
    pub fn render_targets(&self) -> impl Iterator<Item = (usize, &Arc<Surface>)> {
        self.render_targets
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (i, s)))
    }

    /// Every bound surface: color slots, then depth, then stencil.
    pub fn bound_surfaces(&self) -> impl Iterator<Item = &Arc<Surface>> {
        self.render_targets
            .iter()
            .chain(std::iter::once(&self.depth))
            .chain(std::iter::once(&self.stencil))
            .filter_map(Option::as_ref)
    }

    /// Effective clip rectangle for a draw.
    ///
    /// Starts from the scissor rectangle when scissoring is enabled, otherwise from the
    /// viewport, and intersects it with the bounds of every bound target. Returns `None` when
    /// the viewport has no area or the enabled scissor is degenerate; the draw is then skipped.
    pub fn resolve_clip_rectangle(&self, state: &RenderState) -> Option<Rect> {
        let viewport = &state.viewport;
        if viewport.width <= 0 || viewport.height <= 0 {
            return None;
        }

        let mut clip = if state.scissor_enable {
            let scissor = state.scissor_rect;
            if scissor.x0 >= scissor.x1 || scissor.y0 >= scissor.y1 {
                return None;
            }
            scissor
        } else {
            viewport.rect()
        };

        for surface in self.bound_surfaces() {
            clip = clip.intersect(&surface.rect());
        }
        Some(clip)
    }
}

fn same_binding(current: Option<&Arc<Surface>>, incoming: Option<&Arc<Surface>>) -> bool {
    match (current, incoming) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Replace `slot` with `surface`, taking the new reference before the old one is released.
fn rebind(slot: &mut Option<Arc<Surface>>, surface: Option<&Arc<Surface>>) {
    let incoming = surface.map(Arc::clone);
    let outgoing = std::mem::replace(slot, incoming);
    drop(outgoing);
}
