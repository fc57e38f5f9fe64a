use std::sync::atomic::{AtomicU64, Ordering};

use crate::blit::CopyStrategy;

/// Telemetry counters for region and volume copies.
///
/// Counts one entry per copied plane, so a depth+stencil copy bumps two counters.
#[derive(Debug, Default)]
pub struct BlitStats {
    whole_surface: AtomicU64,
    depth_rows: AtomicU64,
    color_rows: AtomicU64,
    generic: AtomicU64,
    volume_rows: AtomicU64,
    volume_generic: AtomicU64,
    rejected: AtomicU64,
}

impl BlitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, strategy: CopyStrategy) {
        let counter = match strategy {
            CopyStrategy::WholeSurface => &self.whole_surface,
            CopyStrategy::DepthRows => &self.depth_rows,
            CopyStrategy::ColorRows => &self.color_rows,
            CopyStrategy::Generic => &self.generic,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_volume_rows(&self) {
        self.volume_rows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_volume_generic(&self) {
        self.volume_generic.fetch_add(1, Ordering::Relaxed);
    }

    /// A copy failed validation before touching any surface.
    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BlitStatsSnapshot {
        BlitStatsSnapshot {
            whole_surface: self.whole_surface.load(Ordering::Relaxed),
            depth_rows: self.depth_rows.load(Ordering::Relaxed),
            color_rows: self.color_rows.load(Ordering::Relaxed),
            generic: self.generic.load(Ordering::Relaxed),
            volume_rows: self.volume_rows.load(Ordering::Relaxed),
            volume_generic: self.volume_generic.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlitStatsSnapshot {
    pub whole_surface: u64,
    pub depth_rows: u64,
    pub color_rows: u64,
    pub generic: u64,
    pub volume_rows: u64,
    pub volume_generic: u64,
    pub rejected: u64,
}

impl BlitStatsSnapshot {
    pub fn total_copies(&self) -> u64 {
        self.whole_surface
            + self.depth_rows
            + self.color_rows
            + self.generic
            + self.volume_rows
            + self.volume_generic
    }
}
