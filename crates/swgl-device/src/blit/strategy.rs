//! Fast-path selection for a single plane of a region copy.

use std::fmt;

use super::geometry::Flip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyStrategy {
    /// One bulk copy of the whole slice.
    WholeSurface,
    /// Raw row copy of depth or stencil data, honoring the flip.
    DepthRows,
    /// Raw row copy of color data, honoring the flip; opaque alpha for the alpha pair.
    ColorRows,
    /// Converting, optionally filtered copy through the pipeline.
    Generic,
}

impl fmt::Display for CopyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CopyStrategy::WholeSurface => "whole_surface",
            CopyStrategy::DepthRows => "depth_rows",
            CopyStrategy::ColorRows => "color_rows",
            CopyStrategy::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// Everything the classifier looks at, precomputed for one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyTraits {
    pub full_copy: bool,
    pub scaling: bool,
    pub flip: Flip,
    /// Source and destination formats are identical.
    pub same_format: bool,
    /// Formats differ only by alpha versus padding in the top byte.
    pub alpha_pair: bool,
    /// Source and destination planes have the same slice size.
    pub equal_slice: bool,
    /// Source row pitch is at most 16 bytes wider than the packed row.
    pub tight_pitch: bool,
    /// The plane carries depth or stencil data selected by the copy flags.
    pub depth: bool,
    /// The plane carries color data and every color channel is selected.
    pub color: bool,
    /// Either plane is stored in 2×2 quads.
    pub quad_layout: bool,
    pub fast_paths: bool,
}

type Guard = fn(&CopyTraits) -> bool;

/// Most specific first. Anything left over is [`CopyStrategy::Generic`].
const STRATEGIES: &[(Guard, CopyStrategy)] = &[
    (whole_surface, CopyStrategy::WholeSurface),
    (depth_rows, CopyStrategy::DepthRows),
    (color_rows, CopyStrategy::ColorRows),
];

fn whole_surface(t: &CopyTraits) -> bool {
    t.full_copy
        && !t.scaling
        && t.same_format
        && !t.alpha_pair
        && t.equal_slice
        && t.tight_pitch
        && t.flip.is_none()
}

fn depth_rows(t: &CopyTraits) -> bool {
    t.depth && !t.scaling && t.same_format && !t.quad_layout
}

fn color_rows(t: &CopyTraits) -> bool {
    t.color && !t.scaling && (t.same_format || t.alpha_pair) && !t.quad_layout
}

pub fn classify(traits: &CopyTraits) -> CopyStrategy {
    if !traits.fast_paths {
        return CopyStrategy::Generic;
    }
    STRATEGIES
        .iter()
        .find(|(guard, _)| guard(traits))
        .map(|&(_, strategy)| strategy)
        .unwrap_or(CopyStrategy::Generic)
}
