// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sonowerk-enhance — Bone-surface enhancement for tracked ultrasound frames.
//
// Provides scan conversion between fan and lines images, the individual
// enhancement stages (smoothing, thresholding, edge detection, island removal,
// morphology, shadow estimation, greyscale restoration), and the
// `TransverseProcessEnhancer` that runs them per frame.

pub mod enhance;
pub mod filter;
pub mod scan;

// Re-export the primary types so callers can use `sonowerk_enhance::TransverseProcessEnhancer` etc.
pub use enhance::{
    DebugCollections, FrameReport, FrameTransforms, SequenceOutcome, SkippedFrame,
    TransformProvider, TransverseProcessEnhancer, process_sequence,
};
pub use filter::{BinaryMask, ShadowMap, Statistics};
pub use scan::ScanConverter;
