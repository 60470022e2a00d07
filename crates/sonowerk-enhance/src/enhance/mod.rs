// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestration: the per-frame enhancer, its debug snapshots and the
// sequence runner.

pub mod debug;
pub mod enhancer;
pub mod sequence;

pub use debug::{DebugCollections, DebugSequence};
pub use enhancer::{FrameReport, PROCESSOR_ELEMENT, TransverseProcessEnhancer};
pub use sequence::{FrameTransforms, SequenceOutcome, SkippedFrame, TransformProvider, process_sequence};
