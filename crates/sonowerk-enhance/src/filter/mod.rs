// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Individual enhancement stages. Each stage is a function from its inputs to
// a freshly allocated output; sequencing lives in `crate::enhance`.

pub mod edges;
pub mod islands;
pub mod mask;
pub mod morphology;
pub mod restore;
pub mod shadow;
pub mod smooth;
pub mod stats;
pub mod threshold;

pub use mask::BinaryMask;
pub use shadow::ShadowMap;
pub use stats::Statistics;
