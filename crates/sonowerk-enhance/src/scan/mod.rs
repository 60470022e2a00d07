// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan conversion between fan images and scan-line (lines) images.

pub mod convert;

pub use convert::ScanConverter;
