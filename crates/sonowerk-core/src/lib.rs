// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sonowerk — Core types, configuration and error definitions shared across all
// crates.

pub mod config;
pub mod element;
pub mod error;
pub mod types;

pub use config::{Connectivity, EnhancerConfig, ScanGeometry, TransducerGeometry};
pub use element::ConfigElement;
pub use error::{ErrorClass, SonowerkError};
pub use types::*;
