// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Descriptive intensity statistics of a single image.

use image::GrayImage;
use serde::Serialize;

/// Mean, population standard deviation, maximum and minimum intensity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

impl Statistics {
    /// Compute over every pixel. An empty image yields all zeros.
    pub fn of(image: &GrayImage) -> Self {
        let count = image.as_raw().len();
        if count == 0 {
            return Self::default();
        }

        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        let mut max = u8::MIN;
        let mut min = u8::MAX;
        for &v in image.as_raw() {
            sum += u64::from(v);
            sum_sq += u64::from(v) * u64::from(v);
            max = max.max(v);
            min = min.min(v);
        }

        let n = count as f64;
        let mean = sum as f64 / n;
        let variance = (sum_sq as f64 / n - mean * mean).max(0.0);
        Self {
            mean,
            std_dev: variance.sqrt(),
            max: f64::from(max),
            min: f64::from(min),
        }
    }
}
