// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intensity-band binarization.

use image::{GrayImage, Luma};
use tracing::{debug, instrument};

use crate::filter::mask::BinaryMask;

/// Intensity band and the two output values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    pub lower: f64,
    pub upper: f64,
    pub in_value: f64,
    pub out_value: f64,
}

impl ThresholdBand {
    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        let v = f64::from(value);
        self.lower <= v && v <= self.upper
    }
}

/// Map every pixel inside `[lower, upper]` to `in_value` and every other
/// pixel to `out_value`. Output values are rounded to 8 bits; callers keep
/// them in `[0, 255]` and distinct (see `EnhancerConfig::validate`).
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn threshold(image: &GrayImage, band: ThresholdBand) -> BinaryMask {
    let in_value = to_u8(band.in_value);
    let out_value = to_u8(band.out_value);

    let output = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y).0[0];
        Luma([if band.contains(v) { in_value } else { out_value }])
    });
    let mask = BinaryMask::new(output, in_value, out_value);
    debug!(foreground = mask.foreground_area(), "Thresholding complete");
    mask
}

fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
