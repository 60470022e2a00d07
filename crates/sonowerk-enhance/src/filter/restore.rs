// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greyscale restoration under a binary mask.

use image::{GrayImage, Luma};
use sonowerk_core::error::{Result, SonowerkError};
use tracing::{debug, instrument};

use crate::filter::mask::BinaryMask;

/// Replace every foreground pixel with the original intensity; background
/// pixels take the mask's background value.
#[instrument(skip_all, fields(width = mask.image.width(), height = mask.image.height()))]
pub fn restore_greyscale(mask: &BinaryMask, original: &GrayImage) -> Result<GrayImage> {
    if mask.dimensions() != original.dimensions() {
        return Err(SonowerkError::ImageError(format!(
            "mask is {:?} but the unprocessed image is {:?}",
            mask.dimensions(),
            original.dimensions()
        )));
    }
    let restored = GrayImage::from_fn(original.width(), original.height(), |x, y| {
        if mask.foreground_at(x, y) {
            *original.get_pixel(x, y)
        } else {
            Luma([mask.background])
        }
    });
    debug!("Greyscale values restored under mask");
    Ok(restored)
}
