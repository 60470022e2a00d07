// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gradient-magnitude edge detection.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::gradients::sobel_gradients;
use tracing::{debug, instrument};

use crate::filter::mask::{BinaryMask, MASK_BACKGROUND, MASK_FOREGROUND};

/// Sobel gradient magnitude of every pixel.
pub fn gradient_magnitude(image: &GrayImage) -> ImageBuffer<Luma<u16>, Vec<u16>> {
    sobel_gradients(image)
}

/// Binarize the gradient magnitude: pixels at or above `threshold` become
/// edge foreground.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn detect_edges(image: &GrayImage, threshold: f64) -> BinaryMask {
    let magnitude = gradient_magnitude(image);
    let edges = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let m = f64::from(magnitude.get_pixel(x, y).0[0]);
        Luma([if m >= threshold { MASK_FOREGROUND } else { MASK_BACKGROUND }])
    });
    let mask = BinaryMask::new(edges, MASK_FOREGROUND, MASK_BACKGROUND);
    debug!(edge_pixels = mask.foreground_area(), "Edge detection complete");
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_has_no_edges() {
        let img = GrayImage::from_pixel(10, 10, Luma([128u8]));
        assert_eq!(detect_edges(&img, 10.0).foreground_area(), 0);
    }

    #[test]
    fn step_produces_edges_along_the_boundary_only() {
        // Dark top half, bright bottom half.
        let img = GrayImage::from_fn(12, 12, |_, y| Luma([if y < 6 { 20 } else { 220 }]));
        let mask = detect_edges(&img, 10.0);
        for x in 0..12 {
            assert!(mask.foreground_at(x, 5));
            assert!(mask.foreground_at(x, 6));
            assert!(!mask.foreground_at(x, 1));
            assert!(!mask.foreground_at(x, 10));
        }
    }

    #[test]
    fn high_threshold_suppresses_weak_edges() {
        let img = GrayImage::from_fn(8, 8, |x, _| Luma([if x < 4 { 100 } else { 104 }]));
        assert!(detect_edges(&img, 5.0).foreground_area() > 0);
        assert_eq!(detect_edges(&img, 100.0).foreground_area(), 0);
    }
}
