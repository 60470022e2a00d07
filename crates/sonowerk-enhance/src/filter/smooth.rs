// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Separable Gaussian smoothing with an explicit kernel size.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;
use tracing::{debug, instrument};

/// Normalised 1-D Gaussian kernel of `size` taps. `std_dev` must be positive;
/// `EnhancerConfig::validate` checks both options before a kernel is built.
pub fn gaussian_kernel(std_dev: f64, size: u32) -> Vec<f32> {
    let radius = f64::from(size / 2);
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let d = f64::from(i) - radius;
            (-(d * d) / (2.0 * std_dev * std_dev)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / total) as f32).collect()
}

/// Blur with the same 1-D kernel along rows and then columns. Borders are
/// padded by continuity. Both passes run in `f32`; the result is rounded once.
#[instrument(skip(image, kernel), fields(width = image.width(), height = image.height(), taps = kernel.len()))]
pub fn gaussian_smooth(image: &GrayImage, kernel: &[f32]) -> GrayImage {
    if image.width() == 0 || image.height() == 0 || kernel.len() <= 1 {
        return image.clone();
    }
    let float: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            Luma([f32::from(image.get_pixel(x, y).0[0])])
        });
    let blurred = separable_filter_equal(&float, kernel);

    debug!("Gaussian smoothing complete");
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([blurred.get_pixel(x, y).0[0].round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let k = gaussian_kernel(1.5, 7);
        assert_eq!(k.len(), 7);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..3 {
            assert!((k[i] - k[6 - i]).abs() < 1e-7);
        }
        assert!(k[3] > k[2] && k[2] > k[1]);
    }

    #[test]
    fn empty_kernel_leaves_image_alone() {
        let img = GrayImage::from_fn(5, 4, |x, y| Luma([(x * 30 + y) as u8]));
        assert!(gaussian_kernel(1.0, 0).is_empty());
        assert_eq!(gaussian_smooth(&img, &gaussian_kernel(1.0, 0)), img);
    }

    #[test]
    fn ramp_is_preserved_away_from_borders() {
        // A linear ramp is a fixed point of any symmetric normalised kernel.
        let img = GrayImage::from_fn(20, 5, |x, _| Luma([(x * 10) as u8]));
        let out = gaussian_smooth(&img, &gaussian_kernel(1.7, 7));
        for x in 3..17 {
            assert_eq!(out.get_pixel(x, 2).0[0], (x * 10) as u8, "column {x}");
        }
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let img = GrayImage::from_pixel(12, 9, Luma([143u8]));
        let k = gaussian_kernel(2.0, 5);
        assert_eq!(gaussian_smooth(&img, &k), img);
    }

    #[test]
    fn single_tap_kernel_is_identity() {
        let img = GrayImage::from_fn(6, 6, |x, y| Luma([(x * 40 + y) as u8]));
        let k = gaussian_kernel(1.0, 1);
        assert_eq!(gaussian_smooth(&img, &k), img);
    }

    #[test]
    fn spike_is_spread_out() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255u8]));
        let k = gaussian_kernel(1.0, 5);
        let out = gaussian_smooth(&img, &k);
        let centre = out.get_pixel(4, 4).0[0];
        assert!(centre < 255 && centre > 0);
        assert!(out.get_pixel(5, 4).0[0] > 0);
        assert!(out.get_pixel(4, 3).0[0] > 0);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
    }
}
