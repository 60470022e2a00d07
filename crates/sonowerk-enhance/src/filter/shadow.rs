// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Acoustic shadow estimation along scan lines.

use image::{GrayImage, ImageBuffer, Luma};
use tracing::{debug, instrument};

use crate::filter::mask::BinaryMask;

/// Per-sample shadow probability in `[0, 1]`, same layout as the lines image.
pub type ShadowMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Accumulated reflector strength (in full-intensity samples) at which a
/// sample is considered certainly shadowed.
const SATURATION_SAMPLES: f32 = 4.0;

/// Walk every scan line (column) away from the transducer (row 0) and
/// accumulate the strength of the foreground reflectors passed so far.
///
/// A sample's shadow probability is the strength accumulated strictly before
/// it, so a reflector does not shadow itself. Strength is the original
/// intensity scaled to `[0, 1]`. Probabilities never decrease along a line.
#[instrument(skip_all, fields(width = mask.image.width(), height = mask.image.height()))]
pub fn estimate_shadow(mask: &BinaryMask, intensities: &GrayImage) -> ShadowMap {
    let (w, h) = mask.dimensions();
    let mut map = ShadowMap::new(w, h);
    let mut shadowed_lines = 0u32;

    for x in 0..w {
        let mut accumulated = 0f32;
        for y in 0..h {
            map.put_pixel(x, y, Luma([(accumulated / SATURATION_SAMPLES).min(1.0)]));
            if mask.foreground_at(x, y) {
                let strength = if x < intensities.width() && y < intensities.height() {
                    f32::from(intensities.get_pixel(x, y).0[0]) / 255.0
                } else {
                    1.0
                };
                accumulated += strength;
            }
        }
        if accumulated >= SATURATION_SAMPLES {
            shadowed_lines += 1;
        }
    }

    debug!(shadowed_lines, "Shadow estimation complete");
    map
}

/// Scale a shadow map to 8 bits for export.
pub fn shadow_to_gray(map: &ShadowMap) -> GrayImage {
    GrayImage::from_fn(map.width(), map.height(), |x, y| {
        Luma([(map.get_pixel(x, y).0[0] * 255.0).round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::mask::{MASK_BACKGROUND, MASK_FOREGROUND};

    fn mask_with_rows(w: u32, h: u32, rows: std::ops::Range<u32>) -> BinaryMask {
        let img = GrayImage::from_fn(w, h, |_, y| {
            Luma([if rows.contains(&y) { MASK_FOREGROUND } else { MASK_BACKGROUND }])
        });
        BinaryMask::new(img, MASK_FOREGROUND, MASK_BACKGROUND)
    }

    #[test]
    fn empty_mask_has_no_shadow() {
        let mask = mask_with_rows(4, 10, 0..0);
        let map = estimate_shadow(&mask, &GrayImage::from_pixel(4, 10, Luma([255u8])));
        assert!(map.pixels().all(|p| p.0[0] == 0.0));
    }

    #[test]
    fn strong_reflector_shadows_everything_beyond_it() {
        let mask = mask_with_rows(3, 20, 5..9);
        let bright = GrayImage::from_pixel(3, 20, Luma([255u8]));
        let map = estimate_shadow(&mask, &bright);
        for x in 0..3 {
            // In front of and at the first reflector sample: no shadow.
            for y in 0..=5 {
                assert_eq!(map.get_pixel(x, y).0[0], 0.0);
            }
            // Four full-strength samples saturate the probability.
            for y in 9..20 {
                assert_eq!(map.get_pixel(x, y).0[0], 1.0);
            }
        }
    }

    #[test]
    fn weak_reflector_gives_partial_probability() {
        let mask = mask_with_rows(1, 10, 2..4);
        let dim = GrayImage::from_pixel(1, 10, Luma([51u8])); // strength 0.2
        let map = estimate_shadow(&mask, &dim);
        let p = map.get_pixel(0, 9).0[0];
        assert!((p - 0.1).abs() < 1e-6, "got {p}");
    }

    #[test]
    fn probabilities_are_bounded_and_monotone() {
        let img = GrayImage::from_fn(6, 30, |x, y| Luma([((x * 31 + y * 17) % 256) as u8]));
        let mask = BinaryMask::new(
            GrayImage::from_fn(6, 30, |x, y| Luma([if (x + y) % 3 == 0 { 255 } else { 0 }])),
            MASK_FOREGROUND,
            MASK_BACKGROUND,
        );
        let map = estimate_shadow(&mask, &img);
        for x in 0..6 {
            let mut last = 0.0;
            for y in 0..30 {
                let p = map.get_pixel(x, y).0[0];
                assert!((0.0..=1.0).contains(&p));
                assert!(p >= last);
                last = p;
            }
        }
    }

    #[test]
    fn export_scales_to_full_range() {
        let mut map = ShadowMap::new(2, 1);
        map.put_pixel(1, 0, Luma([1.0]));
        assert_eq!(shadow_to_gray(&map).as_raw(), &vec![0, 255]);
    }
}
