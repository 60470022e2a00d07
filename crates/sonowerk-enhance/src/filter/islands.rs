// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Island removal. Drops connected foreground components below an area limit.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{self, connected_components};
use sonowerk_core::Connectivity;
use tracing::{debug, instrument};

use crate::filter::mask::BinaryMask;

/// Clear every connected foreground component whose pixel count is strictly
/// less than `min_area`. Larger components are left untouched.
///
/// Only areas decide, so the result does not depend on labelling order.
#[instrument(skip(mask), fields(width = mask.image.width(), height = mask.image.height()))]
pub fn remove_islands(mut mask: BinaryMask, min_area: u32, connectivity: Connectivity) -> BinaryMask {
    if min_area <= 1 {
        return mask;
    }

    // Label a normalised copy so that differently valued foreground pixels of
    // a greyscale mask still join the same component.
    let binary = GrayImage::from_fn(mask.image.width(), mask.image.height(), |x, y| {
        Luma([u8::from(mask.foreground_at(x, y))])
    });
    let conn = match connectivity {
        Connectivity::Four => region_labelling::Connectivity::Four,
        Connectivity::Eight => region_labelling::Connectivity::Eight,
    };
    let labels = connected_components(&binary, conn, Luma([0u8]));

    let label_count = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize;
    let mut areas = vec![0u32; label_count + 1];
    for p in labels.pixels() {
        areas[p.0[0] as usize] += 1;
    }

    let mut removed = 0usize;
    let background = mask.background;
    for (label, pixel) in labels.pixels().zip(mask.image.pixels_mut()) {
        let l = label.0[0] as usize;
        if l != 0 && areas[l] < min_area {
            pixel.0[0] = background;
            removed += 1;
        }
    }

    let islands = areas.iter().skip(1).filter(|&&a| a < min_area).count();
    debug!(components = label_count, islands, removed, "Island removal complete");
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::mask::{MASK_BACKGROUND, MASK_FOREGROUND};

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([MASK_FOREGROUND]));
            }
        }
    }

    fn mask_with_blobs() -> BinaryMask {
        let mut img = GrayImage::new(30, 20);
        fill(&mut img, 1, 1, 2, 2); // area 4
        fill(&mut img, 10, 2, 5, 4); // area 20
        fill(&mut img, 20, 10, 8, 8); // area 64
        BinaryMask::new(img, MASK_FOREGROUND, MASK_BACKGROUND)
    }

    #[test]
    fn small_components_are_cleared_and_large_ones_kept() {
        let before = mask_with_blobs();
        let after = remove_islands(before.clone(), 20, Connectivity::Four);

        assert_eq!(after.foreground_area(), 84);
        assert!(!after.foreground_at(1, 1));
        // Components at or above the limit survive pixel for pixel.
        for (x, y, px) in before.image.enumerate_pixels() {
            if x >= 10 {
                assert_eq!(after.image.get_pixel(x, y), px);
            }
        }
    }

    #[test]
    fn never_grows_foreground() {
        let before = mask_with_blobs();
        for limit in [0, 1, 5, 21, 65, 1000] {
            let after = remove_islands(before.clone(), limit, Connectivity::Eight);
            assert!(after.foreground_area() <= before.foreground_area());
        }
        assert_eq!(remove_islands(before, 1000, Connectivity::Four).foreground_area(), 0);
    }

    #[test]
    fn connectivity_changes_component_grouping() {
        // Three pixels touching only diagonally.
        let mut img = GrayImage::new(5, 5);
        for i in 0..3 {
            img.put_pixel(i, i, Luma([MASK_FOREGROUND]));
        }
        let mask = BinaryMask::new(img, MASK_FOREGROUND, MASK_BACKGROUND);

        assert_eq!(remove_islands(mask.clone(), 3, Connectivity::Four).foreground_area(), 0);
        assert_eq!(remove_islands(mask, 3, Connectivity::Eight).foreground_area(), 3);
    }

    #[test]
    fn greyscale_mask_components_are_value_agnostic() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([10 + x as u8]));
        let mask = BinaryMask::from_greyscale(img.clone());
        let after = remove_islands(mask, 4, Connectivity::Four);
        assert_eq!(after.image, img);
    }

    #[test]
    fn honours_non_zero_background() {
        let img = GrayImage::from_fn(6, 1, |x, _| Luma([if x == 2 { 0 } else { 255 }]));
        // Foreground is 0 here, background 255.
        let mask = BinaryMask::new(img, 0, 255);
        let after = remove_islands(mask, 2, Connectivity::Four);
        assert!(after.image.pixels().all(|p| p.0[0] == 255));
    }
}
