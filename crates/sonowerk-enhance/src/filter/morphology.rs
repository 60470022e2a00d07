// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectangular erosion and dilation of masks.

use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};
use sonowerk_core::error::{Result, SonowerkError};
use tracing::{debug, instrument};

use crate::filter::mask::BinaryMask;

/// Largest kernel side accepted by the structuring-element builder.
pub const MAX_KERNEL_SIZE: i32 = 511;

/// Rectangular structuring element, `rows x columns` pixels. Even sizes
/// reach one pixel further towards increasing coordinates when eroding.
/// Dilation uses the reflected window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    pub rows: u32,
    pub columns: u32,
    window: Mask,
    reflected: Mask,
}

impl Kernel {
    /// Build from the `[rows, columns]` pair used in configuration.
    pub fn from_size(size: [i32; 2]) -> Result<Self> {
        let [r, c] = size;
        if !(1..=MAX_KERNEL_SIZE).contains(&r) || !(1..=MAX_KERNEL_SIZE).contains(&c) {
            return Err(SonowerkError::config(format!(
                "morphology kernel must be between 1 and {MAX_KERNEL_SIZE} on each side, got [{r}, {c}]"
            )));
        }
        let (rows, columns) = (r as u32, c as u32);
        let full = GrayImage::from_pixel(columns, rows, Luma([u8::MAX]));
        // Centres are at most 255 because sides are at most 511.
        let centre = |len: u32, reflect: bool| {
            let lo = (len - 1) / 2;
            (if reflect { len - 1 - lo } else { lo }) as u8
        };
        Ok(Self {
            rows,
            columns,
            window: Mask::from_image(&full, centre(columns, false), centre(rows, false)),
            reflected: Mask::from_image(&full, centre(columns, true), centre(rows, true)),
        })
    }

    fn is_identity(&self) -> bool {
        self.rows == 1 && self.columns == 1
    }
}

/// Shrink the foreground: a pixel stays foreground only if every in-image
/// pixel under the kernel is foreground.
#[instrument(skip_all, fields(rows = kernel.rows, columns = kernel.columns))]
pub fn erode(mask: BinaryMask, kernel: &Kernel) -> BinaryMask {
    if kernel.is_identity() {
        return mask;
    }
    let image = if mask.foreground >= mask.background {
        grayscale_erode(&mask.image, &kernel.window)
    } else {
        grayscale_dilate(&mask.image, &kernel.window)
    };
    let out = BinaryMask::new(image, mask.foreground, mask.background);
    debug!(foreground = out.foreground_area(), "Erosion complete");
    out
}

/// Grow the foreground: a pixel becomes foreground if any in-image pixel
/// under the reflected kernel is foreground.
#[instrument(skip_all, fields(rows = kernel.rows, columns = kernel.columns))]
pub fn dilate(mask: BinaryMask, kernel: &Kernel) -> BinaryMask {
    if kernel.is_identity() {
        return mask;
    }
    let image = if mask.foreground >= mask.background {
        grayscale_dilate(&mask.image, &kernel.reflected)
    } else {
        grayscale_erode(&mask.image, &kernel.reflected)
    };
    let out = BinaryMask::new(image, mask.foreground, mask.background);
    debug!(foreground = out.foreground_area(), "Dilation complete");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::mask::{MASK_BACKGROUND, MASK_FOREGROUND};
    use image::Luma;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> BinaryMask {
        let img = GrayImage::from_fn(w, h, |x, y| {
            let inside = (x0..x0 + rw).contains(&x) && (y0..y0 + rh).contains(&y);
            Luma([if inside { MASK_FOREGROUND } else { MASK_BACKGROUND }])
        });
        BinaryMask::new(img, MASK_FOREGROUND, MASK_BACKGROUND)
    }

    fn noisy_mask() -> BinaryMask {
        let img = GrayImage::from_fn(13, 11, |x, y| {
            Luma([if (x * 7 + y * 3) % 5 < 2 { MASK_FOREGROUND } else { MASK_BACKGROUND }])
        });
        BinaryMask::new(img, MASK_FOREGROUND, MASK_BACKGROUND)
    }

    #[test]
    fn one_by_one_erosion_is_identity() {
        let mask = noisy_mask();
        let k = Kernel::from_size([1, 1]).unwrap();
        assert_eq!(erode(mask.clone(), &k), mask);
        assert_eq!(dilate(mask.clone(), &k), mask);
    }

    #[test]
    fn closing_recovers_interior_rectangle() {
        for size in [[3, 3], [2, 4], [5, 1]] {
            let k = Kernel::from_size(size).unwrap();
            let blob = rect_mask(30, 24, 9, 7, 8, 6);
            let closed = erode(dilate(blob.clone(), &k), &k);
            assert_eq!(closed, blob, "kernel {size:?}");
        }
    }

    #[test]
    fn erosion_shrinks_rectangle_by_kernel_radius() {
        let blob = rect_mask(20, 20, 5, 5, 7, 5);
        let eroded = erode(blob, &Kernel::from_size([3, 3]).unwrap());
        assert_eq!(eroded, rect_mask(20, 20, 6, 6, 5, 3));
    }

    #[test]
    fn dilation_grows_rectangle_along_each_axis() {
        let blob = rect_mask(20, 20, 8, 8, 2, 2);
        // 1 row, 5 columns: grows two pixels left and right only.
        let dilated = dilate(blob, &Kernel::from_size([1, 5]).unwrap());
        assert_eq!(dilated, rect_mask(20, 20, 6, 8, 6, 2));
    }

    #[test]
    fn inverted_polarity_masks_erode_the_low_value() {
        let img = GrayImage::from_fn(9, 9, |x, y| {
            Luma([if (2..7).contains(&x) && (2..7).contains(&y) { 0 } else { 255 }])
        });
        let mask = BinaryMask::new(img, 0, 255);
        let eroded = erode(mask, &Kernel::from_size([3, 3]).unwrap());
        assert_eq!(eroded.foreground_area(), 9);
    }

    #[test]
    fn non_positive_kernel_is_rejected() {
        assert!(Kernel::from_size([0, 3]).is_err());
        assert!(Kernel::from_size([3, -2]).is_err());
        assert!(Kernel::from_size([3, MAX_KERNEL_SIZE + 1]).is_err());
        assert!(Kernel::from_size([MAX_KERNEL_SIZE, 1]).is_ok());
    }

    #[test]
    fn even_kernel_erodes_towards_increasing_coordinates() {
        // 1 row, 2 columns: a pixel survives only if its right neighbour is
        // foreground too.
        let blob = rect_mask(12, 3, 4, 1, 4, 1);
        let eroded = erode(blob.clone(), &Kernel::from_size([1, 2]).unwrap());
        assert_eq!(eroded, rect_mask(12, 3, 4, 1, 3, 1));
        let dilated = dilate(blob, &Kernel::from_size([1, 2]).unwrap());
        assert_eq!(dilated, rect_mask(12, 3, 4, 1, 5, 1));
    }
}
