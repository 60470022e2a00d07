// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary mask buffer and the rule that combines the threshold and edge masks.

use image::{GrayImage, Luma};
use tracing::debug;

/// Foreground value of masks built by this crate when no threshold values
/// apply (edge masks, direct casts).
pub const MASK_FOREGROUND: u8 = 255;
/// Background value paired with [`MASK_FOREGROUND`].
pub const MASK_BACKGROUND: u8 = 0;

/// Working buffer threaded through binarization, island removal and
/// morphology.
///
/// A pixel is foreground when it differs from `background`. Binary masks hold
/// only the two values; a direct cast of a greyscale image keeps its full
/// range and treats every non-background intensity as foreground.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    pub image: GrayImage,
    pub foreground: u8,
    pub background: u8,
}

impl BinaryMask {
    pub fn new(image: GrayImage, foreground: u8, background: u8) -> Self {
        Self {
            image,
            foreground,
            background,
        }
    }

    /// Use a greyscale image as a mask without binarizing it.
    pub fn from_greyscale(image: GrayImage) -> Self {
        Self::new(image, MASK_FOREGROUND, MASK_BACKGROUND)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[inline]
    pub fn is_foreground(&self, value: u8) -> bool {
        value != self.background
    }

    pub fn foreground_at(&self, x: u32, y: u32) -> bool {
        self.is_foreground(self.image.get_pixel(x, y).0[0])
    }

    /// Number of foreground pixels.
    pub fn foreground_area(&self) -> usize {
        self.image
            .as_raw()
            .iter()
            .filter(|&&v| self.is_foreground(v))
            .count()
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }
}

/// Produce the working mask from whichever binarizers ran.
///
/// | threshold | edges | result |
/// |---|---|---|
/// | some | some | threshold mask where the edge mask is also foreground |
/// | some | none | threshold mask |
/// | none | some | edge mask |
/// | none | none | direct cast of `lines` |
pub fn combine(
    threshold: Option<BinaryMask>,
    edges: Option<BinaryMask>,
    lines: &GrayImage,
) -> BinaryMask {
    match (threshold, edges) {
        (Some(threshold), Some(edges)) => conjunction(&threshold, &edges),
        (Some(threshold), None) => threshold,
        (None, Some(edges)) => edges,
        (None, None) => BinaryMask::from_greyscale(lines.clone()),
    }
}

/// Pixel-wise AND. The result uses the values of `primary`.
pub fn conjunction(primary: &BinaryMask, other: &BinaryMask) -> BinaryMask {
    let image = GrayImage::from_fn(primary.image.width(), primary.image.height(), |x, y| {
        let keep = primary.foreground_at(x, y)
            && x < other.image.width()
            && y < other.image.height()
            && other.foreground_at(x, y);
        Luma([if keep { primary.foreground } else { primary.background }])
    });
    let mask = BinaryMask::new(image, primary.foreground, primary.background);
    debug!(
        before = primary.foreground_area(),
        after = mask.foreground_area(),
        "Threshold and edge masks combined"
    );
    mask
}
