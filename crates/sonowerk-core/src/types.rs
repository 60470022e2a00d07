// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: tracked frames, their spatial geometry, and named
// coordinate-frame transforms.

use std::collections::BTreeMap;

use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SonowerkError};

/// Row-major homogeneous 4x4 transform.
pub type Matrix4 = [[f64; 4]; 4];

/// The identity transform.
pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Placement of an image in physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Position of pixel (0, 0) in millimetres.
    pub origin: [f64; 3],
    /// Pixel step along x, y and z, in millimetres. A curvilinear lines image
    /// steps in angle across scan lines, so its x spacing is in degrees.
    pub spacing: [f64; 3],
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            spacing: [1.0; 3],
        }
    }
}

impl ImageGeometry {
    /// Derive the geometry from an image-to-reference pose: the origin is the
    /// translation column and the in-plane spacing is the length of the first
    /// two column vectors. Out-of-plane spacing is fixed at 1.
    pub fn from_image_to_reference(m: &Matrix4) -> Self {
        let column_norm = |c: usize| (m[0][c].powi(2) + m[1][c].powi(2) + m[2][c].powi(2)).sqrt();
        Self {
            origin: [m[0][3], m[1][3], m[2][3]],
            spacing: [column_norm(0), column_norm(1), 1.0],
        }
    }
}

/// A single tracked image frame.
///
/// The frame owns its pixel buffer and a table of named poses recorded by the
/// tracker at acquisition time.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: DynamicImage,
    pub geometry: ImageGeometry,
    /// Poses keyed by transform name (e.g. `ProbeToTracker`).
    pub transforms: BTreeMap<String, Matrix4>,
    /// Acquisition time in seconds.
    pub timestamp: f64,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            geometry: ImageGeometry::default(),
            transforms: BTreeMap::new(),
            timestamp: 0.0,
        }
    }

    /// Wrap an 8-bit greyscale buffer.
    pub fn from_gray(image: GrayImage) -> Self {
        Self::new(DynamicImage::ImageLuma8(image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn with_transform(mut self, name: &TransformName, matrix: Matrix4) -> Self {
        self.transforms.insert(name.to_string(), matrix);
        self
    }
}

/// A `FromToTo` coordinate-frame transform name, e.g. `ImageToReference`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformName {
    pub from: String,
    pub to: String,
}

impl TransformName {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parse `FromToTo`. Exactly one `To` separator followed by an upper-case
    /// letter must split two non-empty frame names.
    pub fn parse(name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        let splits: Vec<usize> = name
            .match_indices("To")
            .map(|(i, _)| i)
            .filter(|&i| i > 0 && bytes.get(i + 2).is_some_and(u8::is_ascii_uppercase))
            .collect();
        match splits.as_slice() {
            [i] => Ok(Self::new(&name[..*i], &name[i + 2..])),
            [] => Err(SonowerkError::config(format!(
                "transform name {name:?} has no FromToTo separator"
            ))),
            _ => Err(SonowerkError::config(format!(
                "transform name {name:?} is ambiguous"
            ))),
        }
    }
}

impl std::fmt::Display for TransformName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}To{}", self.from, self.to)
    }
}
