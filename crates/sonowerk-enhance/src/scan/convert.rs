// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan conversion: resampling between the fan (Cartesian) image and the
// rectangular lines image, in both directions.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::geometric_transformations::{Interpolation, warp_into_with};
use sonowerk_core::error::{Result, SonowerkError};
use sonowerk_core::{ScanGeometry, TransducerGeometry};
use tracing::{debug, instrument};

/// Value written where a sample falls outside the acoustic field or the
/// source image.
pub const BACKGROUND: u8 = 0;

/// Positions this close outside the valid range are snapped onto it, so that
/// samples landing exactly on the last row/column survive rounding noise.
const EDGE_TOLERANCE: f64 = 1e-6;

/// Bidirectional resampler between fan and lines images.
///
/// The lines image has one column per scan line and one row per sample along
/// the line, so its size is `number_of_scan_lines x samples_per_scan_line`.
/// Row 0 is the sample nearest the transducer.
#[derive(Debug, Clone)]
pub struct ScanConverter {
    geometry: ScanGeometry,
    scan_lines: u32,
    samples: u32,
}

impl ScanConverter {
    /// Build a converter for a fixed lines-image grid.
    pub fn new(
        geometry: ScanGeometry,
        number_of_scan_lines: i32,
        samples_per_scan_line: i32,
    ) -> Result<Self> {
        geometry.validate()?;
        if number_of_scan_lines < 2 || samples_per_scan_line < 2 {
            return Err(SonowerkError::config(format!(
                "scan converter needs at least 2x2 samples, got {number_of_scan_lines}x{samples_per_scan_line}"
            )));
        }
        Ok(Self {
            geometry,
            scan_lines: number_of_scan_lines as u32,
            samples: samples_per_scan_line as u32,
        })
    }

    pub fn geometry(&self) -> &ScanGeometry {
        &self.geometry
    }

    /// `(width, height)` of the lines image: scan lines by samples.
    pub fn lines_dimensions(&self) -> (u32, u32) {
        (self.scan_lines, self.samples)
    }

    /// Step between neighbouring lines-image pixels: across lines (degrees
    /// for curvilinear probes, millimetres for linear ones) and along a line
    /// (millimetres).
    pub fn lines_spacing(&self) -> [f64; 2] {
        let lines = f64::from(self.scan_lines - 1);
        let samples = f64::from(self.samples - 1);
        match self.geometry.transducer {
            TransducerGeometry::Curvilinear {
                radius_start_mm,
                radius_stop_mm,
                theta_start_deg,
                theta_stop_deg,
            } => [
                (theta_stop_deg - theta_start_deg) / lines,
                (radius_stop_mm - radius_start_mm) / samples,
            ],
            TransducerGeometry::Linear {
                imaging_depth_mm,
                transducer_width_mm,
            } => [transducer_width_mm / lines, imaging_depth_mm / samples],
        }
    }

    /// Fan-image pixel position of a (possibly fractional) lines-image
    /// position.
    fn fan_position(&self, line: f64, sample: f64) -> (f64, f64) {
        let [cx, cy] = self.geometry.transducer_center_pixel;
        let [sx, sy] = self.geometry.output_image_spacing_mm_per_pixel;
        let line_frac = line / f64::from(self.scan_lines - 1);
        let sample_frac = sample / f64::from(self.samples - 1);
        match self.geometry.transducer {
            TransducerGeometry::Curvilinear {
                radius_start_mm,
                radius_stop_mm,
                theta_start_deg,
                theta_stop_deg,
            } => {
                let theta = (theta_start_deg + line_frac * (theta_stop_deg - theta_start_deg))
                    .to_radians();
                let r = radius_start_mm + sample_frac * (radius_stop_mm - radius_start_mm);
                (cx + r * theta.sin() / sx, cy + r * theta.cos() / sy)
            }
            TransducerGeometry::Linear {
                imaging_depth_mm,
                transducer_width_mm,
            } => (
                cx + (line_frac - 0.5) * transducer_width_mm / sx,
                cy + sample_frac * imaging_depth_mm / sy,
            ),
        }
    }

    /// Lines-image position of a fan-image pixel, or `None` when the pixel is
    /// outside the acoustic field.
    fn lines_position(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let [cx, cy] = self.geometry.transducer_center_pixel;
        let [sx, sy] = self.geometry.output_image_spacing_mm_per_pixel;
        let dx = (x - cx) * sx;
        let dy = (y - cy) * sy;
        let (line_frac, sample_frac) = match self.geometry.transducer {
            TransducerGeometry::Curvilinear {
                radius_start_mm,
                radius_stop_mm,
                theta_start_deg,
                theta_stop_deg,
            } => {
                let r = dx.hypot(dy);
                let theta = dx.atan2(dy).to_degrees();
                (
                    (theta - theta_start_deg) / (theta_stop_deg - theta_start_deg),
                    (r - radius_start_mm) / (radius_stop_mm - radius_start_mm),
                )
            }
            TransducerGeometry::Linear {
                imaging_depth_mm,
                transducer_width_mm,
            } => (dx / transducer_width_mm + 0.5, dy / imaging_depth_mm),
        };
        let line = line_frac * f64::from(self.scan_lines - 1);
        let sample = sample_frac * f64::from(self.samples - 1);
        let inside = |v: f64, max: u32| v >= -EDGE_TOLERANCE && v <= f64::from(max - 1) + EDGE_TOLERANCE;
        (inside(line, self.scan_lines) && inside(sample, self.samples)).then_some((line, sample))
    }

    /// Resample the fan image along every scan line.
    #[instrument(skip_all, fields(width = fan.width(), height = fan.height()))]
    pub fn to_lines(&self, fan: &GrayImage) -> GrayImage {
        let (lines, outside) = resample(fan, self.scan_lines, self.samples, |line, sample| {
            Some(self.fan_position(f64::from(line), f64::from(sample)))
        });
        debug!(
            scan_lines = self.scan_lines,
            samples = self.samples,
            outside,
            "Fan image converted to lines image"
        );
        lines
    }

    /// Map a lines image back into a fan image of `width x height` pixels.
    ///
    /// Pixels outside the acoustic field are set to [`BACKGROUND`]. A lines
    /// image whose size differs from the configured grid is rejected.
    #[instrument(skip(self, lines))]
    pub fn from_lines(&self, lines: &GrayImage, width: u32, height: u32) -> Result<GrayImage> {
        if lines.dimensions() != self.lines_dimensions() {
            return Err(SonowerkError::config(format!(
                "lines image is {}x{} but the scan converter expects {}x{}",
                lines.width(),
                lines.height(),
                self.scan_lines,
                self.samples
            )));
        }
        let (fan, outside) = resample(lines, width, height, |x, y| {
            self.lines_position(f64::from(x), f64::from(y))
        });
        debug!(outside, "Lines image converted back to fan image");
        Ok(fan)
    }
}

/// Marks output pixels whose pre-image is outside the source.
const OUTSIDE: f32 = -1.0;

/// Build a `width x height` image whose pixel `(x, y)` is the bilinear
/// sample of `src` at `locate(x, y)`. Pixels with no location, or whose
/// location falls outside `src`, become [`BACKGROUND`]. Returns the image and
/// the number of such pixels.
fn resample<F>(src: &GrayImage, width: u32, height: u32, locate: F) -> (GrayImage, usize)
where
    F: Fn(u32, u32) -> Option<(f64, f64)> + Send + Sync,
{
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        let area = width as usize * height as usize;
        return (GrayImage::from_pixel(width, height, Luma([BACKGROUND])), area);
    }
    let max_x = f64::from(w - 1);
    let max_y = f64::from(h - 1);
    let within = |v: f64, max: f64| v >= -EDGE_TOLERANCE && v <= max + EDGE_TOLERANCE;

    // The last row and column are repeated once so that positions on the far
    // edge still have a right and bottom neighbour.
    let padded: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_fn(w + 1, h + 1, |x, y| {
        Luma([f32::from(src.get_pixel(x.min(w - 1), y.min(h - 1)).0[0])])
    });

    let mut sampled: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::new(width, height);
    warp_into_with(
        &padded,
        |x, y| match locate(x as u32, y as u32) {
            Some((px, py)) if within(px, max_x) && within(py, max_y) => {
                (px.clamp(0.0, max_x) as f32, py.clamp(0.0, max_y) as f32)
            }
            _ => (OUTSIDE, OUTSIDE),
        },
        Interpolation::Bilinear,
        Luma([OUTSIDE]),
        &mut sampled,
    );

    let mut outside = 0usize;
    let out = GrayImage::from_fn(width, height, |x, y| {
        let v = sampled.get_pixel(x, y).0[0];
        if v < 0.0 {
            outside += 1;
            Luma([BACKGROUND])
        } else {
            Luma([round_u8(f64::from(v))])
        }
    });
    (out, outside)
}

fn round_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
