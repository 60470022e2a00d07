// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-frame pipeline: scan conversion, smoothing, binarization, mask cleanup,
// shadow estimation, greyscale restoration and the return to fan geometry.

use image::DynamicImage;
use serde::Serialize;
use sonowerk_core::error::{Result, SonowerkError};
use sonowerk_core::{Connectivity, ConfigElement, EnhancerConfig, Frame, ImageGeometry};
use tracing::{debug, info, instrument, warn};

use crate::enhance::debug::DebugCollections;
use crate::filter::edges::detect_edges;
use crate::filter::islands::remove_islands;
use crate::filter::mask::combine;
use crate::filter::morphology::{Kernel, dilate, erode};
use crate::filter::restore::restore_greyscale;
use crate::filter::shadow::{ShadowMap, estimate_shadow, shadow_to_gray};
use crate::filter::smooth::{gaussian_kernel, gaussian_smooth};
use crate::filter::stats::Statistics;
use crate::filter::threshold::{ThresholdBand, threshold};
use crate::scan::ScanConverter;

/// Name of the element that carries processor options inside a larger
/// configuration tree.
pub const PROCESSOR_ELEMENT: &str = "Processor";

/// What one call to [`TransverseProcessEnhancer::process_frame`] observed.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Statistics of the lines image after smoothing.
    pub statistics: Statistics,
    /// Shadow probability per lines-image sample.
    #[serde(skip)]
    pub shadow_map: ShadowMap,
    pub lines_width: u32,
    pub lines_height: u32,
}

/// Stage parameters derived from a validated configuration. A `None` stage
/// passes its input through unchanged.
#[derive(Debug, Clone)]
struct Stages {
    scan_converter: Option<ScanConverter>,
    gaussian: Option<Vec<f32>>,
    threshold: Option<ThresholdBand>,
    edge_threshold: Option<f64>,
    islands: Option<(u32, Connectivity)>,
    erosion: Option<Kernel>,
    dilation: Option<Kernel>,
    restore: bool,
    return_to_fan: bool,
}

impl Stages {
    fn prepare(config: &EnhancerConfig) -> Result<Self> {
        let scan_converter = if config.convert_to_lines_image {
            let geometry = config.scan_geometry.ok_or_else(|| {
                SonowerkError::MissingElement(sonowerk_core::config::SCAN_CONVERSION_ELEMENT.into())
            })?;
            Some(ScanConverter::new(
                geometry,
                config.number_of_scan_lines,
                config.number_of_samples_per_scan_line,
            )?)
        } else {
            None
        };

        Ok(Self {
            scan_converter,
            gaussian: config.gaussian_enabled.then(|| {
                gaussian_kernel(config.gaussian_std_dev, config.gaussian_kernel_size.max(0) as u32)
            }),
            threshold: config.thresholding_enabled.then_some(ThresholdBand {
                lower: config.lower_threshold,
                upper: config.upper_threshold,
                in_value: config.threshold_in_value,
                out_value: config.threshold_out_value,
            }),
            edge_threshold: config.edge_detector_enabled.then_some(config.edge_threshold),
            islands: config.island_removal_enabled.then_some((
                config.island_area_threshold.max(0) as u32,
                config.island_connectivity,
            )),
            erosion: config
                .erosion_enabled
                .then(|| Kernel::from_size(config.erosion_kernel_size))
                .transpose()?,
            dilation: config
                .dilation_enabled
                .then(|| Kernel::from_size(config.dilation_kernel_size))
                .transpose()?,
            restore: config.reconvert_binary_to_greyscale,
            return_to_fan: config.return_to_fan_image,
        })
    }
}

/// Bone-surface enhancer for tracked ultrasound frames.
///
/// One instance processes frames one at a time; give each worker its own
/// instance. Per-frame buffers are dropped at the end of every call, only the
/// debug collections persist.
#[derive(Debug, Clone)]
pub struct TransverseProcessEnhancer {
    config: EnhancerConfig,
    stages: Stages,
    debug: DebugCollections,
    frames_seen: usize,
}

impl Default for TransverseProcessEnhancer {
    fn default() -> Self {
        let config = EnhancerConfig::default();
        Self {
            stages: Stages {
                scan_converter: None,
                gaussian: None,
                threshold: None,
                edge_threshold: None,
                islands: None,
                erosion: None,
                dilation: None,
                restore: config.reconvert_binary_to_greyscale,
                return_to_fan: false,
            },
            debug: DebugCollections::from_config(&config),
            config,
            frames_seen: 0,
        }
    }
}

impl TransverseProcessEnhancer {
    /// Build an enhancer from a configuration, failing on any invalid option.
    pub fn new(config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        let stages = Stages::prepare(&config)?;
        Ok(Self {
            debug: DebugCollections::from_config(&config),
            config,
            stages,
            frames_seen: 0,
        })
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    pub fn debug_collections(&self) -> &DebugCollections {
        &self.debug
    }

    /// Replace the configuration from a processor element.
    ///
    /// `element` may be the processor element itself or any tree containing a
    /// `Processor` element. Absent options keep their current value. On error
    /// the previous configuration stays in effect.
    #[instrument(skip_all, fields(element = %element.name))]
    pub fn read_configuration(&mut self, element: &ConfigElement) -> Result<()> {
        let element = element.find_nested(PROCESSOR_ELEMENT).unwrap_or(element);

        let config = self.config.read_element(element)?;
        let stages = Stages::prepare(&config)?;
        self.debug.reconfigure(&config);
        self.config = config;
        self.stages = stages;
        info!(
            convert = self.config.convert_to_lines_image,
            thresholding = self.config.thresholding_enabled,
            edges = self.config.edge_detector_enabled,
            "Configuration read"
        );
        Ok(())
    }

    /// Write every option, including the scan geometry, into `element`.
    pub fn write_configuration(&self, element: &mut ConfigElement) -> Result<()> {
        if element.name.is_empty() {
            element.name = PROCESSOR_ELEMENT.to_string();
        }
        self.config.write_element(element);
        Ok(())
    }

    /// Enhance one frame. The frame index used in error context counts every
    /// call on this instance.
    pub fn process_frame(&mut self, input: &Frame, output: &mut Frame) -> Result<FrameReport> {
        let index = self.frames_seen;
        self.process_frame_at(index, input, output)
    }

    /// Enhance one frame, reporting errors against `frame_index`.
    ///
    /// On error `output` is left untouched and no debug snapshot is recorded.
    #[instrument(skip(self, input, output), fields(width = input.width(), height = input.height()))]
    pub fn process_frame_at(
        &mut self,
        frame_index: usize,
        input: &Frame,
        output: &mut Frame,
    ) -> Result<FrameReport> {
        self.frames_seen = self.frames_seen.max(frame_index) + 1;

        if input.width() == 0 || input.height() == 0 {
            warn!(frame_index, "Empty input frame");
            return Err(SonowerkError::frame(frame_index, "input frame has no pixels"));
        }
        let fan = input.image.to_luma8();
        let stages = &self.stages;

        // Lines image
        let lines = match &stages.scan_converter {
            Some(converter) => converter.to_lines(&fan),
            None => fan.clone(),
        };
        let lines = match &stages.gaussian {
            Some(kernel) => gaussian_smooth(&lines, kernel),
            None => lines,
        };
        let statistics = Statistics::of(&lines);
        debug!(
            mean = statistics.mean,
            std_dev = statistics.std_dev,
            min = statistics.min,
            max = statistics.max,
            "Lines image statistics"
        );
        let unprocessed = lines.clone();

        // Binarization
        let threshold_mask = stages.threshold.map(|band| threshold(&lines, band));
        let edge_mask = stages.edge_threshold.map(|t| detect_edges(&lines, t));
        let mut mask = combine(threshold_mask, edge_mask, &lines);
        drop(lines);

        // Cleanup
        if let Some((min_area, connectivity)) = stages.islands {
            mask = remove_islands(mask, min_area, connectivity);
        }
        if let Some(kernel) = &stages.erosion {
            mask = erode(mask, kernel);
        }
        if let Some(kernel) = &stages.dilation {
            mask = dilate(mask, kernel);
        }

        let shadow_map = estimate_shadow(&mask, &unprocessed);

        let processed = if stages.restore {
            restore_greyscale(&mask, &unprocessed)
                .map_err(|err| SonowerkError::frame(frame_index, err.to_string()))?
        } else {
            mask.into_image()
        };
        let (lines_width, lines_height) = processed.dimensions();

        let (result, geometry) = match (&stages.scan_converter, stages.return_to_fan) {
            (Some(converter), true) => (
                converter
                    .from_lines(&processed, fan.width(), fan.height())
                    .map_err(|err| SonowerkError::frame(frame_index, err.to_string()))?,
                input.geometry,
            ),
            (Some(converter), false) => {
                let [sx, sy] = converter.lines_spacing();
                let geometry = ImageGeometry {
                    origin: input.geometry.origin,
                    spacing: [sx, sy, input.geometry.spacing[2]],
                };
                (processed.clone(), geometry)
            }
            (None, _) => (processed.clone(), input.geometry),
        };

        if self.debug.is_enabled() {
            self.debug
                .record(&unprocessed, &shadow_to_gray(&shadow_map), &processed);
        }

        output.image = DynamicImage::ImageLuma8(result);
        output.geometry = geometry;
        output.transforms = input.transforms.clone();
        output.timestamp = input.timestamp;

        info!(frame_index, lines_width, lines_height, "Frame enhanced");
        Ok(FrameReport {
            statistics,
            shadow_map,
            lines_width,
            lines_height,
        })
    }

    /// Write every configured debug sequence to disk.
    pub fn save_debug_sequences(&self) -> Result<usize> {
        self.debug.save()
    }
}
