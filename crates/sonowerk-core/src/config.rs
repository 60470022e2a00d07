// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::element::ConfigElement;
use crate::error::{Result, SonowerkError};

/// Name of the child element carrying the transducer geometry.
pub const SCAN_CONVERSION_ELEMENT: &str = "ScanConversion";

/// Value written to the processor element's `Type` attribute.
pub const PROCESSOR_TYPE: &str = "TransverseProcessEnhancer";

/// Neighbourhood used when grouping foreground pixels into islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Horizontal and vertical neighbours only.
    Four,
    /// Diagonal neighbours as well.
    Eight,
}

impl Connectivity {
    fn from_count(n: i32) -> Option<Self> {
        match n {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    fn count(self) -> i32 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// Shape of the acoustic field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransducerGeometry {
    /// Convex probe: scan lines fan out from a common centre.
    Curvilinear {
        radius_start_mm: f64,
        radius_stop_mm: f64,
        theta_start_deg: f64,
        theta_stop_deg: f64,
    },
    /// Linear probe: parallel scan lines.
    Linear {
        imaging_depth_mm: f64,
        transducer_width_mm: f64,
    },
}

/// Transducer geometry needed to resample between fan and lines images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanGeometry {
    pub transducer: TransducerGeometry,
    /// Pixel position of the transducer centre (curvilinear: centre of the
    /// arc; linear: middle of the transducer face).
    pub transducer_center_pixel: [f64; 2],
    /// Fan image pixel size in millimetres (x, y).
    pub output_image_spacing_mm_per_pixel: [f64; 2],
}

impl ScanGeometry {
    pub fn validate(&self) -> Result<()> {
        let [sx, sy] = self.output_image_spacing_mm_per_pixel;
        if !(sx > 0.0 && sy > 0.0) {
            return Err(SonowerkError::config(format!(
                "OutputImageSpacingMmPerPixel must be positive, got [{sx}, {sy}]"
            )));
        }
        if !self.transducer_center_pixel.iter().all(|v| v.is_finite()) {
            return Err(SonowerkError::config("TransducerCenterPixel must be finite"));
        }
        match self.transducer {
            TransducerGeometry::Curvilinear {
                radius_start_mm,
                radius_stop_mm,
                theta_start_deg,
                theta_stop_deg,
            } => {
                if !(radius_start_mm >= 0.0 && radius_stop_mm > radius_start_mm) {
                    return Err(SonowerkError::config(format!(
                        "radius range [{radius_start_mm}, {radius_stop_mm}] mm is empty or negative"
                    )));
                }
                if !(theta_stop_deg > theta_start_deg)
                    || theta_start_deg < -180.0
                    || theta_stop_deg > 180.0
                {
                    return Err(SonowerkError::config(format!(
                        "angle range [{theta_start_deg}, {theta_stop_deg}] deg is invalid"
                    )));
                }
            }
            TransducerGeometry::Linear {
                imaging_depth_mm,
                transducer_width_mm,
            } => {
                if !(imaging_depth_mm > 0.0 && transducer_width_mm > 0.0) {
                    return Err(SonowerkError::config(format!(
                        "linear transducer needs positive depth and width, got {imaging_depth_mm} x {transducer_width_mm} mm"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parse a `ScanConversion` element.
    pub fn read_element(el: &ConfigElement) -> Result<Self> {
        let required = |key: &str| -> Result<f64> {
            el.scalar_attribute::<f64>(key)?.ok_or_else(|| {
                SonowerkError::config(format!("{} is missing attribute {key}", el.name))
            })
        };
        let required_pair = |key: &str| -> Result<[f64; 2]> {
            el.pair_attribute::<f64>(key)?.ok_or_else(|| {
                SonowerkError::config(format!("{} is missing attribute {key}", el.name))
            })
        };

        let kind = el
            .attribute("TransducerGeometry")
            .map(|s| s.trim().to_ascii_uppercase())
            .ok_or_else(|| SonowerkError::config("ScanConversion is missing TransducerGeometry"))?;
        let transducer = match kind.as_str() {
            "CURVILINEAR" => TransducerGeometry::Curvilinear {
                radius_start_mm: required("RadiusStartMm")?,
                radius_stop_mm: required("RadiusStopMm")?,
                theta_start_deg: required("ThetaStartDeg")?,
                theta_stop_deg: required("ThetaStopDeg")?,
            },
            "LINEAR" => TransducerGeometry::Linear {
                imaging_depth_mm: required("ImagingDepthMm")?,
                transducer_width_mm: required("TransducerWidthMm")?,
            },
            other => {
                return Err(SonowerkError::InvalidAttribute {
                    element: el.name.clone(),
                    attribute: "TransducerGeometry".into(),
                    value: other.into(),
                });
            }
        };

        let geometry = Self {
            transducer,
            transducer_center_pixel: required_pair("TransducerCenterPixel")?,
            output_image_spacing_mm_per_pixel: required_pair("OutputImageSpacingMmPerPixel")?,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Write into a `ScanConversion` element, replacing any previous values.
    pub fn write_element(&self, el: &mut ConfigElement) {
        el.attributes.clear();
        match self.transducer {
            TransducerGeometry::Curvilinear {
                radius_start_mm,
                radius_stop_mm,
                theta_start_deg,
                theta_stop_deg,
            } => {
                el.set_attribute("TransducerGeometry", "CURVILINEAR");
                el.set_attribute("RadiusStartMm", radius_start_mm);
                el.set_attribute("RadiusStopMm", radius_stop_mm);
                el.set_attribute("ThetaStartDeg", theta_start_deg);
                el.set_attribute("ThetaStopDeg", theta_stop_deg);
            }
            TransducerGeometry::Linear {
                imaging_depth_mm,
                transducer_width_mm,
            } => {
                el.set_attribute("TransducerGeometry", "LINEAR");
                el.set_attribute("ImagingDepthMm", imaging_depth_mm);
                el.set_attribute("TransducerWidthMm", transducer_width_mm);
            }
        }
        el.set_pair("TransducerCenterPixel", self.transducer_center_pixel);
        el.set_pair(
            "OutputImageSpacingMmPerPixel",
            self.output_image_spacing_mm_per_pixel,
        );
    }
}

/// Every option of the enhancement pipeline.
///
/// Defaults leave all optional stages disabled so a freshly constructed
/// pipeline passes frames through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    pub convert_to_lines_image: bool,
    pub number_of_scan_lines: i32,
    pub number_of_samples_per_scan_line: i32,
    pub scan_geometry: Option<ScanGeometry>,

    pub gaussian_enabled: bool,
    pub gaussian_std_dev: f64,
    pub gaussian_kernel_size: i32,

    pub thresholding_enabled: bool,
    pub threshold_in_value: f64,
    pub threshold_out_value: f64,
    pub lower_threshold: f64,
    pub upper_threshold: f64,

    pub edge_detector_enabled: bool,
    /// Minimum gradient magnitude counted as an edge.
    pub edge_threshold: f64,

    pub island_removal_enabled: bool,
    pub island_area_threshold: i32,
    pub island_connectivity: Connectivity,

    pub erosion_enabled: bool,
    pub erosion_kernel_size: [i32; 2],

    pub dilation_enabled: bool,
    pub dilation_kernel_size: [i32; 2],

    pub reconvert_binary_to_greyscale: bool,
    pub return_to_fan_image: bool,

    pub lines_image_file_name: Option<String>,
    pub intermediate_image_file_name: Option<String>,
    pub processed_lines_image_file_name: Option<String>,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            convert_to_lines_image: false,
            number_of_scan_lines: 0,
            number_of_samples_per_scan_line: 0,
            scan_geometry: None,
            gaussian_enabled: false,
            gaussian_std_dev: 3.0,
            gaussian_kernel_size: 5,
            thresholding_enabled: false,
            threshold_in_value: 255.0,
            threshold_out_value: 0.0,
            lower_threshold: 0.0,
            upper_threshold: 255.0,
            edge_detector_enabled: false,
            edge_threshold: 10.0,
            island_removal_enabled: false,
            island_area_threshold: 0,
            island_connectivity: Connectivity::Four,
            erosion_enabled: false,
            erosion_kernel_size: [1, 1],
            dilation_enabled: false,
            dilation_kernel_size: [1, 1],
            reconvert_binary_to_greyscale: false,
            return_to_fan_image: false,
            lines_image_file_name: None,
            intermediate_image_file_name: None,
            processed_lines_image_file_name: None,
        }
    }
}

impl EnhancerConfig {
    /// Check every cross-option constraint. Called before a configuration is
    /// accepted so that bad options fail at setup time, not on a frame.
    pub fn validate(&self) -> Result<()> {
        if self.convert_to_lines_image {
            if self.number_of_scan_lines < 2 || self.number_of_samples_per_scan_line < 2 {
                return Err(SonowerkError::config(format!(
                    "lines image must be at least 2x2, got {} scan lines x {} samples",
                    self.number_of_scan_lines, self.number_of_samples_per_scan_line
                )));
            }
            match &self.scan_geometry {
                Some(geometry) => geometry.validate()?,
                None => return Err(SonowerkError::MissingElement(SCAN_CONVERSION_ELEMENT.into())),
            }
        }
        if self.return_to_fan_image && !self.convert_to_lines_image {
            return Err(SonowerkError::config(
                "ReturnToFanImage requires ConvertToLinesImage",
            ));
        }

        if self.gaussian_enabled {
            if self.gaussian_kernel_size <= 0 || self.gaussian_kernel_size % 2 == 0 {
                return Err(SonowerkError::config(format!(
                    "GaussianKernelSize must be a positive odd integer, got {}",
                    self.gaussian_kernel_size
                )));
            }
            if !(self.gaussian_std_dev > 0.0) {
                return Err(SonowerkError::config(format!(
                    "GaussianStdDev must be positive, got {}",
                    self.gaussian_std_dev
                )));
            }
        }

        if self.thresholding_enabled {
            if self.lower_threshold > self.upper_threshold {
                return Err(SonowerkError::config(format!(
                    "LowerThreshold {} exceeds UpperThreshold {}",
                    self.lower_threshold, self.upper_threshold
                )));
            }
            for (name, value) in [
                ("ThresholdInValue", self.threshold_in_value),
                ("ThresholdOutValue", self.threshold_out_value),
            ] {
                if !(0.0..=255.0).contains(&value) {
                    return Err(SonowerkError::config(format!(
                        "{name} must lie in [0, 255], got {value}"
                    )));
                }
            }
            // Compared as the 8-bit values the stage writes.
            if self.threshold_in_value.round() == self.threshold_out_value.round() {
                return Err(SonowerkError::config(format!(
                    "ThresholdInValue {} and ThresholdOutValue {} are the same 8-bit value",
                    self.threshold_in_value, self.threshold_out_value
                )));
            }
        }

        if self.island_removal_enabled && self.island_area_threshold < 0 {
            return Err(SonowerkError::config(format!(
                "IslandAreaThreshold must not be negative, got {}",
                self.island_area_threshold
            )));
        }

        for (enabled, name, size) in [
            (self.erosion_enabled, "ErosionKernelSize", self.erosion_kernel_size),
            (self.dilation_enabled, "DilationKernelSize", self.dilation_kernel_size),
        ] {
            if enabled && size.iter().any(|&k| k <= 0) {
                return Err(SonowerkError::config(format!(
                    "{name} must be positive, got [{}, {}]",
                    size[0], size[1]
                )));
            }
        }
        Ok(())
    }

    /// Read options from a processor element on top of the current values.
    /// Absent attributes keep their current value. The result is validated
    /// before it is returned.
    pub fn read_element(&self, el: &ConfigElement) -> Result<Self> {
        let mut cfg = self.clone();

        macro_rules! read {
            (bool $key:literal => $field:ident) => {
                if let Some(v) = el.bool_attribute($key)? {
                    cfg.$field = v;
                }
            };
            (scalar $key:literal => $field:ident) => {
                if let Some(v) = el.scalar_attribute($key)? {
                    cfg.$field = v;
                }
            };
            (pair $key:literal => $field:ident) => {
                if let Some(v) = el.pair_attribute($key)? {
                    cfg.$field = v;
                }
            };
            (string $key:literal => $field:ident) => {
                if el.attribute($key).is_some() {
                    cfg.$field = el.string_attribute($key);
                }
            };
        }

        read!(bool "ConvertToLinesImage" => convert_to_lines_image);
        read!(scalar "NumberOfScanLines" => number_of_scan_lines);
        read!(scalar "NumberOfSamplesPerScanLine" => number_of_samples_per_scan_line);

        read!(bool "GaussianEnabled" => gaussian_enabled);
        read!(scalar "GaussianStdDev" => gaussian_std_dev);
        read!(scalar "GaussianKernelSize" => gaussian_kernel_size);

        read!(bool "ThresholdingEnabled" => thresholding_enabled);
        read!(scalar "ThresholdInValue" => threshold_in_value);
        read!(scalar "ThresholdOutValue" => threshold_out_value);
        read!(scalar "LowerThreshold" => lower_threshold);
        read!(scalar "UpperThreshold" => upper_threshold);

        read!(bool "EdgeDetectorEnabled" => edge_detector_enabled);
        read!(scalar "EdgeThreshold" => edge_threshold);

        read!(bool "IslandRemovalEnabled" => island_removal_enabled);
        read!(scalar "IslandAreaThreshold" => island_area_threshold);
        if let Some(n) = el.scalar_attribute::<i32>("IslandConnectivity")? {
            cfg.island_connectivity =
                Connectivity::from_count(n).ok_or_else(|| SonowerkError::InvalidAttribute {
                    element: el.name.clone(),
                    attribute: "IslandConnectivity".into(),
                    value: n.to_string(),
                })?;
        }

        read!(bool "ErosionEnabled" => erosion_enabled);
        read!(pair "ErosionKernelSize" => erosion_kernel_size);
        read!(bool "DilationEnabled" => dilation_enabled);
        read!(pair "DilationKernelSize" => dilation_kernel_size);

        read!(bool "ReconvertBinaryToGreyscale" => reconvert_binary_to_greyscale);
        read!(bool "ReturnToFanImage" => return_to_fan_image);

        read!(string "LinesImageFileName" => lines_image_file_name);
        read!(string "IntermediateImageFileName" => intermediate_image_file_name);
        read!(string "ProcessedLinesImageFileName" => processed_lines_image_file_name);

        if let Some(scan) = el.child(SCAN_CONVERSION_ELEMENT) {
            cfg.scan_geometry = Some(ScanGeometry::read_element(scan)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Write every option into a processor element.
    pub fn write_element(&self, el: &mut ConfigElement) {
        el.set_attribute("Type", PROCESSOR_TYPE);

        el.set_bool("ConvertToLinesImage", self.convert_to_lines_image);
        el.set_attribute("NumberOfScanLines", self.number_of_scan_lines);
        el.set_attribute("NumberOfSamplesPerScanLine", self.number_of_samples_per_scan_line);

        el.set_bool("GaussianEnabled", self.gaussian_enabled);
        el.set_attribute("GaussianStdDev", self.gaussian_std_dev);
        el.set_attribute("GaussianKernelSize", self.gaussian_kernel_size);

        el.set_bool("ThresholdingEnabled", self.thresholding_enabled);
        el.set_attribute("ThresholdInValue", self.threshold_in_value);
        el.set_attribute("ThresholdOutValue", self.threshold_out_value);
        el.set_attribute("LowerThreshold", self.lower_threshold);
        el.set_attribute("UpperThreshold", self.upper_threshold);

        el.set_bool("EdgeDetectorEnabled", self.edge_detector_enabled);
        el.set_attribute("EdgeThreshold", self.edge_threshold);

        el.set_bool("IslandRemovalEnabled", self.island_removal_enabled);
        el.set_attribute("IslandAreaThreshold", self.island_area_threshold);
        el.set_attribute("IslandConnectivity", self.island_connectivity.count());

        el.set_bool("ErosionEnabled", self.erosion_enabled);
        el.set_pair("ErosionKernelSize", self.erosion_kernel_size);
        el.set_bool("DilationEnabled", self.dilation_enabled);
        el.set_pair("DilationKernelSize", self.dilation_kernel_size);

        el.set_bool("ReconvertBinaryToGreyscale", self.reconvert_binary_to_greyscale);
        el.set_bool("ReturnToFanImage", self.return_to_fan_image);

        for (key, value) in [
            ("LinesImageFileName", &self.lines_image_file_name),
            ("IntermediateImageFileName", &self.intermediate_image_file_name),
            ("ProcessedLinesImageFileName", &self.processed_lines_image_file_name),
        ] {
            match value {
                Some(name) => el.set_attribute(key, name),
                None => {
                    el.attributes.remove(key);
                }
            }
        }

        match &self.scan_geometry {
            Some(geometry) => geometry.write_element(el.child_mut_or_insert(SCAN_CONVERSION_ELEMENT)),
            None => el.children.retain(|c| c.name != SCAN_CONVERSION_ELEMENT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curvilinear() -> ScanGeometry {
        ScanGeometry {
            transducer: TransducerGeometry::Curvilinear {
                radius_start_mm: 10.0,
                radius_stop_mm: 60.0,
                theta_start_deg: -30.0,
                theta_stop_deg: 30.0,
            },
            transducer_center_pixel: [200.0, 0.0],
            output_image_spacing_mm_per_pixel: [0.2, 0.2],
        }
    }

    fn converting() -> EnhancerConfig {
        EnhancerConfig {
            convert_to_lines_image: true,
            number_of_scan_lines: 64,
            number_of_samples_per_scan_line: 200,
            scan_geometry: Some(curvilinear()),
            ..EnhancerConfig::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        EnhancerConfig::default().validate().unwrap();
        converting().validate().unwrap();
    }

    #[test]
    fn even_or_non_positive_gaussian_kernel_is_rejected() {
        for size in [0, -3, 4] {
            let cfg = EnhancerConfig {
                gaussian_enabled: true,
                gaussian_kernel_size: size,
                ..EnhancerConfig::default()
            };
            assert!(cfg.validate().is_err(), "kernel size {size} accepted");
        }
    }

    #[test]
    fn morphology_kernels_must_be_positive() {
        let cfg = EnhancerConfig {
            erosion_enabled: true,
            erosion_kernel_size: [3, 0],
            ..EnhancerConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = EnhancerConfig {
            dilation_enabled: true,
            dilation_kernel_size: [-1, 3],
            ..EnhancerConfig::default()
        };
        assert!(cfg.validate().is_err());

        // Disabled stages are not checked.
        let cfg = EnhancerConfig {
            erosion_kernel_size: [0, 0],
            ..EnhancerConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn conversion_requires_geometry_and_grid() {
        let cfg = EnhancerConfig {
            scan_geometry: None,
            ..converting()
        };
        assert!(matches!(cfg.validate(), Err(SonowerkError::MissingElement(_))));

        let cfg = EnhancerConfig {
            number_of_scan_lines: 1,
            ..converting()
        };
        assert!(cfg.validate().is_err());

        let cfg = EnhancerConfig {
            return_to_fan_image: true,
            ..EnhancerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_gaussian_std_dev_is_rejected() {
        for std_dev in [0.0, -1.5, f64::NAN] {
            let cfg = EnhancerConfig {
                gaussian_enabled: true,
                gaussian_std_dev: std_dev,
                ..EnhancerConfig::default()
            };
            assert!(cfg.validate().is_err(), "std-dev {std_dev} accepted");
        }
    }

    #[test]
    fn threshold_output_values_must_be_distinct_bytes() {
        let thresholding = |in_value: f64, out_value: f64| EnhancerConfig {
            thresholding_enabled: true,
            threshold_in_value: in_value,
            threshold_out_value: out_value,
            ..EnhancerConfig::default()
        };
        assert!(thresholding(0.0, 0.0).validate().is_err());
        assert!(thresholding(100.2, 99.8).validate().is_err());
        assert!(thresholding(300.0, 0.0).validate().is_err());
        assert!(thresholding(255.0, -1.0).validate().is_err());
        thresholding(0.0, 255.0).validate().unwrap();
        thresholding(128.0, 127.0).validate().unwrap();

        // Only checked while thresholding is enabled.
        EnhancerConfig {
            threshold_in_value: 0.0,
            threshold_out_value: 0.0,
            ..EnhancerConfig::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn inverted_threshold_band_is_rejected() {
        let cfg = EnhancerConfig {
            thresholding_enabled: true,
            lower_threshold: 200.0,
            upper_threshold: 100.0,
            ..EnhancerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn read_element_applies_attributes_over_defaults() {
        let mut el = ConfigElement::new("Processor");
        el.set_attribute("ThresholdingEnabled", "TRUE");
        el.set_attribute("LowerThreshold", "120");
        el.set_attribute("IslandRemovalEnabled", "true");
        el.set_attribute("IslandAreaThreshold", "20");
        el.set_attribute("IslandConnectivity", "8");
        el.set_attribute("ErosionKernelSize", "3 5");
        el.set_attribute("LinesImageFileName", "lines.png");

        let cfg = EnhancerConfig::default().read_element(&el).unwrap();
        assert!(cfg.thresholding_enabled);
        assert_eq!(cfg.lower_threshold, 120.0);
        assert_eq!(cfg.upper_threshold, 255.0);
        assert_eq!(cfg.island_area_threshold, 20);
        assert_eq!(cfg.island_connectivity, Connectivity::Eight);
        assert_eq!(cfg.erosion_kernel_size, [3, 5]);
        assert_eq!(cfg.lines_image_file_name.as_deref(), Some("lines.png"));
    }

    #[test]
    fn read_element_rejects_bad_connectivity_and_geometry() {
        let mut el = ConfigElement::new("Processor");
        el.set_attribute("IslandConnectivity", "6");
        assert!(EnhancerConfig::default().read_element(&el).is_err());

        let mut el = ConfigElement::new("Processor");
        el.child_mut_or_insert(SCAN_CONVERSION_ELEMENT)
            .set_attribute("TransducerGeometry", "PHASED");
        assert!(EnhancerConfig::default().read_element(&el).is_err());
    }

    #[test]
    fn write_then_read_reproduces_configuration() {
        let cfg = EnhancerConfig {
            gaussian_enabled: true,
            gaussian_std_dev: 1.25,
            gaussian_kernel_size: 7,
            thresholding_enabled: true,
            lower_threshold: 120.0,
            erosion_enabled: true,
            erosion_kernel_size: [3, 5],
            processed_lines_image_file_name: Some("processed.png".into()),
            ..converting()
        };
        let mut el = ConfigElement::new("Processor");
        cfg.write_element(&mut el);
        assert_eq!(el.attribute("Type"), Some(PROCESSOR_TYPE));
        assert!(el.child(SCAN_CONVERSION_ELEMENT).is_some());

        let back = EnhancerConfig::default().read_element(&el).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn linear_geometry_round_trips() {
        let geometry = ScanGeometry {
            transducer: TransducerGeometry::Linear {
                imaging_depth_mm: 40.0,
                transducer_width_mm: 38.5,
            },
            transducer_center_pixel: [128.0, 12.0],
            output_image_spacing_mm_per_pixel: [0.15, 0.15],
        };
        let mut el = ConfigElement::new(SCAN_CONVERSION_ELEMENT);
        geometry.write_element(&mut el);
        assert_eq!(ScanGeometry::read_element(&el).unwrap(), geometry);
    }
}
