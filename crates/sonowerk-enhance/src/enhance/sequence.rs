// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Running the enhancer over an ordered frame sequence, skipping frames that
// cannot be processed.

use image::GrayImage;
use sonowerk_core::error::{ErrorClass, Result, SonowerkError};
use sonowerk_core::{Frame, ImageGeometry, Matrix4, TransformName};
use tracing::{info, instrument, warn};

use crate::enhance::enhancer::{FrameReport, TransverseProcessEnhancer};

/// Source of per-frame poses.
pub trait TransformProvider {
    /// Look up transform `name` for the frame at `frame_index`.
    fn transform(&self, frame_index: usize, frame: &Frame, name: &TransformName) -> Result<Matrix4>;
}

/// Reads poses from the frame's own transform table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTransforms;

impl TransformProvider for FrameTransforms {
    fn transform(&self, frame_index: usize, frame: &Frame, name: &TransformName) -> Result<Matrix4> {
        frame
            .transforms
            .get(&name.to_string())
            .copied()
            .ok_or_else(|| SonowerkError::TransformUnavailable {
                frame_index,
                transform: name.to_string(),
            })
    }
}

/// A frame left out of the output, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedFrame {
    pub frame_index: usize,
    pub reason: String,
}

/// Result of a sequence run. `outputs[i]` is `None` for skipped frames.
#[derive(Debug, Default)]
pub struct SequenceOutcome {
    pub outputs: Vec<Option<Frame>>,
    pub reports: Vec<Option<FrameReport>>,
    pub skipped: Vec<SkippedFrame>,
}

impl SequenceOutcome {
    pub fn processed_count(&self) -> usize {
        self.outputs.iter().filter(|o| o.is_some()).count()
    }
}

/// Enhance every frame in order.
///
/// With a transform provider, each input frame's geometry is refreshed from
/// the named image-to-reference pose before processing. Frame-level failures
/// are logged and skipped; configuration-level failures stop the run.
#[instrument(skip_all, fields(frames = frames.len()))]
pub fn process_sequence(
    enhancer: &mut TransverseProcessEnhancer,
    frames: &[Frame],
    transforms: Option<(&dyn TransformProvider, &TransformName)>,
) -> Result<SequenceOutcome> {
    let mut outcome = SequenceOutcome::default();

    for (frame_index, frame) in frames.iter().enumerate() {
        match process_one(enhancer, frame_index, frame, transforms) {
            Ok((output, report)) => {
                outcome.outputs.push(Some(output));
                outcome.reports.push(Some(report));
            }
            Err(err) if err.class() == ErrorClass::SkipFrame => {
                warn!(
                    frame_index,
                    transform = %transforms.map(|(_, name)| name.to_string()).unwrap_or_default(),
                    error = %err,
                    "Skipping frame"
                );
                outcome.outputs.push(None);
                outcome.reports.push(None);
                outcome.skipped.push(SkippedFrame {
                    frame_index,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        processed = outcome.processed_count(),
        skipped = outcome.skipped.len(),
        "Sequence processed"
    );
    Ok(outcome)
}

fn process_one(
    enhancer: &mut TransverseProcessEnhancer,
    frame_index: usize,
    frame: &Frame,
    transforms: Option<(&dyn TransformProvider, &TransformName)>,
) -> Result<(Frame, FrameReport)> {
    let refreshed;
    let input = match transforms {
        Some((provider, name)) => {
            let pose = provider.transform(frame_index, frame, name)?;
            let mut copy = frame.clone();
            copy.geometry = ImageGeometry::from_image_to_reference(&pose);
            refreshed = copy;
            &refreshed
        }
        None => frame,
    };

    let mut output = Frame::from_gray(GrayImage::new(0, 0));
    let report = enhancer.process_frame_at(frame_index, input, &mut output)?;
    Ok((output, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use sonowerk_core::{EnhancerConfig, IDENTITY};

    fn frame(value: u8) -> Frame {
        Frame::from_gray(GrayImage::from_pixel(6, 4, Luma([value])))
    }

    fn scaled_pose() -> Matrix4 {
        let mut m = IDENTITY;
        m[0][0] = 0.5;
        m[1][1] = 0.25;
        m[0][3] = 10.0;
        m
    }

    #[test]
    fn bad_frames_are_skipped_and_run_continues() {
        let mut enhancer = TransverseProcessEnhancer::new(EnhancerConfig::default()).unwrap();
        let frames = vec![frame(10), Frame::from_gray(GrayImage::new(0, 0)), frame(30)];

        let outcome = process_sequence(&mut enhancer, &frames, None).unwrap();
        assert_eq!(outcome.outputs.len(), 3);
        assert!(outcome.outputs[1].is_none());
        assert_eq!(outcome.processed_count(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].frame_index, 1);
        let last = outcome.outputs[2].as_ref().unwrap();
        assert_eq!(last.image.to_luma8().get_pixel(0, 0).0[0], 30);
    }

    #[test]
    fn geometry_is_refreshed_from_pose() {
        let name = TransformName::parse("ImageToReference").unwrap();
        let frames = vec![frame(5).with_transform(&name, scaled_pose())];
        let mut enhancer = TransverseProcessEnhancer::default();

        let outcome =
            process_sequence(&mut enhancer, &frames, Some((&FrameTransforms, &name))).unwrap();
        let out = outcome.outputs[0].as_ref().unwrap();
        assert_eq!(out.geometry.origin, [10.0, 0.0, 0.0]);
        assert_eq!(out.geometry.spacing, [0.5, 0.25, 1.0]);
    }

    #[test]
    fn missing_transform_skips_only_that_frame() {
        let name = TransformName::parse("ImageToReference").unwrap();
        let frames = vec![
            frame(1).with_transform(&name, IDENTITY),
            frame(2),
            frame(3).with_transform(&name, IDENTITY),
        ];
        let mut enhancer = TransverseProcessEnhancer::default();

        let outcome =
            process_sequence(&mut enhancer, &frames, Some((&FrameTransforms, &name))).unwrap();
        assert_eq!(outcome.processed_count(), 2);
        assert_eq!(outcome.skipped[0].frame_index, 1);
        assert!(outcome.skipped[0].reason.contains("ImageToReference"));
    }

    struct BrokenProvider;

    impl TransformProvider for BrokenProvider {
        fn transform(&self, _: usize, _: &Frame, _: &TransformName) -> Result<Matrix4> {
            Err(SonowerkError::config("tracker not configured"))
        }
    }

    #[test]
    fn fatal_errors_stop_the_run() {
        let name = TransformName::parse("ProbeToTracker").unwrap();
        let mut enhancer = TransverseProcessEnhancer::default();
        let result = process_sequence(&mut enhancer, &[frame(1)], Some((&BrokenProvider, &name)));
        assert!(matches!(result, Err(SonowerkError::Configuration(_))));
    }
}
