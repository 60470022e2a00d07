// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optional per-frame snapshots kept for offline inspection, and their export
// as numbered PNG files.

use std::path::{Path, PathBuf};

use image::GrayImage;
use sonowerk_core::EnhancerConfig;
use sonowerk_core::error::{Result, SonowerkError};
use tracing::{debug, info, instrument};

/// Snapshots destined for one export target.
#[derive(Debug, Clone)]
pub struct DebugSequence {
    target: PathBuf,
    frames: Vec<GrayImage>,
}

impl DebugSequence {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            frames: Vec::new(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn frames(&self) -> &[GrayImage] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// File written for the snapshot at `index`: `<stem>_<NNNN>.png` next to
    /// the configured target.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        let stem = self
            .target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        self.target.with_file_name(format!("{stem}_{index:04}.png"))
    }

    /// Write every snapshot. Returns the number of files written.
    pub fn save(&self) -> Result<usize> {
        if let Some(parent) = self.target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        for (index, frame) in self.frames.iter().enumerate() {
            let path = self.frame_path(index);
            frame.save(&path).map_err(|err| {
                SonowerkError::ImageError(format!(
                    "failed to save debug image to {}: {}",
                    path.display(),
                    err
                ))
            })?;
        }
        debug!(target = %self.target.display(), frames = self.frames.len(), "Debug sequence written");
        Ok(self.frames.len())
    }
}

/// The three optional snapshot lists: lines images, intermediate (shadow)
/// images, and processed lines images. A list exists only while its file
/// name is configured, and grows by one snapshot per completed frame.
#[derive(Debug, Clone, Default)]
pub struct DebugCollections {
    pub lines: Option<DebugSequence>,
    pub intermediate: Option<DebugSequence>,
    pub processed: Option<DebugSequence>,
}

impl DebugCollections {
    pub fn from_config(config: &EnhancerConfig) -> Self {
        let mut collections = Self::default();
        collections.reconfigure(config);
        collections
    }

    /// Follow a configuration change. Lists whose target is unchanged keep
    /// their snapshots; others are started afresh or dropped.
    pub fn reconfigure(&mut self, config: &EnhancerConfig) {
        fn update(slot: &mut Option<DebugSequence>, name: &Option<String>) {
            match name {
                Some(name) if slot.as_ref().is_some_and(|s| s.target == Path::new(name)) => {}
                Some(name) => *slot = Some(DebugSequence::new(name)),
                None => *slot = None,
            }
        }
        update(&mut self.lines, &config.lines_image_file_name);
        update(&mut self.intermediate, &config.intermediate_image_file_name);
        update(&mut self.processed, &config.processed_lines_image_file_name);
    }

    /// Whether any export target is configured.
    pub fn is_enabled(&self) -> bool {
        self.lines.is_some() || self.intermediate.is_some() || self.processed.is_some()
    }

    /// Append one frame's snapshots to every configured list.
    pub(crate) fn record(&mut self, lines: &GrayImage, intermediate: &GrayImage, processed: &GrayImage) {
        for (slot, image) in [
            (&mut self.lines, lines),
            (&mut self.intermediate, intermediate),
            (&mut self.processed, processed),
        ] {
            if let Some(sequence) = slot {
                sequence.frames.push(image.clone());
            }
        }
    }

    /// Write all configured lists to disk.
    #[instrument(skip(self))]
    pub fn save(&self) -> Result<usize> {
        let mut written = 0;
        for sequence in [&self.lines, &self.intermediate, &self.processed]
            .into_iter()
            .flatten()
        {
            written += sequence.save()?;
        }
        info!(written, "Debug sequences saved");
        Ok(written)
    }
}
