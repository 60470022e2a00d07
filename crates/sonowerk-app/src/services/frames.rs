// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame directory I/O: loading input frames (with optional recorded poses)
// and writing enhanced frames back out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sonowerk_core::error::{Result, SonowerkError};
use sonowerk_core::{Frame, Matrix4};
use tracing::{debug, info, warn};

/// Sidecar file in the input directory holding per-frame poses.
pub const POSES_FILE: &str = "poses.json";

const FRAME_EXTENSIONS: &[&str] = &["png", "bmp", "tif", "tiff", "jpg", "jpeg"];

/// Recorded poses and timestamp for one frame file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FramePoses {
    pub timestamp: f64,
    pub transforms: BTreeMap<String, Matrix4>,
}

/// A loaded frame together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedFrame {
    pub path: PathBuf,
    pub frame: Frame,
}

/// Image files in `dir`, sorted by name.
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Load every frame in `dir`, attaching poses from `poses.json` when present.
///
/// A file that cannot be decoded becomes an empty frame so the sequence
/// runner reports it as skipped at its position.
pub fn load_frames(dir: &Path) -> Result<Vec<LoadedFrame>> {
    let poses = load_poses(dir)?;
    let paths = list_frames(dir)?;
    info!(dir = %dir.display(), count = paths.len(), "Loading frames");

    let frames = paths
        .into_iter()
        .map(|path| {
            let mut frame = match image::open(&path) {
                Ok(img) => Frame::new(img),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Unreadable frame");
                    Frame::from_gray(image::GrayImage::new(0, 0))
                }
            };
            let name = file_name(&path);
            if let Some(p) = poses.get(&name) {
                frame.timestamp = p.timestamp;
                frame.transforms = p.transforms.clone();
            }
            LoadedFrame { path, frame }
        })
        .collect();
    Ok(frames)
}

fn load_poses(dir: &Path) -> Result<BTreeMap<String, FramePoses>> {
    let path = dir.join(POSES_FILE);
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let text = std::fs::read_to_string(&path)?;
    let poses: BTreeMap<String, FramePoses> = serde_json::from_str(&text)?;
    debug!(frames = poses.len(), "Poses loaded");
    Ok(poses)
}

/// Save an enhanced frame under `out_dir` as PNG, keeping the input's stem.
pub fn save_frame(out_dir: &Path, source: &Path, frame: &Frame) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let path = out_dir.join(format!("{stem}.png"));
    frame.image.save(&path).map_err(|e| {
        SonowerkError::ImageError(format!("failed to save {}: {}", path.display(), e))
    })?;
    Ok(path)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
