// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sonowerk.

use thiserror::Error;

/// How the caller should react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The pipeline itself is unusable (bad options, missing geometry).
    /// Surfaced immediately, never retried.
    Fatal,
    /// Only the current frame is affected. The frame is skipped and the
    /// sequence carries on with the next one.
    SkipFrame,
}

/// Top-level error type for all Sonowerk operations.
#[derive(Debug, Error)]
pub enum SonowerkError {
    // -- Configuration --
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid value {value:?} for attribute {attribute} of element {element}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("required configuration element {0} is missing")]
    MissingElement(String),

    // -- Per-frame --
    #[error("frame {frame_index}: {reason}")]
    FrameProcessing { frame_index: usize, reason: String },

    #[error("frame {frame_index}: transform {transform} is not available")]
    TransformUnavailable { frame_index: usize, transform: String },

    // -- Image export / IO --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SonowerkError {
    /// Classify the error for the frame-loop policy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::FrameProcessing { .. } | Self::TransformUnavailable { .. } => {
                ErrorClass::SkipFrame
            }
            _ => ErrorClass::Fatal,
        }
    }

    /// Shorthand for building a `Configuration` error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Shorthand for building a `FrameProcessing` error.
    pub fn frame(frame_index: usize, reason: impl Into<String>) -> Self {
        Self::FrameProcessing {
            frame_index,
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SonowerkError>;
