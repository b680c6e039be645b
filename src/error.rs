// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Library error type.
//!
//! Only genuine failures live here. Degenerate geometry and stale pointer
//! events are expected during normal interaction and are dropped, not raised.

use std::path::PathBuf;

/// Errors raised by the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image could not be opened or its header could not be decoded.
    #[error("failed to load image {path}: {cause}")]
    ImageLoad {
        path: String,
        #[source]
        cause: image::ImageError,
    },

    #[error("unsupported file extension for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
