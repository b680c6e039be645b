// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! DrawZone - interactive region drawing over an image.
//!
//! A headless engine for drawing, selecting, moving and resizing rectangular
//! and polygonal regions over a pannable, zoomable image. Geometry is kept
//! in the image's native pixel space; the host feeds in pointer input and
//! receives normalized element lists back.

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod util;
pub mod zone;

pub use config::ZoneConfig;
pub use error::{Error, Result};
pub use models::element::Element;
pub use zone::{DrawZone, ZoneEvent, ZoneOptions};
