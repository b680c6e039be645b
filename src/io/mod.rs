// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images and documents.

pub mod image_size;
pub mod media;
pub mod serialization;
