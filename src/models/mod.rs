// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared between the engine and its host.

pub mod document;
pub mod element;
pub mod mode;
