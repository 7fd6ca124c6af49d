// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotations, sessions, the navigation stack and the manifest.

pub mod annotation;
pub mod manifest;
pub mod navigation;
pub mod session;
