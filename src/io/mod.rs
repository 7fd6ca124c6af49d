// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: input images, saved artifacts and the manifest.

pub mod artifacts;
pub mod media;
pub mod serialization;
