// Copyright 2026 Local Server Contributors
// SPDX-License-Identifier: Apache-2.0

//! local-server runtime: shortcut redirects and diversion pages for a fixed
//! set of locally-resolved domains.
//!
//! This library crate exposes the runtime modules for integration testing.

pub mod acquisition;
pub mod cli;
pub mod render;
pub mod rest;
