// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Code generation for Minnow.
//!
//! This module contains code generators for target formats:
//! - **`javascript`**: JavaScript source-text generation, fused with
//!   semantic validation against the host registration table

pub mod javascript;
