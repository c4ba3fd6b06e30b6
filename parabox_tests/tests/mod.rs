// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `parabox`.
//!
//! - The `util` module contains shared helpers for building sources and comparing layouts.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which makes the shared helpers easy to reach.
//! - Put new tests into the module matching their topic, and start test names with that
//!   topic, e.g. `relayout_insert_in_middle` rather than `insert_in_middle_relayout`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod properties;
mod util;
