// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Grouping, batching and round-trip properties of the synchronization engine.

mod grouping;
mod operator_roundtrip;
