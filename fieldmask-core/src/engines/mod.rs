// fieldmask-core/src/engines/mod.rs
//! This module contains the masking engine implementations.
//!
//! Each engine is a separate file within this directory and implements the
//! `MaskingEngine` trait. The rule-tree engine is currently the only one.

pub mod rule_engine;
