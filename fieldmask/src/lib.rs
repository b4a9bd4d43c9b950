// fieldmask/src/lib.rs
//! # fieldmask CLI Application
//!
//! This crate provides the command-line interface for the `fieldmask-core`
//! masking engine: `fieldmask mask` masks one JSON document and
//! `fieldmask check` compiles rule expressions and prints the merged rule tree.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
