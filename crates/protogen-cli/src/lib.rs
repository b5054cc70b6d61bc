//! protogen CLI library.
//!
//! Command implementations for the `protogen` binary.

pub mod commands;
