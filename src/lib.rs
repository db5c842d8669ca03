//! Build environment bootstrap library
//!
//! This library provides the fetch-and-extract logic behind the `setup-buildenv` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
