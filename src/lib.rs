//! Mediascore - ratings for the video files on disk
//!
//! This library crate exposes the pipeline pieces for the binary and for
//! integration testing.

pub mod config;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod resolver;
pub mod signal;
