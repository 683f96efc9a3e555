//! Hlsgate - HLS front end for object storage
//!
//! This library crate exposes the server, handlers and configuration for
//! integration testing and the CLI.

pub mod config;
pub mod server;
pub mod streaming;
