//! Hlsgate-Common: Shared types, constants, and utilities.
//!
//! This crate provides the pieces shared by the HTTP front end and the
//! storage backends:
//!
//! - **Segment tokens**: reversible, URL-safe encoding of storage object names
//! - **Names**: validated video identifiers and segment object names
//! - **Media types**: content types and file extensions for HLS
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use hlsgate_common::token::{decode_segment_token, encode_segment_token};
//! use hlsgate_common::names::VideoName;
//!
//! let token = encode_segment_token("720p/segment0.ts");
//! assert_eq!(decode_segment_token(&token).unwrap(), "720p/segment0.ts");
//!
//! let video = VideoName::parse("demo").unwrap();
//! assert_eq!(video.manifest_object(), "demo.m3u8");
//! ```

pub mod error;
pub mod media;
pub mod names;
pub mod token;

pub use error::{Error, Result};
pub use names::{SegmentName, VideoName};
pub use token::{decode_segment_token, encode_segment_token, DecodeError};
