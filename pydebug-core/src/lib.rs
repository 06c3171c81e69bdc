//! # pydebug-core
//!
//! Core library for pydebug - decoding of pydevd debugger wire messages.
//!
//! This library provides:
//! - Domain types for threads, frames, values, threading events and arrays
//! - Decoders from the XML wire format into those types
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Decoding is layered:
//! - **Reader:** a [`TreeReader`] cursor over the message tree
//! - **Attributes:** required/optional reads with percent-decoding
//! - **Decoders:** one per message kind, composing each other for nested nodes
//!
//! Decoding is synchronous and allocation-only: no I/O, no shared state.
//! Independent payloads may be decoded on different threads.
//!
//! ## Example
//!
//! ```rust
//! use pydebug_core::decode::parse_thread;
//! use pydebug_core::position::IdentityConverter;
//!
//! let thread = parse_thread(
//!     r#"<xml><thread id="1" name="MainThread" stop_reason="0" message="None"></thread></xml>"#,
//!     &IdentityConverter,
//! )
//! .expect("valid payload");
//! assert_eq!(thread.name, "MainThread");
//! assert!(thread.message.is_none());
//! ```

// Re-export commonly used items at the crate root
pub use accessor::{AccessorLink, FrameAccessor};
pub use config::Config;
pub use error::{Error, Result};
pub use position::{IdentityConverter, PathMappingConverter, PositionConverter, SourcePosition};
pub use reader::{TreeReader, XmlTreeReader};
pub use types::*;

// Public modules
pub mod accessor;
pub mod config;
pub mod decode;
pub mod error;
pub mod logging;
pub mod position;
pub mod reader;
pub mod types;
