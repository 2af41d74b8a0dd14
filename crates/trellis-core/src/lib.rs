//! # Trellis Core
//!
//! Leaf types shared by every layer of the Trellis request router.
//!
//! ## Contents
//!
//! - **HTTP message**: the opaque, host-supplied request ([`HttpMessage`],
//!   [`BoxedRequest`]). Trellis never parses HTTP itself; the host server hands
//!   it an already-parsed message.
//! - **Path patterns**: `/users/{id}` style patterns and the segment matcher
//!   ([`PathPattern`], [`Segment`]).
//! - **Output**: the value a handler produces for the publisher ([`Output`],
//!   [`IntoOutput`]).
//!
//! Routing, handler resolution and dispatch live in `trellis-framework`.

pub mod error;
pub mod message;
pub mod output;
pub mod pattern;

pub use error::BoxError;
pub use message::{BoxedRequest, HttpMessage, strip_port};
pub use output::{IntoOutput, Output};
pub use pattern::{PathPattern, Segment, normalize_path};
