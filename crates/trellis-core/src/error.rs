//! Error types shared across Trellis crates.
//!
//! Routing and dispatch errors are defined in `trellis-framework`.

/// A type-erased error raised by application code (handlers, middleware).
///
/// Trellis never inspects or rewraps these; callers can `downcast` them back
/// to the concrete error the handler returned.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
