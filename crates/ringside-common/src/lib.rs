//! # Ringside Common
//!
//! Common types shared by the Ringside crates:
//! - Canvas coordinate types (`Vec2`, `Size`)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_translation() {
        let origin = Vec2::new(110.0, 150.0);
        let moved = origin + Vec2::new(10.0, -5.0);
        assert_eq!(moved, Vec2::new(120.0, 145.0));
    }

    #[test]
    fn test_config_error_wraps_into_top_level() {
        let err: RingsideError = ConfigError::Validation("empty roster".to_string()).into();
        assert!(err.to_string().contains("empty roster"));
    }
}
