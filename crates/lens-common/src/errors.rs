use std::path::PathBuf;

use crate::id::SurfaceHandle;
use crate::types::Rect;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the surface backend, one per call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("invalid surface geometry: {0:?}")]
    InvalidGeometry(Rect),

    #[error("unknown surface handle: {0}")]
    UnknownHandle(SurfaceHandle),
}

impl SurfaceError {
    /// Races between the binder and backend state. Logged, never surfaced.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::UnknownHandle(_))
    }

    /// Conditions that may clear up on the next geometry change.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::InvalidGeometry(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LensError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("preview.settle_interval_ms".into());
        assert_eq!(
            err.to_string(),
            "config validation error: preview.settle_interval_ms"
        );
    }

    #[test]
    fn surface_error_display() {
        let err = SurfaceError::BackendUnavailable("host stopped".into());
        assert_eq!(err.to_string(), "surface backend unavailable: host stopped");

        let err = SurfaceError::UnknownHandle(SurfaceHandle(4));
        assert_eq!(err.to_string(), "unknown surface handle: surface-4");

        let err = SurfaceError::InvalidGeometry(Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(err.to_string().starts_with("invalid surface geometry"));
    }

    #[test]
    fn surface_error_classification() {
        assert!(SurfaceError::UnknownHandle(SurfaceHandle(1)).is_benign());
        assert!(!SurfaceError::BackendUnavailable("x".into()).is_benign());
        assert!(SurfaceError::InvalidGeometry(Rect::default()).is_transient());
        assert!(!SurfaceError::BackendUnavailable("x".into()).is_transient());
        assert!(!SurfaceError::UnknownHandle(SurfaceHandle(1)).is_transient());
    }

    #[test]
    fn lens_error_from_config() {
        let lens_err: LensError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(lens_err, LensError::Config(_)));
        assert!(lens_err.to_string().contains("bad toml"));
    }

    #[test]
    fn lens_error_from_surface() {
        let lens_err: LensError = SurfaceError::BackendUnavailable("gone".into()).into();
        assert!(matches!(lens_err, LensError::Surface(_)));
        assert!(lens_err.to_string().contains("gone"));
    }

    #[test]
    fn lens_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let lens_err: LensError = io_err.into();
        assert!(matches!(lens_err, LensError::Io(_)));
        assert!(lens_err.to_string().contains("file missing"));
    }
}
