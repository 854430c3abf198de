use std::fmt;

use solido_core::SettingsError;

#[derive(Debug)]
pub enum ViewerError {
    /// eframe came up without a wgpu render state.
    NoGraphicsContext,
    Settings(SettingsError),
    Texture { path: String, source: std::io::Error },
    Args(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::NoGraphicsContext => {
                write!(f, "no wgpu graphics context available")
            }
            ViewerError::Settings(err) => write!(f, "settings: {err}"),
            ViewerError::Texture { path, source } => {
                write!(f, "failed to read texture {path}: {source}")
            }
            ViewerError::Args(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Settings(err) => Some(err),
            ViewerError::Texture { source, .. } => Some(source),
            ViewerError::NoGraphicsContext | ViewerError::Args(_) => None,
        }
    }
}

impl From<SettingsError> for ViewerError {
    fn from(err: SettingsError) -> Self {
        ViewerError::Settings(err)
    }
}
