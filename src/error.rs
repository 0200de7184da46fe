// error.rs — error taxonomy

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Preload(#[from] PreloadError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Every variant renders the same user-facing message; the cause stays
/// reachable through `source()` for logs.
#[derive(Debug, thiserror::Error)]
pub enum PreloadError {
    #[error("Failed to load image: {url}")]
    Unsupported { url: String },
    #[error("Failed to load image: {url}")]
    Open {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load image: {url}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog {0} contains no panoramas")]
    Empty(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter")]
    NoAdapter,
    #[error("cannot open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
