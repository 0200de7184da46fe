// preload.rs — background image decoding for panoramas
//
// Every request gets a token; only the newest token's result is handed back,
// so switching panoramas mid-load never shows the older image.

use crate::catalog;
use crate::error::PreloadError;
use crate::i18n;
use crate::panorama::{PanoramaAsset, PanoramaMetadata};

use image::io::Reader as ImageReader;
use image::{GenericImageView, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Message for a load that died without reporting a cause.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Decodes one image on the calling thread.
pub fn preload_image(url: &str, assets_dir: &Path) -> Result<RgbaImage, PreloadError> {
    let Some(path) = catalog::resolve_image_path(url, assets_dir) else {
        return Err(PreloadError::Unsupported {
            url: url.to_string(),
        });
    };

    log::info!(
        "{}",
        i18n::tr_with("log.loading_image_bg", &[("path", path.display().to_string())])
    );

    let file = File::open(&path).map_err(|source| PreloadError::Open {
        url: url.to_string(),
        source,
    })?;

    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        })
        .map_err(|source| PreloadError::Decode {
            url: url.to_string(),
            source,
        })?;

    let (w, h) = img.dimensions();
    log::info!(
        "{}",
        i18n::tr_with(
            "log.image_loaded_size",
            &[("w", w.to_string()), ("h", h.to_string())]
        )
    );
    Ok(img.to_rgba8())
}

/// Never fails: load problems end up in `PanoramaAsset::error`.
pub fn preload_panorama(panorama: &PanoramaMetadata, assets_dir: &Path) -> PanoramaAsset {
    match preload_image(&panorama.image_url, assets_dir) {
        Ok(image) => PanoramaAsset::loaded(panorama.id.clone(), image),
        Err(err) => {
            log::warn!(
                "{}",
                i18n::tr_with("error.decode_image", &[("err", describe(&err))])
            );
            PanoramaAsset::failed(panorama.id.clone(), err.to_string())
        }
    }
}

/// Loads every panorama concurrently; results keep the input order.
pub fn preload_many(panoramas: &[PanoramaMetadata], assets_dir: &Path) -> Vec<PanoramaAsset> {
    thread::scope(|scope| {
        let handles: Vec<_> = panoramas
            .iter()
            .map(|p| (p, scope.spawn(move || preload_panorama(p, assets_dir))))
            .collect();

        handles
            .into_iter()
            .map(|(p, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| PanoramaAsset::failed(p.id.clone(), UNKNOWN_ERROR))
            })
            .collect()
    })
}

fn describe(err: &PreloadError) -> String {
    match std::error::Error::source(err) {
        Some(cause) => format!("{err} ({cause})"),
        None => err.to_string(),
    }
}

struct Completed {
    token: u64,
    asset: PanoramaAsset,
}

pub struct Preloader {
    assets_dir: PathBuf,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    latest: u64,
    pending: bool,
}

impl Preloader {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        let (tx, rx) = channel();
        Self {
            assets_dir: assets_dir.into(),
            tx,
            rx,
            latest: 0,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Starts loading `panorama` and supersedes any earlier request.
    pub fn request(&mut self, panorama: &PanoramaMetadata) -> u64 {
        self.request_with(panorama, preload_panorama)
    }

    pub(crate) fn request_with(
        &mut self,
        panorama: &PanoramaMetadata,
        load: fn(&PanoramaMetadata, &Path) -> PanoramaAsset,
    ) -> u64 {
        self.latest += 1;
        self.pending = true;

        let token = self.latest;
        let tx = self.tx.clone();
        let meta = panorama.clone();
        let assets_dir = self.assets_dir.clone();

        let spawned = thread::Builder::new()
            .name(format!("preload-{}", meta.id))
            .spawn(move || {
                // a panicked load still reports back
                let asset = panic::catch_unwind(AssertUnwindSafe(|| load(&meta, &assets_dir)))
                    .unwrap_or_else(|_| {
                        log::error!("preload of {} panicked", meta.id);
                        PanoramaAsset::failed(meta.id.clone(), UNKNOWN_ERROR)
                    });
                if tx.send(Completed { token, asset }).is_err() {
                    log::error!("{}", i18n::tr("error.send_to_main_failed"));
                }
            });

        if let Err(err) = spawned {
            log::error!("preload thread for {} failed to start: {err}", panorama.id);
            let _ = self.tx.send(Completed {
                token,
                asset: PanoramaAsset::failed(panorama.id.clone(), err.to_string()),
            });
        }
        token
    }

    /// Returns the newest request's result once it is ready.
    pub fn poll(&mut self) -> Option<PanoramaAsset> {
        while let Ok(done) = self.rx.try_recv() {
            if done.token == self.latest {
                self.pending = false;
                return Some(done.asset);
            }
            log::debug!("dropping stale preload of {}", done.asset.id);
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn wait(&mut self, timeout: std::time::Duration) -> Option<PanoramaAsset> {
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            if let Some(asset) = self.poll() {
                return Some(asset);
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        None
    }
}
