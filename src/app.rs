// app.rs — ties the store, gesture controls and preloads together
//
// Everything here is window-system agnostic: main.rs feeds input in, the
// renderer reads `camera()` and receives decoded images from `frame()`.

use crate::catalog;
use crate::config::Settings;
use crate::controls::{ControlEvent, ControlOptions, PanoramaControls};
use crate::i18n;
use crate::panorama::{PanoramaConfig, PanoramaMetadata, Rotation};
use crate::preload::Preloader;
use crate::store::PanoramaStore;
use crate::toolbar::ToolbarAction;

use image::RgbaImage;
use std::f32::consts::FRAC_PI_2;
use std::path::Path;

/// Camera parameters for one frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub stereo: bool,
}

pub struct App {
    store: PanoramaStore,
    controls: PanoramaControls,
    catalog: PanoramaConfig,
    preloader: Preloader,
    is_loading: bool,
    error: Option<String>,
    local_count: usize,
}

impl App {
    pub fn new(catalog: PanoramaConfig, settings: &Settings) -> Self {
        let controls = PanoramaControls::new(ControlOptions {
            sensitivity: settings.sensitivity,
            ..ControlOptions::default()
        });

        let mut app = Self {
            store: PanoramaStore::new(),
            controls,
            catalog,
            preloader: Preloader::new(&settings.assets_dir),
            is_loading: false,
            error: None,
            local_count: 0,
        };

        if app.store.selected_panorama_id().is_none() {
            if let Some(first) = app.catalog.panoramas.first().map(|p| p.id.clone()) {
                app.select(&first);
            }
        }
        app
    }

    pub fn store(&self) -> &PanoramaStore {
        &self.store
    }

    pub fn controls_mut(&mut self) -> &mut PanoramaControls {
        &mut self.controls
    }

    pub fn panoramas(&self) -> &[PanoramaMetadata] {
        catalog::all(&self.catalog)
    }

    pub fn selected(&self) -> Option<&PanoramaMetadata> {
        self.store
            .selected_panorama_id()
            .and_then(|id| catalog::find_by_id(id, &self.catalog))
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Switches to `id` and starts its preload. Unknown or already selected
    /// ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if self.store.selected_panorama_id() == Some(id) {
            return false;
        }
        if catalog::find_by_id(id, &self.catalog).is_none() {
            log::warn!("unknown panorama {id:?}");
            return false;
        }
        self.store.set_selected_panorama_id(Some(id.to_string()));
        self.start_load();
        true
    }

    /// Reloads the current panorama after a failure.
    pub fn retry(&mut self) {
        if self.selected().is_some() {
            self.start_load();
        }
    }

    fn start_load(&mut self) {
        let Some(panorama) = self.selected().cloned() else {
            return;
        };
        self.is_loading = true;
        self.error = None;
        self.preloader.request(&panorama);
    }

    /// Adds a file from disk to the catalog and selects it. A file that was
    /// opened before is selected again instead of being added twice.
    pub fn open_local(&mut self, path: &Path) -> String {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let url = path.display().to_string();
        if let Some(known) = self.catalog.panoramas.iter().find(|p| p.image_url == url) {
            let id = known.id.clone();
            self.select(&id);
            return id;
        }

        self.local_count += 1;
        let id = format!("local-{}", self.local_count);
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        self.catalog.panoramas.push(PanoramaMetadata {
            id: id.clone(),
            title,
            description: url.clone(),
            image_url: url,
            thumbnail: None,
            width: None,
            height: None,
            fov: None,
            created_at: None,
            tags: Vec::new(),
        });
        self.select(&id);
        id
    }

    pub fn apply(&mut self, event: ControlEvent) {
        match event {
            // horizontal motion turns around the vertical axis and vice versa
            ControlEvent::Rotate { dx, dy } => {
                self.store.update_rotation(dy, dx);
                let r = self.store.rotation();
                self.store.set_rotation(Rotation::new(
                    r.x.clamp(-FRAC_PI_2, FRAC_PI_2),
                    catalog::normalize_rotation(r.y),
                ));
            }
            ControlEvent::Zoom(delta) => {
                let zoom = self.controls.clamp_zoom(self.store.zoom() + delta);
                self.store.set_zoom(zoom);
            }
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = self.controls.clamp_zoom(zoom);
        self.store.set_zoom(zoom);
    }

    pub fn set_vr_mode(&mut self, is_vr: bool) {
        self.store.set_vr_mode(is_vr);
    }

    pub fn toggle_vr_mode(&mut self) {
        self.store.toggle_vr_mode();
    }

    /// Back to zoom 1 looking straight ahead; selection and VR mode stay.
    pub fn reset_view(&mut self) {
        self.controls.cancel();
        self.store.set_zoom(1.0);
        self.store.set_rotation(Rotation::ZERO);
    }

    pub fn handle(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Select(id) => {
                self.select(&id);
            }
            ToolbarAction::SetZoom(zoom) => self.set_zoom(zoom),
            ToolbarAction::SetVrMode(is_vr) => self.set_vr_mode(is_vr),
            ToolbarAction::Retry => self.retry(),
        }
    }

    /// Per-frame update: advances inertia and collects finished preloads.
    /// Returns a freshly decoded image for the renderer, if any.
    pub fn frame(&mut self, dt: f32) -> Option<RgbaImage> {
        if let Some(event) = self.controls.tick(dt) {
            self.apply(event);
        }

        let asset = self.preloader.poll()?;
        self.is_loading = false;
        if asset.is_loaded {
            asset.image
        } else {
            self.error = Some(
                asset
                    .error
                    .unwrap_or_else(|| i18n::tr("status.load_failed")),
            );
            None
        }
    }

    pub fn camera(&self) -> CameraView {
        let state = self.store.state();
        CameraView {
            // 0 - y instead of -y: a resting view reads 0.0, not -0.0
            yaw: 0.0 - state.rotation.y.to_degrees(),
            pitch: state.rotation.x.to_degrees(),
            fov: catalog::default_fov(self.selected()) / state.zoom.max(f32::EPSILON),
            stereo: state.is_vr_mode,
        }
    }
}
