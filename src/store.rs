// store.rs — flat view-model shared by the toolbar and the viewer

use crate::panorama::{PanoramaState, Rotation};

#[derive(Debug, Clone, Default)]
pub struct PanoramaStore {
    state: PanoramaState,
}

impl PanoramaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PanoramaState {
        &self.state
    }

    pub fn selected_panorama_id(&self) -> Option<&str> {
        self.state.selected_panorama_id.as_deref()
    }

    pub fn is_vr_mode(&self) -> bool {
        self.state.is_vr_mode
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    pub fn set_selected_panorama_id(&mut self, id: Option<String>) {
        self.state.selected_panorama_id = id;
    }

    pub fn set_vr_mode(&mut self, is_vr: bool) {
        self.state.is_vr_mode = is_vr;
    }

    pub fn toggle_vr_mode(&mut self) {
        self.state.is_vr_mode = !self.state.is_vr_mode;
    }

    /// Stores the value as given; range limits belong to the caller.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.state.zoom = zoom;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.state.rotation = rotation;
    }

    pub fn update_rotation(&mut self, delta_x: f32, delta_y: f32) {
        self.state.rotation.x += delta_x;
        self.state.rotation.y += delta_y;
    }

    pub fn reset(&mut self) {
        self.state = PanoramaState::default();
    }
}
