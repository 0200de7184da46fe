// panorama.rs — 全景图元数据与视图状态

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanoramaMetadata {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// 缩放为 1 时的垂直视场角（度）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanoramaConfig {
    pub panoramas: Vec<PanoramaMetadata>,
}

/// 球面旋转（弧度）。`x` 跟随垂直拖拽，`y` 跟随水平拖拽。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaState {
    pub selected_panorama_id: Option<String>,
    pub is_vr_mode: bool,
    pub zoom: f32,
    pub rotation: Rotation,
}

impl Default for PanoramaState {
    fn default() -> Self {
        Self {
            selected_panorama_id: None,
            is_vr_mode: false,
            zoom: 1.0,
            rotation: Rotation::ZERO,
        }
    }
}

/// 预加载结果。加载失败时 `image` 为空并携带错误信息。
#[derive(Debug, Clone)]
pub struct PanoramaAsset {
    pub id: String,
    pub image: Option<image::RgbaImage>,
    pub is_loaded: bool,
    pub error: Option<String>,
}

impl PanoramaAsset {
    pub fn loaded(id: impl Into<String>, image: image::RgbaImage) -> Self {
        Self {
            id: id.into(),
            image: Some(image),
            is_loaded: true,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: None,
            is_loaded: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_reads_camel_case_catalog_entries() {
        let json = r#"{
            "id": "p",
            "title": "T",
            "description": "D",
            "imageUrl": "/panoramas/p.jpg",
            "createdAt": "2024-01-01",
            "fov": 60
        }"#;
        let meta: PanoramaMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.image_url, "/panoramas/p.jpg");
        assert_eq!(meta.created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(meta.fov, Some(60.0));
        assert!(meta.tags.is_empty());
        assert!(meta.thumbnail.is_none());
    }

    #[test]
    fn initial_state_matches_a_fresh_viewer() {
        let state = PanoramaState::default();
        assert_eq!(state.selected_panorama_id, None);
        assert!(!state.is_vr_mode);
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.rotation, Rotation::ZERO);
    }
}
