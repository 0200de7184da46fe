// catalog.rs — built-in panoramas, JSON catalogs, and view math helpers

use crate::error::CatalogError;
use crate::panorama::{PanoramaConfig, PanoramaMetadata};
use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

pub const DEFAULT_FOV: f32 = 75.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 5.0;

fn builtin(id: &str, title: &str, description: &str, stem: &str) -> PanoramaMetadata {
    PanoramaMetadata {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image_url: format!("/panoramas/{stem}.jpg"),
        thumbnail: Some(format!("/panoramas/{stem}-thumb.jpg")),
        width: Some(8192),
        height: Some(4096),
        fov: Some(DEFAULT_FOV),
        created_at: None,
        tags: Vec::new(),
    }
}

pub fn default_config() -> PanoramaConfig {
    PanoramaConfig {
        panoramas: vec![
            builtin(
                "panorama-1",
                "Mountain Vista",
                "A beautiful panoramic view of mountain landscape",
                "mountain",
            ),
            builtin("panorama-2", "Urban Skyline", "City skyline at sunset", "city"),
            builtin("panorama-3", "Ocean Horizon", "Serene ocean view", "ocean"),
        ],
    }
}

pub fn find_by_id<'a>(id: &str, config: &'a PanoramaConfig) -> Option<&'a PanoramaMetadata> {
    config.panoramas.iter().find(|p| p.id == id)
}

pub fn all(config: &PanoramaConfig) -> &[PanoramaMetadata] {
    &config.panoramas
}

/// Falls back to 75° when the panorama is missing or declares no (or a zero) fov.
pub fn default_fov(panorama: Option<&PanoramaMetadata>) -> f32 {
    match panorama.and_then(|p| p.fov) {
        Some(fov) if fov > 0.0 => fov,
        _ => DEFAULT_FOV,
    }
}

pub fn clamp_zoom(zoom: f32, min: f32, max: f32) -> f32 {
    zoom.min(max).max(min)
}

/// Maps any angle into `[0, 2π)`.
pub fn normalize_rotation(rotation: f32) -> f32 {
    let normalized = rotation.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

pub fn load_from_path(path: &Path) -> Result<PanoramaConfig, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PanoramaConfig =
        serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if config.panoramas.is_empty() {
        return Err(CatalogError::Empty(path.to_path_buf()));
    }
    Ok(config)
}

/// Turns a catalog `imageUrl` into a file path.
///
/// - `http://` / `https://` URLs are not loadable (`None`).
/// - Existing absolute paths are used as-is (local files opened by the user).
/// - Anything else is resolved under `assets_dir`, with a leading `/` meaning
///   the assets root.
pub fn resolve_image_path(url: &str, assets_dir: &Path) -> Option<PathBuf> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return None;
    }
    let as_path = Path::new(trimmed);
    if as_path.is_absolute() && as_path.exists() {
        return Some(as_path.to_path_buf());
    }
    Some(assets_dir.join(trimmed.trim_start_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use std::io::Write;

    #[test]
    fn default_config_has_complete_entries() {
        let config = default_config();
        assert_eq!(config.panoramas.len(), 3);
        for p in all(&config) {
            assert!(!p.id.is_empty());
            assert!(!p.title.is_empty());
            assert!(!p.description.is_empty());
            assert!(p.image_url.starts_with("/panoramas/"));
        }
    }

    #[test]
    fn find_by_id_hits_and_misses() {
        let config = default_config();
        let first = &config.panoramas[0];
        assert_eq!(find_by_id(&first.id, &config).map(|p| &p.title), Some(&first.title));
        assert!(find_by_id("non-existent-id", &config).is_none());
    }

    #[test]
    fn default_fov_falls_back_to_75() {
        let mut meta = default_config().panoramas.remove(0);
        meta.fov = Some(90.0);
        assert_eq!(default_fov(Some(&meta)), 90.0);
        meta.fov = None;
        assert_eq!(default_fov(Some(&meta)), 75.0);
        meta.fov = Some(0.0);
        assert_eq!(default_fov(Some(&meta)), 75.0);
        assert_eq!(default_fov(None), 75.0);
    }

    #[test]
    fn clamp_zoom_respects_bounds() {
        assert_eq!(clamp_zoom(0.5, MIN_ZOOM, MAX_ZOOM), 1.0);
        assert_eq!(clamp_zoom(3.0, MIN_ZOOM, MAX_ZOOM), 3.0);
        assert_eq!(clamp_zoom(10.0, MIN_ZOOM, MAX_ZOOM), 5.0);
        assert_eq!(clamp_zoom(2.5, 2.0, 3.0), 2.5);
    }

    #[test]
    fn normalize_rotation_wraps_into_one_turn() {
        assert_eq!(normalize_rotation(0.0), 0.0);
        assert!((normalize_rotation(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_rotation(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!(normalize_rotation(TAU).abs() < 1e-5);
        let tiny = normalize_rotation(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn load_from_path_reads_json_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"panoramas":[{{"id":"a","title":"A","description":"","imageUrl":"a.jpg"}}]}}"#
        )
        .unwrap();
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.panoramas.len(), 1);
        assert_eq!(config.panoramas[0].id, "a");
    }

    #[test]
    fn bundled_catalog_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/panoramas.json");
        assert_eq!(load_from_path(&path).unwrap(), default_config());
    }

    #[test]
    fn load_from_path_rejects_empty_and_broken_catalogs() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, r#"{{"panoramas":[]}}"#).unwrap();
        assert!(matches!(load_from_path(empty.path()), Err(CatalogError::Empty(_))));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "not json").unwrap();
        assert!(matches!(load_from_path(broken.path()), Err(CatalogError::Parse { .. })));

        let missing = Path::new("/definitely/not/here.json");
        assert!(matches!(load_from_path(missing), Err(CatalogError::Read { .. })));
    }

    #[test]
    fn resolve_image_path_handles_url_shapes() {
        let assets = Path::new("assets");
        assert_eq!(
            resolve_image_path("/panoramas/city.jpg", assets),
            Some(PathBuf::from("assets/panoramas/city.jpg"))
        );
        assert_eq!(
            resolve_image_path("panoramas/city.jpg", assets),
            Some(PathBuf::from("assets/panoramas/city.jpg"))
        );
        assert_eq!(resolve_image_path("https://cdn/x.jpg", assets), None);
        assert_eq!(resolve_image_path("  ", assets), None);

        let file = tempfile::NamedTempFile::new().unwrap();
        let abs = file.path().to_str().unwrap();
        assert_eq!(resolve_image_path(abs, assets), Some(file.path().to_path_buf()));
    }
}
