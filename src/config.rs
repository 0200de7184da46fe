// config.rs — settings from the command line and environment
//
// Env: PANORAMA_LANG, PANORAMA_CATALOG, PANORAMA_ASSETS
// CLI flags win over the environment.

use crate::i18n;
use clap::Parser;
use std::path::PathBuf;

/// The viewer drags twice as fast as the bare controls default.
pub const VIEWER_SENSITIVITY: f32 = 0.01;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "panorama_explorer")]
#[command(about = "Interactive viewer for equirectangular panoramas")]
pub struct Settings {
    /// UI language (en, zh-Hans).
    #[arg(long, env = "PANORAMA_LANG", default_value = i18n::FALLBACK_LANG)]
    pub lang: String,

    /// Panorama catalog JSON used instead of the built-in one.
    #[arg(long, env = "PANORAMA_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Root directory for catalog image URLs.
    #[arg(long = "assets", env = "PANORAMA_ASSETS", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Drag sensitivity in radians per pixel.
    #[arg(long, default_value_t = VIEWER_SENSITIVITY, value_parser = parse_sensitivity)]
    pub sensitivity: f32,

    /// Preload every catalog entry and exit.
    #[arg(long = "check")]
    pub check_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lang: i18n::FALLBACK_LANG.to_string(),
            catalog: None,
            assets_dir: PathBuf::from("assets"),
            sensitivity: VIEWER_SENSITIVITY,
            check_only: false,
        }
    }
}

fn parse_sensitivity(raw: &str) -> Result<f32, String> {
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err("must be a positive number".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Settings, clap::Error> {
        Settings::try_parse_from(std::iter::once("panorama_explorer").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Settings::command().debug_assert();
    }

    #[test]
    fn reads_all_flags() {
        let settings = parse(&[
            "--lang", "zh-Hans", "--catalog", "c.json", "--assets", "/srv/pano",
            "--sensitivity", "0.02", "--check",
        ])
        .unwrap();
        assert_eq!(settings.lang, "zh-Hans");
        assert_eq!(settings.catalog, Some(PathBuf::from("c.json")));
        assert_eq!(settings.assets_dir, PathBuf::from("/srv/pano"));
        assert_eq!(settings.sensitivity, 0.02);
        assert!(settings.check_only);
    }

    #[test]
    fn sensitivity_defaults_and_validation() {
        assert_eq!(parse(&["--lang", "en"]).unwrap().sensitivity, VIEWER_SENSITIVITY);
        assert!(parse(&["--sensitivity", "-1"]).is_err());
        assert!(parse(&["--sensitivity", "0"]).is_err());
        assert!(parse(&["--sensitivity", "inf"]).is_err());
        assert!(parse(&["--sensitivity", "fast"]).is_err());
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(parse(&["--catalog"]).is_err());
        assert!(parse(&["--fullscreen"]).is_err());
    }

    #[test]
    fn sensitivity_parser_accepts_positive_finite_values() {
        assert_eq!(parse_sensitivity("0.005"), Ok(0.005));
        assert!(parse_sensitivity("NaN").is_err());
    }
}
