//! Startup: configuration lookup and input scripts

use scene_engine::config::{Config, ConfigError, EditorConfig};
use scene_engine::input::{InputEvent, KeyCode, MouseButton, ScriptedInput};
use ron::error::SpannedError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CUBE_EDITOR_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "cube_editor.toml";

/// Frames the demo lets the cubes fall before touching the camera
const DEMO_SETTLE_FRAMES: usize = 120;

/// Startup errors; all of them end the process
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Config file unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input script unreadable
    #[error("Cannot read script {path}: {source}")]
    ScriptIo {
        /// Script path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Input script is not valid RON
    #[error("Invalid script {path}: {source}")]
    ScriptParse {
        /// Script path
        path: PathBuf,
        /// Parser error with its position
        #[source]
        source: SpannedError,
    },
}

/// Config file to use: the env override, else the default file if it exists
pub fn config_path(env_value: Option<OsString>, working_dir: &Path) -> Option<PathBuf> {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(value));
    }
    let default = working_dir.join(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}

/// Load and validate the configuration
///
/// Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, LaunchError> {
    let config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            EditorConfig::load_from_file(path)?
        }
        None => {
            log::info!("No configuration file, using defaults");
            EditorConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}

/// Read a RON input script; the session quits after its last frame
pub fn load_script(path: &Path) -> Result<ScriptedInput, LaunchError> {
    let text = std::fs::read_to_string(path).map_err(|source| LaunchError::ScriptIo {
        path: path.to_path_buf(),
        source,
    })?;
    let script = ScriptedInput::from_ron_str(&text).map_err(|source| LaunchError::ScriptParse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Replaying {} frames from {}", script.remaining_frames(), path.display());
    Ok(script.quit_when_exhausted())
}

/// Built-in session used when no script is given
///
/// Drops a ring of cubes, lets them settle, nudges the camera, removes one
/// cube, then saves the scene and takes a screenshot.
pub fn demo_script(config: &EditorConfig) -> ScriptedInput {
    let width = config.viewport.width as f32;
    let height = config.viewport.height as f32;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 4.0;

    let clicks = (0..8)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            InputEvent::MouseDown {
                button: MouseButton::Left,
                x: cx + radius * angle.cos(),
                y: cy + radius * angle.sin(),
            }
        })
        .collect();

    let mut script = ScriptedInput::new(vec![clicks]);
    for _ in 0..DEMO_SETTLE_FRAMES {
        script.push_frame(Vec::new());
    }
    script.push_frame(vec![InputEvent::KeyDown(KeyCode::Left), InputEvent::KeyDown(KeyCode::PageUp)]);
    script.push_frame(vec![InputEvent::MouseDown {
        button: MouseButton::Right,
        x: cx + radius,
        y: cy,
    }]);
    script.push_frame(vec![InputEvent::KeyDown(KeyCode::S)]);
    script.push_frame(vec![InputEvent::KeyDown(KeyCode::P)]);
    script.quit_when_exhausted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::input::InputSource;

    #[test]
    fn test_env_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "").unwrap();

        let path = config_path(Some(OsString::from("/etc/editor.ron")), dir.path());
        assert_eq!(path, Some(PathBuf::from("/etc/editor.ron")));
    }

    #[test]
    fn test_default_file_used_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(config_path(None, dir.path()), None);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "").unwrap();
        assert_eq!(config_path(None, dir.path()), Some(dir.path().join(DEFAULT_CONFIG_FILE)));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        std::fs::write(&path, "[viewport]\nwidth = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, LaunchError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_script_quits_after_last_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        std::fs::write(&path, "[[KeyDown(Left)], []]").unwrap();

        let mut script = load_script(&path).unwrap();
        assert_eq!(script.remaining_frames(), 2);
        script.poll_events();
        script.poll_events();
        assert_eq!(script.poll_events(), vec![InputEvent::Quit]);
    }

    #[test]
    fn test_bad_script_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        std::fs::write(&path, "[[Jump]]").unwrap();
        let err = load_script(&path).unwrap_err();
        assert!(matches!(err, LaunchError::ScriptParse { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_bundled_session_and_config_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));

        let script = load_script(&root.join("sessions/place_and_save.ron")).unwrap();
        assert_eq!(script.remaining_frames(), 65);

        let config = load_config(Some(&root.join("cube_editor.example.toml"))).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_demo_script_ends_with_quit() {
        let script = demo_script(&EditorConfig::default());
        assert_eq!(script.remaining_frames(), DEMO_SETTLE_FRAMES + 5);
    }
}
