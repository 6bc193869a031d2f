//! # Editor Configuration
//!
//! Every setting the editor reads at startup, grouped by subsystem. Missing
//! sections and fields fall back to their defaults, so a config file only
//! needs to name what it changes:
//!
//! ```toml
//! [viewport]
//! width = 1920
//! height = 1080
//!
//! [editing]
//! remove_radius = 2.0
//! picking = "CameraRay"
//! ```

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;
use crate::input::{KeyBindings, PickingMode};
use crate::render::{CameraRig, Projection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Ground plane placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Half of the ground's edge length; also scales planar picking
    pub half_extent: f32,
    /// Y coordinate of the ground surface
    pub height: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            height: 0.0,
        }
    }
}

/// Camera rig, step sizes and projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting rig
    pub rig: CameraRig,
    /// Distance moved per pan event
    pub pan_step: f32,
    /// Distance moved per zoom event
    pub zoom_step: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl CameraConfig {
    /// Projection parameters
    pub fn projection(&self) -> Projection {
        Projection {
            fov_degrees: self.fov_degrees,
            near: self.near,
            far: self.far,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let projection = Projection::default();
        Self {
            rig: CameraRig::default(),
            pan_step: 0.1,
            zoom_step: 0.5,
            fov_degrees: projection.fov_degrees,
            near: projection.near,
            far: projection.far,
        }
    }
}

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration
    pub gravity: Vec3,
    /// Fixed step length in seconds, one step per frame
    pub timestep: f32,
    /// Half edge length of spawned cubes
    pub cube_half_extent: f32,
    /// Bodies beyond this count are refused
    pub max_bodies: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
            cube_half_extent: 0.5,
            max_bodies: 4096,
        }
    }
}

/// Spawn and removal behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingConfig {
    /// Height above the ground at which clicked cubes appear
    pub spawn_height: f32,
    /// Where the spawn-cube key drops a cube
    pub spawn_point: Vec3,
    /// Only remove objects this close to the click; `None` removes the nearest anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_radius: Option<f32>,
    /// How clicks map to ground positions
    pub picking: PickingMode,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            spawn_height: 1.0,
            spawn_point: Vec3::new(0.0, 5.0, 0.0),
            remove_radius: None,
            picking: PickingMode::Planar,
        }
    }
}

/// Default file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Scene document used by save and load
    pub scene_path: PathBuf,
    /// Image written by the screenshot action
    pub screenshot_path: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            scene_path: PathBuf::from("scene.xml"),
            screenshot_path: PathBuf::from("screenshot.png"),
        }
    }
}

/// Frame pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Sleep after each frame, in milliseconds
    pub idle_wait_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { idle_wait_ms: 10 }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window size
    pub viewport: ViewportConfig,
    /// Ground plane
    pub ground: GroundConfig,
    /// Camera
    pub camera: CameraConfig,
    /// Physics
    pub physics: PhysicsConfig,
    /// Editing
    pub editing: EditingConfig,
    /// File locations
    pub files: FileConfig,
    /// Frame pacing
    pub frame: FrameConfig,
    /// Key → action table
    pub bindings: KeyBindings,
}

impl Config for EditorConfig {}

impl EditorConfig {
    /// Set the viewport size
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = ViewportConfig { width, height };
        self
    }

    /// Set the starting camera rig
    pub fn with_camera_rig(mut self, rig: CameraRig) -> Self {
        self.camera.rig = rig;
        self
    }

    /// Set the body limit
    pub fn with_max_bodies(mut self, max_bodies: usize) -> Self {
        self.physics.max_bodies = max_bodies;
        self
    }

    /// Set the removal radius
    pub fn with_remove_radius(mut self, radius: Option<f32>) -> Self {
        self.editing.remove_radius = radius;
        self
    }

    /// Set the picking mode
    pub fn with_picking(mut self, picking: PickingMode) -> Self {
        self.editing.picking = picking;
        self
    }

    /// Set the idle wait between frames
    pub fn with_idle_wait_ms(mut self, idle_wait_ms: u64) -> Self {
        self.frame.idle_wait_ms = idle_wait_ms;
        self
    }

    /// Set the default scene and screenshot paths
    pub fn with_files(mut self, scene_path: impl Into<PathBuf>, screenshot_path: impl Into<PathBuf>) -> Self {
        self.files = FileConfig {
            scene_path: scene_path.into(),
            screenshot_path: screenshot_path.into(),
        };
        self
    }

    /// Check every setting
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }

        positive("ground.half_extent", self.ground.half_extent)?;
        positive("camera.pan_step", self.camera.pan_step)?;
        positive("camera.zoom_step", self.camera.zoom_step)?;
        positive("camera.fov_degrees", self.camera.fov_degrees)?;
        positive("camera.near", self.camera.near)?;
        if !self.camera.far.is_finite() || self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(format!(
                "camera.far ({}) must exceed camera.near ({})",
                self.camera.far, self.camera.near
            )));
        }

        positive("physics.timestep", self.physics.timestep)?;
        positive("physics.cube_half_extent", self.physics.cube_half_extent)?;
        if !self.physics.gravity.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid("physics.gravity must be finite".to_string()));
        }
        if self.physics.max_bodies == 0 {
            return Err(ConfigError::Invalid("physics.max_bodies must be at least 1".to_string()));
        }

        if !self.editing.spawn_height.is_finite() || !self.ground.height.is_finite() {
            return Err(ConfigError::Invalid("spawn and ground heights must be finite".to_string()));
        }
        if !self.editing.spawn_point.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid("editing.spawn_point must be finite".to_string()));
        }
        if let Some(radius) = self.editing.remove_radius {
            positive("editing.remove_radius", radius)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{EditorAction, KeyCode};

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.viewport, ViewportConfig { width: 1280, height: 720 });
        assert_eq!(config.ground.half_extent, 20.0);
        assert_eq!(config.frame.idle_wait_ms, 10);
        assert_eq!(config.bindings.action_for(KeyCode::Left), Some(EditorAction::PanLeft));
    }

    #[test]
    fn test_zero_viewport_is_invalid() {
        let config = EditorConfig::default().with_viewport(0, 720);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_far_not_beyond_near_is_invalid() {
        let mut config = EditorConfig::default();
        config.camera.far = config.camera.near;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_finite_spawn_point_is_invalid() {
        let mut config = EditorConfig::default();
        config.editing.spawn_point.y = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_positive_timestep_is_invalid() {
        let mut config = EditorConfig::default();
        config.physics.timestep = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EditorConfig = toml::from_str(
            r#"
            [viewport]
            width = 800

            [editing]
            remove_radius = 2.5
            picking = "CameraRay"
            "#,
        )
        .unwrap();

        assert_eq!(config.viewport.width, 800);
        assert_eq!(config.viewport.height, 720);
        assert_eq!(config.editing.remove_radius, Some(2.5));
        assert_eq!(config.editing.picking, PickingMode::CameraRay);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        let config = EditorConfig::default()
            .with_viewport(640, 480)
            .with_remove_radius(Some(1.5))
            .with_camera_rig(CameraRig::LookAt {
                eye: Vec3::new(0.0, 8.0, 12.0),
                target: Vec3::zeros(),
                up: Vec3::y(),
            });

        config.save_to_file(&path).unwrap();
        let loaded = EditorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.ron");
        let config = EditorConfig::default().with_idle_wait_ms(0).with_max_bodies(16);

        config.save_to_file(&path).unwrap();
        assert_eq!(EditorConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            EditorConfig::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
