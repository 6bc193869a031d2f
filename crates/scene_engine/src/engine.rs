//! Editor frame loop
//!
//! The [`Editor`] owns the scene store, the physics bridge, the camera and
//! the coordinate mapper. Each frame runs the same phases in order:
//!
//! ```text
//! drain input → step physics → sync poses → render → present → idle wait
//! ```
//!
//! A failing phase is logged, reported in the [`FrameReport`], and the loop
//! moves on. Only a quit event ends the session.

use crate::application::DocumentPaths;
use crate::config::{ConfigError, EditorConfig};
use crate::foundation::math::Vec3;
use crate::foundation::time::FramePacer;
use crate::input::{CoordinateMapper, EditorAction, InputEvent, InputSource, MouseButton};
use crate::physics::{PhysicsBridge, PhysicsEngine, RapierPhysics, SyncReport};
use crate::render::{
    CameraController, FrameView, PanDirection, RenderBackend, RenderError, ZoomDirection,
};
use crate::scene::{ObjectId, SceneDocument, SceneError, SceneStore};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Frame loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Processing frames
    Running,
    /// Quit requested; no further frames run
    Terminating,
}

/// What happened during one frame
#[derive(Debug)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Input events processed
    pub events: usize,
    /// Result of the pose sync
    pub sync: SyncReport,
    /// Failures that occurred; none of them stopped the frame
    pub errors: Vec<EditorError>,
    /// State after the frame
    pub state: LoopState,
}

/// Totals for a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames run
    pub frames: u64,
    /// Errors reported across all frames
    pub errors: usize,
    /// Objects in the scene when the session ended
    pub final_objects: usize,
}

/// Editor-level errors
#[derive(Error, Debug)]
pub enum EditorError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scene operation failed
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Renderer failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Interactive cube scene editor
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    store: SceneStore,
    bridge: PhysicsBridge,
    camera: CameraController,
    mapper: CoordinateMapper,
    pacer: FramePacer,
    state: LoopState,
    pending_screenshot: Option<PathBuf>,
    released: bool,
}

impl Editor {
    /// Create an editor driving `engine`
    ///
    /// # Errors
    /// [`EditorError::Config`] if the configuration is invalid.
    pub fn new(config: EditorConfig, engine: Box<dyn PhysicsEngine>) -> Result<Self, EditorError> {
        config.validate()?;

        let mapper = CoordinateMapper::new(
            config.viewport.width,
            config.viewport.height,
            config.ground.half_extent,
            config.ground.height,
        )?;
        let camera = CameraController::new(
            config.camera.rig,
            config.camera.projection(),
            config.camera.pan_step,
            config.camera.zoom_step,
        );
        let bridge = PhysicsBridge::new(engine, config.physics.cube_half_extent);
        let pacer = FramePacer::from_millis(config.frame.idle_wait_ms);

        log::info!(
            "Editor ready: {}x{} viewport, {:?} picking",
            config.viewport.width,
            config.viewport.height,
            config.editing.picking
        );

        Ok(Self {
            config,
            store: SceneStore::new(),
            bridge,
            camera,
            mapper,
            pacer,
            state: LoopState::Running,
            pending_screenshot: None,
            released: false,
        })
    }

    /// Create an editor backed by [`RapierPhysics`]
    ///
    /// # Errors
    /// [`EditorError::Config`] if the configuration is invalid.
    pub fn with_rapier(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let physics = RapierPhysics::new(&config.physics, config.ground.height);
        Self::new(config, Box::new(physics))
    }

    /// Active configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Scene contents
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Physics bridge
    pub fn bridge(&self) -> &PhysicsBridge {
        &self.bridge
    }

    /// Camera
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Screen → world mapping
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames finished so far
    pub fn frame_count(&self) -> u64 {
        self.pacer.frame_count()
    }

    /// Whether physics and renderer resources have been released
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Update the viewport after a window resize
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] for a zero dimension; the old size is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        self.mapper.resize(width, height)?;
        self.config.viewport.width = width;
        self.config.viewport.height = height;
        Ok(())
    }

    /// Ground point under a screen position
    pub fn ground_point(&self, x: f32, y: f32) -> Vec3 {
        let view_projection = self.camera.view_projection(self.mapper.aspect_ratio());
        self.mapper
            .placement_point(x, y, self.config.editing.picking, &view_projection)
    }

    /// Spawn a cube above the ground point under `(x, y)`
    ///
    /// # Errors
    /// [`SceneError::SpawnFailed`] when physics refuses the body.
    pub fn spawn_at_screen(&mut self, x: f32, y: f32) -> Result<ObjectId, SceneError> {
        let position = self.ground_point(x, y) + Vec3::new(0.0, self.config.editing.spawn_height, 0.0);
        self.store.spawn(&mut self.bridge, position)
    }

    /// Remove the cube nearest to the ground point under `(x, y)`
    pub fn remove_at_screen(&mut self, x: f32, y: f32) -> Option<ObjectId> {
        let point = self.ground_point(x, y);
        self.store
            .remove_nearest(&mut self.bridge, point, self.config.editing.remove_radius)
    }

    /// Write the current scene to `path`
    ///
    /// # Errors
    /// [`SceneError`] from serialization or file access.
    pub fn save_scene(&self, path: &Path) -> Result<(), SceneError> {
        SceneDocument::from_store(&self.store).write_to_path(path)
    }

    /// Replace the scene with the document at `path`
    ///
    /// On error the current scene is untouched.
    ///
    /// # Errors
    /// [`SceneError`] from file access, parsing, or spawning.
    pub fn load_scene(&mut self, path: &Path) -> Result<usize, SceneError> {
        let document = SceneDocument::read_from_path(path)?;
        let ids = document.load_into(&mut self.store, &mut self.bridge)?;
        Ok(ids.len())
    }

    /// Drop a cube at the configured spawn point
    ///
    /// # Errors
    /// [`SceneError::SpawnFailed`] when physics refuses the body.
    pub fn spawn_default(&mut self) -> Result<ObjectId, SceneError> {
        self.store.spawn(&mut self.bridge, self.config.editing.spawn_point)
    }

    /// Remove the most recently placed cube, if any
    pub fn remove_last(&mut self) -> Option<ObjectId> {
        self.store.remove_last(&mut self.bridge)
    }

    /// Remove every cube
    pub fn clear_scene(&mut self) -> usize {
        self.store.clear(&mut self.bridge)
    }

    /// Return camera and scene to their startup state
    pub fn reset(&mut self) {
        self.clear_scene();
        self.camera.reset();
        self.pending_screenshot = None;
    }

    /// Apply one input event
    ///
    /// # Errors
    /// Whatever the triggered action fails with.
    pub fn handle_event<P>(&mut self, event: InputEvent, paths: &mut P) -> Result<(), EditorError>
    where
        P: DocumentPaths + ?Sized,
    {
        match event {
            InputEvent::Quit => {
                self.apply_action(EditorAction::Quit, paths)?;
            }
            InputEvent::KeyDown(key) => match self.config.bindings.action_for(key) {
                Some(action) => self.apply_action(action, paths)?,
                None => log::trace!("Unbound key {:?}", key),
            },
            InputEvent::MouseDown { button, x, y } => match button {
                MouseButton::Left => {
                    self.spawn_at_screen(x, y)?;
                }
                MouseButton::Right => {
                    self.remove_at_screen(x, y);
                }
                MouseButton::Middle | MouseButton::Other(_) => {
                    log::trace!("Ignoring {:?} click at ({}, {})", button, x, y);
                }
            },
        }
        Ok(())
    }

    fn apply_action<P>(&mut self, action: EditorAction, paths: &mut P) -> Result<(), EditorError>
    where
        P: DocumentPaths + ?Sized,
    {
        match action {
            EditorAction::PanLeft => self.camera.pan(PanDirection::Left),
            EditorAction::PanRight => self.camera.pan(PanDirection::Right),
            EditorAction::PanUp => self.camera.pan(PanDirection::Up),
            EditorAction::PanDown => self.camera.pan(PanDirection::Down),
            EditorAction::ZoomIn => self.camera.zoom(ZoomDirection::In),
            EditorAction::ZoomOut => self.camera.zoom(ZoomDirection::Out),
            EditorAction::ResetCamera => self.camera.reset(),
            EditorAction::SaveScene => match paths.save_path() {
                Some(path) => self.save_scene(&path)?,
                None => log::info!("Save cancelled"),
            },
            EditorAction::LoadScene => match paths.open_path() {
                Some(path) => {
                    self.load_scene(&path)?;
                }
                None => log::info!("Load cancelled"),
            },
            EditorAction::SpawnCube => {
                self.spawn_default()?;
            }
            EditorAction::RemoveLast => {
                if self.remove_last().is_none() {
                    log::debug!("Nothing to remove");
                }
            }
            EditorAction::ClearScene => {
                self.clear_scene();
            }
            EditorAction::Screenshot => match paths.screenshot_path() {
                Some(path) => self.pending_screenshot = Some(path),
                None => log::info!("Screenshot cancelled"),
            },
            EditorAction::Quit => {
                log::info!("Quit requested");
                self.state = LoopState::Terminating;
            }
        }
        Ok(())
    }

    /// Draw the current scene
    ///
    /// # Errors
    /// [`RenderError`] from the backend.
    pub fn render<R: RenderBackend + ?Sized>(&self, renderer: &mut R) -> Result<(), RenderError> {
        let aspect = self.mapper.aspect_ratio();
        let view = FrameView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(aspect),
        };
        let scale = 2.0 * self.bridge.cube_half_extent();

        renderer.begin_frame(&view)?;
        renderer.draw_ground(self.config.ground.half_extent, self.config.ground.height);
        for object in self.store.iter() {
            renderer.draw_object(&object.transform(scale));
        }
        renderer.present()
    }

    /// Run a single frame
    pub fn run_frame<I, R, P>(&mut self, input: &mut I, renderer: &mut R, paths: &mut P) -> FrameReport
    where
        I: InputSource + ?Sized,
        R: RenderBackend + ?Sized,
        P: DocumentPaths + ?Sized,
    {
        let frame = self.pacer.frame_count() + 1;
        let mut report = FrameReport {
            frame,
            events: 0,
            sync: SyncReport::default(),
            errors: Vec::new(),
            state: self.state,
        };
        if self.state == LoopState::Terminating {
            return report;
        }

        for event in input.poll_events() {
            report.events += 1;
            if let Err(err) = self.handle_event(event, paths) {
                log::error!("Frame {}: {:?} failed: {}", frame, event, err);
                report.errors.push(err);
            }
            if self.state == LoopState::Terminating {
                report.state = self.state;
                return report;
            }
        }

        self.bridge.step();
        report.sync = self.bridge.sync_poses(&mut self.store);

        match self.render(renderer) {
            Ok(()) => {
                if let Some(path) = self.pending_screenshot.take() {
                    if let Err(err) = renderer.capture(&path) {
                        log::error!("Frame {}: screenshot failed: {}", frame, err);
                        report.errors.push(err.into());
                    }
                }
            }
            Err(err) => {
                log::error!("Frame {}: render failed: {}", frame, err);
                report.errors.push(err.into());
            }
        }

        self.pacer.finish_frame();
        report.state = self.state;
        report
    }

    /// Run frames until quit, then release physics and renderer
    ///
    /// Release also happens if a frame panics.
    pub fn run<I, R, P>(&mut self, input: &mut I, renderer: &mut R, paths: &mut P) -> SessionSummary
    where
        I: InputSource + ?Sized,
        R: RenderBackend + ?Sized,
        P: DocumentPaths + ?Sized,
    {
        log::info!("Editor session started");
        let mut errors = 0;
        let guard = SessionGuard {
            editor: &mut *self,
            renderer,
        };

        loop {
            let report = guard.editor.run_frame(input, &mut *guard.renderer, paths);
            errors += report.errors.len();
            if report.state == LoopState::Terminating {
                break;
            }
        }

        let summary = SessionSummary {
            frames: guard.editor.frame_count(),
            errors,
            final_objects: guard.editor.store.len(),
        };
        drop(guard);

        log::info!(
            "Editor session ended after {} frames ({:.1} fps average, {} errors)",
            summary.frames,
            self.pacer.average_fps(),
            summary.errors
        );
        summary
    }

    /// Release physics bodies and renderer resources; later calls do nothing
    pub fn shutdown<R: RenderBackend + ?Sized>(&mut self, renderer: &mut R) {
        if self.released {
            return;
        }
        self.state = LoopState::Terminating;
        self.bridge.release(&mut self.store);
        renderer.release();
        self.released = true;
    }
}

/// Releases the session's resources on every exit path
struct SessionGuard<'a, R: RenderBackend + ?Sized> {
    editor: &'a mut Editor,
    renderer: &'a mut R,
}

impl<R: RenderBackend + ?Sized> Drop for SessionGuard<'_, R> {
    fn drop(&mut self) {
        self.editor.shutdown(&mut *self.renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::FixedPaths;
    use crate::input::{KeyCode, ScriptedInput};
    use crate::physics::testing::MockPhysics;
    use crate::render::{CameraRig, HeadlessRenderer};

    fn editor() -> Editor {
        let (engine, _) = MockPhysics::new();
        Editor::new(EditorConfig::default().with_idle_wait_ms(0), Box::new(engine)).unwrap()
    }

    fn paths(dir: &tempfile::TempDir) -> FixedPaths {
        FixedPaths::new(dir.path().join("scene.xml"), dir.path().join("shot.png"))
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let (engine, _) = MockPhysics::new();
        let result = Editor::new(EditorConfig::default().with_viewport(1280, 0), Box::new(engine));
        assert!(matches!(result, Err(EditorError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_left_click_spawns_above_mapped_point() {
        let mut editor = editor();
        let id = editor.spawn_at_screen(640.0, 360.0).unwrap();
        let object = editor.store().get(id).unwrap();
        assert_eq!(object.position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_key_bindings_drive_camera() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor();
        let mut paths = paths(&dir);

        editor.handle_event(InputEvent::KeyDown(KeyCode::Left), &mut paths).unwrap();
        editor.handle_event(InputEvent::KeyDown(KeyCode::Left), &mut paths).unwrap();

        let CameraRig::FreeFly { offset } = editor.camera().rig() else {
            panic!("default rig is free-fly");
        };
        approx::assert_relative_eq!(offset.x, -0.2);
        assert_eq!(offset.y, -5.0);
        assert_eq!(offset.z, -20.0);
    }

    #[test]
    fn test_quit_stops_before_physics_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor();
        let mut renderer = HeadlessRenderer::new(16);
        let mut paths = paths(&dir);
        let mut input = ScriptedInput::new(vec![vec![InputEvent::Quit]]);

        let report = editor.run_frame(&mut input, &mut renderer, &mut paths);
        assert_eq!(report.state, LoopState::Terminating);
        assert_eq!(editor.bridge().steps(), 0);
        assert_eq!(renderer.presented_frames(), 0);
    }

    #[test]
    fn test_screenshot_captures_the_same_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor();
        let mut renderer = HeadlessRenderer::new(16);
        let mut paths = paths(&dir);
        let mut input = ScriptedInput::new(vec![vec![InputEvent::KeyDown(KeyCode::P)]]);

        let report = editor.run_frame(&mut input, &mut renderer, &mut paths);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert!(dir.path().join("shot.png").exists());
    }

    #[test]
    fn test_resize_rejects_zero() {
        let mut editor = editor();
        assert!(editor.resize(0, 100).is_err());
        editor.resize(800, 600).unwrap();
        assert_eq!(editor.mapper().viewport(), (800, 600));
        assert_eq!(editor.config().viewport.width, 800);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut editor = editor();
        let mut renderer = HeadlessRenderer::new(16);
        editor.spawn_at_screen(100.0, 100.0).unwrap();

        editor.shutdown(&mut renderer);
        editor.shutdown(&mut renderer);
        assert!(editor.is_released());
        assert!(renderer.is_released());
        assert!(editor.store().is_empty());
        assert_eq!(editor.bridge().body_count(), 0);
    }
}
