//! Headless rendering backend
//!
//! Records every frame instead of drawing it. Captures are rasterized from
//! the last presented frame as a top-down orthographic view: the ground as a
//! white/green checkerboard of one-unit cells and each cube as a blue square
//! footprint.

use super::{BackendResult, FrameView, RenderBackend, RenderError};
use crate::foundation::math::Transform;
use image::{Rgb, RgbImage};
use std::path::Path;

const GROUND_LIGHT: Rgb<u8> = Rgb([255, 255, 255]);
const GROUND_DARK: Rgb<u8> = Rgb([0, 255, 0]);
const CUBE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Everything drawn in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Camera matrices for the frame
    pub view: FrameView,
    /// Ground `(half_extent, height)` if it was drawn
    pub ground: Option<(f32, f32)>,
    /// Object transforms in draw order
    pub objects: Vec<Transform>,
}

/// Backend that records frames and can rasterize a top-down capture
#[derive(Debug)]
pub struct HeadlessRenderer {
    capture_size: u32,
    current: Option<FrameRecord>,
    last_presented: Option<FrameRecord>,
    presented_frames: u64,
    released: bool,
}

impl HeadlessRenderer {
    /// Create a renderer whose captures are `capture_size` × `capture_size` pixels
    pub fn new(capture_size: u32) -> Self {
        Self {
            capture_size: capture_size.max(1),
            current: None,
            last_presented: None,
            presented_frames: 0,
            released: false,
        }
    }

    /// Last presented frame
    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.last_presented.as_ref()
    }

    /// Number of frames presented
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    /// Whether [`RenderBackend::release`] has run
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn current_mut(&mut self) -> Option<&mut FrameRecord> {
        if self.current.is_none() {
            log::warn!("Draw call outside of a frame ignored");
        }
        self.current.as_mut()
    }

    fn rasterize(&self, frame: &FrameRecord) -> RgbImage {
        let size = self.capture_size;
        let mut image = RgbImage::from_pixel(size, size, BACKGROUND);

        // Top-down view spans the ground, or a 20-unit window without one
        let half_extent = frame.ground.map_or(20.0, |(half, _)| half).max(f32::EPSILON);
        let units_per_pixel = 2.0 * half_extent / size as f32;
        let to_world = |px: u32| -half_extent + (px as f32 + 0.5) * units_per_pixel;

        if frame.ground.is_some() {
            for (px, pz, pixel) in image.enumerate_pixels_mut() {
                let cell_x = to_world(px).floor() as i64;
                let cell_z = to_world(pz).floor() as i64;
                *pixel = if (cell_x + cell_z).rem_euclid(2) == 0 {
                    GROUND_LIGHT
                } else {
                    GROUND_DARK
                };
            }
        }

        for object in &frame.objects {
            let footprint = 0.5 * object.scale.x.abs().max(object.scale.z.abs());
            let to_pixel = |world: f32| ((world + half_extent) / units_per_pixel).floor();
            let min_x = to_pixel(object.position.x - footprint).max(0.0) as u32;
            let max_x = to_pixel(object.position.x + footprint).min(size as f32 - 1.0);
            let min_z = to_pixel(object.position.z - footprint).max(0.0) as u32;
            let max_z = to_pixel(object.position.z + footprint).min(size as f32 - 1.0);
            if max_x < 0.0 || max_z < 0.0 {
                continue;
            }
            for pz in min_z..=max_z as u32 {
                for px in min_x..=max_x as u32 {
                    image.put_pixel(px, pz, CUBE_COLOR);
                }
            }
        }

        image
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(512)
    }
}

impl RenderBackend for HeadlessRenderer {
    fn begin_frame(&mut self, view: &FrameView) -> BackendResult<()> {
        if self.current.is_some() {
            return Err(RenderError::FrameProtocol(
                "begin_frame called twice without present".to_string(),
            ));
        }
        self.current = Some(FrameRecord {
            view: *view,
            ground: None,
            objects: Vec::new(),
        });
        Ok(())
    }

    fn draw_ground(&mut self, half_extent: f32, height: f32) {
        if let Some(frame) = self.current_mut() {
            frame.ground = Some((half_extent, height));
        }
    }

    fn draw_object(&mut self, transform: &Transform) {
        if let Some(frame) = self.current_mut() {
            frame.objects.push(transform.clone());
        }
    }

    fn present(&mut self) -> BackendResult<()> {
        let frame = self.current.take().ok_or_else(|| {
            RenderError::FrameProtocol("present called without begin_frame".to_string())
        })?;
        self.last_presented = Some(frame);
        self.presented_frames += 1;
        Ok(())
    }

    fn capture(&mut self, path: &Path) -> BackendResult<()> {
        let frame = self.last_presented.as_ref().ok_or(RenderError::NothingPresented)?;
        let image = self.rasterize(frame);
        image
            .save(path)
            .map_err(|e| RenderError::Capture(format!("{}: {e}", path.display())))?;
        log::info!("Captured frame to {}", path.display());
        Ok(())
    }

    fn release(&mut self) {
        self.current = None;
        self.released = true;
        log::debug!("Headless renderer released after {} frames", self.presented_frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};

    fn view() -> FrameView {
        FrameView {
            view: Mat4::identity(),
            projection: Mat4::identity(),
        }
    }

    #[test]
    fn test_records_presented_frame() {
        let mut renderer = HeadlessRenderer::new(64);
        renderer.begin_frame(&view()).unwrap();
        renderer.draw_ground(20.0, 0.0);
        renderer.draw_object(&Transform::from_position(Vec3::new(1.0, 0.5, 2.0)));
        renderer.present().unwrap();

        let frame = renderer.last_frame().unwrap();
        assert_eq!(frame.ground, Some((20.0, 0.0)));
        assert_eq!(frame.objects.len(), 1);
        assert_eq!(renderer.presented_frames(), 1);
    }

    #[test]
    fn test_frame_protocol_is_enforced() {
        let mut renderer = HeadlessRenderer::new(64);
        assert!(matches!(renderer.present(), Err(RenderError::FrameProtocol(_))));
        renderer.begin_frame(&view()).unwrap();
        assert!(matches!(renderer.begin_frame(&view()), Err(RenderError::FrameProtocol(_))));
    }

    #[test]
    fn test_capture_requires_presented_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = HeadlessRenderer::new(64);
        let result = renderer.capture(&dir.path().join("shot.png"));
        assert!(matches!(result, Err(RenderError::NothingPresented)));
    }

    #[test]
    fn test_capture_draws_cube_footprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");

        let mut renderer = HeadlessRenderer::new(40);
        renderer.begin_frame(&view()).unwrap();
        renderer.draw_ground(20.0, 0.0);
        renderer.draw_object(&Transform::from_position(Vec3::new(0.5, 0.5, 0.5)));
        renderer.present().unwrap();
        renderer.capture(&path).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (40, 40));
        // One pixel per world unit: cube at (0.5, 0.5) covers pixel (20, 20)
        assert_eq!(*image.get_pixel(20, 20), CUBE_COLOR);
        // Corner cell (-20, -20) is an even cell
        assert_eq!(*image.get_pixel(0, 0), GROUND_LIGHT);
        assert_eq!(*image.get_pixel(1, 0), GROUND_DARK);
    }

    #[test]
    fn test_release_marks_renderer() {
        let mut renderer = HeadlessRenderer::default();
        renderer.release();
        assert!(renderer.is_released());
    }
}
