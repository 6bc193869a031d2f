//! Screen → world coordinate mapping for object placement
//!
//! Converts a mouse click in pixels to a point on the ground plane.
//!
//! The default [`PickingMode::Planar`] mapping scales Normalized Device
//! Coordinates by the ground half-extent and ignores the camera entirely:
//! after panning or zooming, the placed cube no longer lands under the
//! cursor. This is a known approximation and is kept as the default.
//! [`PickingMode::CameraRay`] instead casts a ray through the click using
//! the current view and projection.

use crate::config::ConfigError;
use crate::foundation::math::{Mat4, Ray, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// How clicks are turned into ground positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickingMode {
    /// NDC scaled by the ground half-extent, camera-independent
    #[default]
    Planar,
    /// Ray through the click intersected with the ground plane
    CameraRay,
}

/// Maps screen-space clicks to world-space placement points
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    width: u32,
    height: u32,
    half_extent: f32,
    ground_height: f32,
}

impl CoordinateMapper {
    /// Create a mapper for a viewport of `width` × `height` pixels
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when either dimension is zero.
    pub fn new(width: u32, height: u32, half_extent: f32, ground_height: f32) -> Result<Self, ConfigError> {
        Self::check_viewport(width, height)?;
        Ok(Self {
            width,
            height,
            half_extent,
            ground_height,
        })
    }

    /// Update the viewport size (call on window resize)
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when either dimension is zero; the
    /// previous size is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        Self::check_viewport(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn check_viewport(width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-zero, got {width}x{height}"
            )));
        }
        Ok(())
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width / height of the viewport
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Convert screen coordinates to Normalized Device Coordinates
    ///
    /// X: -1 = left, +1 = right. Y: -1 = top, +1 = bottom. Points outside
    /// the viewport extrapolate past ±1.
    pub fn screen_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let ndc_x = (x / self.width as f32) * 2.0 - 1.0;
        let ndc_y = (y / self.height as f32) * 2.0 - 1.0;
        (ndc_x, ndc_y)
    }

    /// Camera-independent ground mapping, returns `(x, z)`
    pub fn map(&self, x: f32, y: f32) -> (f32, f32) {
        let (ndc_x, ndc_y) = self.screen_to_ndc(x, y);
        (ndc_x * self.half_extent, ndc_y * self.half_extent)
    }

    /// World-space ray through a screen point
    ///
    /// `view_projection` is `projection * view`. Returns `None` if the
    /// matrix is not invertible.
    pub fn camera_ray(&self, x: f32, y: f32, view_projection: &Mat4) -> Option<Ray> {
        let inverse = view_projection.try_inverse()?;
        let (ndc_x, ndc_y) = self.screen_to_ndc(x, y);
        // Clip space Y points up, screen Y points down
        let clip_y = -ndc_y;

        let near = inverse * Vec4::new(ndc_x, clip_y, -1.0, 1.0);
        let far = inverse * Vec4::new(ndc_x, clip_y, 1.0, 1.0);
        if near.w.abs() <= f32::EPSILON || far.w.abs() <= f32::EPSILON {
            return None;
        }

        let near = Vec3::new(near.x, near.y, near.z) / near.w;
        let far = Vec3::new(far.x, far.y, far.z) / far.w;
        let direction = far - near;
        if direction.norm_squared() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(near, direction))
    }

    /// Ground-plane placement point for a click
    ///
    /// In [`PickingMode::CameraRay`] a ray that misses the ground falls back
    /// to the planar mapping.
    pub fn placement_point(&self, x: f32, y: f32, mode: PickingMode, view_projection: &Mat4) -> Vec3 {
        if mode == PickingMode::CameraRay {
            let hit = self
                .camera_ray(x, y, view_projection)
                .and_then(|ray| ray.intersect_ground(self.ground_height));
            if let Some(point) = hit {
                return point;
            }
            log::debug!("Camera ray at ({x}, {y}) missed the ground, using planar mapping");
        }

        let (wx, wz) = self.map(x, y);
        Vec3::new(wx, self.ground_height, wz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(1280, 720, 20.0, 0.0).unwrap()
    }

    #[test]
    fn test_top_left_maps_to_negative_extent() {
        let (x, z) = mapper().map(0.0, 0.0);
        assert_relative_eq!(x, -20.0);
        assert_relative_eq!(z, -20.0);
    }

    #[test]
    fn test_center_maps_to_origin() {
        let (x, z) = mapper().map(640.0, 360.0);
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(z, 0.0);
    }

    #[test]
    fn test_outside_viewport_extrapolates() {
        let (x, z) = mapper().map(1920.0, -360.0);
        assert_relative_eq!(x, 40.0);
        assert_relative_eq!(z, -40.0);
    }

    #[test]
    fn test_zero_viewport_is_rejected() {
        assert!(matches!(CoordinateMapper::new(0, 720, 20.0, 0.0), Err(ConfigError::Invalid(_))));
        assert!(matches!(CoordinateMapper::new(1280, 0, 20.0, 0.0), Err(ConfigError::Invalid(_))));

        let mut mapper = mapper();
        assert!(mapper.resize(0, 10).is_err());
        assert_eq!(mapper.viewport(), (1280, 720));
    }

    #[test]
    fn test_camera_ray_from_overhead_camera_hits_below_center() {
        let mapper = CoordinateMapper::new(800, 800, 20.0, 0.0).unwrap();
        let view = Mat4::look_at(Vec3::new(3.0, 10.0, -2.0), Vec3::new(3.0, 0.0, -2.0), -Vec3::z());
        let projection = Mat4::perspective(45f32.to_radians(), 1.0, 0.1, 50.0);

        let point = mapper.placement_point(400.0, 400.0, PickingMode::CameraRay, &(projection * view));
        assert_relative_eq!(point, Vec3::new(3.0, 0.0, -2.0), epsilon = 1e-3);
    }

    #[test]
    fn test_camera_ray_miss_falls_back_to_planar() {
        let mapper = mapper();
        // Camera looking straight up never reaches the ground
        let view = Mat4::look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 10.0, 0.0), Vec3::z());
        let projection = Mat4::perspective(45f32.to_radians(), mapper.aspect_ratio(), 0.1, 50.0);

        let point = mapper.placement_point(640.0, 360.0, PickingMode::CameraRay, &(projection * view));
        assert_relative_eq!(point, Vec3::zeros());
    }
}
