use crypt_caster_core::{PlayerSnapshot, SPRITE_IMAGE_SIZE};
use crypt_caster_raycast::DEFAULT_RAY_STEP;
use glam::Vec2;

use crate::RenderingError;

/// Smallest distance used when dividing by a ray or sprite distance.
pub const MIN_PROJECTION_DISTANCE: f32 = 1e-3;

/// Contrast bias applied to the squared distance falloff.
const SHADE_BIAS: f32 = 1.5;

/// Screen geometry and view parameters shared by the wall and sprite passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionConfig {
    screen_width: u32,
    screen_height: u32,
    ray_ratio: u32,
    view_distance: f32,
    ray_step: f32,
    wall_scale: f32,
}

impl ProjectionConfig {
    /// Creates a projection for a screen of the given size.
    ///
    /// `ray_ratio` is the number of screen pixels covered by each cast ray.
    /// The wall scale equals the sprite image size so that a wall and a sprite
    /// at the same distance project to the same height.
    pub fn new(
        screen_width: u32,
        screen_height: u32,
        ray_ratio: u32,
        view_distance: f32,
        ray_step: f32,
    ) -> Result<Self, RenderingError> {
        if screen_width == 0 || screen_height == 0 {
            return Err(RenderingError::InvalidResolution {
                width: screen_width,
                height: screen_height,
            });
        }
        if ray_ratio == 0 || ray_ratio > screen_width {
            return Err(RenderingError::InvalidRayRatio {
                ray_ratio,
                screen_width,
            });
        }
        if !view_distance.is_finite() || view_distance <= 0.0 {
            return Err(RenderingError::InvalidViewDistance { view_distance });
        }
        let ray_step = if ray_step.is_finite() && ray_step > 0.0 {
            ray_step
        } else {
            DEFAULT_RAY_STEP
        };

        Ok(Self {
            screen_width,
            screen_height,
            ray_ratio,
            view_distance,
            ray_step,
            wall_scale: SPRITE_IMAGE_SIZE as f32,
        })
    }

    /// Screen width in pixels.
    #[must_use]
    pub const fn screen_width(&self) -> u32 {
        self.screen_width
    }

    /// Screen height in pixels.
    #[must_use]
    pub const fn screen_height(&self) -> u32 {
        self.screen_height
    }

    /// Screen pixels covered by each ray column.
    #[must_use]
    pub const fn ray_ratio(&self) -> u32 {
        self.ray_ratio
    }

    /// Farthest distance drawn, in world units.
    #[must_use]
    pub const fn view_distance(&self) -> f32 {
        self.view_distance
    }

    /// Marching step used by the view pass.
    #[must_use]
    pub const fn ray_step(&self) -> f32 {
        self.ray_step
    }

    /// Number of rays cast per frame.
    #[must_use]
    pub const fn view_rays(&self) -> u32 {
        self.screen_width / self.ray_ratio
    }

    /// Angle of the ray cast for `column`.
    #[must_use]
    pub fn ray_angle(&self, camera: &Camera, column: u32) -> f32 {
        camera.angle - camera.fov / 2.0
            + camera.fov * column as f32 / self.view_rays() as f32
    }

    /// Projected height of a wall strip at distance `distance`.
    ///
    /// `relative_angle` is the ray angle minus the facing angle and removes
    /// the fish-eye distortion.
    #[must_use]
    pub fn strip_height(&self, distance: f32, relative_angle: f32) -> f32 {
        let distance = distance.max(MIN_PROJECTION_DISTANCE);
        let correction = relative_angle.cos().max(MIN_PROJECTION_DISTANCE);
        (self.screen_height as f32 / distance) * self.wall_scale / correction
    }

    /// Brightness multiplier for something `distance` away from the camera.
    #[must_use]
    pub fn shade(&self, distance: f32) -> f32 {
        let falloff = (1.0 - distance / self.view_distance).clamp(0.0, 1.0);
        (falloff * falloff * SHADE_BIAS).clamp(0.0, 1.0)
    }

    /// Vertical centre of the view.
    #[must_use]
    pub fn horizon(&self) -> f32 {
        self.screen_height as f32 / 2.0
    }
}

/// Eye through which a frame is rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub position: Vec2,
    /// Facing angle in radians.
    pub angle: f32,
    /// Horizontal field of view in radians.
    pub fov: f32,
}

impl Camera {
    /// Creates a camera.
    #[must_use]
    pub const fn new(position: Vec2, angle: f32, fov: f32) -> Self {
        Self {
            position,
            angle,
            fov,
        }
    }
}

impl From<&PlayerSnapshot> for Camera {
    fn from(player: &PlayerSnapshot) -> Self {
        Self::new(player.position, player.angle, player.fov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    fn projection() -> ProjectionConfig {
        ProjectionConfig::new(640, 480, 2, 384.0, 0.3).expect("valid projection")
    }

    #[test]
    fn rejects_degenerate_screens() {
        assert_eq!(
            ProjectionConfig::new(0, 480, 1, 384.0, 0.3),
            Err(RenderingError::InvalidResolution {
                width: 0,
                height: 480
            })
        );
        assert_eq!(
            ProjectionConfig::new(640, 480, 0, 384.0, 0.3),
            Err(RenderingError::InvalidRayRatio {
                ray_ratio: 0,
                screen_width: 640
            })
        );
        assert!(matches!(
            ProjectionConfig::new(640, 480, 2, f32::NAN, 0.3),
            Err(RenderingError::InvalidViewDistance { .. })
        ));
    }

    #[test]
    fn ray_angles_sweep_the_field_of_view() {
        let projection = projection();
        let camera = Camera::new(Vec2::ZERO, 1.0, FRAC_PI_3);
        assert_eq!(projection.view_rays(), 320);
        assert!((projection.ray_angle(&camera, 0) - (1.0 - FRAC_PI_3 / 2.0)).abs() < 1e-6);
        assert!((projection.ray_angle(&camera, 160) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn strips_shrink_with_distance_and_skip_fish_eye() {
        let projection = projection();
        assert!((projection.strip_height(32.0, 0.0) - 480.0).abs() < 1e-3);
        assert!((projection.strip_height(64.0, 0.0) - 240.0).abs() < 1e-3);
        assert!(projection.strip_height(64.0, 0.5) > projection.strip_height(64.0, 0.0));
        assert!(projection.strip_height(0.0, 0.0).is_finite());
    }

    #[test]
    fn shade_fades_to_black_at_the_view_distance() {
        let projection = projection();
        assert_eq!(projection.shade(0.0), 1.0);
        assert_eq!(projection.shade(384.0), 0.0);
        assert_eq!(projection.shade(1_000.0), 0.0);
        assert!(projection.shade(100.0) > projection.shade(200.0));
    }
}
