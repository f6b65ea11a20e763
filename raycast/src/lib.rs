#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step ray marching through the level grid.
//!
//! The same marcher backs the per-column view pass, monster line of sight and
//! the short range probes used by the player's use action. Rays stop at the
//! first cell holding a visible wall and report the distance of the stopping
//! iteration without interpolating inside the step.

use crypt_caster_core::{bearing, heading_vector, CellCoord, GridView, Wall};
use glam::Vec2;

/// Default distance, in world units, advanced per marching iteration.
pub const DEFAULT_RAY_STEP: f32 = 0.3;

/// Smallest tolerance, as a fraction of a cell, used to decide whether a hit
/// point lies on a vertical cell edge.
pub const EDGE_EPSILON: f32 = 0.01;

/// Details of a wall struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit<'a> {
    /// Cell containing the wall.
    pub cell: CellCoord,
    /// Wall occupying the cell.
    pub wall: &'a Wall,
    /// World-space point of the stopping iteration.
    pub point: Vec2,
    /// Horizontal texture coordinate of the struck face in `[0, 1)`.
    pub texture_fraction: f32,
}

/// Outcome of a single ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<'a> {
    /// Wall struck by the ray, or `None` when the ray ran out of range.
    pub wall: Option<WallHit<'a>>,
    /// Distance travelled; equals the maximum distance when nothing was hit.
    pub distance: f32,
}

/// Marches rays through a grid with a fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCaster {
    step: f32,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self::new(DEFAULT_RAY_STEP)
    }
}

impl RayCaster {
    /// Creates a caster advancing `step` world units per iteration.
    ///
    /// Non-positive or non-finite steps fall back to [`DEFAULT_RAY_STEP`].
    #[must_use]
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            DEFAULT_RAY_STEP
        };
        Self { step }
    }

    /// Distance advanced per iteration.
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Edge tolerance for hit points produced by this caster.
    ///
    /// A ray overshoots a face by up to one step, so the tolerance grows with
    /// the step and never drops below [`EDGE_EPSILON`].
    #[must_use]
    pub fn edge_tolerance(&self, cell_size: f32) -> f32 {
        (self.step / cell_size).max(EDGE_EPSILON)
    }

    /// Casts a ray and reports the first visible wall closer than
    /// `max_distance`.
    #[must_use]
    pub fn cast<'a>(
        &self,
        grid: &GridView<'a>,
        origin: Vec2,
        angle: f32,
        max_distance: f32,
    ) -> RayHit<'a> {
        let direction = heading_vector(angle);
        let cell_size = grid.cell_size();
        let max_distance = if max_distance.is_finite() {
            max_distance.max(0.0)
        } else {
            0.0
        };
        let tolerance = self.edge_tolerance(cell_size);
        let iterations = (max_distance / self.step).ceil() as u32;

        for iteration in 0..iterations {
            let t = iteration as f32 * self.step;
            if t >= max_distance {
                break;
            }
            let point = origin + direction * t;
            let (column, row) = grid.world_to_cell(point);
            if let Some(wall) = grid.cell_at(column, row) {
                if !wall.is_invisible() {
                    return RayHit {
                        wall: Some(WallHit {
                            cell: CellCoord::new(column as u32, row as u32),
                            wall,
                            point,
                            texture_fraction: texture_fraction(point, cell_size, tolerance),
                        }),
                        distance: t,
                    };
                }
            }
        }

        RayHit {
            wall: None,
            distance: max_distance,
        }
    }

    /// Reports whether no visible wall lies between the two points.
    #[must_use]
    pub fn line_of_sight(&self, grid: &GridView<'_>, from: Vec2, to: Vec2) -> bool {
        let distance = from.distance(to);
        if distance <= f32::EPSILON {
            return true;
        }
        self.cast(grid, from, bearing(from, to), distance)
            .wall
            .is_none()
    }

    /// Short range probe used by interactions; returns the wall within `range`.
    #[must_use]
    pub fn probe<'a>(
        &self,
        grid: &GridView<'a>,
        origin: Vec2,
        angle: f32,
        range: f32,
    ) -> Option<WallHit<'a>> {
        self.cast(grid, origin, angle, range).wall
    }
}

/// Texture coordinate of a hit point inside its cell.
///
/// A fractional x within `tolerance` of a cell edge means the ray struck a
/// face aligned with the y axis, so the fractional y selects the texture
/// column.
#[must_use]
pub fn texture_fraction(point: Vec2, cell_size: f32, tolerance: f32) -> f32 {
    let scaled = point / cell_size;
    let frac_x = scaled.x - scaled.x.floor();
    let frac_y = scaled.y - scaled.y.floor();
    if frac_x < tolerance || frac_x > 1.0 - tolerance {
        frac_y
    } else {
        frac_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::{TextureId, WallKind};

    #[test]
    fn texture_fraction_uses_y_on_vertical_faces() {
        let fraction = texture_fraction(Vec2::new(64.1, 40.0), 32.0, EDGE_EPSILON);
        assert!((fraction - 0.25).abs() < 1e-4);

        let fraction = texture_fraction(Vec2::new(72.0, 64.1), 32.0, EDGE_EPSILON);
        assert!((fraction - 0.25).abs() < 1e-4);
    }

    #[test]
    fn edge_tolerance_follows_coarse_steps() {
        assert_eq!(RayCaster::new(0.2).edge_tolerance(32.0), EDGE_EPSILON);
        assert_eq!(RayCaster::new(1.0).edge_tolerance(32.0), 1.0 / 32.0);
    }

    #[test]
    fn invisible_walls_do_not_stop_rays() {
        let size = 4;
        let mut cells = vec![None; size * size];
        cells[size + 2] = Some(Wall::furniture());
        cells[size + 3] = Some(Wall::new(TextureId::new(3), WallKind::Plain));
        let grid = GridView::new(&cells, size as u32, 32.0);

        let hit = RayCaster::default().cast(&grid, Vec2::new(48.0, 48.0), 0.0, 200.0);
        let wall = hit.wall.expect("visible wall behind furniture");
        assert_eq!(wall.cell, CellCoord::new(3, 1));
        assert_eq!(wall.wall.texture(), TextureId::new(3));
    }

    #[test]
    fn invalid_step_falls_back_to_default() {
        assert_eq!(RayCaster::new(0.0).step(), DEFAULT_RAY_STEP);
        assert_eq!(RayCaster::new(f32::NAN).step(), DEFAULT_RAY_STEP);
        assert_eq!(RayCaster::new(1.5).step(), 1.5);
    }
}
