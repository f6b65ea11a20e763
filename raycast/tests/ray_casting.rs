use std::f32::consts::FRAC_PI_2;

use crypt_caster_core::{CellCoord, GridView, TextureId, Wall, WallKind, CELL_SIZE};
use crypt_caster_raycast::{RayCaster, DEFAULT_RAY_STEP};
use glam::Vec2;

const SIZE: usize = 10;

fn bordered_cells() -> Vec<Option<Wall>> {
    let mut cells = vec![None; SIZE * SIZE];
    for row in 0..SIZE {
        for column in 0..SIZE {
            if row == 0 || column == 0 || row == SIZE - 1 || column == SIZE - 1 {
                cells[row * SIZE + column] = Some(Wall::new(TextureId::new(1), WallKind::Plain));
            }
        }
    }
    cells
}

fn place(cells: &mut [Option<Wall>], column: usize, row: usize, texture: u16) {
    cells[row * SIZE + column] = Some(Wall::new(TextureId::new(texture), WallKind::Plain));
}

fn center(column: u32, row: u32) -> Vec2 {
    CellCoord::new(column, row).center(CELL_SIZE)
}

#[test]
fn ray_along_axis_reports_distance_within_one_step() {
    let mut cells = bordered_cells();
    place(&mut cells, 2, 6, 4);
    let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);

    let origin = Vec2::new(2.0 * CELL_SIZE + 5.0, 2.0 * CELL_SIZE);
    let hit = RayCaster::default().cast(&grid, origin, FRAC_PI_2, 12.0 * CELL_SIZE);

    let expected = 4.0 * CELL_SIZE;
    assert!(
        (hit.distance - expected).abs() <= DEFAULT_RAY_STEP,
        "distance {} expected {}",
        hit.distance,
        expected
    );
    let wall = hit.wall.expect("wall four cells south");
    assert_eq!(wall.cell, CellCoord::new(2, 6));
    assert_eq!(wall.wall.texture(), TextureId::new(4));
}

#[test]
fn ray_east_from_player_cell_hits_nearest_wall() {
    for k in 1..=6u32 {
        let mut cells = bordered_cells();
        place(&mut cells, 1 + k as usize, 1, 2);
        let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);

        let origin = center(1, 1);
        let player_offset = origin.x - CELL_SIZE;
        let hit = RayCaster::default().cast(&grid, origin, 0.0, 12.0 * CELL_SIZE);

        let expected = k as f32 * CELL_SIZE - player_offset;
        assert!(
            (hit.distance - expected).abs() <= DEFAULT_RAY_STEP,
            "k = {k}: distance {} expected {}",
            hit.distance,
            expected
        );
        let wall = hit.wall.expect("wall east of the player");
        assert_eq!(wall.cell, CellCoord::new(1 + k, 1));
        assert_eq!(Some(wall.wall), grid.cell_at(1 + k as i32, 1));
    }
}

#[test]
fn ray_without_wall_in_range_returns_max_distance() {
    let cells = bordered_cells();
    let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);

    let hit = RayCaster::default().cast(&grid, center(1, 1), 0.0, 2.0 * CELL_SIZE);
    assert!(hit.wall.is_none());
    assert_eq!(hit.distance, 2.0 * CELL_SIZE);
}

#[test]
fn line_of_sight_breaks_only_for_walls_between_the_points() {
    let player = center(1, 4);
    let monster = center(6, 4);

    let cells = bordered_cells();
    let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);
    let caster = RayCaster::default();
    assert!(caster.line_of_sight(&grid, player, monster));
    assert!(caster.line_of_sight(&grid, monster, player));

    for column in 2..=5 {
        let mut blocked = bordered_cells();
        place(&mut blocked, column, 4, 1);
        let grid = GridView::new(&blocked, SIZE as u32, CELL_SIZE);
        assert!(
            !caster.line_of_sight(&grid, player, monster),
            "wall at column {column} must block sight"
        );
    }

    let mut behind = bordered_cells();
    place(&mut behind, 7, 4, 1);
    let grid = GridView::new(&behind, SIZE as u32, CELL_SIZE);
    assert!(caster.line_of_sight(&grid, player, monster));
}

#[test]
fn probe_only_reaches_walls_within_range() {
    let cells = bordered_cells();
    let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);
    let caster = RayCaster::default();

    let near = caster.probe(&grid, center(1, 1), 0.0, CELL_SIZE);
    assert!(near.is_none());

    let facing_wall = caster.probe(&grid, center(8, 1), 0.0, CELL_SIZE);
    assert_eq!(facing_wall.map(|hit| hit.cell), Some(CellCoord::new(9, 1)));
}

#[test]
fn wall_at_exactly_max_distance_is_out_of_range() {
    let cells = bordered_cells();
    let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);
    let caster = RayCaster::new(1.0);
    let origin = Vec2::new(48.0, 48.0);

    let at_limit = caster.cast(&grid, origin, 0.0, 240.0);
    assert!(at_limit.wall.is_none());
    assert_eq!(at_limit.distance, 240.0);

    let beyond = caster.cast(&grid, origin, 0.0, 241.0);
    assert_eq!(beyond.wall.map(|hit| hit.cell), Some(CellCoord::new(9, 1)));
    assert_eq!(beyond.distance, 240.0);
}

#[test]
fn coarse_steps_still_texture_vertical_faces_along_y() {
    let cells = bordered_cells();
    let grid = GridView::new(&cells, SIZE as u32, CELL_SIZE);

    let hit = RayCaster::new(1.0).cast(&grid, Vec2::new(48.5, 40.0), 0.0, 12.0 * CELL_SIZE);
    let wall = hit.wall.expect("east border");
    assert_eq!(wall.point, Vec2::new(288.5, 40.0));
    assert!((wall.texture_fraction - 0.25).abs() < 1e-4);
}
