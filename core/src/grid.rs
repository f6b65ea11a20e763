use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{CellCoord, KeyColor, TextureId};

/// Ticks spent on each frame of an animated decoration.
const DECORATION_FRAME_TICKS: u64 = 10;

/// Behaviour triggered when the player uses a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Inert wall; using it produces a grunt.
    Plain,
    /// Door that clears its own cell when used.
    Door {
        /// Key consumed to open the door, if it is locked.
        key: Option<KeyColor>,
    },
    /// Switch that clears a remote cell when first used.
    Switch {
        /// Cell cleared by the switch.
        target: CellCoord,
        /// Whether the switch was already pressed.
        pressed: bool,
    },
    /// Secret wall that clears its own cell when used.
    Secret,
    /// Exit that completes the level when used.
    Exit,
}

/// Overlay texture drawn on top of a wall, such as a torch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decoration {
    /// First texture of the decoration.
    pub texture: TextureId,
    /// Whether the decoration alternates between two frames.
    pub animated: bool,
}

impl Decoration {
    /// Animation frame shown at the provided simulation tick.
    #[must_use]
    pub const fn frame(&self, animation_tick: u64) -> u8 {
        if self.animated && (animation_tick / DECORATION_FRAME_TICKS) % 2 == 1 {
            1
        } else {
            0
        }
    }
}

/// Solid content of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    texture: TextureId,
    decoration: Option<Decoration>,
    kind: WallKind,
    invisible: bool,
}

impl Wall {
    /// Creates a visible wall with the provided texture and behaviour.
    #[must_use]
    pub const fn new(texture: TextureId, kind: WallKind) -> Self {
        Self {
            texture,
            decoration: None,
            kind,
            invisible: false,
        }
    }

    /// Creates an invisible solid wall that only blocks movement.
    #[must_use]
    pub const fn furniture() -> Self {
        Self {
            texture: TextureId::new(0),
            decoration: None,
            kind: WallKind::Plain,
            invisible: true,
        }
    }

    /// Attaches an overlay decoration to the wall.
    #[must_use]
    pub const fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = Some(decoration);
        self
    }

    /// Texture drawn on every face of the wall.
    #[must_use]
    pub const fn texture(&self) -> TextureId {
        self.texture
    }

    /// Decoration drawn over the texture, if any.
    #[must_use]
    pub const fn decoration(&self) -> Option<Decoration> {
        self.decoration
    }

    /// Behaviour triggered when the wall is used.
    #[must_use]
    pub const fn kind(&self) -> WallKind {
        self.kind
    }

    /// Reports whether the wall blocks movement without being drawn.
    #[must_use]
    pub const fn is_invisible(&self) -> bool {
        self.invisible
    }

    /// Presses an unpressed switch, returning the cell it controls.
    pub fn press(&mut self) -> Option<CellCoord> {
        match &mut self.kind {
            WallKind::Switch { target, pressed } if !*pressed => {
                *pressed = true;
                Some(*target)
            }
            _ => None,
        }
    }
}

/// Read-only view over the level grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Option<Wall>],
    size: u32,
    cell_size: f32,
}

impl<'a> GridView<'a> {
    /// Wraps a row-major cell slice of `size * size` entries.
    #[must_use]
    pub const fn new(cells: &'a [Option<Wall>], size: u32, cell_size: f32) -> Self {
        Self {
            cells,
            size,
            cell_size,
        }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Returns the wall occupying the cell; out-of-range coordinates are empty.
    #[must_use]
    pub fn cell_at(&self, column: i32, row: i32) -> Option<&'a Wall> {
        if column < 0 || row < 0 {
            return None;
        }
        let (column, row) = (column as u32, row as u32);
        if column >= self.size || row >= self.size {
            return None;
        }
        let index = (row as usize) * (self.size as usize) + column as usize;
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Cell coordinates containing the point, possibly outside the grid.
    #[must_use]
    pub fn world_to_cell(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Wall containing the point together with its cell.
    #[must_use]
    pub fn wall_at(&self, point: Vec2) -> Option<(CellCoord, &'a Wall)> {
        let (column, row) = self.world_to_cell(point);
        self.cell_at(column, row)
            .map(|wall| (CellCoord::new(column as u32, row as u32), wall))
    }

    /// Reports whether the point lies inside any wall, drawn or not.
    #[must_use]
    pub fn is_solid(&self, point: Vec2) -> bool {
        self.wall_at(point).is_some()
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        cell.center(self.cell_size)
    }

    /// Iterator over every occupied cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = (CellCoord, &'a Wall)> + 'a {
        let size = self.size.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| {
                let index = index as u32;
                cell.as_ref()
                    .map(|wall| (CellCoord::new(index % size, index / size), wall))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed_grid() -> Vec<Option<Wall>> {
        let size = 3;
        let mut cells = vec![None; size * size];
        for row in 0..size {
            for column in 0..size {
                if row == 0 || column == 0 || row == size - 1 || column == size - 1 {
                    cells[row * size + column] =
                        Some(Wall::new(TextureId::new(1), WallKind::Plain));
                }
            }
        }
        cells
    }

    #[test]
    fn cell_at_is_empty_outside_the_grid() {
        let cells = boxed_grid();
        let grid = GridView::new(&cells, 3, 32.0);

        assert!(grid.cell_at(-1, 0).is_none());
        assert!(grid.cell_at(0, -1).is_none());
        assert!(grid.cell_at(3, 0).is_none());
        assert!(grid.cell_at(0, 3).is_none());
        assert!(grid.cell_at(i32::MAX, i32::MIN).is_none());
        assert!(grid.cell_at(0, 0).is_some());
        assert!(grid.cell_at(1, 1).is_none());
    }

    #[test]
    fn wall_at_composes_world_to_cell() {
        let cells = boxed_grid();
        let grid = GridView::new(&cells, 3, 32.0);

        assert_eq!(grid.world_to_cell(Vec2::new(40.0, 70.0)), (1, 2));
        assert_eq!(grid.world_to_cell(Vec2::new(-1.0, 5.0)), (-1, 0));
        let (cell, _) = grid.wall_at(Vec2::new(40.0, 70.0)).expect("border wall");
        assert_eq!(cell, CellCoord::new(1, 2));
        assert!(!grid.is_solid(Vec2::new(48.0, 48.0)));
    }

    #[test]
    fn walls_iterates_occupied_cells_only() {
        let cells = boxed_grid();
        let grid = GridView::new(&cells, 3, 32.0);

        assert_eq!(grid.walls().count(), 8);
        assert!(grid.walls().all(|(cell, _)| cell != CellCoord::new(1, 1)));
    }

    #[test]
    fn switch_presses_only_once() {
        let target = CellCoord::new(4, 4);
        let mut wall = Wall::new(
            TextureId::new(2),
            WallKind::Switch {
                target,
                pressed: false,
            },
        );

        assert_eq!(wall.press(), Some(target));
        assert_eq!(wall.press(), None);
        assert_eq!(
            wall.kind(),
            WallKind::Switch {
                target,
                pressed: true
            }
        );
    }

    #[test]
    fn animated_decoration_alternates_every_ten_ticks() {
        let torch = Decoration {
            texture: TextureId::new(9),
            animated: true,
        };
        let frames: Vec<u8> = [0, 9, 10, 19, 20].iter().map(|tick| torch.frame(*tick)).collect();
        assert_eq!(frames, vec![0, 0, 1, 1, 0]);

        let banner = Decoration {
            texture: TextureId::new(9),
            animated: false,
        };
        assert_eq!(banner.frame(15), 0);
    }
}
