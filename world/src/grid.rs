use crypt_caster_core::{CellCoord, GridView, Wall};
use glam::Vec2;

/// Mutable square grid of walls owned by the loaded level.
#[derive(Debug)]
pub(crate) struct GridMap {
    cells: Vec<Option<Wall>>,
    size: u32,
    cell_size: f32,
}

impl GridMap {
    pub(crate) fn new(size: u32, cell_size: f32) -> Self {
        let len = (size as usize) * (size as usize);
        Self {
            cells: vec![None; len],
            size,
            cell_size,
        }
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.size, self.cell_size)
    }

    pub(crate) fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.size || cell.row() >= self.size {
            return None;
        }
        Some(cell.row() as usize * self.size as usize + cell.column() as usize)
    }

    pub(crate) fn set(&mut self, cell: CellCoord, wall: Wall) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = Some(wall);
        }
    }

    /// Empties the cell, returning the wall it held.
    pub(crate) fn clear(&mut self, cell: CellCoord) -> Option<Wall> {
        let index = self.index(cell)?;
        self.cells[index].take()
    }

    pub(crate) fn wall_mut(&mut self, cell: CellCoord) -> Option<&mut Wall> {
        let index = self.index(cell)?;
        self.cells[index].as_mut()
    }

    /// Finds a wall touching a circle of `radius` around `point`.
    ///
    /// The circle is approximated by its four axis extremes.
    pub(crate) fn blocking_cell(&self, point: Vec2, radius: f32) -> Option<CellCoord> {
        let grid = self.view();
        [
            Vec2::new(point.x - radius, point.y),
            Vec2::new(point.x + radius, point.y),
            Vec2::new(point.x, point.y - radius),
            Vec2::new(point.x, point.y + radius),
        ]
        .into_iter()
        .find_map(|probe| grid.wall_at(probe).map(|(cell, _)| cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::{TextureId, WallKind};

    #[test]
    fn clear_removes_wall_and_ignores_outside_cells() {
        let mut grid = GridMap::new(4, 32.0);
        let cell = CellCoord::new(2, 1);
        grid.set(cell, Wall::new(TextureId::new(1), WallKind::Plain));
        grid.set(CellCoord::new(9, 9), Wall::new(TextureId::new(1), WallKind::Plain));

        assert!(grid.view().cell_at(2, 1).is_some());
        assert!(grid.clear(cell).is_some());
        assert!(grid.view().cell_at(2, 1).is_none());
        assert!(grid.clear(CellCoord::new(9, 9)).is_none());
    }

    #[test]
    fn blocking_cell_checks_axis_extremes() {
        let mut grid = GridMap::new(4, 32.0);
        let wall = CellCoord::new(2, 1);
        grid.set(wall, Wall::furniture());

        assert_eq!(grid.blocking_cell(Vec2::new(62.0, 48.0), 3.0), Some(wall));
        assert_eq!(grid.blocking_cell(Vec2::new(58.0, 48.0), 3.0), None);
    }
}
