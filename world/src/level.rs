use std::{
    collections::{HashMap, HashSet},
    f32::consts::TAU,
    time::Duration,
};

use crypt_caster_core::{
    CellContent, CellCoord, CellDescriptor, KeyColor, LevelAmbience, LevelDescriptor, TextureId,
    Wall, WallKind, CELL_SIZE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    arena::Arena,
    grid::GridMap,
    items::Item,
    monsters::{Corpse, Monster},
    player::Player,
    projectiles::Projectile,
    schedule::Scheduler,
    Config, MAX_LEVEL_SIZE,
};

/// Reasons a level descriptor is rejected at load time.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LevelError {
    /// The grid edge is zero or larger than [`MAX_LEVEL_SIZE`].
    #[error("level size {size} must be between 1 and 1024")]
    InvalidSize {
        /// Requested edge length.
        size: u32,
    },
    /// A cell record lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the {size}x{size} grid")]
    CellOutOfBounds {
        /// Column of the record.
        column: u32,
        /// Row of the record.
        row: u32,
        /// Edge length of the grid.
        size: u32,
    },
    /// Two records describe the same cell.
    #[error("cell ({column}, {row}) is described more than once")]
    DuplicateCell {
        /// Column of the records.
        column: u32,
        /// Row of the records.
        row: u32,
    },
    /// No player spawn was placed.
    #[error("level has no player spawn")]
    MissingPlayerSpawn,
    /// More than one player spawn was placed.
    #[error("level has more than one player spawn")]
    DuplicatePlayerSpawn,
    /// The player spawn facing is NaN or infinite.
    #[error("player spawn facing must be finite")]
    InvalidFacing,
    /// A border cell is not solid.
    #[error("border cell ({column}, {row}) must hold a wall")]
    OpenBorder {
        /// Column of the open cell.
        column: u32,
        /// Row of the open cell.
        row: u32,
    },
    /// A switch targets a cell outside the grid.
    #[error("switch at ({column}, {row}) targets ({target_column}, {target_row}) outside the grid")]
    SwitchTargetOutOfBounds {
        /// Column of the switch.
        column: u32,
        /// Row of the switch.
        row: u32,
        /// Column of the target.
        target_column: u32,
        /// Row of the target.
        target_row: u32,
    },
}

/// Entity counts reported when a level loads.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LevelSummary {
    pub(crate) monsters: u32,
    pub(crate) items: u32,
    pub(crate) secrets: u32,
}

/// Everything owned by the loaded level; replaced wholesale on load or title.
#[derive(Debug)]
pub(crate) struct Level {
    pub(crate) name: String,
    pub(crate) ambience: LevelAmbience,
    pub(crate) grid: GridMap,
    pub(crate) player: Player,
    pub(crate) monsters: Arena<Monster>,
    pub(crate) projectiles: Arena<Projectile>,
    pub(crate) items: Arena<Item>,
    pub(crate) corpses: Arena<Corpse>,
    pub(crate) schedule: Scheduler,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) elapsed: Duration,
    pub(crate) ticks: u64,
    pub(crate) footstep_ready: bool,
}

impl Level {
    /// Level shown behind the title screen: no grid and no entities.
    pub(crate) fn empty(config: &Config) -> Self {
        Self::with_grid(
            String::new(),
            LevelAmbience::default(),
            GridMap::new(0, CELL_SIZE),
            Player::spawn(CellCoord::new(0, 0).center(CELL_SIZE), 0.0, config),
            config.rng_seed,
        )
    }

    fn with_grid(
        name: String,
        ambience: LevelAmbience,
        grid: GridMap,
        player: Player,
        seed: u64,
    ) -> Self {
        Self {
            name,
            ambience,
            grid,
            player,
            monsters: Arena::default(),
            projectiles: Arena::default(),
            items: Arena::default(),
            corpses: Arena::default(),
            schedule: Scheduler::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            elapsed: Duration::ZERO,
            ticks: 0,
            footstep_ready: true,
        }
    }

    /// Validates the descriptor and builds a fresh level from it.
    pub(crate) fn build(
        descriptor: &LevelDescriptor,
        config: &Config,
    ) -> Result<(Self, LevelSummary), LevelError> {
        let facing = validate(descriptor)?;
        let spawn = descriptor
            .cells
            .iter()
            .find(|cell| matches!(cell.content, CellContent::PlayerSpawn { .. }))
            .map(|cell| CellCoord::new(cell.column, cell.row))
            .ok_or(LevelError::MissingPlayerSpawn)?;

        let mut level = Self::with_grid(
            descriptor.name.clone(),
            descriptor.ambience,
            GridMap::new(descriptor.size, CELL_SIZE),
            Player::spawn(spawn.center(CELL_SIZE), facing, config),
            descriptor.seed.unwrap_or(config.rng_seed),
        );

        let mut summary = LevelSummary {
            monsters: 0,
            items: 0,
            secrets: 0,
        };
        for record in &descriptor.cells {
            let cell = CellCoord::new(record.column, record.row);
            match &record.content {
                CellContent::Wall {
                    texture,
                    decoration,
                } => {
                    let wall = Wall::new(*texture, WallKind::Plain);
                    let wall = match decoration {
                        Some(decoration) => wall.with_decoration(*decoration),
                        None => wall,
                    };
                    level.grid.set(cell, wall);
                }
                CellContent::Door { texture, key } => {
                    level.grid.set(cell, door(*texture, *key));
                }
                CellContent::Switch {
                    texture,
                    target_column,
                    target_row,
                } => {
                    let target = CellCoord::new(*target_column, *target_row);
                    let kind = WallKind::Switch {
                        target,
                        pressed: false,
                    };
                    level.grid.set(cell, Wall::new(*texture, kind));
                }
                CellContent::Secret { texture } => {
                    level.grid.set(cell, Wall::new(*texture, WallKind::Secret));
                    summary.secrets += 1;
                }
                CellContent::Exit { texture } => {
                    level.grid.set(cell, Wall::new(*texture, WallKind::Exit));
                }
                CellContent::Monster { species } => {
                    let heading = level.rng.gen_range(0.0..TAU);
                    let jitter = level.rng.gen_range(0.5..=1.0);
                    let monster = Monster::spawn(
                        *species,
                        cell.center(CELL_SIZE),
                        heading,
                        jitter,
                        config,
                    );
                    let _ = level.monsters.insert(monster);
                    summary.monsters += 1;
                }
                CellContent::Item { kind } => {
                    if kind.is_furniture() {
                        level.grid.set(cell, Wall::furniture());
                    } else {
                        summary.items += 1;
                    }
                    let _ = level.items.insert(Item::place(*kind, cell));
                }
                CellContent::PlayerSpawn { .. } => {}
            }
        }

        Ok((level, summary))
    }
}

fn door(texture: TextureId, key: Option<KeyColor>) -> Wall {
    Wall::new(texture, WallKind::Door { key })
}

/// Checks every load-time invariant and returns the player facing.
fn validate(descriptor: &LevelDescriptor) -> Result<f32, LevelError> {
    let size = descriptor.size;
    if size == 0 || size > MAX_LEVEL_SIZE {
        return Err(LevelError::InvalidSize { size });
    }

    let mut occupied: HashMap<(u32, u32), &CellDescriptor> = HashMap::new();
    let mut facing = None;
    for record in &descriptor.cells {
        if record.column >= size || record.row >= size {
            return Err(LevelError::CellOutOfBounds {
                column: record.column,
                row: record.row,
                size,
            });
        }
        if occupied.insert((record.column, record.row), record).is_some() {
            return Err(LevelError::DuplicateCell {
                column: record.column,
                row: record.row,
            });
        }

        match record.content {
            CellContent::PlayerSpawn { facing: angle } => {
                if facing.is_some() {
                    return Err(LevelError::DuplicatePlayerSpawn);
                }
                if !angle.is_finite() {
                    return Err(LevelError::InvalidFacing);
                }
                facing = Some(angle);
            }
            CellContent::Switch {
                target_column,
                target_row,
                ..
            } if target_column >= size || target_row >= size => {
                return Err(LevelError::SwitchTargetOutOfBounds {
                    column: record.column,
                    row: record.row,
                    target_column,
                    target_row,
                });
            }
            _ => {}
        }
    }

    let facing = facing.ok_or(LevelError::MissingPlayerSpawn)?;

    let border: HashSet<(u32, u32)> = (0..size)
        .flat_map(|index| {
            [
                (index, 0),
                (index, size - 1),
                (0, index),
                (size - 1, index),
            ]
        })
        .collect();
    let mut open: Vec<(u32, u32)> = border
        .into_iter()
        .filter(|cell| {
            !occupied
                .get(cell)
                .is_some_and(|record| is_wall(&record.content))
        })
        .collect();
    open.sort_unstable_by_key(|&(column, row)| (row, column));
    if let Some(&(column, row)) = open.first() {
        return Err(LevelError::OpenBorder { column, row });
    }

    Ok(facing)
}

fn is_wall(content: &CellContent) -> bool {
    matches!(
        content,
        CellContent::Wall { .. }
            | CellContent::Door { .. }
            | CellContent::Switch { .. }
            | CellContent::Secret { .. }
            | CellContent::Exit { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> LevelDescriptor {
        LevelDescriptor::from_ascii("room", &["1111", "1*P1", "1gU1", "1111"])
    }

    #[test]
    fn build_counts_entities_and_installs_furniture() {
        let (level, summary) = Level::build(&room(), &Config::default()).expect("valid level");

        assert_eq!(summary.monsters, 1);
        assert_eq!(summary.items, 1);
        assert_eq!(summary.secrets, 0);
        assert_eq!(level.items.len(), 2);
        let barrel = level.grid.view().cell_at(2, 2).copied();
        assert_eq!(barrel, Some(Wall::furniture()));
    }

    #[test]
    fn validation_rejects_malformed_levels() {
        let cases = [
            (
                LevelDescriptor::from_ascii("empty", &[]),
                LevelError::InvalidSize { size: 0 },
            ),
            (
                LevelDescriptor::from_ascii("nobody", &["111", "1 1", "111"]),
                LevelError::MissingPlayerSpawn,
            ),
            (
                LevelDescriptor::from_ascii("crowd", &["1111", "1**1", "1111", "1111"]),
                LevelError::DuplicatePlayerSpawn,
            ),
            (
                LevelDescriptor::from_ascii("leaky", &["1111", "1* 1", "1   ", "1111"]),
                LevelError::OpenBorder { column: 3, row: 2 },
            ),
        ];

        for (descriptor, expected) in cases {
            assert_eq!(
                Level::build(&descriptor, &Config::default()).err(),
                Some(expected),
                "level {}",
                descriptor.name
            );
        }
    }

    #[test]
    fn validation_rejects_out_of_range_records() {
        let outside = room().with_cell(
            7,
            1,
            CellContent::Item {
                kind: crypt_caster_core::ItemKind::Apple,
            },
        );
        assert_eq!(
            Level::build(&outside, &Config::default()).err(),
            Some(LevelError::CellOutOfBounds {
                column: 7,
                row: 1,
                size: 4
            })
        );

        let switch = room().with_cell(
            0,
            1,
            CellContent::Switch {
                texture: TextureId::new(3),
                target_column: 9,
                target_row: 9,
            },
        );
        assert_eq!(
            Level::build(&switch, &Config::default()).err(),
            Some(LevelError::SwitchTargetOutOfBounds {
                column: 0,
                row: 1,
                target_column: 9,
                target_row: 9
            })
        );

        let mut duplicated = room();
        duplicated.cells.push(duplicated.cells[0].clone());
        assert_eq!(
            Level::build(&duplicated, &Config::default()).err(),
            Some(LevelError::DuplicateCell { column: 0, row: 0 })
        );

        let dizzy = room().with_cell(1, 1, CellContent::PlayerSpawn { facing: f32::NAN });
        assert_eq!(
            Level::build(&dizzy, &Config::default()).err(),
            Some(LevelError::InvalidFacing)
        );
    }
}
