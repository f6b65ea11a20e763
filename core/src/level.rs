use serde::{Deserialize, Serialize};

use crate::{grid::Decoration, ItemKind, KeyColor, Species, TextureId};

/// Texture used for decorations placed by the ASCII legend.
const TORCH_TEXTURE: u16 = 8;

/// Content placed into a single cell when a level loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellContent {
    /// Inert wall.
    Wall {
        /// Wall texture.
        texture: TextureId,
        /// Optional overlay decoration.
        #[serde(default)]
        decoration: Option<Decoration>,
    },
    /// Door, optionally locked behind a key.
    Door {
        /// Door texture.
        texture: TextureId,
        /// Key required to open the door.
        #[serde(default)]
        key: Option<KeyColor>,
    },
    /// Switch that clears a remote cell.
    Switch {
        /// Switch texture.
        texture: TextureId,
        /// Column of the cell cleared by the switch.
        target_column: u32,
        /// Row of the cell cleared by the switch.
        target_row: u32,
    },
    /// Secret wall that opens when used.
    Secret {
        /// Texture disguising the secret.
        texture: TextureId,
    },
    /// Exit that completes the level when used.
    Exit {
        /// Exit texture.
        texture: TextureId,
    },
    /// Monster spawn at the cell centre.
    Monster {
        /// Species to spawn.
        species: Species,
    },
    /// Item resting at the cell centre.
    Item {
        /// Kind of item to place.
        kind: ItemKind,
    },
    /// Player spawn at the cell centre.
    PlayerSpawn {
        /// Initial facing angle in radians.
        facing: f32,
    },
}

/// Single cell record of a level descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellDescriptor {
    /// Zero-based column.
    pub column: u32,
    /// Zero-based row.
    pub row: u32,
    /// Content placed into the cell.
    pub content: CellContent,
}

/// Ceiling and floor colours drawn behind the walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAmbience {
    /// RGB colour of the upper half of the view.
    pub ceiling_tint: [u8; 3],
    /// RGB colour of the lower half of the view.
    pub floor_tint: [u8; 3],
}

impl Default for LevelAmbience {
    fn default() -> Self {
        Self {
            ceiling_tint: [40, 36, 44],
            floor_tint: [68, 60, 52],
        }
    }
}

/// Complete description of a level consumed by the world loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Display name of the level.
    pub name: String,
    /// Number of cells along each edge of the square grid.
    pub size: u32,
    /// Ceiling and floor colours.
    #[serde(default)]
    pub ambience: LevelAmbience,
    /// Seed overriding the world's random source for this level.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Cell records; cells without a record are empty.
    #[serde(default)]
    pub cells: Vec<CellDescriptor>,
}

impl LevelDescriptor {
    /// Builds a descriptor from an ASCII map, one string per row.
    ///
    /// Legend: digits are wall textures, `T` a torch-lit wall, `#` a door,
    /// `&` a red-locked door, `%` a secret, `X` an exit, `*` the player facing
    /// east, `g`/`s`/`t` a ghoul/skeleton/thing, `P`/`C`/`M`/`A` a
    /// potion/crystal/meat/apple, `K`/`B`/`G` a red/blue/green key and `O`/`U`
    /// a column/barrel. Any other character leaves the cell empty. The grid is
    /// sized to the longest row or the row count, whichever is larger.
    #[must_use]
    pub fn from_ascii(name: impl Into<String>, rows: &[&str]) -> Self {
        let width = rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0);
        let size = width.max(rows.len()) as u32;

        let mut cells = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                if let Some(content) = legend(symbol) {
                    cells.push(CellDescriptor {
                        column: column as u32,
                        row: row as u32,
                        content,
                    });
                }
            }
        }

        Self {
            name: name.into(),
            size,
            ambience: LevelAmbience::default(),
            seed: None,
            cells,
        }
    }

    /// Replaces the record of a cell, or adds one when the cell was empty.
    #[must_use]
    pub fn with_cell(mut self, column: u32, row: u32, content: CellContent) -> Self {
        self.cells
            .retain(|cell| !(cell.column == column && cell.row == row));
        self.cells.push(CellDescriptor {
            column,
            row,
            content,
        });
        self
    }
}

fn legend(symbol: char) -> Option<CellContent> {
    let content = match symbol {
        '1'..='9' => CellContent::Wall {
            texture: TextureId::new(symbol as u16 - '0' as u16),
            decoration: None,
        },
        'T' => CellContent::Wall {
            texture: TextureId::new(1),
            decoration: Some(Decoration {
                texture: TextureId::new(TORCH_TEXTURE),
                animated: true,
            }),
        },
        '#' => CellContent::Door {
            texture: TextureId::new(5),
            key: None,
        },
        '&' => CellContent::Door {
            texture: TextureId::new(6),
            key: Some(KeyColor::Red),
        },
        '%' => CellContent::Secret {
            texture: TextureId::new(1),
        },
        'X' => CellContent::Exit {
            texture: TextureId::new(7),
        },
        '*' => CellContent::PlayerSpawn { facing: 0.0 },
        'g' => CellContent::Monster {
            species: Species::Ghoul,
        },
        's' => CellContent::Monster {
            species: Species::Skeleton,
        },
        't' => CellContent::Monster {
            species: Species::Thing,
        },
        'P' => item(ItemKind::Potion),
        'C' => item(ItemKind::Crystal),
        'M' => item(ItemKind::Meat),
        'A' => item(ItemKind::Apple),
        'K' => item(ItemKind::Key(KeyColor::Red)),
        'B' => item(ItemKind::Key(KeyColor::Blue)),
        'G' => item(ItemKind::Key(KeyColor::Green)),
        'O' => item(ItemKind::Column),
        'U' => item(ItemKind::Barrel),
        _ => return None,
    };
    Some(content)
}

const fn item(kind: ItemKind) -> CellContent {
    CellContent::Item { kind }
}
