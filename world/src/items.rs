use crypt_caster_core::{CellCoord, Event, ItemEffect, ItemId, ItemKind, SoundCue, CELL_SIZE};
use glam::Vec2;

use crate::{level::Level, play};

#[derive(Debug)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) cell: CellCoord,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
}

impl Item {
    pub(crate) fn place(kind: ItemKind, cell: CellCoord) -> Self {
        Self {
            kind,
            cell,
            position: cell.center(CELL_SIZE),
            radius: CELL_SIZE / 4.0,
        }
    }
}

/// Picks up every collectable item resting in the player's cell.
pub(crate) fn collect(level: &mut Level, cell: CellCoord, out_events: &mut Vec<Event>) {
    let found: Vec<_> = level
        .items
        .iter()
        .filter(|(_, item)| item.cell == cell && !item.kind.is_furniture())
        .map(|(key, _)| key)
        .collect();

    for key in found {
        let Some(item) = level.items.remove(key) else {
            continue;
        };

        let player = &mut level.player;
        let cue = match item.kind.effect() {
            ItemEffect::RestoreMana(amount) => {
                player.mana = player.mana.saturating_add(amount);
                if item.kind == ItemKind::Crystal {
                    SoundCue::CrystalGet
                } else {
                    SoundCue::PotionGet
                }
            }
            ItemEffect::RestoreHealth(amount) => {
                player.health = player.health.saturating_add(amount);
                if item.kind == ItemKind::Meat {
                    SoundCue::Yum
                } else {
                    SoundCue::Gulp
                }
            }
            ItemEffect::GrantKey(color) => {
                player.keys.add(color);
                SoundCue::KeyUp
            }
            ItemEffect::Furniture => continue,
        };

        out_events.push(Event::ItemPickedUp {
            item: ItemId::new(key),
            kind: item.kind,
            cell,
        });
        play(out_events, cue);
    }
}
