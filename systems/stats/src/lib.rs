#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level statistics accumulated from world events.

use std::{fmt, time::Duration};

use crypt_caster_core::{Event, GameMode};

/// How a level ended, if it has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The level is still being played.
    InProgress,
    /// The player reached an exit.
    Completed,
    /// The player died.
    Died,
}

/// Summary of the player's progress through a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelStats {
    /// Display name of the level.
    pub level: String,
    /// Monsters placed in the level.
    pub monsters_total: u32,
    /// Monsters killed so far.
    pub kills: u32,
    /// Collectable items placed in the level.
    pub items_total: u32,
    /// Items collected so far.
    pub items_found: u32,
    /// Secret walls placed in the level.
    pub secrets_total: u32,
    /// Secret walls opened so far.
    pub secrets_found: u32,
    /// Simulated time spent in the level.
    pub elapsed: Duration,
    /// How the level ended.
    pub outcome: Outcome,
}

impl Default for LevelStats {
    fn default() -> Self {
        Self {
            level: String::new(),
            monsters_total: 0,
            kills: 0,
            items_total: 0,
            items_found: 0,
            secrets_total: 0,
            secrets_found: 0,
            elapsed: Duration::ZERO,
            outcome: Outcome::InProgress,
        }
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.elapsed.as_secs();
        write!(
            f,
            "{}: kills {}/{}, items {}/{}, secrets {}/{}, time {:02}:{:02}",
            self.level,
            self.kills,
            self.monsters_total,
            self.items_found,
            self.items_total,
            self.secrets_found,
            self.secrets_total,
            seconds / 60,
            seconds % 60,
        )
    }
}

/// Pure system that tallies level statistics.
#[derive(Debug, Default)]
pub struct Stats {
    current: LevelStats,
}

impl Stats {
    /// Creates the system with empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the level currently or most recently played.
    #[must_use]
    pub fn report(&self) -> &LevelStats {
        &self.current
    }

    /// Folds world events into the running statistics.
    ///
    /// Loading a level resets every counter.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::LevelLoaded {
                    name,
                    monsters,
                    items,
                    secrets,
                } => {
                    self.current = LevelStats {
                        level: name.clone(),
                        monsters_total: *monsters,
                        items_total: *items,
                        secrets_total: *secrets,
                        ..LevelStats::default()
                    };
                }
                Event::TimeAdvanced { dt } => {
                    self.current.elapsed = self.current.elapsed.saturating_add(*dt);
                }
                Event::MonsterKilled { .. } => self.current.kills += 1,
                Event::ItemPickedUp { .. } => self.current.items_found += 1,
                Event::SecretRevealed { .. } => self.current.secrets_found += 1,
                Event::ModeChanged {
                    mode: GameMode::LevelComplete,
                } => self.current.outcome = Outcome::Completed,
                Event::ModeChanged {
                    mode: GameMode::GameOver,
                } => self.current.outcome = Outcome::Died,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::{CellCoord, EffectId, ItemId, ItemKind, MonsterId, SlotKey, Species};

    #[test]
    fn tallies_events_and_resets_on_load() {
        let key = SlotKey::new(0, 0);
        let mut stats = Stats::new();
        stats.handle(&[
            Event::LevelLoaded {
                name: "crypt".to_string(),
                monsters: 3,
                items: 2,
                secrets: 1,
            },
            Event::TimeAdvanced {
                dt: Duration::from_secs(61),
            },
            Event::MonsterKilled {
                monster: MonsterId::new(key),
                species: Species::Thing,
                corpse: EffectId::new(key),
            },
            Event::ItemPickedUp {
                item: ItemId::new(key),
                kind: ItemKind::Apple,
                cell: CellCoord::new(2, 2),
            },
            Event::SecretRevealed {
                cell: CellCoord::new(3, 3),
            },
            Event::ModeChanged {
                mode: GameMode::LevelComplete,
            },
        ]);

        let report = stats.report();
        assert_eq!(report.kills, 1);
        assert_eq!(report.items_found, 1);
        assert_eq!(report.secrets_found, 1);
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(
            report.to_string(),
            "crypt: kills 1/3, items 1/2, secrets 1/1, time 01:01"
        );

        stats.handle(&[Event::LevelLoaded {
            name: "vault".to_string(),
            monsters: 0,
            items: 0,
            secrets: 0,
        }]);
        assert_eq!(stats.report().kills, 0);
        assert_eq!(stats.report().elapsed, Duration::ZERO);
        assert_eq!(stats.report().outcome, Outcome::InProgress);
    }
}
