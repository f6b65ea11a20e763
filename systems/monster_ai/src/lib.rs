#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster decision making driven by line of sight.
//!
//! After every simulated tick the system inspects each monster that is not
//! cooling down and asks whether it can see the player:
//!
//! * idle monsters that spot the player engage, either closing in (`Melee`) or
//!   holding position and shooting (`Attack`) depending on their species;
//! * engaged monsters that lose sight return to `Idle`, which also makes them
//!   forget the player so the next sighting alerts again;
//! * attacking monsters fire with their species' per-tick probability.
//!
//! Recoil and post-shot cooldowns are owned by the world and never
//! interrupted from here.

use crypt_caster_core::{
    bearing, Command, Event, GameMode, MonsterBehavior, MonsterSnapshot, MonsterView,
    PlayerSnapshot,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the monster AI.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration that seeds the firing dice with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that turns sight lines into behaviour commands.
#[derive(Debug)]
pub struct MonsterAi {
    rng: ChaCha8Rng,
}

impl MonsterAi {
    /// Creates the system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and views to emit monster commands.
    ///
    /// Decisions are only taken on frames that advanced the simulation.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        mode: GameMode,
        monsters: &MonsterView,
        player: &PlayerSnapshot,
        line_of_sight: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(Vec2, Vec2) -> bool,
    {
        if mode != GameMode::Playing {
            return;
        }
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !ticked {
            return;
        }

        for monster in monsters.iter() {
            if monster.behavior.is_cooldown() {
                continue;
            }
            let visible = line_of_sight(monster.position, player.position);
            self.decide(monster, player.position, visible, out);
        }
    }

    fn decide(
        &mut self,
        monster: &MonsterSnapshot,
        target: Vec2,
        visible: bool,
        out: &mut Vec<Command>,
    ) {
        let id = monster.id;
        let heading = bearing(monster.position, target);
        let profile = monster.species.profile();

        match (monster.behavior, visible) {
            (MonsterBehavior::Idle | MonsterBehavior::Wander, true) => {
                let behavior = if profile.can_shoot {
                    MonsterBehavior::Attack
                } else {
                    MonsterBehavior::Melee
                };
                out.push(Command::SetMonsterBehavior {
                    monster: id,
                    behavior,
                });
                out.push(Command::FaceMonster {
                    monster: id,
                    heading,
                });
            }
            (MonsterBehavior::Idle | MonsterBehavior::Wander, false) => {
                if monster.has_seen_player {
                    out.push(Command::SetMonsterBehavior {
                        monster: id,
                        behavior: MonsterBehavior::Idle,
                    });
                }
            }
            (MonsterBehavior::Melee, true) => {
                out.push(Command::FaceMonster {
                    monster: id,
                    heading,
                });
            }
            (MonsterBehavior::Attack, true) => {
                out.push(Command::FaceMonster {
                    monster: id,
                    heading,
                });
                if self.rng.gen_bool(profile.attack_chance.clamp(0.0, 1.0)) {
                    out.push(Command::FireMonsterProjectile {
                        monster: id,
                        heading,
                    });
                }
            }
            (MonsterBehavior::Melee | MonsterBehavior::Attack, false) => {
                out.push(Command::SetMonsterBehavior {
                    monster: id,
                    behavior: MonsterBehavior::Idle,
                });
            }
            (MonsterBehavior::Recoil { .. } | MonsterBehavior::DoNothing { .. }, _) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::{CellCoord, KeyRing, MonsterId, SlotKey, Species};
    use std::time::Duration;

    fn player() -> PlayerSnapshot {
        PlayerSnapshot {
            position: Vec2::new(48.0, 48.0),
            angle: 0.0,
            fov: 1.0,
            radius: 2.0,
            health: 100,
            mana: 100,
            keys: KeyRing::default(),
            cell: CellCoord::new(1, 1),
        }
    }

    fn monster(species: Species, behavior: MonsterBehavior) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(SlotKey::new(0, 0)),
            species,
            position: Vec2::new(144.0, 48.0),
            heading: 0.0,
            radius: 5.0,
            health: 10,
            behavior,
            has_seen_player: behavior.is_engaged(),
        }
    }

    fn run(snapshot: MonsterSnapshot, visible: bool) -> Vec<Command> {
        let mut ai = MonsterAi::new(Config::new(1));
        let view = MonsterView::from_snapshots(vec![snapshot]);
        let events = [Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }];
        let mut commands = Vec::new();
        ai.handle(
            &events,
            GameMode::Playing,
            &view,
            &player(),
            |_, _| visible,
            &mut commands,
        );
        commands
    }

    #[test]
    fn melee_species_close_in_when_they_see_the_player() {
        let commands = run(monster(Species::Ghoul, MonsterBehavior::Idle), true);
        assert_eq!(
            commands[0],
            Command::SetMonsterBehavior {
                monster: MonsterId::new(SlotKey::new(0, 0)),
                behavior: MonsterBehavior::Melee,
            }
        );
        match commands[1] {
            Command::FaceMonster { heading, .. } => {
                assert!((heading.abs() - std::f32::consts::PI).abs() < 1e-5)
            }
            ref other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn shooting_species_attack_from_range() {
        let commands = run(monster(Species::Skeleton, MonsterBehavior::Wander), true);
        assert!(matches!(
            commands[0],
            Command::SetMonsterBehavior {
                behavior: MonsterBehavior::Attack,
                ..
            }
        ));
    }

    #[test]
    fn losing_sight_returns_to_idle() {
        for behavior in [MonsterBehavior::Melee, MonsterBehavior::Attack] {
            let commands = run(monster(Species::Skeleton, behavior), false);
            assert!(matches!(
                commands.as_slice(),
                [Command::SetMonsterBehavior {
                    behavior: MonsterBehavior::Idle,
                    ..
                }]
            ));
        }
    }

    #[test]
    fn cooling_down_monsters_are_left_alone() {
        let recoiling = monster(
            Species::Ghoul,
            MonsterBehavior::Recoil { ticks_remaining: 3 },
        );
        assert!(run(recoiling, true).is_empty());

        let resting = monster(
            Species::Skeleton,
            MonsterBehavior::DoNothing { ticks_remaining: 3 },
        );
        assert!(run(resting, false).is_empty());
    }

    #[test]
    fn frames_without_ticks_take_no_decisions() {
        let mut ai = MonsterAi::new(Config::new(1));
        let view = MonsterView::from_snapshots(vec![monster(Species::Ghoul, MonsterBehavior::Idle)]);
        let mut commands = Vec::new();
        ai.handle(&[], GameMode::Playing, &view, &player(), |_, _| true, &mut commands);
        assert!(commands.is_empty());
    }
}
