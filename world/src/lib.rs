#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Crypt Caster.
//!
//! The world owns the grid, the player and every entity arena of the loaded
//! level. It only changes through [`apply`] and [`load_level`]; everything
//! else reads it through the [`query`] module.

mod arena;
mod grid;
mod interaction;
mod items;
mod level;
mod monsters;
mod player;
mod projectiles;
mod schedule;

use std::{f32::consts::PI, time::Duration};

use crypt_caster_core::{Command, Event, GameMode, LevelDescriptor, SoundCue, CELL_SIZE};

pub use level::LevelError;

use level::Level;
use schedule::ScheduledAction;

/// Largest level edge, in cells, accepted by the loader.
pub const MAX_LEVEL_SIZE: u32 = 1024;

/// Simulation tuning applied to every level.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// Furthest distance, in world units, that rays travel.
    pub view_distance: f32,
    /// Distance advanced per ray-marching iteration.
    pub ray_step: f32,
    /// Reach of the use probe.
    pub use_range: f32,
    /// Player collision radius.
    pub player_radius: f32,
    /// Multiplier applied to the player radius when testing monster contact
    /// and monster projectile hits.
    pub player_hit_factor: f32,
    /// Health the player starts each level with.
    pub player_health: i32,
    /// Mana the player starts each level with.
    pub player_mana: i32,
    /// Mana spent per attack.
    pub attack_cost: i32,
    /// Player projectile speed in world units per second.
    pub player_projectile_speed: f32,
    /// Damage dealt by player projectiles.
    pub player_projectile_damage: i32,
    /// Monster projectile speed in world units per second.
    pub monster_projectile_speed: f32,
    /// Collision radius of every projectile.
    pub projectile_radius: f32,
    /// Distance after which a projectile expires.
    pub projectile_max_travel: f32,
    /// Collision radius of every monster.
    pub monster_radius: f32,
    /// Speed multiplier applied while a monster wanders.
    pub idle_speed_factor: f32,
    /// Speed multiplier applied while a monster recoils.
    pub recoil_speed_factor: f32,
    /// Ticks a monster spends recoiling after a melee strike.
    pub recoil_ticks: u32,
    /// Ticks a monster rests after firing.
    pub attack_cooldown_ticks: u32,
    /// Minimum spacing between footstep cues.
    pub footstep_cooldown: Duration,
    /// Lifetime of a monster corpse.
    pub corpse_lifetime: Duration,
    /// Seed used when a level does not provide its own.
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        let view_distance = CELL_SIZE * 12.0;
        Self {
            fov: PI / 3.0,
            view_distance,
            ray_step: 0.3,
            use_range: CELL_SIZE,
            player_radius: CELL_SIZE / 16.0,
            player_hit_factor: 3.0,
            player_health: 100,
            player_mana: 100,
            attack_cost: 10,
            player_projectile_speed: 180.0,
            player_projectile_damage: 40,
            monster_projectile_speed: 120.0,
            projectile_radius: CELL_SIZE / 16.0,
            projectile_max_travel: view_distance * 2.0,
            monster_radius: CELL_SIZE / 6.0,
            idle_speed_factor: 0.5,
            recoil_speed_factor: 2.5,
            recoil_ticks: 30,
            attack_cooldown_ticks: 60,
            footstep_cooldown: Duration::from_millis(300),
            corpse_lifetime: Duration::from_millis(300),
            rng_seed: 0x6372_7970_745f_6361,
        }
    }
}

/// Represents the authoritative Crypt Caster world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    mode: GameMode,
    level: Level,
}

impl World {
    /// Creates a world on the title screen using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a world on the title screen using the provided tuning.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let level = Level::empty(&config);
        Self {
            config,
            mode: GameMode::Title,
            level,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates and installs a level, replacing every entity, timer and the grid.
///
/// On error the world is left untouched.
pub fn load_level(
    world: &mut World,
    descriptor: &LevelDescriptor,
    out_events: &mut Vec<Event>,
) -> Result<(), LevelError> {
    let (level, summary) = match Level::build(descriptor, &world.config) {
        Ok(built) => built,
        Err(error) => {
            tracing::warn!(level = %descriptor.name, %error, "level rejected");
            return Err(error);
        }
    };

    tracing::info!(
        level = %descriptor.name,
        monsters = summary.monsters,
        items = summary.items,
        secrets = summary.secrets,
        "level loaded"
    );

    world.level = level;
    world.mode = GameMode::Playing;
    out_events.push(Event::LevelLoaded {
        name: descriptor.name.clone(),
        monsters: summary.monsters,
        items: summary.items,
        secrets: summary.secrets,
    });
    out_events.push(Event::ModeChanged {
        mode: GameMode::Playing,
    });
    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetPaused { paused } => {
            let next = match (world.mode, paused) {
                (GameMode::Playing, true) => GameMode::Paused,
                (GameMode::Paused, false) => GameMode::Playing,
                _ => return,
            };
            world.mode = next;
            out_events.push(Event::ModeChanged { mode: next });
        }
        Command::ReturnToTitle => {
            if world.mode == GameMode::Title {
                return;
            }
            world.level = Level::empty(&world.config);
            world.mode = GameMode::Title;
            out_events.push(Event::ModeChanged {
                mode: GameMode::Title,
            });
        }
        _ if world.mode != GameMode::Playing => {}
        Command::Tick { dt } => tick(world, dt, out_events),
        Command::MovePlayer {
            direction,
            distance,
        } => player::move_player(world, direction, distance, out_events),
        Command::TurnPlayer { delta } => player::turn_player(&mut world.level, delta, out_events),
        Command::UseFacing => interaction::use_facing(world, out_events),
        Command::PlayerAttack => {
            projectiles::player_attack(&mut world.level, &world.config, out_events);
        }
        Command::SetMonsterBehavior { monster, behavior } => {
            monsters::set_behavior(&mut world.level, monster, behavior, out_events);
        }
        Command::FaceMonster { monster, heading } => {
            monsters::face(&mut world.level, monster, heading);
        }
        Command::FireMonsterProjectile { monster, heading } => {
            monsters::fire(&mut world.level, &world.config, monster, heading, out_events);
        }
    }
}

fn tick(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let level = &mut world.level;
    level.elapsed = level.elapsed.saturating_add(dt);
    level.ticks = level.ticks.saturating_add(1);
    out_events.push(Event::TimeAdvanced { dt });

    while let Some(action) = level.schedule.pop_due(level.elapsed) {
        match action {
            ScheduledAction::ClearFootsteps => level.footstep_ready = true,
            ScheduledAction::DespawnEffect(effect) => {
                if level.corpses.remove(effect.key()).is_some() {
                    out_events.push(Event::EffectExpired { effect });
                }
            }
        }
    }

    monsters::advance(world, dt, out_events);
    projectiles::advance(world, dt, out_events);
}

/// Emits a sound cue with its mixing parameters.
pub(crate) fn play(out_events: &mut Vec<Event>, cue: SoundCue) {
    let (volume, wait) = match cue {
        SoundCue::Footstep(_) => (0.5, true),
        SoundCue::DoorOpen => (0.4, false),
        SoundCue::Zap => (0.3, false),
        _ => (1.0, false),
    };
    out_events.push(Event::SoundTriggered { cue, volume, wait });
}

/// Query functions that expose read-only views into the world state.
pub mod query {
    use std::time::Duration;

    use crypt_caster_core::{
        CellCoord, GameMode, GridView, ItemId, ItemKind, LevelAmbience, MonsterId, MonsterSnapshot,
        MonsterView, PlayerSnapshot, SpriteImage, SpriteSnapshot,
    };
    use crypt_caster_raycast::RayCaster;
    use glam::Vec2;

    use super::{Config, World};

    /// Ticks spent on each monster animation frame.
    const MONSTER_FRAME_TICKS: u64 = 20;

    /// Opacity of projectile sprites.
    pub const PROJECTILE_ALPHA: f32 = 0.5;

    /// Tuning the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Mode the experience is currently in.
    #[must_use]
    pub fn mode(world: &World) -> GameMode {
        world.mode
    }

    /// Display name of the loaded level; empty on the title screen.
    #[must_use]
    pub fn level_name(world: &World) -> &str {
        &world.level.name
    }

    /// Ceiling and floor colours of the loaded level.
    #[must_use]
    pub fn ambience(world: &World) -> LevelAmbience {
        world.level.ambience
    }

    /// Read-only view of the level grid.
    #[must_use]
    pub fn grid(world: &World) -> GridView<'_> {
        world.level.grid.view()
    }

    /// Simulation time accumulated in the loaded level.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.level.elapsed
    }

    /// Number of ticks simulated in the loaded level; drives animations.
    #[must_use]
    pub fn animation_tick(world: &World) -> u64 {
        world.level.ticks
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world
            .level
            .player
            .snapshot(world.config.fov, world.level.grid.cell_size())
    }

    /// Snapshot of every living monster, ordered by identifier.
    #[must_use]
    pub fn monsters(world: &World) -> MonsterView {
        let snapshots = world
            .level
            .monsters
            .iter()
            .map(|(key, monster)| MonsterSnapshot {
                id: MonsterId::new(key),
                species: monster.species,
                position: monster.position,
                heading: monster.heading,
                radius: monster.radius,
                health: monster.health,
                behavior: monster.behavior,
                has_seen_player: monster.has_seen_player,
            })
            .collect();
        MonsterView::from_snapshots(snapshots)
    }

    /// Items still resting in the level, furniture included.
    #[must_use]
    pub fn items(world: &World) -> Vec<(ItemId, ItemKind, CellCoord)> {
        world
            .level
            .items
            .iter()
            .map(|(key, item)| (ItemId::new(key), item.kind, item.cell))
            .collect()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn projectile_count(world: &World) -> usize {
        world.level.projectiles.len()
    }

    /// Billboard sprites for every item, corpse, monster and projectile.
    #[must_use]
    pub fn sprites(world: &World) -> Vec<SpriteSnapshot> {
        let level = &world.level;
        let frame = ((level.ticks / MONSTER_FRAME_TICKS) % 2) as u8;
        let mut sprites = Vec::with_capacity(
            level.items.len() + level.corpses.len() + level.monsters.len() + level.projectiles.len(),
        );

        sprites.extend(level.items.iter().map(|(_, item)| SpriteSnapshot {
            position: item.position,
            radius: item.radius,
            image: SpriteImage::Item(item.kind),
            alpha: 1.0,
        }));
        sprites.extend(level.corpses.iter().map(|(_, corpse)| SpriteSnapshot {
            position: corpse.position,
            radius: corpse.radius,
            image: SpriteImage::Corpse(corpse.species),
            alpha: 1.0,
        }));
        sprites.extend(level.monsters.iter().map(|(_, monster)| SpriteSnapshot {
            position: monster.position,
            radius: monster.radius,
            image: SpriteImage::Monster {
                species: monster.species,
                frame,
            },
            alpha: 1.0,
        }));
        sprites.extend(level.projectiles.iter().map(|(_, projectile)| SpriteSnapshot {
            position: projectile.position,
            radius: projectile.radius,
            image: SpriteImage::Projectile(projectile.kind),
            alpha: PROJECTILE_ALPHA,
        }));
        sprites
    }

    /// Reports whether no visible wall separates the two points.
    #[must_use]
    pub fn line_of_sight(world: &World, from: Vec2, to: Vec2) -> bool {
        RayCaster::new(world.config.ray_step).line_of_sight(&grid(world), from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::{MoveDirection, ProjectileKind, SpriteImage};

    fn corridor() -> LevelDescriptor {
        LevelDescriptor::from_ascii(
            "corridor",
            &["11111", "1*  1", "11111", "11111", "11111"],
        )
    }

    #[test]
    fn new_world_starts_on_title_screen() {
        let world = World::new();
        assert_eq!(query::mode(&world), GameMode::Title);
        assert_eq!(query::level_name(&world), "");
        assert!(query::sprites(&world).is_empty());
    }

    #[test]
    fn commands_are_ignored_outside_playing() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MovePlayer {
                direction: MoveDirection::Forward,
                distance: 4.0,
            },
            &mut events,
        );
        apply(&mut world, Command::SetPaused { paused: true }, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::elapsed(&world), Duration::ZERO);
    }

    #[test]
    fn pause_freezes_simulation_until_resumed() {
        let mut world = World::new();
        let mut events = Vec::new();
        load_level(&mut world, &corridor(), &mut events).expect("valid level");

        events.clear();
        apply(&mut world, Command::SetPaused { paused: true }, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ModeChanged {
                mode: GameMode::Paused
            }]
        );
        assert_eq!(query::elapsed(&world), Duration::ZERO);

        events.clear();
        apply(&mut world, Command::SetPaused { paused: false }, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(query::mode(&world), GameMode::Playing);
        assert_eq!(query::elapsed(&world), Duration::from_millis(16));
    }

    #[test]
    fn return_to_title_drops_the_level() {
        let mut world = World::new();
        let mut events = Vec::new();
        load_level(&mut world, &corridor(), &mut events).expect("valid level");
        apply(&mut world, Command::PlayerAttack, &mut events);
        assert_eq!(query::projectile_count(&world), 1);

        events.clear();
        apply(&mut world, Command::ReturnToTitle, &mut events);

        assert_eq!(
            events,
            vec![Event::ModeChanged {
                mode: GameMode::Title
            }]
        );
        assert_eq!(query::projectile_count(&world), 0);
        assert_eq!(query::grid(&world).size(), 0);
        assert_eq!(query::level_name(&world), "");
    }

    #[test]
    fn projectiles_are_drawn_translucent() {
        let mut world = World::new();
        let mut events = Vec::new();
        load_level(&mut world, &corridor(), &mut events).expect("valid level");
        apply(&mut world, Command::PlayerAttack, &mut events);

        let alphas: Vec<(SpriteImage, f32)> = query::sprites(&world)
            .iter()
            .map(|sprite| (sprite.image, sprite.alpha))
            .collect();
        assert_eq!(
            alphas,
            vec![(
                SpriteImage::Projectile(ProjectileKind::Zap),
                query::PROJECTILE_ALPHA
            )]
        );
    }

    #[test]
    fn rejected_level_leaves_world_untouched() {
        let mut world = World::new();
        let mut events = Vec::new();
        load_level(&mut world, &corridor(), &mut events).expect("valid level");

        events.clear();
        let broken = LevelDescriptor::from_ascii("broken", &["111", "1 1", "111"]);
        let result = load_level(&mut world, &broken, &mut events);

        assert_eq!(result, Err(LevelError::MissingPlayerSpawn));
        assert!(events.is_empty());
        assert_eq!(query::level_name(&world), "corridor");
        assert_eq!(query::mode(&world), GameMode::Playing);
    }
}
