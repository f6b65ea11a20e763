use crypt_caster_core::{
    heading_vector, normalize_angle, CellCoord, Event, GameMode, KeyRing, MoveDirection,
    PlayerSnapshot, SoundCue,
};
use glam::Vec2;
use rand::Rng;

use crate::{items, level::Level, play, schedule::ScheduledAction, Config, World};

/// Number of footstep variants shipped with the audio assets.
const FOOTSTEP_VARIANTS: u8 = 4;

#[derive(Debug)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) angle: f32,
    pub(crate) radius: f32,
    pub(crate) health: i32,
    pub(crate) mana: i32,
    pub(crate) keys: KeyRing,
}

impl Player {
    pub(crate) fn spawn(position: Vec2, facing: f32, config: &Config) -> Self {
        Self {
            position,
            angle: normalize_angle(facing),
            radius: config.player_radius,
            health: config.player_health,
            mana: config.player_mana,
            keys: KeyRing::default(),
        }
    }

    pub(crate) fn cell(&self, cell_size: f32) -> CellCoord {
        CellCoord::containing(self.position, cell_size).unwrap_or(CellCoord::new(0, 0))
    }

    pub(crate) fn snapshot(&self, fov: f32, cell_size: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            angle: self.angle,
            fov,
            radius: self.radius,
            health: self.health,
            mana: self.mana,
            keys: self.keys,
            cell: self.cell(cell_size),
        }
    }
}

/// Moves the player, sliding along the blocking wall when possible.
pub(crate) fn move_player(
    world: &mut World,
    direction: MoveDirection,
    distance: f32,
    out_events: &mut Vec<Event>,
) {
    if !distance.is_finite() || distance <= 0.0 {
        return;
    }

    let level = &mut world.level;
    let from = level.player.position;
    let radius = level.player.radius;
    let heading = level.player.angle + direction.heading_offset();
    let candidate = from + heading_vector(heading) * distance;

    let to = match level.grid.blocking_cell(candidate, radius) {
        None => candidate,
        Some(wall) => {
            let offset = candidate - wall.center(level.grid.cell_size());
            let slide = if offset.x.abs() > offset.y.abs() {
                Vec2::new(from.x, candidate.y)
            } else {
                Vec2::new(candidate.x, from.y)
            };
            let stalled = slide.distance_squared(from) <= f32::EPSILON;
            if stalled || level.grid.blocking_cell(slide, radius).is_some() {
                out_events.push(Event::PlayerBlocked { wall });
                return;
            }
            slide
        }
    };

    level.player.position = to;
    let cell = level.player.cell(level.grid.cell_size());
    out_events.push(Event::PlayerMoved { from, to, cell });

    items::collect(level, cell, out_events);
    footstep(level, &world.config, out_events);
}

pub(crate) fn turn_player(level: &mut Level, delta: f32, out_events: &mut Vec<Event>) {
    if !delta.is_finite() || delta == 0.0 {
        return;
    }
    level.player.angle = normalize_angle(level.player.angle + delta);
    out_events.push(Event::PlayerTurned {
        angle: level.player.angle,
    });
}

/// Applies damage to the player; health reaching zero ends the game once.
pub(crate) fn damage(
    mode: &mut GameMode,
    player: &mut Player,
    amount: i32,
    out_events: &mut Vec<Event>,
) {
    if *mode != GameMode::Playing || amount <= 0 {
        return;
    }

    player.health = player.health.saturating_sub(amount).max(0);
    out_events.push(Event::PlayerDamaged {
        amount,
        health: player.health,
    });

    if player.health > 0 {
        play(out_events, SoundCue::Pain);
        return;
    }

    *mode = GameMode::GameOver;
    tracing::info!("player died");
    out_events.push(Event::PlayerDied);
    out_events.push(Event::ModeChanged {
        mode: GameMode::GameOver,
    });
    play(out_events, SoundCue::PlayerDeath);
}

fn footstep(level: &mut Level, config: &Config, out_events: &mut Vec<Event>) {
    if !level.footstep_ready {
        return;
    }
    level.footstep_ready = false;
    let variant = level.rng.gen_range(0..FOOTSTEP_VARIANTS);
    play(out_events, SoundCue::Footstep(variant));
    level.schedule.schedule(
        level.elapsed.saturating_add(config.footstep_cooldown),
        ScheduledAction::ClearFootsteps,
    );
}
