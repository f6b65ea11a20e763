#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates sampled key states into player commands.
//!
//! Movement and turning ease in: the longer a key is held, the faster the
//! player travels, up to a cap. Use, attack and pause fire once per press.

use std::time::Duration;

use crypt_caster_core::{Command, GameMode, MoveDirection, PlayerInput, CELL_SIZE};

/// Ease-in tuning for movement and turning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Travel speed, in world units per second, when a key is first pressed.
    pub move_min_speed: f32,
    /// Travel speed cap in world units per second.
    pub move_max_speed: f32,
    /// Hold time needed to reach the travel speed cap.
    pub move_ramp: Duration,
    /// Turn rate, in radians per second, when a key is first pressed.
    pub turn_min_speed: f32,
    /// Turn rate cap in radians per second.
    pub turn_max_speed: f32,
    /// Hold time needed to reach the turn rate cap.
    pub turn_ramp: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            move_min_speed: CELL_SIZE * 1.875,
            move_max_speed: CELL_SIZE * 7.5,
            move_ramp: Duration::from_millis(500),
            turn_min_speed: 1.257,
            turn_max_speed: 4.712,
            turn_ramp: Duration::from_millis(600),
        }
    }
}

/// Pure system that converts input snapshots into commands.
#[derive(Debug)]
pub struct PlayerControl {
    config: Config,
    move_held: Duration,
    turn_held: Duration,
    previous: PlayerInput,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl PlayerControl {
    /// Creates the system with the provided tuning.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            move_held: Duration::ZERO,
            turn_held: Duration::ZERO,
            previous: PlayerInput::default(),
        }
    }

    /// Current travel speed in world units per second.
    #[must_use]
    pub fn move_speed(&self) -> f32 {
        ease_in(
            self.move_held,
            self.config.move_ramp,
            self.config.move_min_speed,
            self.config.move_max_speed,
        )
    }

    /// Current turn rate in radians per second.
    #[must_use]
    pub fn turn_speed(&self) -> f32 {
        ease_in(
            self.turn_held,
            self.config.turn_ramp,
            self.config.turn_min_speed,
            self.config.turn_max_speed,
        )
    }

    /// Consumes the frame's input and emits commands for the world.
    pub fn handle(
        &mut self,
        mode: GameMode,
        dt: Duration,
        input: &PlayerInput,
        out: &mut Vec<Command>,
    ) {
        let previous = std::mem::replace(&mut self.previous, *input);

        if input.pause && !previous.pause {
            match mode {
                GameMode::Playing => out.push(Command::SetPaused { paused: true }),
                GameMode::Paused => out.push(Command::SetPaused { paused: false }),
                GameMode::Title | GameMode::GameOver | GameMode::LevelComplete => {}
            }
        }

        if mode != GameMode::Playing {
            self.move_held = Duration::ZERO;
            self.turn_held = Duration::ZERO;
            return;
        }

        let seconds = dt.as_secs_f32();
        self.move_held = hold(self.move_held, input.is_moving(), previous.is_moving(), dt);
        self.turn_held = hold(self.turn_held, input.is_turning(), previous.is_turning(), dt);

        let active: Vec<MoveDirection> = directions(input).collect();
        let distance = self.move_speed() * seconds;
        if distance > 0.0 && !active.is_empty() {
            // Perpendicular legs share the distance so diagonals keep the cap.
            let distance = distance / (active.len() as f32).sqrt();
            for direction in active {
                out.push(Command::MovePlayer {
                    direction,
                    distance,
                });
            }
        }

        if input.turn_left != input.turn_right {
            let rate = self.turn_speed() * seconds;
            let delta = if input.turn_left { -rate } else { rate };
            if delta != 0.0 {
                out.push(Command::TurnPlayer { delta });
            }
        }

        if input.use_action && !previous.use_action {
            out.push(Command::UseFacing);
        }
        if input.attack && !previous.attack {
            out.push(Command::PlayerAttack);
        }
    }
}

fn hold(held: Duration, active: bool, was_active: bool, dt: Duration) -> Duration {
    match (active, was_active) {
        (false, _) => Duration::ZERO,
        (true, false) => dt,
        (true, true) => held.saturating_add(dt),
    }
}

fn ease_in(held: Duration, ramp: Duration, min: f32, max: f32) -> f32 {
    let progress = if ramp.is_zero() {
        1.0
    } else {
        (held.as_secs_f32() / ramp.as_secs_f32()).clamp(0.0, 1.0)
    };
    min + (max - min) * progress * progress
}

/// Opposing keys cancel each other out.
fn directions(input: &PlayerInput) -> impl Iterator<Item = MoveDirection> {
    [
        (input.forward && !input.backward).then_some(MoveDirection::Forward),
        (input.backward && !input.forward).then_some(MoveDirection::Backward),
        (input.strafe_left && !input.strafe_right).then_some(MoveDirection::StrafeLeft),
        (input.strafe_right && !input.strafe_left).then_some(MoveDirection::StrafeRight),
    ]
    .into_iter()
    .flatten()
}
