use crypt_caster_core::{CellCoord, Event, GameMode, SoundCue, WallKind};
use crypt_caster_raycast::RayCaster;

use crate::{level::Level, play, World};

/// Probes the wall in front of the player and triggers it.
pub(crate) fn use_facing(world: &mut World, out_events: &mut Vec<Event>) {
    let World {
        config,
        mode,
        level,
    } = world;
    let caster = RayCaster::new(config.ray_step);
    let target = caster
        .probe(
            &level.grid.view(),
            level.player.position,
            level.player.angle,
            config.use_range,
        )
        .map(|hit| hit.cell);

    if let Some(cell) = target {
        apply_use(mode, level, cell, out_events);
    }
}

/// Dispatches the use behaviour of the wall occupying `cell`.
pub(crate) fn apply_use(
    mode: &mut GameMode,
    level: &mut Level,
    cell: CellCoord,
    out_events: &mut Vec<Event>,
) {
    let Some(wall) = level.grid.wall_mut(cell) else {
        return;
    };

    match wall.kind() {
        WallKind::Plain => bump(cell, out_events),
        WallKind::Door { key: None } => open(level, cell, out_events),
        WallKind::Door { key: Some(key) } => {
            if level.player.keys.take(key) {
                out_events.push(Event::KeyConsumed {
                    key,
                    remaining: level.player.keys.count(key),
                });
                play(out_events, SoundCue::Unlock);
                open(level, cell, out_events);
            } else {
                out_events.push(Event::DoorLocked { cell, key });
                play(out_events, SoundCue::Grunt);
            }
        }
        WallKind::Switch { .. } => match wall.press() {
            Some(target) => {
                let _ = level.grid.clear(target);
                tracing::debug!(?cell, ?target, "switch pressed");
                out_events.push(Event::SwitchPressed {
                    switch: cell,
                    target,
                });
                play(out_events, SoundCue::Switch);
            }
            None => bump(cell, out_events),
        },
        WallKind::Secret => {
            let _ = level.grid.clear(cell);
            tracing::debug!(?cell, "secret revealed");
            out_events.push(Event::SecretRevealed { cell });
            play(out_events, SoundCue::Secret);
        }
        WallKind::Exit => {
            *mode = GameMode::LevelComplete;
            tracing::info!(level = %level.name, "level exit reached");
            out_events.push(Event::LevelExitReached { cell });
            out_events.push(Event::ModeChanged {
                mode: GameMode::LevelComplete,
            });
            play(out_events, SoundCue::LevelExit);
        }
    }
}

fn open(level: &mut Level, cell: CellCoord, out_events: &mut Vec<Event>) {
    let _ = level.grid.clear(cell);
    tracing::debug!(?cell, "door opened");
    out_events.push(Event::DoorOpened { cell });
    play(out_events, SoundCue::DoorOpen);
}

fn bump(cell: CellCoord, out_events: &mut Vec<Event>) {
    out_events.push(Event::WallBumped { cell });
    play(out_events, SoundCue::Grunt);
}
