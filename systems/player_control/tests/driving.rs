use std::time::Duration;

use crypt_caster_core::{Command, GameMode, LevelDescriptor, PlayerInput};
use crypt_caster_system_player_control::PlayerControl;
use crypt_caster_world::{self as world, query, World};

const FRAME: Duration = Duration::from_micros(16_667);

fn hallway() -> World {
    let level = LevelDescriptor::from_ascii(
        "hallway",
        &[
            "1111111111",
            "1*       1",
            "1111111111",
            "1111111111",
            "1111111111",
            "1111111111",
            "1111111111",
            "1111111111",
            "1111111111",
            "1111111111",
        ],
    );
    let mut world = World::new();
    let mut events = Vec::new();
    world::load_level(&mut world, &level, &mut events).expect("hallway loads");
    world
}

fn pump(world: &mut World, control: &mut PlayerControl, input: &PlayerInput) {
    let mut commands = Vec::new();
    control.handle(query::mode(world), FRAME, input, &mut commands);
    commands.push(Command::Tick { dt: FRAME });

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

#[test]
fn holding_forward_walks_until_the_far_wall() {
    let mut world = hallway();
    let mut control = PlayerControl::default();
    let input = PlayerInput {
        forward: true,
        ..PlayerInput::default()
    };

    let start = query::player(&world).position;
    for _ in 0..240 {
        pump(&mut world, &mut control, &input);
    }
    let end = query::player(&world).position;

    assert!(end.x > start.x + 200.0, "player only reached {end:?}");
    assert!(end.x < 9.0 * 32.0);
    assert_eq!(end.y, start.y);
}

#[test]
fn pause_key_round_trips_through_the_world() {
    let mut world = hallway();
    let mut control = PlayerControl::default();
    let pause = PlayerInput {
        pause: true,
        ..PlayerInput::default()
    };

    pump(&mut world, &mut control, &pause);
    assert_eq!(query::mode(&world), GameMode::Paused);

    pump(&mut world, &mut control, &PlayerInput::default());
    pump(&mut world, &mut control, &pause);
    assert_eq!(query::mode(&world), GameMode::Playing);
}
