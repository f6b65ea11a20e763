use crypt_caster_core::{CellContent, LevelAmbience, LevelDescriptor, TextureId};

/// Level played when no level file is supplied.
///
/// Two rooms joined by a door lead to a red-locked passage; a switch opens
/// the wall between the lower rooms and a secret wall hides a shortcut to the
/// exit.
pub(crate) fn demo_level() -> LevelDescriptor {
    let mut level = LevelDescriptor::from_ascii(
        "The Crypt",
        &[
            "1111111111111111",
            "1*  P   1  g   1",
            "1   K   1      1",
            "1  O    #   s  1",
            "1       1      1",
            "11T11&111111%111",
            "1   M  1       1",
            "1 t    1   C   1",
            "1      9    U  1",
            "1  A   1   B   1",
            "1111T111111111X1",
            "1111111111111111",
            "1111111111111111",
            "1111111111111111",
            "1111111111111111",
            "1111111111111111",
        ],
    )
    .with_cell(
        7,
        6,
        CellContent::Switch {
            texture: TextureId::new(3),
            target_column: 7,
            target_row: 8,
        },
    );
    level.ambience = LevelAmbience {
        ceiling_tint: [28, 26, 38],
        floor_tint: [58, 50, 44],
    };
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::{Event, GameMode};
    use crypt_caster_world::{self as world, World};

    #[test]
    fn demo_level_loads_with_its_contents() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::load_level(&mut world, &demo_level(), &mut events).expect("demo level is valid");

        assert_eq!(
            events,
            vec![
                Event::LevelLoaded {
                    name: "The Crypt".to_string(),
                    monsters: 3,
                    items: 6,
                    secrets: 1,
                },
                Event::ModeChanged {
                    mode: GameMode::Playing
                },
            ]
        );
    }
}
