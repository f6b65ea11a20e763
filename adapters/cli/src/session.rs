use std::time::Duration;

use crypt_caster_core::{Command, Event, GameMode, LevelDescriptor, PlayerInput, SoundCue};
use crypt_caster_rendering::{
    AudioSink, Camera, Hud, MapOverlay, ProjectionConfig, Renderer, Scene,
};
use crypt_caster_system_monster_ai::{Config as AiConfig, MonsterAi};
use crypt_caster_system_player_control::PlayerControl;
use crypt_caster_system_stats::{LevelStats, Stats};
use crypt_caster_world::{self as world, query, Config as WorldConfig, LevelError, World};

/// Fixed simulation step used by headless runs.
pub(crate) const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

/// Audio sink that reports cues through the log.
#[derive(Debug, Default)]
pub(crate) struct TracingAudio;

impl AudioSink for TracingAudio {
    fn play(&mut self, cue: SoundCue, volume: f32, wait: bool) {
        tracing::debug!(cue = cue.asset_name(), volume, wait, "sound cue");
    }
}

/// Wires the world, the systems and the renderer into a per-frame loop.
#[derive(Debug)]
pub(crate) struct GameSession<A> {
    world: World,
    level: LevelDescriptor,
    control: PlayerControl,
    ai: MonsterAi,
    stats: Stats,
    renderer: Renderer,
    audio: A,
    overlay: bool,
    previous: PlayerInput,
}

impl<A: AudioSink> GameSession<A> {
    pub(crate) fn new(
        config: WorldConfig,
        level: LevelDescriptor,
        projection: ProjectionConfig,
        audio: A,
    ) -> Result<Self, LevelError> {
        let ai = MonsterAi::new(AiConfig::new(config.rng_seed));
        let mut session = Self {
            world: World::with_config(config),
            level,
            control: PlayerControl::default(),
            ai,
            stats: Stats::new(),
            renderer: Renderer::new(projection),
            audio,
            overlay: false,
            previous: PlayerInput::default(),
        };
        let mut events = Vec::new();
        world::load_level(&mut session.world, &session.level, &mut events)?;
        session.dispatch(&events);
        Ok(session)
    }

    /// Statistics of the current level.
    pub(crate) fn stats(&self) -> &LevelStats {
        self.stats.report()
    }

    /// Advances the simulation by one frame.
    pub(crate) fn step(&mut self, dt: Duration, input: PlayerInput) {
        let mode = query::mode(&self.world);
        let previous = std::mem::replace(&mut self.previous, input);
        let mut events = Vec::new();

        if input.toggle_overlay && !previous.toggle_overlay {
            self.overlay = !self.overlay;
        }
        let finished = matches!(
            mode,
            GameMode::Title | GameMode::GameOver | GameMode::LevelComplete
        );
        if finished && input.use_action && !previous.use_action {
            if let Err(error) = world::load_level(&mut self.world, &self.level, &mut events) {
                tracing::error!(%error, "failed to restart level");
            }
        }

        let mut commands = Vec::new();
        self.control.handle(mode, dt, &input, &mut commands);
        commands.push(Command::Tick { dt });
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut decisions = Vec::new();
        let monsters = query::monsters(&self.world);
        let player = query::player(&self.world);
        let sight = &self.world;
        self.ai.handle(
            &events,
            query::mode(sight),
            &monsters,
            &player,
            |from, to| query::line_of_sight(sight, from, to),
            &mut decisions,
        );
        for command in decisions {
            world::apply(&mut self.world, command, &mut events);
        }

        self.dispatch(&events);
    }

    /// Renders the world into `scene`.
    pub(crate) fn populate(&mut self, scene: &mut Scene) {
        let player = query::player(&self.world);
        let grid = query::grid(&self.world);
        let sprites = query::sprites(&self.world);
        scene.frame = self.renderer.render(
            &grid,
            &Camera::from(&player),
            &sprites,
            query::animation_tick(&self.world),
        );
        scene.hud = Hud {
            mode: query::mode(&self.world),
            health: player.health,
            mana: player.mana,
            keys: player.keys,
        };
        scene.ambience = query::ambience(&self.world);
        scene.overlay = self.overlay.then(|| {
            let cell = grid.cell_size();
            MapOverlay {
                size: grid.size(),
                walls: grid
                    .walls()
                    .filter(|(_, wall)| !wall.is_invisible())
                    .map(|(coord, _)| (coord.column(), coord.row()))
                    .collect(),
                player: player.position / cell,
                player_angle: player.angle,
                monsters: query::monsters(&self.world)
                    .iter()
                    .map(|monster| monster.position / cell)
                    .collect(),
            }
        });
    }

    fn dispatch(&mut self, events: &[Event]) {
        self.stats.handle(events);
        for event in events {
            match event {
                Event::SoundTriggered { cue, volume, wait } => {
                    self.audio.play(*cue, *volume, *wait);
                }
                Event::ModeChanged {
                    mode: mode @ (GameMode::GameOver | GameMode::LevelComplete),
                } => {
                    tracing::info!(?mode, stats = %self.stats.report(), "level finished");
                }
                Event::ModeChanged { mode } => tracing::debug!(?mode, "mode changed"),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_system_stats::Outcome;

    #[derive(Debug, Default)]
    struct RecordingAudio {
        cues: Vec<SoundCue>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: SoundCue, _volume: f32, _wait: bool) {
            self.cues.push(cue);
        }
    }

    fn session(level: LevelDescriptor) -> GameSession<RecordingAudio> {
        let config = WorldConfig::default();
        let projection =
            ProjectionConfig::new(320, 200, 2, config.view_distance, config.ray_step)
                .expect("projection");
        GameSession::new(config, level, projection, RecordingAudio::default())
            .expect("level loads")
    }

    fn exit_room() -> LevelDescriptor {
        LevelDescriptor::from_ascii("exit", &["1111", "1*X1", "1  1", "1111"])
    }

    fn press_use() -> PlayerInput {
        PlayerInput {
            use_action: true,
            ..PlayerInput::default()
        }
    }

    #[test]
    fn idle_demo_run_accumulates_time() {
        let mut session = session(crate::demo::demo_level());
        for _ in 0..120 {
            session.step(HEADLESS_FRAME, PlayerInput::default());
        }
        assert_eq!(session.stats().elapsed, HEADLESS_FRAME * 120);
        assert_eq!(session.stats().outcome, Outcome::InProgress);
        assert_eq!(query::mode(&session.world), GameMode::Playing);
    }

    #[test]
    fn use_key_restarts_a_finished_level() {
        let mut session = session(exit_room());

        session.step(HEADLESS_FRAME, press_use());
        assert_eq!(query::mode(&session.world), GameMode::LevelComplete);
        assert_eq!(session.stats().outcome, Outcome::Completed);
        assert!(session.audio.cues.contains(&SoundCue::LevelExit));

        session.step(HEADLESS_FRAME, PlayerInput::default());
        session.step(HEADLESS_FRAME, press_use());
        assert_eq!(query::mode(&session.world), GameMode::Playing);
        assert_eq!(session.stats().outcome, Outcome::InProgress);
        assert_eq!(session.stats().elapsed, HEADLESS_FRAME);
    }

    #[test]
    fn overlay_toggles_once_per_press() {
        let mut session = session(exit_room());
        let toggle = PlayerInput {
            toggle_overlay: true,
            ..PlayerInput::default()
        };
        let mut scene = Scene::default();

        session.step(HEADLESS_FRAME, toggle);
        session.step(HEADLESS_FRAME, toggle);
        session.populate(&mut scene);
        let overlay = scene.overlay.as_ref().expect("overlay enabled");
        assert_eq!(overlay.size, 4);
        assert!(overlay.walls.contains(&(0, 0)));

        session.step(HEADLESS_FRAME, PlayerInput::default());
        session.step(HEADLESS_FRAME, toggle);
        session.populate(&mut scene);
        assert!(scene.overlay.is_none());
    }

    #[test]
    fn populated_scene_reflects_the_player() {
        let mut session = session(crate::demo::demo_level());
        let mut scene = Scene::default();
        session.populate(&mut scene);

        assert_eq!(scene.hud.mode, GameMode::Playing);
        assert_eq!(scene.hud.health, 100);
        assert_eq!(scene.frame.walls.len(), 160);
    }
}
