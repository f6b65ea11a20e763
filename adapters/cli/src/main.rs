#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Crypt Caster.

mod config;
mod demo;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crypt_caster_core::{PlayerInput, GAME_TITLE};
use crypt_caster_rendering::{Presentation, ProjectionConfig, RenderingBackend, Scene};
use crypt_caster_rendering_macroquad::MacroquadBackend;
use crypt_caster_world::Config as WorldConfig;
use tracing_subscriber::EnvFilter;

use self::{
    config::EngineConfigFile,
    session::{GameSession, TracingAudio, HEADLESS_FRAME},
};

#[derive(Debug, Parser)]
#[command(name = "crypt-caster", about = "First-person raycasting dungeon crawler")]
struct Cli {
    /// Level file in TOML; the built-in demo level is played when omitted
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Window resolution preset
    #[arg(long, value_enum, default_value_t = Resolution::Small)]
    res: Resolution,
    /// Screen pixels covered by each cast ray
    #[arg(long, default_value_t = 2)]
    ratio: u32,
    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    vsync: bool,
    /// Start in fullscreen
    #[arg(long)]
    fullscreen: bool,
    /// Seed for monster behaviour and footstep variation
    #[arg(long)]
    seed: Option<u64>,
    /// Simulate the given number of 60 Hz ticks without a window and print statistics
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// Engine tuning file in TOML
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print frame timing once per second
    #[arg(long)]
    show_fps: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Resolution {
    Tiny,
    Small,
    Medium,
    Large,
    Larger,
    Super,
}

impl Resolution {
    const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Tiny => (640, 480),
            Self::Small => (800, 600),
            Self::Medium => (1024, 768),
            Self::Large => (1280, 960),
            Self::Larger => (1400, 1050),
            Self::Super => (1600, 1200),
        }
    }
}

/// Entry point for the Crypt Caster command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut world_config = WorldConfig::default();
    if let Some(path) = &cli.config {
        EngineConfigFile::load(path)?.apply(&mut world_config)?;
    }
    if let Some(seed) = cli.seed {
        world_config.rng_seed = seed;
    }

    let level = match &cli.level {
        Some(path) => config::load_level(path)?,
        None => demo::demo_level(),
    };
    let (width, height) = cli.res.dimensions();
    let projection = ProjectionConfig::new(
        width,
        height,
        cli.ratio,
        world_config.view_distance,
        world_config.ray_step,
    )
    .context("invalid projection settings")?;

    let level_name = level.name.clone();
    let mut session = GameSession::new(world_config, level, projection, TracingAudio)
        .with_context(|| format!("failed to load level {level_name:?}"))?;
    let mut scene = Scene::default();

    if let Some(ticks) = cli.headless {
        tracing::info!(ticks, "running headless");
        for _ in 0..ticks {
            session.step(HEADLESS_FRAME, PlayerInput::default());
            session.populate(&mut scene);
        }
        println!("{}", session.stats());
        return Ok(());
    }

    session.populate(&mut scene);
    let mut presentation = Presentation::new(GAME_TITLE, &projection, scene);
    presentation.fullscreen = cli.fullscreen;
    presentation.vsync = cli.vsync;

    MacroquadBackend::new()
        .with_vsync(cli.vsync)
        .with_show_fps(cli.show_fps)
        .run(presentation, move |dt, input, scene| {
            session.step(dt, input);
            session.populate(scene);
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_into_presets() {
        let cli = Cli::try_parse_from([
            "crypt-caster",
            "--res",
            "super",
            "--ratio",
            "4",
            "--headless",
            "30",
            "--seed",
            "7",
        ])
        .expect("valid flags");
        assert_eq!(cli.res.dimensions(), (1600, 1200));
        assert_eq!(cli.ratio, 4);
        assert_eq!(cli.headless, Some(30));
        assert_eq!(cli.seed, Some(7));
        assert!(!cli.verbose);
    }

    #[test]
    fn defaults_match_the_small_window() {
        let cli = Cli::try_parse_from(["crypt-caster"]).expect("no flags");
        assert_eq!(cli.res, Resolution::Small);
        assert_eq!(cli.ratio, 2);
        assert!(cli.level.is_none() && cli.headless.is_none());
    }
}
