#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Crypt Caster adapters.
//!
//! The crate owns everything between the world snapshots and a backend's
//! draw calls: the perspective projector, the per-column depth buffer, the
//! wall pass and the depth-tested sprite compositor. Backends only receive
//! [`Frame`]s of screen-space strips and slices and never see the grid.

mod depth;
mod projection;
mod sprites;
mod walls;

use anyhow::Result as AnyResult;
use crypt_caster_core::{
    GameMode, GridView, KeyRing, LevelAmbience, PlayerInput, SoundCue, SpriteSnapshot,
};
use crypt_caster_raycast::RayCaster;
use glam::Vec2;
use std::time::Duration;

pub use depth::DepthBuffer;
pub use projection::{Camera, ProjectionConfig, MIN_PROJECTION_DISTANCE};
pub use sprites::{ScreenRect, SpriteDraw, SpriteSlice};
pub use walls::{DecorationLayer, WallColumn};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from an RGB triple.
    #[must_use]
    pub const fn from_tint(tint: [u8; 3]) -> Self {
        Self::from_rgb_u8(tint[0], tint[1], tint[2])
    }

    /// Returns the color darkened by a brightness multiplier.
    #[must_use]
    pub fn shaded(self, brightness: f32) -> Self {
        let brightness = brightness.clamp(0.0, 1.0);
        Self {
            red: self.red * brightness,
            green: self.green * brightness,
            blue: self.blue * brightness,
            alpha: self.alpha,
        }
    }

    /// Returns the color with its alpha channel scaled.
    #[must_use]
    pub fn faded(self, alpha: f32) -> Self {
        Self {
            alpha: self.alpha * alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Everything drawn in the 3D view for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Wall strips in column order.
    pub walls: Vec<WallColumn>,
    /// Sprite draws ordered far to near.
    pub sprites: Vec<SpriteDraw>,
}

/// Projects the grid and sprites into screen-space draw commands.
#[derive(Clone, Debug)]
pub struct Renderer {
    projection: ProjectionConfig,
    caster: RayCaster,
    depth: DepthBuffer,
}

impl Renderer {
    /// Creates a renderer for the provided projection.
    #[must_use]
    pub fn new(projection: ProjectionConfig) -> Self {
        Self {
            projection,
            caster: RayCaster::new(projection.ray_step()),
            depth: DepthBuffer::new(
                projection.view_rays() as usize,
                projection.view_distance(),
            ),
        }
    }

    /// Projection used by the renderer.
    #[must_use]
    pub const fn projection(&self) -> &ProjectionConfig {
        &self.projection
    }

    /// Depth buffer filled by the most recent wall pass.
    #[must_use]
    pub const fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Renders one frame: the wall pass first, then the sprite compositor.
    pub fn render(
        &mut self,
        grid: &GridView<'_>,
        camera: &Camera,
        sprites: &[SpriteSnapshot],
        animation_tick: u64,
    ) -> Frame {
        let walls = walls::wall_pass(
            &self.projection,
            &self.caster,
            grid,
            camera,
            animation_tick,
            &mut self.depth,
        );
        let sprites = sprites::composite(&self.projection, camera, sprites, &self.depth);
        Frame { walls, sprites }
    }
}

/// Status values shown on top of the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Current game mode.
    pub mode: GameMode,
    /// Remaining health.
    pub health: i32,
    /// Remaining mana.
    pub mana: i32,
    /// Keys carried.
    pub keys: KeyRing,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            mode: GameMode::Title,
            health: 0,
            mana: 0,
            keys: KeyRing::default(),
        }
    }
}

/// Top-down minimap expressed in cell units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapOverlay {
    /// Cells along each edge of the level.
    pub size: u32,
    /// Visible walls as `(column, row)` pairs.
    pub walls: Vec<(u32, u32)>,
    /// Player position in cells.
    pub player: Vec2,
    /// Player facing angle.
    pub player_angle: f32,
    /// Monster positions in cells.
    pub monsters: Vec<Vec2>,
}

/// Scene handed to backends each frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Projected walls and sprites.
    pub frame: Frame,
    /// Status values.
    pub hud: Hud,
    /// Minimap drawn when the overlay is enabled.
    pub overlay: Option<MapOverlay>,
    /// Ceiling and floor colors.
    pub ambience: LevelAmbience,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Window width in pixels.
    pub screen_width: u32,
    /// Window height in pixels.
    pub screen_height: u32,
    /// Whether the window starts fullscreen.
    pub fullscreen: bool,
    /// Whether buffer swaps wait for vertical sync.
    pub vsync: bool,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new windowed presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, projection: &ProjectionConfig, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            screen_width: projection.screen_width(),
            screen_height: projection.screen_height(),
            fullscreen: false,
            vsync: false,
            clear_color: Color::from_rgb_u8(0, 0, 0),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Crypt Caster scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// key states captured by the adapter, and refreshes the scene before it
    /// is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, PlayerInput, &mut Scene) + 'static;
}

/// Destination for the sound cues emitted by the world.
pub trait AudioSink {
    /// Plays `cue` at `volume`; with `wait` a cue already playing is not restarted.
    fn play(&mut self, cue: SoundCue, volume: f32, wait: bool);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RenderingError {
    /// Screen dimensions must both be positive.
    #[error("screen resolution {width}x{height} must be positive")]
    InvalidResolution {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Each ray must cover at least one pixel and at most the whole screen.
    #[error("ray ratio {ray_ratio} must be between 1 and the screen width {screen_width}")]
    InvalidRayRatio {
        /// Requested ratio.
        ray_ratio: u32,
        /// Screen width the ratio divides.
        screen_width: u32,
    },
    /// The view distance must be a positive finite number.
    #[error("view distance {view_distance} must be positive and finite")]
    InvalidViewDistance {
        /// Requested view distance.
        view_distance: f32,
    },
}
