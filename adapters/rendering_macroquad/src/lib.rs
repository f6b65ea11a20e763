#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Crypt Caster.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature; sound cues are handed to an
//! [`AudioSink`](crypt_caster_rendering::AudioSink) by the caller instead.
//!
//! Walls and sprites are drawn as flat-shaded rectangles from the
//! screen-space strips and slices of each [`Frame`](crypt_caster_rendering::Frame).

mod palette;

use anyhow::Result;
use crypt_caster_core::{heading_vector, GameMode, KeyColor, PlayerInput};
use crypt_caster_rendering::{
    Color, Hud, MapOverlay, Presentation, RenderingBackend, Scene, SpriteDraw, WallColumn,
};
use macroquad::{
    input::{is_key_down, is_key_pressed, KeyCode},
    shapes::{draw_circle, draw_line, draw_rectangle},
    text::{draw_text, measure_text},
};
use std::{
    ops::Range,
    time::{Duration, Instant},
};

/// Brightness of the mortar seams drawn between texel blocks.
const SEAM_SHADE: f32 = 0.8;

/// Texel columns of a decoration covered by its flame.
const FLAME_COLUMNS: Range<u32> = 12..20;

/// Fraction of the shorter screen edge covered by the map overlay.
const OVERLAY_FRACTION: f32 = 0.4;

/// Raw key states observed on a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyObservations {
    w: bool,
    s: bool,
    a: bool,
    d: bool,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    space: bool,
    shift: bool,
    o: bool,
    escape: bool,
}

impl KeyObservations {
    fn poll() -> Self {
        Self {
            w: is_key_down(KeyCode::W),
            s: is_key_down(KeyCode::S),
            a: is_key_down(KeyCode::A),
            d: is_key_down(KeyCode::D),
            up: is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            space: is_key_down(KeyCode::Space),
            shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            o: is_key_down(KeyCode::O),
            escape: is_key_down(KeyCode::Escape),
        }
    }
}

fn player_input_from_observations(keys: KeyObservations) -> PlayerInput {
    PlayerInput {
        forward: keys.w || keys.up,
        backward: keys.s || keys.down,
        strafe_left: keys.a,
        strafe_right: keys.d,
        turn_left: keys.left,
        turn_right: keys.right,
        use_action: keys.space,
        attack: keys.shift,
        toggle_overlay: keys.o,
        pause: keys.escape,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    render: Duration,
}

impl FpsCounter {
    /// Records a frame and returns `(fps, average render time)` once per second.
    fn record_frame(&mut self, now: Instant, render: Duration) -> Option<(f32, Duration)> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        self.render += render;

        let elapsed = now.duration_since(start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        let average = self.render / self.frames;
        *self = Self {
            window_start: Some(now),
            ..Self::default()
        };
        Some((fps, average))
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, PlayerInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            screen_width,
            screen_height,
            fullscreen,
            vsync,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(screen_width).unwrap_or(i32::MAX),
            window_height: i32::try_from(screen_height).unwrap_or(i32::MAX),
            fullscreen,
            ..macroquad::window::Conf::default()
        };
        config.platform.swap_interval = swap_interval.or(vsync.then_some(1));

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Q) {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let input = player_input_from_observations(KeyObservations::poll());
                update_scene(frame_dt, input, &mut scene);

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let width = macroquad::window::screen_width();
                let height = macroquad::window::screen_height();
                // Frames are projected at the presentation size; stretch to the window.
                let scale_x = width / screen_width as f32;
                let scale_y = height / screen_height as f32;

                draw_ambience(&scene, width, height);
                for column in &scene.frame.walls {
                    draw_wall_column(column, scale_x, scale_y);
                }
                for sprite in &scene.frame.sprites {
                    draw_sprite(sprite, scale_x, scale_y);
                }
                if let Some(overlay) = &scene.overlay {
                    draw_overlay(overlay, width, height);
                }
                draw_hud(&scene.hud, width, height);

                if let Some((fps, render)) =
                    fps_counter.record_frame(Instant::now(), render_start.elapsed())
                {
                    if show_fps {
                        println!(
                            "FPS: {fps:.2} | render: {:>6.2}ms",
                            render.as_secs_f64() * 1_000.0
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_ambience(scene: &Scene, width: f32, height: f32) {
    let horizon = height / 2.0;
    draw_rectangle(
        0.0,
        0.0,
        width,
        horizon,
        to_macroquad_color(Color::from_tint(scene.ambience.ceiling_tint)),
    );
    draw_rectangle(
        0.0,
        horizon,
        width,
        height - horizon,
        to_macroquad_color(Color::from_tint(scene.ambience.floor_tint)),
    );
}

fn draw_wall_column(column: &WallColumn, scale_x: f32, scale_y: f32) {
    let mut color = palette::wall(column.texture).shaded(column.shade);
    if column.source_column % palette::SEAM_SPACING == 0 {
        color = color.shaded(SEAM_SHADE);
    }
    let x = column.screen_x * scale_x;
    let width = column.width * scale_x;
    draw_rectangle(
        x,
        column.top * scale_y,
        width,
        column.height * scale_y,
        to_macroquad_color(color),
    );

    if let Some(layer) = column.decoration {
        if FLAME_COLUMNS.contains(&column.source_column) {
            let color = palette::decoration(layer.texture, layer.frame).shaded(column.shade);
            draw_rectangle(
                x,
                (column.top + column.height * 0.3) * scale_y,
                width,
                column.height * 0.15 * scale_y,
                to_macroquad_color(color),
            );
        }
    }
}

fn draw_sprite(sprite: &SpriteDraw, scale_x: f32, scale_y: f32) {
    let color = palette::sprite(sprite.image)
        .shaded(sprite.shade)
        .faded(sprite.alpha);
    let color = to_macroquad_color(color);
    for slice in &sprite.slices {
        let Some((top, bottom)) = palette::silhouette(sprite.image, slice.source_column) else {
            continue;
        };
        let dest = slice.dest;
        draw_rectangle(
            dest.x * scale_x,
            (dest.y + dest.height * top) * scale_y,
            dest.width * scale_x,
            dest.height * (bottom - top) * scale_y,
            color,
        );
    }
}

fn draw_overlay(overlay: &MapOverlay, width: f32, height: f32) {
    if overlay.size == 0 {
        return;
    }
    let cell = width.min(height) * OVERLAY_FRACTION / overlay.size as f32;
    let extent = cell * overlay.size as f32;
    draw_rectangle(
        0.0,
        0.0,
        extent,
        extent,
        to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.6)),
    );
    let wall = to_macroquad_color(Color::new(0.8, 0.8, 0.8, 0.8));
    for &(column, row) in &overlay.walls {
        draw_rectangle(column as f32 * cell, row as f32 * cell, cell, cell, wall);
    }

    let monster = to_macroquad_color(Color::from_rgb_u8(220, 60, 60));
    for position in &overlay.monsters {
        draw_circle(position.x * cell, position.y * cell, cell * 0.3, monster);
    }

    let player = to_macroquad_color(Color::from_rgb_u8(240, 220, 80));
    let (x, y) = (overlay.player.x * cell, overlay.player.y * cell);
    let heading = heading_vector(overlay.player_angle) * cell;
    draw_circle(x, y, cell * 0.35, player);
    draw_line(x, y, x + heading.x, y + heading.y, 1.5, player);
}

fn draw_hud(hud: &Hud, width: f32, height: f32) {
    let bar_width = width * 0.25;
    let bar_height = 10.0;
    let margin = 10.0;
    let base_y = height - margin - bar_height;
    draw_bar(
        margin,
        base_y - bar_height - 4.0,
        bar_width,
        bar_height,
        hud.health,
        Color::from_rgb_u8(200, 40, 40),
    );
    draw_bar(
        margin,
        base_y,
        bar_width,
        bar_height,
        hud.mana,
        Color::from_rgb_u8(60, 90, 230),
    );

    let mut key_x = margin * 2.0 + bar_width;
    for color in KeyColor::ALL {
        for _ in 0..hud.keys.count(color) {
            draw_rectangle(
                key_x,
                base_y - 4.0,
                8.0,
                bar_height + 4.0,
                to_macroquad_color(palette::key_color(color)),
            );
            key_x += 12.0;
        }
    }

    if let Some(message) = mode_message(hud.mode) {
        let font_size = 32.0;
        let dimensions = measure_text(message, None, font_size as u16, 1.0);
        draw_text(
            message,
            (width - dimensions.width) / 2.0,
            height / 2.0,
            font_size,
            macroquad::color::WHITE,
        );
    }
}

fn draw_bar(x: f32, y: f32, width: f32, height: f32, value: i32, color: Color) {
    let fill = (value.max(0) as f32 / 100.0).min(1.0);
    draw_rectangle(
        x,
        y,
        width,
        height,
        to_macroquad_color(Color::new(0.1, 0.1, 0.1, 0.8)),
    );
    draw_rectangle(x, y, width * fill, height, to_macroquad_color(color));
}

fn mode_message(mode: GameMode) -> Option<&'static str> {
    match mode {
        GameMode::Title => Some("Crypt Caster - press space"),
        GameMode::Paused => Some("Paused"),
        GameMode::GameOver => Some("You died - press space"),
        GameMode::LevelComplete => Some("Level complete - press space"),
        GameMode::Playing => None,
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
