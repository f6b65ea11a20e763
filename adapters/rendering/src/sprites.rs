use crypt_caster_core::{bearing, relative_angle, SpriteImage, SpriteSnapshot, SPRITE_IMAGE_SIZE};

use crate::{Camera, DepthBuffer, ProjectionConfig, MIN_PROJECTION_DISTANCE};

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Single visible texel column of a sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSlice {
    /// Texel column sampled from the sprite image.
    pub source_column: u32,
    /// Destination rectangle on screen.
    pub dest: ScreenRect,
}

/// Draw command for one billboard sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    /// Image to draw.
    pub image: SpriteImage,
    /// Distance from the camera.
    pub distance: f32,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Brightness multiplier in `0.0..=1.0`.
    pub shade: f32,
    /// Visible slices, left to right.
    pub slices: Vec<SpriteSlice>,
}

struct Placed {
    image: SpriteImage,
    alpha: f32,
    distance: f32,
    relative: f32,
}

/// Sorts sprites far to near and emits the slices left visible by the walls.
pub(crate) fn composite(
    projection: &ProjectionConfig,
    camera: &Camera,
    sprites: &[SpriteSnapshot],
    depth: &DepthBuffer,
) -> Vec<SpriteDraw> {
    let mut placed: Vec<Placed> = sprites
        .iter()
        .map(|sprite| Placed {
            image: sprite.image,
            alpha: sprite.alpha,
            distance: camera.position.distance(sprite.position),
            relative: relative_angle(bearing(camera.position, sprite.position), camera.angle),
        })
        .filter(|sprite| {
            sprite.distance > MIN_PROJECTION_DISTANCE
                && sprite.distance <= projection.view_distance()
        })
        .collect();
    // Stable, so sprites at equal distances keep snapshot order.
    placed.sort_by(|a, b| b.distance.total_cmp(&a.distance));

    placed
        .into_iter()
        .filter_map(|sprite| place(projection, camera, depth, sprite))
        .collect()
}

fn place(
    projection: &ProjectionConfig,
    camera: &Camera,
    depth: &DepthBuffer,
    sprite: Placed,
) -> Option<SpriteDraw> {
    let screen_width = projection.screen_width() as f32;
    let image_size = SPRITE_IMAGE_SIZE as f32;
    let scale = projection.screen_height() as f32 / sprite.distance;
    let half = image_size / 2.0 * scale;
    let size = half * 2.0;

    let left = sprite.relative / camera.fov * screen_width + screen_width / 2.0 - half;
    if left + size < 0.0 || left > screen_width {
        return None;
    }
    let top = projection.horizon() - half;
    let slice_width = size / image_size;
    let ray_ratio = projection.ray_ratio() as f32;

    let slices: Vec<SpriteSlice> = (0..SPRITE_IMAGE_SIZE)
        .filter_map(|source_column| {
            let x = left + source_column as f32 * slice_width;
            let centre = x + slice_width / 2.0;
            if centre < 0.0 || centre >= screen_width {
                return None;
            }
            let column = (centre / ray_ratio).floor() as usize;
            depth
                .is_visible(column, sprite.distance)
                .then_some(SpriteSlice {
                    source_column,
                    dest: ScreenRect {
                        x,
                        y: top,
                        width: slice_width,
                        height: size,
                    },
                })
        })
        .collect();

    if slices.is_empty() {
        return None;
    }
    Some(SpriteDraw {
        image: sprite.image,
        distance: sprite.distance,
        alpha: sprite.alpha,
        shade: projection.shade(sprite.distance),
        slices,
    })
}
