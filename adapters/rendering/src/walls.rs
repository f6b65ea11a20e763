use crypt_caster_core::{relative_angle, GridView, TextureId, TEXTURE_SIZE};
use crypt_caster_raycast::RayCaster;

use crate::{Camera, DepthBuffer, ProjectionConfig};

/// Decoration texture drawn over a wall strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecorationLayer {
    /// Decoration texture.
    pub texture: TextureId,
    /// Active animation frame.
    pub frame: u8,
}

/// One textured vertical strip produced by the wall pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Ray column index.
    pub column: u32,
    /// Left edge of the strip in screen pixels.
    pub screen_x: f32,
    /// Strip width in screen pixels.
    pub width: f32,
    /// Wall texture.
    pub texture: TextureId,
    /// Optional decoration drawn over the wall texture.
    pub decoration: Option<DecorationLayer>,
    /// Texel column sampled from the texture.
    pub source_column: u32,
    /// Projected strip height in pixels.
    pub height: f32,
    /// Top edge of the strip in pixels; may be negative for close walls.
    pub top: f32,
    /// Brightness multiplier in `0.0..=1.0`.
    pub shade: f32,
    /// Distance along the ray to the wall.
    pub depth: f32,
}

/// Casts one ray per column, filling `depth` and returning the visible strips.
pub(crate) fn wall_pass(
    projection: &ProjectionConfig,
    caster: &RayCaster,
    grid: &GridView<'_>,
    camera: &Camera,
    animation_tick: u64,
    depth: &mut DepthBuffer,
) -> Vec<WallColumn> {
    depth.reset();

    let width = projection.ray_ratio() as f32;
    let mut columns = Vec::with_capacity(projection.view_rays() as usize);
    for column in 0..projection.view_rays() {
        let angle = projection.ray_angle(camera, column);
        let hit = caster.cast(grid, camera.position, angle, projection.view_distance());
        let Some(wall) = hit.wall else {
            continue;
        };

        depth.record(column as usize, hit.distance);
        let height = projection.strip_height(hit.distance, relative_angle(angle, camera.angle));
        let source_column =
            ((wall.texture_fraction * TEXTURE_SIZE as f32) as u32).min(TEXTURE_SIZE - 1);
        columns.push(WallColumn {
            column,
            screen_x: column as f32 * width,
            width,
            texture: wall.wall.texture(),
            decoration: wall.wall.decoration().map(|decoration| DecorationLayer {
                texture: decoration.texture,
                frame: decoration.frame(animation_tick),
            }),
            source_column,
            height,
            top: projection.horizon() - height / 2.0,
            shade: projection.shade(hit.distance),
            depth: hit.distance,
        });
    }
    columns
}
