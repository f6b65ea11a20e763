use crypt_caster_core::{ItemKind, KeyColor, ProjectileKind, Species, SpriteImage, TextureId};
use crypt_caster_rendering::Color;

const WALL_COLORS: [Color; 10] = [
    Color::from_rgb_u8(96, 96, 96),
    Color::from_rgb_u8(120, 112, 104),
    Color::from_rgb_u8(92, 108, 124),
    Color::from_rgb_u8(110, 84, 64),
    Color::from_rgb_u8(72, 96, 72),
    Color::from_rgb_u8(140, 100, 52),
    Color::from_rgb_u8(150, 40, 36),
    Color::from_rgb_u8(56, 140, 160),
    Color::from_rgb_u8(240, 180, 60),
    Color::from_rgb_u8(128, 64, 128),
];

/// Texel columns between the mortar seams drawn on walls.
pub(crate) const SEAM_SPACING: u32 = 8;

/// Flat color standing in for a wall texture.
pub(crate) fn wall(texture: TextureId) -> Color {
    WALL_COLORS[usize::from(texture.get()) % WALL_COLORS.len()]
}

/// Flame color of an animated decoration frame.
pub(crate) fn decoration(texture: TextureId, frame: u8) -> Color {
    let base = wall(texture);
    if frame == 0 {
        base
    } else {
        base.shaded(0.75)
    }
}

/// Flat color of a sprite image.
pub(crate) fn sprite(image: SpriteImage) -> Color {
    match image {
        SpriteImage::Monster { species, frame } => {
            let base = species_color(species);
            if frame == 0 {
                base
            } else {
                base.shaded(0.85)
            }
        }
        SpriteImage::Corpse(species) => species_color(species).shaded(0.45),
        SpriteImage::Projectile(ProjectileKind::Zap) => Color::from_rgb_u8(120, 200, 255),
        SpriteImage::Projectile(ProjectileKind::Bone) => Color::from_rgb_u8(230, 224, 200),
        SpriteImage::Item(kind) => item_color(kind),
    }
}

fn species_color(species: Species) -> Color {
    match species {
        Species::Ghoul => Color::from_rgb_u8(110, 150, 90),
        Species::Skeleton => Color::from_rgb_u8(220, 216, 200),
        Species::Thing => Color::from_rgb_u8(170, 60, 150),
    }
}

fn item_color(kind: ItemKind) -> Color {
    match kind {
        ItemKind::Potion => Color::from_rgb_u8(60, 90, 230),
        ItemKind::Crystal => Color::from_rgb_u8(150, 220, 255),
        ItemKind::Meat => Color::from_rgb_u8(190, 70, 60),
        ItemKind::Apple => Color::from_rgb_u8(220, 40, 40),
        ItemKind::Key(color) => key_color(color),
        ItemKind::Column => Color::from_rgb_u8(150, 150, 140),
        ItemKind::Barrel => Color::from_rgb_u8(130, 90, 50),
    }
}

/// Color used for keys in the world and on the HUD.
pub(crate) fn key_color(color: KeyColor) -> Color {
    match color {
        KeyColor::Red => Color::from_rgb_u8(220, 50, 50),
        KeyColor::Blue => Color::from_rgb_u8(60, 100, 230),
        KeyColor::Green => Color::from_rgb_u8(60, 190, 80),
    }
}

/// Vertical span, as fractions of the sprite height, covered by a texel column.
///
/// Returns `None` for transparent columns.
pub(crate) fn silhouette(image: SpriteImage, source_column: u32) -> Option<(f32, f32)> {
    let offset = (source_column as f32 + 0.5) / 32.0 - 0.5;
    let (half_width, top, bottom) = match image {
        SpriteImage::Monster { .. } => (0.3, 0.15, 1.0),
        SpriteImage::Corpse(_) => (0.4, 0.85, 1.0),
        SpriteImage::Projectile(_) => (0.1, 0.4, 0.6),
        SpriteImage::Item(ItemKind::Column) => (0.2, 0.0, 1.0),
        SpriteImage::Item(ItemKind::Barrel) => (0.25, 0.5, 1.0),
        SpriteImage::Item(_) => (0.15, 0.7, 1.0),
    };
    (offset.abs() <= half_width).then_some((top, bottom))
}
