use std::time::Duration;

use crypt_caster_core::{
    heading_vector, Event, MonsterId, ProjectileId, ProjectileKind, ProjectileOwner,
    ProjectileRemoval, SoundCue,
};
use glam::Vec2;

use crate::{level::Level, monsters, play, player, Config, World};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) owner: ProjectileOwner,
    pub(crate) kind: ProjectileKind,
    pub(crate) position: Vec2,
    pub(crate) heading: f32,
    pub(crate) speed: f32,
    pub(crate) radius: f32,
    pub(crate) damage: i32,
    pub(crate) travelled: f32,
    pub(crate) max_travel: f32,
}

pub(crate) fn spawn(level: &mut Level, projectile: Projectile, out_events: &mut Vec<Event>) {
    let owner = projectile.owner;
    let kind = projectile.kind;
    let id = ProjectileId::new(level.projectiles.insert(projectile));
    out_events.push(Event::ProjectileSpawned {
        projectile: id,
        owner,
        kind,
    });
}

/// Spends mana and launches a bolt just ahead of the player.
pub(crate) fn player_attack(level: &mut Level, config: &Config, out_events: &mut Vec<Event>) {
    let player = &mut level.player;
    if player.mana <= 0 {
        return;
    }

    player.mana = player.mana.saturating_sub(config.attack_cost).max(0);
    out_events.push(Event::ManaSpent {
        amount: config.attack_cost,
        mana: player.mana,
    });

    let projectile = Projectile {
        owner: ProjectileOwner::Player,
        kind: ProjectileKind::Zap,
        position: player.position + heading_vector(player.angle) * (player.radius * 2.0),
        heading: player.angle,
        speed: config.player_projectile_speed,
        radius: config.projectile_radius,
        damage: config.player_projectile_damage,
        travelled: 0.0,
        max_travel: config.projectile_max_travel,
    };
    spawn(level, projectile, out_events);
    play(out_events, SoundCue::Zap);
}

/// Moves every projectile one tick and resolves its first collision.
///
/// Walls are tested before entities. A projectile strikes at most one target
/// and is removed by that strike.
pub(crate) fn advance(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let World {
        config,
        mode,
        level,
    } = world;
    let seconds = dt.as_secs_f32();
    let player_reach = level.player.radius * config.player_hit_factor;

    for key in level.projectiles.keys() {
        let Some(projectile) = level.projectiles.get(key).copied() else {
            continue;
        };
        let travel = projectile.speed * seconds;
        let candidate = projectile.position + heading_vector(projectile.heading) * travel;

        let removal = if level.grid.view().is_solid(candidate) {
            Some(ProjectileRemoval::HitWall)
        } else {
            match projectile.owner {
                ProjectileOwner::Player => level
                    .monsters
                    .iter()
                    .find(|(_, monster)| {
                        monster.position.distance(candidate) < monster.radius + projectile.radius
                    })
                    .map(|(monster, _)| ProjectileRemoval::HitMonster(MonsterId::new(monster))),
                ProjectileOwner::Monster(_) => {
                    let distance = level.player.position.distance(candidate);
                    (distance < player_reach + projectile.radius)
                        .then_some(ProjectileRemoval::HitPlayer)
                }
            }
        };
        let removal = removal.or_else(|| {
            (projectile.travelled + travel >= projectile.max_travel)
                .then_some(ProjectileRemoval::Expired)
        });

        let Some(reason) = removal else {
            if let Some(live) = level.projectiles.get_mut(key) {
                live.position = candidate;
                live.travelled += travel;
            }
            continue;
        };

        let _ = level.projectiles.remove(key);
        out_events.push(Event::ProjectileRemoved {
            projectile: ProjectileId::new(key),
            reason,
        });
        match reason {
            ProjectileRemoval::HitMonster(monster) => {
                monsters::damage(level, config, monster, projectile.damage, out_events);
            }
            ProjectileRemoval::HitPlayer => {
                player::damage(mode, &mut level.player, projectile.damage, out_events);
            }
            ProjectileRemoval::HitWall | ProjectileRemoval::Expired => {}
        }
    }
}
