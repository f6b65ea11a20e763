//! Monster movement, behaviour transitions and damage.

use std::{
    f32::consts::{PI, TAU},
    time::Duration,
};

use crypt_caster_core::{
    heading_vector, normalize_angle, EffectId, Event, MonsterBehavior, MonsterId, ProjectileKind,
    ProjectileOwner, SoundCue, Species,
};
use glam::Vec2;
use rand::Rng;

use crate::{
    level::Level,
    play, player,
    projectiles::{self, Projectile},
    schedule::ScheduledAction,
    Config, World,
};

#[derive(Debug)]
pub(crate) struct Monster {
    pub(crate) species: Species,
    pub(crate) position: Vec2,
    pub(crate) heading: f32,
    pub(crate) speed: f32,
    pub(crate) radius: f32,
    pub(crate) health: i32,
    pub(crate) behavior: MonsterBehavior,
    pub(crate) has_seen_player: bool,
}

impl Monster {
    pub(crate) fn spawn(
        species: Species,
        position: Vec2,
        heading: f32,
        speed_factor: f32,
        config: &Config,
    ) -> Self {
        let profile = species.profile();
        Self {
            species,
            position,
            heading: normalize_angle(heading),
            speed: profile.base_speed * speed_factor,
            radius: config.monster_radius,
            health: profile.health,
            behavior: MonsterBehavior::Idle,
            has_seen_player: false,
        }
    }

    fn speed_for(&self, config: &Config) -> f32 {
        match self.behavior {
            MonsterBehavior::Idle | MonsterBehavior::Wander => self.speed * config.idle_speed_factor,
            MonsterBehavior::Melee => self.speed,
            MonsterBehavior::Recoil { .. } => self.speed * config.recoil_speed_factor,
            MonsterBehavior::Attack | MonsterBehavior::DoNothing { .. } => 0.0,
        }
    }
}

/// Remains of a slain monster, shown until its despawn timer fires.
#[derive(Debug)]
pub(crate) struct Corpse {
    pub(crate) species: Species,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
}

/// Advances every monster by one tick and resolves contact with the player.
pub(crate) fn advance(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let World {
        config,
        mode,
        level,
    } = world;
    let seconds = dt.as_secs_f32();
    let player_position = level.player.position;
    let reach = level.player.radius * config.player_hit_factor;
    let mut contact_damage = Vec::new();

    for key in level.monsters.keys() {
        let Some(monster) = level.monsters.get_mut(key) else {
            continue;
        };
        let id = MonsterId::new(key);

        let step = monster.speed_for(config) * seconds;
        if step > 0.0 {
            let candidate = monster.position + heading_vector(monster.heading) * step;
            if level.grid.blocking_cell(candidate, monster.radius).is_some() {
                monster.heading = normalize_angle(monster.heading + PI);
            } else {
                monster.position = candidate;
            }
        }

        let expired = match &mut monster.behavior {
            MonsterBehavior::Recoil { ticks_remaining }
            | MonsterBehavior::DoNothing { ticks_remaining } => {
                *ticks_remaining = ticks_remaining.saturating_sub(1);
                *ticks_remaining == 0
            }
            _ => false,
        };
        if expired {
            if matches!(monster.behavior, MonsterBehavior::Recoil { .. }) {
                monster.heading = level.rng.gen_range(0.0..TAU);
            }
            monster.behavior = MonsterBehavior::Idle;
            out_events.push(Event::MonsterBehaviorChanged {
                monster: id,
                behavior: MonsterBehavior::Idle,
            });
        }

        let touching = monster.position.distance(player_position) < reach + monster.radius;
        let recoiling = matches!(monster.behavior, MonsterBehavior::Recoil { .. });
        if touching && !recoiling {
            monster.heading = normalize_angle(monster.heading + PI);
            monster.behavior = MonsterBehavior::Recoil {
                ticks_remaining: config.recoil_ticks,
            };
            out_events.push(Event::MonsterBehaviorChanged {
                monster: id,
                behavior: monster.behavior,
            });
            contact_damage.push(monster.species.profile().melee_damage);
        }
    }

    for amount in contact_damage {
        player::damage(mode, &mut level.player, amount, out_events);
    }
}

/// Applies a behaviour requested by the AI.
///
/// Cooldown states belong to the world and cannot be interrupted. The alert
/// cue fires on the first transition into an engaged state after the monster
/// last lost sight of the player.
pub(crate) fn set_behavior(
    level: &mut Level,
    id: MonsterId,
    behavior: MonsterBehavior,
    out_events: &mut Vec<Event>,
) {
    let Some(monster) = level.monsters.get_mut(id.key()) else {
        return;
    };
    if monster.behavior.is_cooldown() {
        return;
    }

    match behavior {
        MonsterBehavior::Idle => {
            monster.has_seen_player = false;
            if monster.behavior.is_engaged() {
                monster.behavior = MonsterBehavior::Idle;
                out_events.push(Event::MonsterBehaviorChanged {
                    monster: id,
                    behavior,
                });
            }
        }
        MonsterBehavior::Melee | MonsterBehavior::Attack => {
            if monster.behavior == behavior {
                return;
            }
            if !monster.has_seen_player {
                monster.has_seen_player = true;
                out_events.push(Event::MonsterNoticedPlayer { monster: id });
                play(out_events, SoundCue::MonsterAlert);
            }
            monster.behavior = behavior;
            out_events.push(Event::MonsterBehaviorChanged {
                monster: id,
                behavior,
            });
        }
        MonsterBehavior::Wander
        | MonsterBehavior::Recoil { .. }
        | MonsterBehavior::DoNothing { .. } => {}
    }
}

pub(crate) fn face(level: &mut Level, id: MonsterId, heading: f32) {
    if !heading.is_finite() {
        return;
    }
    if let Some(monster) = level.monsters.get_mut(id.key()) {
        if !monster.behavior.is_cooldown() {
            monster.heading = normalize_angle(heading);
        }
    }
}

/// Launches a projectile from an attacking monster and starts its cooldown.
pub(crate) fn fire(
    level: &mut Level,
    config: &Config,
    id: MonsterId,
    heading: f32,
    out_events: &mut Vec<Event>,
) {
    if !heading.is_finite() {
        return;
    }
    let Some(monster) = level.monsters.get_mut(id.key()) else {
        return;
    };
    let profile = monster.species.profile();
    if monster.behavior != MonsterBehavior::Attack || !profile.can_shoot {
        return;
    }

    monster.heading = normalize_angle(heading);
    monster.behavior = MonsterBehavior::DoNothing {
        ticks_remaining: config.attack_cooldown_ticks,
    };
    let origin =
        monster.position + heading_vector(heading) * (monster.radius + config.projectile_radius);
    out_events.push(Event::MonsterBehaviorChanged {
        monster: id,
        behavior: monster.behavior,
    });

    let projectile = Projectile {
        owner: ProjectileOwner::Monster(id),
        kind: ProjectileKind::Bone,
        position: origin,
        heading: normalize_angle(heading),
        speed: config.monster_projectile_speed,
        radius: config.projectile_radius,
        damage: profile.projectile_damage,
        travelled: 0.0,
        max_travel: config.projectile_max_travel,
    };
    projectiles::spawn(level, projectile, out_events);
    play(out_events, SoundCue::MonsterAttack);
}

/// Applies damage to a monster, replacing it with a corpse when it dies.
pub(crate) fn damage(
    level: &mut Level,
    config: &Config,
    id: MonsterId,
    amount: i32,
    out_events: &mut Vec<Event>,
) {
    let Some(monster) = level.monsters.get_mut(id.key()) else {
        return;
    };
    monster.health = monster.health.saturating_sub(amount);
    if monster.health > 0 {
        out_events.push(Event::MonsterDamaged {
            monster: id,
            amount,
            health: monster.health,
        });
        play(out_events, SoundCue::MonsterHit);
        return;
    }

    let Some(monster) = level.monsters.remove(id.key()) else {
        return;
    };
    let corpse = EffectId::new(level.corpses.insert(Corpse {
        species: monster.species,
        position: monster.position,
        radius: monster.radius,
    }));
    level.schedule.schedule(
        level.elapsed.saturating_add(config.corpse_lifetime),
        ScheduledAction::DespawnEffect(corpse),
    );
    tracing::debug!(?id, species = ?monster.species, "monster killed");
    out_events.push(Event::MonsterKilled {
        monster: id,
        species: monster.species,
        corpse,
    });
    play(out_events, SoundCue::MonsterDeath);
}
