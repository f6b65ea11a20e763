#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Crypt Caster engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate device input into
//! [`PlayerInput`] snapshots, systems turn those snapshots and world views into
//! [`Command`] values, the world executes commands via its `apply` entry point
//! and broadcasts [`Event`] values describing what happened. Renderers only ever
//! read the immutable views defined here, most notably [`GridView`] and
//! [`SpriteSnapshot`].

mod grid;
mod level;

use std::{
    f32::consts::{FRAC_PI_2, PI, TAU},
    time::Duration,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use grid::{Decoration, GridView, Wall, WallKind};
pub use level::{CellContent, CellDescriptor, LevelAmbience, LevelDescriptor};

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Crypt Caster";

/// Side length of a single grid cell expressed in world units.
pub const CELL_SIZE: f32 = 32.0;

/// Width and height, in texels, of every square wall texture.
pub const TEXTURE_SIZE: u32 = 32;

/// Width and height, in texels, of every square sprite image.
pub const SPRITE_IMAGE_SIZE: u32 = 32;

/// Number of cells along each edge of a full-size level.
pub const DEFAULT_MAP_SIZE: u32 = 100;

/// Wraps an angle into the half-open range `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns `angle - reference` wrapped into the range `(-π, π]`.
///
/// Bearings computed with `atan2` and facing angles accumulated from turning
/// live in different ranges; comparing them without wrapping makes sprites
/// behind the camera appear on screen.
#[must_use]
pub fn relative_angle(angle: f32, reference: f32) -> f32 {
    let delta = (angle - reference).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

/// Unit vector pointing along the provided angle.
#[must_use]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector pointing from `from` towards `to`.
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Describes which phase of the experience is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// No level is loaded; adapters present the title screen.
    Title,
    /// A level is loaded and the simulation advances with every tick.
    Playing,
    /// A level is loaded but simulation ticks are ignored.
    Paused,
    /// The player died; the level stays loaded for presentation only.
    GameOver,
    /// The player used an exit wall.
    LevelComplete,
}

/// Direction of a player movement request relative to the facing angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    /// Along the facing angle.
    Forward,
    /// Opposite the facing angle.
    Backward,
    /// Perpendicular to the facing angle, towards the left of the view.
    StrafeLeft,
    /// Perpendicular to the facing angle, towards the right of the view.
    StrafeRight,
}

impl MoveDirection {
    /// Offset added to the facing angle to obtain the travel heading.
    #[must_use]
    pub const fn heading_offset(self) -> f32 {
        match self {
            Self::Forward => 0.0,
            Self::Backward => PI,
            Self::StrafeLeft => -FRAC_PI_2,
            Self::StrafeRight => FRAC_PI_2,
        }
    }
}

/// Discrete key states sampled by an adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlayerInput {
    /// Move along the facing angle.
    pub forward: bool,
    /// Move against the facing angle.
    pub backward: bool,
    /// Step to the left without turning.
    pub strafe_left: bool,
    /// Step to the right without turning.
    pub strafe_right: bool,
    /// Rotate counter-clockwise on screen.
    pub turn_left: bool,
    /// Rotate clockwise on screen.
    pub turn_right: bool,
    /// Interact with the wall in front of the player.
    pub use_action: bool,
    /// Cast a projectile.
    pub attack: bool,
    /// Show or hide the map overlay.
    pub toggle_overlay: bool,
    /// Pause or resume the simulation.
    pub pause: bool,
}

impl PlayerInput {
    /// Reports whether any movement key is held.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.forward || self.backward || self.strafe_left || self.strafe_right
    }

    /// Reports whether any turning key is held.
    #[must_use]
    pub const fn is_turning(&self) -> bool {
        self.turn_left || self.turn_right
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player travel a distance relative to the facing angle.
    MovePlayer {
        /// Direction of travel relative to the facing angle.
        direction: MoveDirection,
        /// Distance to travel measured in world units.
        distance: f32,
    },
    /// Rotates the player by the provided angle in radians.
    TurnPlayer {
        /// Signed rotation; positive values turn clockwise on screen.
        delta: f32,
    },
    /// Probes the wall directly in front of the player and triggers its behaviour.
    UseFacing,
    /// Spends mana to launch a projectile along the facing angle.
    PlayerAttack,
    /// Requests that a monster switch behaviour in response to line of sight.
    SetMonsterBehavior {
        /// Identifier of the monster to update.
        monster: MonsterId,
        /// Behaviour the monster should adopt.
        behavior: MonsterBehavior,
    },
    /// Points a monster along the provided heading.
    FaceMonster {
        /// Identifier of the monster to rotate.
        monster: MonsterId,
        /// Absolute heading in radians.
        heading: f32,
    },
    /// Requests that an attacking monster launch a projectile.
    FireMonsterProjectile {
        /// Identifier of the monster firing.
        monster: MonsterId,
        /// Absolute heading of the projectile in radians.
        heading: f32,
    },
    /// Pauses or resumes the loaded level.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Unloads the active level, dropping every entity and pending timer.
    ReturnToTitle,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a level finished loading and replaced the previous one.
    LevelLoaded {
        /// Display name of the level.
        name: String,
        /// Number of monsters placed in the level.
        monsters: u32,
        /// Number of collectable items placed in the level.
        items: u32,
        /// Number of secret walls in the level.
        secrets: u32,
    },
    /// Announces that the world entered a new game mode.
    ModeChanged {
        /// Mode that became active.
        mode: GameMode,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
        /// Cell occupied after the move.
        cell: CellCoord,
    },
    /// Reports that a movement request was rejected by collision.
    PlayerBlocked {
        /// Cell containing the wall that blocked the move.
        wall: CellCoord,
    },
    /// Confirms that the player's facing angle changed.
    PlayerTurned {
        /// Facing angle after the turn, in `[0, 2π)`.
        angle: f32,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Damage requested by the source.
        amount: i32,
        /// Health remaining after clamping at zero.
        health: i32,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Reports that the player spent mana on an attack.
    ManaSpent {
        /// Mana deducted by the attack.
        amount: i32,
        /// Mana remaining after clamping at zero.
        mana: i32,
    },
    /// Confirms that the player collected an item.
    ItemPickedUp {
        /// Identifier of the collected item.
        item: ItemId,
        /// Kind of item collected.
        kind: ItemKind,
        /// Cell the item occupied.
        cell: CellCoord,
    },
    /// Confirms that a door was opened and its cell cleared.
    DoorOpened {
        /// Cell that contained the door.
        cell: CellCoord,
    },
    /// Reports that the player tried a locked door without the matching key.
    DoorLocked {
        /// Cell that contains the door.
        cell: CellCoord,
        /// Key required to open the door.
        key: KeyColor,
    },
    /// Reports that a key was consumed from the player's inventory.
    KeyConsumed {
        /// Colour of the consumed key.
        key: KeyColor,
        /// Keys of that colour left in the inventory.
        remaining: u32,
    },
    /// Confirms that a switch was pressed and its target cleared.
    SwitchPressed {
        /// Cell that contains the switch.
        switch: CellCoord,
        /// Remote cell cleared by the switch.
        target: CellCoord,
    },
    /// Confirms that a secret wall was discovered and removed.
    SecretRevealed {
        /// Cell that contained the secret wall.
        cell: CellCoord,
    },
    /// Confirms that the player used an exit wall.
    LevelExitReached {
        /// Cell that contains the exit.
        cell: CellCoord,
    },
    /// Reports that the player used a wall without behaviour.
    WallBumped {
        /// Cell that contains the wall.
        cell: CellCoord,
    },
    /// Confirms that a projectile entered the world.
    ProjectileSpawned {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Faction that launched the projectile.
        owner: ProjectileOwner,
        /// Visual kind of the projectile.
        kind: ProjectileKind,
    },
    /// Confirms that a projectile left the world.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
        /// Reason the projectile was removed.
        reason: ProjectileRemoval,
    },
    /// Reports that a monster saw the player for the first time since losing sight.
    MonsterNoticedPlayer {
        /// Identifier of the alerted monster.
        monster: MonsterId,
    },
    /// Confirms that a monster changed behaviour.
    MonsterBehaviorChanged {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Behaviour that became active.
        behavior: MonsterBehavior,
    },
    /// Reports that a monster survived a hit.
    MonsterDamaged {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Damage applied by the hit.
        amount: i32,
        /// Health remaining after the hit.
        health: i32,
    },
    /// Reports that a monster died and left a corpse effect behind.
    MonsterKilled {
        /// Identifier of the removed monster.
        monster: MonsterId,
        /// Species of the removed monster.
        species: Species,
        /// Transient corpse effect spawned at the monster's position.
        corpse: EffectId,
    },
    /// Reports that a transient effect expired.
    EffectExpired {
        /// Identifier of the removed effect.
        effect: EffectId,
    },
    /// Requests playback of a sound cue from the audio sink.
    SoundTriggered {
        /// Cue to play.
        cue: SoundCue,
        /// Playback volume in the range `0.0..=1.0`.
        volume: f32,
        /// When `true` the cue must not restart while it is still playing.
        wait: bool,
    },
}

/// Stable arena handle composed of a slot index and a reuse generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    index: u32,
    generation: u32,
}

impl SlotKey {
    /// Creates a handle for the provided slot and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Dense slot index within the owning arena.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(SlotKey);

impl MonsterId {
    /// Wraps an arena handle.
    #[must_use]
    pub const fn new(key: SlotKey) -> Self {
        Self(key)
    }

    /// Retrieves the underlying arena handle.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(SlotKey);

impl ProjectileId {
    /// Wraps an arena handle.
    #[must_use]
    pub const fn new(key: SlotKey) -> Self {
        Self(key)
    }

    /// Retrieves the underlying arena handle.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        self.0
    }
}

/// Unique identifier assigned to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(SlotKey);

impl ItemId {
    /// Wraps an arena handle.
    #[must_use]
    pub const fn new(key: SlotKey) -> Self {
        Self(key)
    }

    /// Retrieves the underlying arena handle.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        self.0
    }
}

/// Unique identifier assigned to a transient visual effect such as a corpse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(SlotKey);

impl EffectId {
    /// Wraps an arena handle.
    #[must_use]
    pub const fn new(key: SlotKey) -> Self {
        Self(key)
    }

    /// Retrieves the underlying arena handle.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn center(&self, cell_size: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * cell_size,
            (self.row as f32 + 0.5) * cell_size,
        )
    }

    /// Converts a world-space point into the cell that contains it.
    ///
    /// Returns `None` for points left of or above the grid origin.
    #[must_use]
    pub fn containing(point: Vec2, cell_size: f32) -> Option<Self> {
        let column = (point.x / cell_size).floor();
        let row = (point.y / cell_size).floor();
        if column < 0.0 || row < 0.0 || !column.is_finite() || !row.is_finite() {
            return None;
        }
        Some(Self::new(column as u32, row as u32))
    }
}

/// Identifier of a wall texture supplied by the asset collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureId(u16);

impl TextureId {
    /// Wraps a raw texture index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the raw texture index.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Colours of the keys that unlock matching doors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyColor {
    /// Red key.
    Red,
    /// Blue key.
    Blue,
    /// Green key.
    Green,
}

impl KeyColor {
    /// Every key colour in inventory order.
    pub const ALL: [KeyColor; 3] = [KeyColor::Red, KeyColor::Blue, KeyColor::Green];

    const fn slot(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
            Self::Green => 2,
        }
    }
}

/// Inventory of keys held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRing {
    counts: [u32; 3],
}

impl KeyRing {
    /// Number of keys of the provided colour currently held.
    #[must_use]
    pub const fn count(&self, color: KeyColor) -> u32 {
        self.counts[color.slot()]
    }

    /// Adds a single key of the provided colour.
    pub fn add(&mut self, color: KeyColor) {
        let slot = &mut self.counts[color.slot()];
        *slot = slot.saturating_add(1);
    }

    /// Removes a single key of the provided colour, returning whether one was held.
    pub fn take(&mut self, color: KeyColor) -> bool {
        let slot = &mut self.counts[color.slot()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Monster species that can be placed in a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Slow, sturdy melee monster.
    Ghoul,
    /// Fragile monster that attacks from range.
    Skeleton,
    /// Weak melee monster.
    Thing,
}

impl Species {
    /// Returns the fixed behaviour profile of the species.
    #[must_use]
    pub const fn profile(self) -> SpeciesProfile {
        match self {
            Self::Ghoul => SpeciesProfile {
                health: 75,
                melee_damage: 10,
                projectile_damage: 0,
                base_speed: 36.0,
                can_shoot: false,
                attack_chance: 0.0,
            },
            Self::Skeleton => SpeciesProfile {
                health: 35,
                melee_damage: 10,
                projectile_damage: 8,
                base_speed: 42.0,
                can_shoot: true,
                attack_chance: 0.02,
            },
            Self::Thing => SpeciesProfile {
                health: 10,
                melee_damage: 10,
                projectile_damage: 0,
                base_speed: 54.0,
                can_shoot: false,
                attack_chance: 0.0,
            },
        }
    }
}

/// Species-specific tuning shared by every monster of that species.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesProfile {
    /// Health assigned when the monster spawns.
    pub health: i32,
    /// Damage dealt to the player on contact.
    pub melee_damage: i32,
    /// Damage carried by the monster's projectiles.
    pub projectile_damage: i32,
    /// Pursuit speed in world units per second.
    pub base_speed: f32,
    /// Whether the species attacks from range instead of closing in.
    pub can_shoot: bool,
    /// Probability of firing on any tick spent attacking with the player in sight.
    pub attack_chance: f64,
}

/// Items that can be placed in a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Restores a little mana.
    Potion,
    /// Restores a lot of mana.
    Crystal,
    /// Restores a lot of health.
    Meat,
    /// Restores a little health.
    Apple,
    /// Adds a key to the player's inventory.
    Key(KeyColor),
    /// Decorative column that blocks movement.
    Column,
    /// Decorative barrel that blocks movement.
    Barrel,
}

impl ItemKind {
    /// Returns the effect applied when the item is collected.
    #[must_use]
    pub const fn effect(self) -> ItemEffect {
        match self {
            Self::Potion => ItemEffect::RestoreMana(25),
            Self::Crystal => ItemEffect::RestoreMana(50),
            Self::Meat => ItemEffect::RestoreHealth(25),
            Self::Apple => ItemEffect::RestoreHealth(10),
            Self::Key(color) => ItemEffect::GrantKey(color),
            Self::Column | Self::Barrel => ItemEffect::Furniture,
        }
    }

    /// Reports whether the item is furniture that behaves like a wall.
    #[must_use]
    pub const fn is_furniture(self) -> bool {
        matches!(self.effect(), ItemEffect::Furniture)
    }
}

/// Effect applied when the player collects an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemEffect {
    /// Adds the provided amount of mana.
    RestoreMana(i32),
    /// Adds the provided amount of health.
    RestoreHealth(i32),
    /// Adds a key of the provided colour.
    GrantKey(KeyColor),
    /// Never collected; occupies its cell with an invisible solid wall.
    Furniture,
}

/// Behaviour state of a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterBehavior {
    /// Wandering without having seen the player.
    Idle,
    /// Reserved roaming state; moves like [`MonsterBehavior::Idle`].
    Wander,
    /// Closing in on the player.
    Melee,
    /// Holding position and firing at the player.
    Attack,
    /// Backing away after a melee strike.
    Recoil {
        /// Ticks left before returning to idle.
        ticks_remaining: u32,
    },
    /// Cooling down after firing.
    DoNothing {
        /// Ticks left before returning to idle.
        ticks_remaining: u32,
    },
}

impl MonsterBehavior {
    /// Reports whether the behaviour is driven by a world-owned countdown.
    #[must_use]
    pub const fn is_cooldown(&self) -> bool {
        matches!(self, Self::Recoil { .. } | Self::DoNothing { .. })
    }

    /// Reports whether the monster is actively engaging the player.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        matches!(self, Self::Melee | Self::Attack)
    }
}

/// Faction that launched a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Launched by the player; hits monsters.
    Player,
    /// Launched by a monster; hits the player.
    Monster(MonsterId),
}

/// Visual kind of a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Magic bolt cast by the player.
    Zap,
    /// Bone shard thrown by a monster.
    Bone,
}

/// Reason a projectile left the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileRemoval {
    /// Struck a wall cell.
    HitWall,
    /// Struck a monster.
    HitMonster(MonsterId),
    /// Struck the player.
    HitPlayer,
    /// Exhausted its travel distance without hitting anything.
    Expired,
}

/// Named sound cues emitted for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A door or secret wall slid open.
    DoorOpen,
    /// The player used something that did not respond.
    Grunt,
    /// A key turned in a lock.
    Unlock,
    /// A switch was pressed.
    Switch,
    /// A secret was found.
    Secret,
    /// The player reached an exit.
    LevelExit,
    /// The player cast a projectile.
    Zap,
    /// A monster noticed the player.
    MonsterAlert,
    /// A monster threw a projectile.
    MonsterAttack,
    /// A monster was hurt.
    MonsterHit,
    /// A monster died.
    MonsterDeath,
    /// The player was hurt.
    Pain,
    /// The player died.
    PlayerDeath,
    /// Mana potion collected.
    PotionGet,
    /// Mana crystal collected.
    CrystalGet,
    /// Meat collected.
    Yum,
    /// Apple collected.
    Gulp,
    /// Key collected.
    KeyUp,
    /// One of four footstep variants.
    Footstep(u8),
}

impl SoundCue {
    /// Asset name the audio collaborator resolves the cue to.
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::DoorOpen => "door_open",
            Self::Grunt => "grunt",
            Self::Unlock => "unlock",
            Self::Switch => "switch",
            Self::Secret => "secret",
            Self::LevelExit => "level_exit",
            Self::Zap => "zap",
            Self::MonsterAlert => "monster_alert",
            Self::MonsterAttack => "monster_attack",
            Self::MonsterHit => "monster_hit",
            Self::MonsterDeath => "monster_death",
            Self::Pain => "pain",
            Self::PlayerDeath => "player_death",
            Self::PotionGet => "potion_get",
            Self::CrystalGet => "zip_up",
            Self::Yum => "yum",
            Self::Gulp => "gulp",
            Self::KeyUp => "key_up",
            Self::Footstep(0) => "footstep_0",
            Self::Footstep(1) => "footstep_1",
            Self::Footstep(2) => "footstep_2",
            Self::Footstep(_) => "footstep_3",
        }
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// World-space position.
    pub position: Vec2,
    /// Facing angle in `[0, 2π)`.
    pub angle: f32,
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Remaining health.
    pub health: i32,
    /// Remaining mana.
    pub mana: i32,
    /// Keys held by the player.
    pub keys: KeyRing,
    /// Cell currently occupied.
    pub cell: CellCoord,
}

/// Immutable representation of a single monster used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Identifier of the monster.
    pub id: MonsterId,
    /// Species of the monster.
    pub species: Species,
    /// World-space position.
    pub position: Vec2,
    /// Heading of travel in radians.
    pub heading: f32,
    /// Collision and hit radius in world units.
    pub radius: f32,
    /// Remaining health.
    pub health: i32,
    /// Active behaviour.
    pub behavior: MonsterBehavior,
    /// Whether the monster saw the player since last losing sight.
    pub has_seen_player: bool,
}

/// Read-only snapshot describing all monsters within the level.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single monster by identifier.
    #[must_use]
    pub fn get(&self, id: MonsterId) -> Option<&MonsterSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of monsters captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Image drawn for a billboard sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteImage {
    /// Living monster with its current animation frame.
    Monster {
        /// Species of the monster.
        species: Species,
        /// Animation frame, alternating between 0 and 1.
        frame: u8,
    },
    /// Corpse left behind by a monster.
    Corpse(Species),
    /// Projectile in flight.
    Projectile(ProjectileKind),
    /// Item or furniture resting in a cell.
    Item(ItemKind),
}

/// Render-side snapshot of a billboard sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSnapshot {
    /// World-space position.
    pub position: Vec2,
    /// Collision and hit radius in world units.
    pub radius: f32,
    /// Image to draw.
    pub image: SpriteImage,
    /// Opacity multiplier in `0.0..=1.0`.
    pub alpha: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn normalize_angle_wraps_into_positive_turn() {
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert!(normalize_angle(TAU) < TAU);
    }

    #[test]
    fn relative_angle_picks_shortest_rotation() {
        let behind_left = relative_angle(0.1, TAU - 0.1);
        assert!((behind_left - 0.2).abs() < 1e-5);

        let behind_right = relative_angle(TAU - 0.1, 0.1);
        assert!((behind_right + 0.2).abs() < 1e-5);

        assert!((relative_angle(PI, 0.0) - PI).abs() < 1e-5);
    }

    #[test]
    fn bearing_points_from_origin_to_target() {
        let angle = bearing(Vec2::new(1.0, 1.0), Vec2::new(1.0, 5.0));
        assert!((angle - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn cell_containing_floors_world_coordinates() {
        assert_eq!(
            CellCoord::containing(Vec2::new(63.9, 32.0), CELL_SIZE),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(CellCoord::containing(Vec2::new(-0.5, 4.0), CELL_SIZE), None);
        assert_eq!(
            CellCoord::new(2, 3).center(CELL_SIZE),
            Vec2::new(80.0, 112.0)
        );
    }

    #[test]
    fn key_ring_take_requires_matching_key() {
        let mut keys = KeyRing::default();
        assert!(!keys.take(KeyColor::Red));

        keys.add(KeyColor::Red);
        keys.add(KeyColor::Red);
        assert_eq!(keys.count(KeyColor::Red), 2);
        assert_eq!(keys.count(KeyColor::Blue), 0);

        assert!(keys.take(KeyColor::Red));
        assert_eq!(keys.count(KeyColor::Red), 1);
    }

    #[test]
    fn furniture_items_never_restore_resources() {
        assert!(ItemKind::Barrel.is_furniture());
        assert!(ItemKind::Column.is_furniture());
        assert!(!ItemKind::Potion.is_furniture());
        assert_eq!(ItemKind::Potion.effect(), ItemEffect::RestoreMana(25));
        assert_eq!(
            ItemKind::Key(KeyColor::Green).effect(),
            ItemEffect::GrantKey(KeyColor::Green)
        );
    }

    #[test]
    fn only_skeletons_attack_from_range() {
        assert!(Species::Skeleton.profile().can_shoot);
        assert!(!Species::Ghoul.profile().can_shoot);
        assert!(!Species::Thing.profile().can_shoot);
    }

    #[test]
    fn move_direction_offsets_are_perpendicular_for_strafing() {
        assert_eq!(MoveDirection::Forward.heading_offset(), 0.0);
        assert_eq!(MoveDirection::Backward.heading_offset(), PI);
        assert_eq!(
            MoveDirection::StrafeLeft.heading_offset(),
            -MoveDirection::StrafeRight.heading_offset()
        );
    }

    #[test]
    fn footstep_variants_map_to_distinct_assets() {
        let names: Vec<_> = (0..4)
            .map(|variant| SoundCue::Footstep(variant).asset_name())
            .collect();
        assert_eq!(
            names,
            vec!["footstep_0", "footstep_1", "footstep_2", "footstep_3"]
        );
    }

    #[test]
    fn monster_view_sorts_and_finds_by_id() {
        let snapshot = |index| MonsterSnapshot {
            id: MonsterId::new(SlotKey::new(index, 0)),
            species: Species::Thing,
            position: Vec2::ZERO,
            heading: 0.0,
            radius: 1.0,
            health: 10,
            behavior: MonsterBehavior::Idle,
            has_seen_player: false,
        };
        let view = MonsterView::from_snapshots(vec![snapshot(4), snapshot(1), snapshot(2)]);

        let order: Vec<u32> = view.iter().map(|monster| monster.id.key().index()).collect();
        assert_eq!(order, vec![1, 2, 4]);
        assert!(view.get(MonsterId::new(SlotKey::new(2, 0))).is_some());
        assert!(view.get(MonsterId::new(SlotKey::new(3, 0))).is_none());
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&MonsterId::new(SlotKey::new(7, 3)));
        assert_round_trip(&CellCoord::new(5, 9));
        assert_round_trip(&TextureId::new(4));
        assert_round_trip(&MonsterBehavior::Recoil { ticks_remaining: 12 });
    }

    #[test]
    fn level_descriptor_round_trips_through_bincode() {
        let level = LevelDescriptor::from_ascii("vault", &["111", "1*1", "111"]);
        assert_round_trip(&level);
    }
}
