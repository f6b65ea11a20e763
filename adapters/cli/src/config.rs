use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crypt_caster_core::{LevelDescriptor, CELL_SIZE};
use crypt_caster_world::Config as WorldConfig;
use serde::Deserialize;

/// Optional engine tuning read from a TOML file.
///
/// Every field is optional; missing values keep the built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EngineConfigFile {
    pub(crate) fov_degrees: Option<f32>,
    pub(crate) view_distance_cells: Option<f32>,
    pub(crate) ray_step: Option<f32>,
    pub(crate) player_health: Option<i32>,
    pub(crate) player_mana: Option<i32>,
    pub(crate) attack_cost: Option<i32>,
    pub(crate) seed: Option<u64>,
}

impl EngineConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = read(path)?;
        Self::parse(&text, path)
    }

    pub(crate) fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlays the file's values on top of `config`.
    pub(crate) fn apply(&self, config: &mut WorldConfig) -> Result<(), ConfigError> {
        if let Some(degrees) = self.fov_degrees {
            if !(degrees.is_finite() && degrees > 0.0 && degrees < 180.0) {
                return Err(ConfigError::invalid("fov_degrees", degrees));
            }
            config.fov = degrees.to_radians();
        }
        if let Some(cells) = self.view_distance_cells {
            if !(cells.is_finite() && cells > 0.0) {
                return Err(ConfigError::invalid("view_distance_cells", cells));
            }
            config.view_distance = cells * CELL_SIZE;
            config.projectile_max_travel = config.view_distance * 2.0;
        }
        if let Some(step) = self.ray_step {
            if !(step.is_finite() && step > 0.0) {
                return Err(ConfigError::invalid("ray_step", step));
            }
            config.ray_step = step;
        }
        if let Some(health) = self.player_health {
            if health <= 0 {
                return Err(ConfigError::invalid("player_health", health));
            }
            config.player_health = health;
        }
        if let Some(mana) = self.player_mana {
            config.player_mana = mana.max(0);
        }
        if let Some(cost) = self.attack_cost {
            config.attack_cost = cost.max(0);
        }
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        Ok(())
    }
}

/// Reads a level descriptor serialised as TOML.
pub(crate) fn load_level(path: &Path) -> Result<LevelDescriptor, ConfigError> {
    let text = read(path)?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors raised while reading configuration and level files.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value} for {field}")]
    Invalid { field: &'static str, value: String },
}

impl ConfigError {
    fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::Invalid {
            field,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_the_listed_fields() {
        let file = EngineConfigFile::parse(
            "fov_degrees = 90.0\nview_distance_cells = 8.0\n",
            Path::new("engine.toml"),
        )
        .expect("valid config");
        let mut config = WorldConfig::default();
        file.apply(&mut config).expect("values in range");

        assert!((config.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(config.view_distance, 256.0);
        assert_eq!(config.projectile_max_travel, 512.0);
        assert_eq!(config.player_health, WorldConfig::default().player_health);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = EngineConfigFile::parse("fog = true\n", Path::new("engine.toml"))
            .expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let file = EngineConfigFile {
            ray_step: Some(0.0),
            ..EngineConfigFile::default()
        };
        let error = file
            .apply(&mut WorldConfig::default())
            .expect_err("zero step");
        assert_eq!(error.to_string(), "invalid value 0 for ray_step");
    }

    #[test]
    fn levels_round_trip_through_toml() {
        let level = crate::demo::demo_level();
        let text = toml::to_string(&level).expect("serialise level");
        let parsed: LevelDescriptor = toml::from_str(&text).expect("parse level");
        assert_eq!(parsed, level);
    }
}
