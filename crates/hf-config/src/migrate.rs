//! Schema migration framework.

use crate::ConfigError;
use crate::schema::RunConfig;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut config: RunConfig) -> Result<RunConfig, ConfigError> {
    while config.version < LATEST_VERSION {
        config = migrate_one_version(config)?;
    }
    Ok(config)
}

fn migrate_one_version(config: RunConfig) -> Result<RunConfig, ConfigError> {
    match config.version {
        0 => migrate_v0_to_v1(config),
        v => Err(ConfigError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// v0 predates the explicit coupling block; serde defaults already fill it
/// in, so only the version stamp moves.
fn migrate_v0_to_v1(mut config: RunConfig) -> Result<RunConfig, ConfigError> {
    config.version = 1;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_latest_is_noop() {
        let config = RunConfig::example();
        assert_eq!(config.version, LATEST_VERSION);
        let migrated = migrate_to_latest(config.clone()).unwrap();
        assert_eq!(migrated, config);
    }

    #[test]
    fn migrate_v0_bumps_version() {
        let mut config = RunConfig::example();
        config.version = 0;
        let migrated = migrate_to_latest(config).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
    }
}
