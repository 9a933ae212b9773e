//! # Register Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     --user user_cashier_01                                             │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CAISSE_ESTABLISHMENT_NAME="Hôtel du Parc"                          │
//! │     CAISSE_POINT_OF_SALE="BAR"                                         │
//! │     CAISSE_CURRENCY=MAD                                                │
//! │     CAISSE_SESSION_USER=user_cashier_01                                │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else register.toml in the platform config dir     │
//! │     ~/.config/caisse-pos/register.toml (Linux)                         │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! session_user = "user_cashier_01"
//! currency = "MAD"
//!
//! [establishment]
//! name = "Hôtel du Parc"
//! point_of_sale_name = "BAR PISCINE"
//! thank_you_message = "Merci et à bientôt !"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use caisse_core::{Catalog, EstablishmentDetails, User};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Unknown session user: {0}")]
    UnknownUser(String),

    #[error("The catalog has no users")]
    NoUsers,
}

// =============================================================================
// Register Config
// =============================================================================

/// Settings of one register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Receipt header/footer and currency.
    pub establishment: EstablishmentDetails,

    /// Currency code looked up in the catalog; overrides the currency of
    /// `establishment` when set.
    pub currency: Option<String>,

    /// User id the register runs as. Defaults to the first admin.
    pub session_user: Option<String>,
}

impl RegisterConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// An explicit `config_path` must exist. The default path is skipped
    /// when missing.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading register config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `CAISSE_*` environment variables.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("CAISSE_ESTABLISHMENT_NAME") {
            debug!(name = %name, "Overriding establishment name from environment");
            self.establishment.name = name;
        }

        if let Some(pos) = var("CAISSE_POINT_OF_SALE") {
            self.establishment.point_of_sale_name = pos;
        }

        if let Some(code) = var("CAISSE_CURRENCY") {
            debug!(currency = %code, "Overriding currency from environment");
            self.currency = Some(code);
        }

        if let Some(user) = var("CAISSE_SESSION_USER") {
            self.session_user = Some(user);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "caisse", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Resolution against the catalog
    // =========================================================================

    /// Establishment details with the configured currency applied.
    pub fn resolve_establishment(
        &self,
        catalog: &Catalog,
    ) -> Result<EstablishmentDetails, ConfigError> {
        let mut establishment = self.establishment.clone();
        if let Some(code) = &self.currency {
            establishment.currency = catalog
                .currency(code)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownCurrency(code.clone()))?;
        }
        Ok(establishment)
    }

    /// The session user: `override_id` first, then the configured user,
    /// then the catalog default.
    pub fn resolve_user(
        &self,
        catalog: &Catalog,
        override_id: Option<&str>,
    ) -> Result<User, ConfigError> {
        match override_id.or(self.session_user.as_deref()) {
            Some(id) => catalog
                .seller(id)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownUser(id.to_string())),
            None => catalog
                .default_session_user()
                .cloned()
                .ok_or(ConfigError::NoUsers),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use caisse_core::UserRole;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RegisterConfig::default();
        assert_eq!(config.establishment, EstablishmentDetails::default());
        assert!(config.currency.is_none());
        assert!(config.session_user.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RegisterConfig::from_toml(
            r#"
            session_user = "user_cashier_01"

            [establishment]
            name = "Hôtel du Parc"
            "#,
        )
        .unwrap();

        assert_eq!(config.establishment.name, "Hôtel du Parc");
        assert_eq!(
            config.establishment.thank_you_message,
            EstablishmentDetails::default().thank_you_message
        );
        assert_eq!(config.session_user.as_deref(), Some("user_cashier_01"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = RegisterConfig::from_toml("session_user = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CAISSE_ESTABLISHMENT_NAME", "Riad Zitoun"),
            ("CAISSE_POINT_OF_SALE", "BAR"),
            ("CAISSE_CURRENCY", "mad"),
        ]
        .into_iter()
        .collect();

        let mut config = RegisterConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.establishment.name, "Riad Zitoun");
        assert_eq!(config.establishment.point_of_sale_name, "BAR");
        assert_eq!(config.currency.as_deref(), Some("mad"));
        assert!(config.session_user.is_none());
    }

    #[test]
    fn test_missing_explicit_path() {
        let path = PathBuf::from("/definitely/not/here/register.toml");
        let err = RegisterConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_resolve_currency() {
        let catalog = Catalog::builtin();
        let config = RegisterConfig {
            currency: Some("MAD".to_string()),
            ..RegisterConfig::default()
        };
        let establishment = config.resolve_establishment(&catalog).unwrap();
        assert_eq!(establishment.currency.symbol, "DH");

        let config = RegisterConfig {
            currency: Some("XYZ".to_string()),
            ..RegisterConfig::default()
        };
        assert!(matches!(
            config.resolve_establishment(&catalog),
            Err(ConfigError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_resolve_user() {
        let catalog = Catalog::builtin();
        let config = RegisterConfig::default();

        assert_eq!(config.resolve_user(&catalog, None).unwrap().role, UserRole::Admin);
        assert_eq!(
            config
                .resolve_user(&catalog, Some("user_cashier_01"))
                .unwrap()
                .name,
            "Marie"
        );
        assert!(matches!(
            config.resolve_user(&catalog, Some("ghost")),
            Err(ConfigError::UnknownUser(_))
        ));
    }
}
