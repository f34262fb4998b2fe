use crate::config::AlignConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

/// Environment variable prefix, e.g. `NEWS_ALIGN_CLEAN__LOWERCASE=true`.
pub const ENV_PREFIX: &str = "NEWS_ALIGN_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, TOML, JSON and environment variables.
    ///
    /// Missing files are skipped, so an empty working directory yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source exists but cannot be parsed.
    pub fn load() -> Result<AlignConfig> {
        let config: AlignConfig = Self::base()
            .merge(Toml::file("config/Align.toml"))
            .join(Json::file("config/Align.json"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to load alignment configuration")?;

        tracing::debug!(lowercase = config.clean.lowercase, "Loaded alignment configuration");
        Ok(config)
    }

    /// Loads configuration with a profile overlay (`config/Align.{profile}.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source exists but cannot be parsed.
    pub fn load_with_profile(profile: &str) -> Result<AlignConfig> {
        let config: AlignConfig = Self::base()
            .merge(Toml::file("config/Align.toml"))
            .merge(Toml::file(format!("config/Align.{profile}.toml")))
            .join(Json::file("config/Align.json"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load alignment configuration for profile {profile}"))?;

        tracing::debug!(profile, "Loaded alignment configuration");
        Ok(config)
    }

    /// Loads configuration from an explicit TOML file plus the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed into an [`AlignConfig`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<AlignConfig> {
        let path = path.as_ref();
        let config: AlignConfig = Self::base()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Loaded alignment configuration");
        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(figment::providers::Serialized::defaults(AlignConfig::default()))
    }
}
