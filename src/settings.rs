//! # Cockpit Settings
//!
//! Settings are layered the usual way:
//!
//! 1. `config/default.toml`
//! 2. `config/{APP_ENV}.toml` when it exists (`APP_ENV` defaults to `local`)
//! 3. `APP_*` environment variables, e.g. `APP_DEFAULT_PAGE_SIZE=16` or
//!    `APP_PAGE_SIZES=10,20,50`
//!
//! The result is validated before any controller is created.

use list_framework::{ControllerSettings, Locale, PageSizes};
use serde::Deserialize;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Error loading settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("At least one page size must be offered")]
    NoPageSizes,

    #[error("Page sizes must be positive")]
    ZeroPageSize,

    #[error("Default page size {0} is not one of the offered sizes")]
    DefaultNotOffered(u32),

    #[error("Controller buffer size must be positive")]
    ZeroBuffer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CockpitSettings {
    pub page_sizes: Vec<u32>,
    pub default_page_size: u32,
    pub default_locale: String,
    pub buffer_size: usize,
}

impl Default for CockpitSettings {
    fn default() -> Self {
        Self {
            page_sizes: vec![8, 16, 24],
            default_page_size: 8,
            default_locale: "en".to_string(),
            buffer_size: 32,
        }
    }
}

impl CockpitSettings {
    /// Loads settings from `config/` and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
        Self::load_from("config", &app_env)
    }

    pub fn load_from(dir: &str, app_env: &str) -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")))
            .add_source(config::File::with_name(&format!("{dir}/{app_env}")).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("page_sizes"),
            )
            .build()?
            .try_deserialize::<CockpitSettings>()?;

        settings.validate()?;
        tracing::debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.page_sizes.is_empty() {
            return Err(SettingsError::NoPageSizes);
        }
        if self.page_sizes.contains(&0) {
            return Err(SettingsError::ZeroPageSize);
        }
        if !self.page_sizes.contains(&self.default_page_size) {
            return Err(SettingsError::DefaultNotOffered(self.default_page_size));
        }
        if self.buffer_size == 0 {
            return Err(SettingsError::ZeroBuffer);
        }
        Ok(())
    }

    pub fn controller(&self) -> ControllerSettings {
        ControllerSettings {
            page_sizes: PageSizes::new(self.page_sizes.clone()),
            default_page_size: self.default_page_size,
            buffer_size: self.buffer_size,
        }
    }

    pub fn locale(&self) -> Locale {
        Locale::new(self.default_locale.clone())
    }
}
