//! Layered configuration loading.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. Global config file (`<config dir>/prd-studio/config.toml`)
//! 3. Project config file (`prd-studio.toml` or `.prd-studio.toml`)
//! 4. `PRD_STUDIO_*` environment variables
//! 5. Bare environment overrides (`GEMINI_API_KEY`, `MODEL_NAME`,
//!    `ALLOWED_ORIGINS`)

use super::settings::{parse_origins, Settings};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::PathBuf;
use tracing::{debug, warn};

const ENV_PREFIX: &str = "PRD_STUDIO_";
const PROJECT_FILES: [&str; 2] = ["prd-studio.toml", ".prd-studio.toml"];

/// Loads [`Settings`] from files and the environment.
pub struct ConfigLoader {
    project_dir: PathBuf,
    global_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            global_file: dirs::config_dir().map(|d| d.join("prd-studio").join("config.toml")),
        }
    }

    /// Resolve project config files relative to `dir` instead of the
    /// current directory.
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Override the global config file location. `None` disables the
    /// global layer entirely.
    pub fn with_global_file(mut self, path: Option<PathBuf>) -> Self {
        self.global_file = path;
        self
    }

    pub fn load(&self) -> Result<Settings, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        if let Some(global) = &self.global_file {
            if global.exists() {
                debug!(path = %global.display(), "Loading global config");
                figment = figment.merge(Toml::file(global));
            }
        }

        if let Some(project) = self.find_project_file() {
            debug!(path = %project.display(), "Loading project config");
            figment = figment.merge(Toml::file(project));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let mut settings: Settings = figment.extract()?;
        apply_bare_env_overrides(&mut settings);

        for issue in settings.validate() {
            warn!("Config: {issue}");
        }
        Ok(settings)
    }

    fn find_project_file(&self) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|p| p.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Un-prefixed environment variables kept for compatibility with the
/// hosted deployment. They win over every other layer.
fn apply_bare_env_overrides(settings: &mut Settings) {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            settings.api_key = key;
        }
    }
    if let Ok(model) = std::env::var("MODEL_NAME") {
        if !model.trim().is_empty() {
            settings.model = model;
        }
    }
    if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
        settings.allowed_origins = parse_origins(&origins);
    }
}
