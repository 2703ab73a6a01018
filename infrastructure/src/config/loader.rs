//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["conductor.toml", ".conductor.toml"];

/// Plain environment variables understood for compatibility with other
/// OpenAI/MCP tooling, mapped to their config keys.
const PLAIN_ENV_VARS: [(&str, &str); 3] = [
    ("OPENAI_BASE_URL", "llm.base_url"),
    ("OPENAI_MODEL", "llm.model"),
    ("MCP_SERVER", "mcp.server"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CONDUCTOR_*` environment variables (`__` separates sections,
    ///    e.g. `CONDUCTOR_LLM__MODEL`)
    /// 2. `OPENAI_BASE_URL`, `OPENAI_MODEL`, `MCP_SERVER`
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./conductor.toml` or `./.conductor.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/conductor/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path)
            .and_then(|figment| figment.extract())
            .map_err(Box::new)
    }

    /// The merged figment, before extraction
    ///
    /// Fails if an explicit config path was given and does not exist.
    pub fn figment(config_path: Option<&PathBuf>) -> Result<Figment, figment::Error> {
        let mut figment = Self::file_figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )?;

        let plain = Env::raw()
            .only(&PLAIN_ENV_VARS.map(|(var, _)| var))
            .map(|key| {
                let key = key.as_str().to_ascii_uppercase();
                PLAIN_ENV_VARS
                    .iter()
                    .find(|(var, _)| *var == key)
                    .map(|(_, path)| *path)
                    .unwrap_or("unused")
                    .into()
            });
        figment = figment.merge(plain);

        Ok(figment.merge(Env::prefixed("CONDUCTOR_").split("__")))
    }

    /// Defaults plus whichever of the given files exist, in priority order
    fn file_figment(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Figment, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // `Toml::file` skips missing files; a mistyped explicit path must not
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/conductor/config.toml if set,
    /// otherwise the platform config dir equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("conductor").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] CONDUCTOR_* (e.g. CONDUCTOR_LLM__MODEL)");
        println!("  [ENV  ] OPENAI_BASE_URL, OPENAI_MODEL, MCP_SERVER");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        // Project config
        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./conductor.toml or ./.conductor.toml");
        }

        // Global config
        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
