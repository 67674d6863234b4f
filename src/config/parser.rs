use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The `DATABASE_URL` environment variable, when set and non-empty, overrides
/// the `store.database-url` value from the file. The merged configuration is
/// validated before being returned.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docglean::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Allowed domain: {}", config.site.allowed_domain);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    // Environment override for the store connection string
    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        if !database_url.is_empty() {
            config.store.database_url = database_url;
        }
    }

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}
