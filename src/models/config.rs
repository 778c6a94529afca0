use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default directory for stored image blobs.
pub const DEFAULT_IMAGES_ROOT: &str = "wwwroot/images";
/// Default lifetime of cached category listings, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Configuration options specific to the catalog service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// SQLite database path or URL.
    pub database_url: String,
    /// Directory holding uploaded images.
    pub images_root: PathBuf,
    /// Time-to-live of the products-by-category cache.
    pub cache_ttl_secs: u64,
}

impl ServerConfig {
    /// Loads configuration from an optional YAML file overlaid with
    /// `CATALOG_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_sources(path, Environment::with_prefix("CATALOG").try_parsing(true))
    }

    /// Defaults, then the file at `path` when it exists, then `env`.
    fn from_sources(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("database_url", "app.db")?
            .set_default("images_root", DEFAULT_IMAGES_ROOT)?
            .set_default("cache_ttl_secs", DEFAULT_CACHE_TTL_SECS)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;
    use std::io::Write;

    /// Environment source fed from `vars` instead of the process environment.
    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("CATALOG")
            .try_parsing(true)
            .source(Some(vars))
    }

    #[test]
    fn reads_values_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "database_url: catalog-test.db").unwrap();
        writeln!(file, "images_root: /tmp/catalog-images").unwrap();
        writeln!(file, "cache_ttl_secs: 30").unwrap();

        let config = ServerConfig::from_sources(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.database_url, "catalog-test.db");
        assert_eq!(config.images_root, PathBuf::from("/tmp/catalog-images"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            ServerConfig::from_sources(Some(Path::new("does-not-exist.yaml")), env(&[])).unwrap();
        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.images_root, PathBuf::from(DEFAULT_IMAGES_ROOT));
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "cache_ttl_secs: 30").unwrap();

        let config = ServerConfig::from_sources(
            Some(file.path()),
            env(&[("CATALOG_CACHE_TTL_SECS", "42")]),
        )
        .unwrap();
        assert_eq!(config.cache_ttl_secs, 42);
    }
}
