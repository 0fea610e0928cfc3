use crate::error::Result;
use crate::utils::constants::{
    CONFIG_FILE, ENV_PREFIX, MARKET_DIR, MET_DIR, MET_VARIABLES_DIR, QUALITY_DIR,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the dashboard's data directories live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    pub data_root: PathBuf,
    pub met_dir: String,
    pub met_variables_dir: String,
    pub market_dir: String,
    pub quality_dir: String,
    pub split_output_dir: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            met_dir: MET_DIR.to_string(),
            met_variables_dir: MET_VARIABLES_DIR.to_string(),
            market_dir: MARKET_DIR.to_string(),
            quality_dir: QUALITY_DIR.to_string(),
            split_output_dir: MET_DIR.to_string(),
        }
    }
}

impl AtlasConfig {
    /// Defaults, then `basmati-atlas.toml` (or `path`), then `BASMATI_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("data_root", defaults.data_root.to_string_lossy().to_string())?
            .set_default("met_dir", defaults.met_dir)?
            .set_default("met_variables_dir", defaults.met_variables_dir)?
            .set_default("market_dir", defaults.market_dir)?
            .set_default("quality_dir", defaults.quality_dir)?
            .set_default("split_output_dir", defaults.split_output_dir)?;

        builder = match path {
            Some(p) => builder.add_source(File::from(p.to_path_buf()).required(true)),
            None => builder.add_source(File::with_name(CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn met_path(&self) -> PathBuf {
        self.data_root.join(&self.met_dir)
    }

    pub fn met_variables_path(&self) -> PathBuf {
        self.data_root.join(&self.met_variables_dir)
    }

    pub fn market_path(&self) -> PathBuf {
        self.data_root.join(&self.market_dir)
    }

    pub fn quality_path(&self) -> PathBuf {
        self.data_root.join(&self.quality_dir)
    }

    pub fn split_output_path(&self) -> PathBuf {
        self.data_root.join(&self.split_output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = AtlasConfig::default();
        assert_eq!(config.met_path(), PathBuf::from("./Met"));
        assert_eq!(
            config.met_variables_path(),
            PathBuf::from("./Meteorological Variables")
        );
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "data_root = \"/srv/basmati\"")?;
        writeln!(file, "quality_dir = \"QualityImages\"")?;

        let config = AtlasConfig::load(Some(file.path()))?;

        assert_eq!(config.quality_path(), PathBuf::from("/srv/basmati/QualityImages"));
        assert_eq!(config.market_path(), PathBuf::from("/srv/basmati/Market"));
        Ok(())
    }
}
