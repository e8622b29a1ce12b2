//! Configuration file loading and parsing

use crate::error::{Error, Result};
use crate::types::ObsgenConfigFile;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["obsgen.yaml", "obsgen.yml"];

/// Loaded obsgen configuration
#[derive(Debug, Clone)]
pub struct ObsgenConfig {
    /// The parsed configuration
    pub config: ObsgenConfigFile,

    /// Path to the configuration file
    pub config_path: Utf8PathBuf,
}

impl ObsgenConfig {
    /// Load configuration from the specified path or search for it
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = if let Some(p) = path {
            let content = fs::read_to_string(p).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::config_not_found(p.as_str())
                } else {
                    Error::Io(e)
                }
            })?;
            (p.to_owned(), content)
        } else {
            Self::find_config()?
        };

        debug!("Loading configuration from {}", config_path);
        let config = Self::parse(&content)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Parse and validate obsgen.yaml content
    pub fn parse(content: &str) -> Result<ObsgenConfigFile> {
        let config: ObsgenConfigFile = serde_yaml_ng::from_str(content)?;

        if config.namespace.trim().is_empty() {
            return Err(Error::missing_field("namespace"));
        }
        if config.pull_secret.trim().is_empty() {
            return Err(Error::invalid_config("pullSecret must not be empty"));
        }
        if config.objstore_secret.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(Error::invalid_config(
                "objstoreSecret must not be empty; omit it to keep the default objstore env",
            ));
        }

        Ok(config)
    }

    /// Find configuration file in current directory or parent directories
    fn find_config() -> Result<(Utf8PathBuf, String)> {
        let cwd = std::env::current_dir().map_err(Error::Io)?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        let mut current = cwd.as_path();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok((path, content));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(
            "obsgen.yaml (searched current and parent directories)",
        ))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(&self.config)?)
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }
}

/// Render a default obsgen.yaml for `namespace`
pub fn generate_default_config(namespace: &str) -> Result<String> {
    let config = ObsgenConfigFile::new(namespace);
    let body = serde_yaml_ng::to_string(&config)?;
    Ok(format!(
        "# obsgen post-processing configuration\n\
         # Set objstoreSecret to replace the default OBJSTORE_CONFIG of Thanos containers.\n\
         {body}"
    ))
}
