use crate::domain::Credentials;
use crate::error::{Result, ScraperError};
use ini::Ini;
use std::path::{Path, PathBuf};

/// Name of the INI section holding all keys
const SECTION: &str = "configuration";

/// Local configuration, read from an SLTrack.ini-style file:
///
/// ```ini
/// [configuration]
/// username = XXX
/// password = YYY
/// output = ZZZ
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    /// Path the raw catalog snapshot is archived to after a successful fetch
    pub output: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = Ini::load_from_file(path).map_err(|e| {
            ScraperError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let section = file.section(Some(SECTION)).ok_or_else(|| {
            ScraperError::Config(format!(
                "missing [{}] section in '{}'",
                SECTION,
                path.display()
            ))
        })?;

        let get = |key: &str| -> Result<String> {
            section
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| ScraperError::Config(format!("missing key '{key}' in [{SECTION}]")))
        };

        Ok(Self {
            username: get("username")?,
            password: get("password")?,
            output: PathBuf::from(get("output")?),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            identity: self.username.clone(),
            password: self.password.clone(),
        }
    }
}
