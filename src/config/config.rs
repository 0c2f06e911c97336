use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolve::ResolveMode;

// ================= gitstamp.toml =================
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// IANA 时区名，用于解释不带时区的时间
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// 相对路径的基准目录
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub mode: ResolveMode,
    #[serde(default = "default_git")]
    pub git: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            source_dir: default_source_dir(),
            extensions: default_extensions(),
            mode: ResolveMode::default(),
            git: default_git(),
        }
    }
}

impl Config {
    /// 加载完成后规整字段并校验时区
    pub fn finalize(&mut self) -> Result<()> {
        self.timezone = self.timezone.trim().to_string();
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| Error::Config(format!("unknown timezone {:?}", self.timezone)))?;

        self.extensions = self
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        if self.git.trim().is_empty() {
            self.git = default_git();
        }
        Ok(())
    }

    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_source_dir() -> PathBuf {
    ".".into()
}

fn default_extensions() -> Vec<String> {
    vec!["md".into(), "markdown".into()]
}

fn default_git() -> String {
    "git".into()
}
