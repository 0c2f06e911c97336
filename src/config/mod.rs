#[allow(clippy::module_inception)]
mod config;
pub use config::Config;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// 默认配置文件名
pub const DEFAULT_CONFIG: &str = "gitstamp.toml";

/// 读取配置。`explicit` 为 false 时文件不存在则使用默认值。
///
/// 不做 finalize：调用方应用命令行覆盖后再调用 [`Config::finalize`]。
pub fn load(path: &Path, explicit: bool) -> Result<Config> {
    let cfg = if path.exists() {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        from_str(&text)?
    } else if explicit {
        return Err(Error::Config(format!("config file {} not found", path.display())));
    } else {
        Config::default()
    };
    Ok(cfg)
}

/// 从 TOML 文本解析（不做 finalize）
pub fn from_str(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| Error::Config(format!("gitstamp.toml parse error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolveMode;

    #[test]
    fn empty_file_uses_defaults() {
        let mut cfg = from_str("").unwrap();
        cfg.finalize().unwrap();
        assert_eq!(cfg.timezone, "UTC");
        assert_eq!(cfg.mode, ResolveMode::Precedence);
        assert_eq!(cfg.git, "git");
        assert!(cfg.accepts_extension("md"));
        assert!(cfg.accepts_extension("MARKDOWN"));
        assert!(!cfg.accepts_extension("html"));
    }

    #[test]
    fn full_file() {
        let mut cfg = from_str(
            r#"
timezone = "Asia/Shanghai"
source_dir = "source"
extensions = [".md", "HTML"]
mode = "earliest"
git = "/usr/bin/git"
"#,
        )
        .unwrap();
        cfg.finalize().unwrap();
        assert_eq!(cfg.timezone, "Asia/Shanghai");
        assert_eq!(cfg.source_dir, std::path::PathBuf::from("source"));
        assert_eq!(cfg.extensions, vec!["md".to_string(), "html".to_string()]);
        assert_eq!(cfg.mode, ResolveMode::Earliest);
    }

    #[test]
    fn bad_timezone_fails_finalize() {
        let mut cfg = from_str("timezone = \"Nowhere/City\"").unwrap();
        assert!(matches!(cfg.finalize(), Err(Error::Config(_))));
    }

    #[test]
    fn override_can_replace_bad_timezone_before_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG);
        fs::write(&path, "timezone = \"Nowhere/City\"\n").unwrap();

        let mut cfg = load(&path, true).unwrap();
        assert_eq!(cfg.timezone, "Nowhere/City");
        cfg.timezone = "Europe/Berlin".into();
        cfg.finalize().unwrap();
        assert_eq!(cfg.timezone, "Europe/Berlin");
    }

    #[test]
    fn missing_files() {
        let p = Path::new("/nonexistent/gitstamp.toml");
        assert!(load(p, false).is_ok());
        assert!(matches!(load(p, true), Err(Error::Config(_))));
    }
}
