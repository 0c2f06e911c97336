use std::path::PathBuf;

use crate::resolve::Field;

/// 错误分类：作者可修复 / 集成缺陷 / 环境问题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    MalformedInput,
    Integration,
    Io,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("front matter of {path} is not terminated by a closing delimiter")]
    UnterminatedFrontMatter { path: PathBuf },

    #[error("malformed JSON front matter in {path}: {detail}")]
    MalformedJson { path: PathBuf, detail: String },

    #[error("malformed YAML front matter in {path}: {detail}")]
    MalformedYaml { path: PathBuf, detail: String },

    #[error("invalid `{field}` value {value:?} in front matter of {path}")]
    InvalidTimestamp {
        field: Field,
        value: String,
        path: PathBuf,
    },

    #[error("invalid `{field}` timestamp {value:?} from git history of {path}")]
    InvalidHistoryTimestamp {
        field: Field,
        value: String,
        path: PathBuf,
    },

    #[error("unknown timezone {timezone:?} while resolving {path}")]
    UnknownTimezone { timezone: String, path: PathBuf },

    /// 上游 pipeline 推导的默认值与 front matter 不一致
    #[error(
        "`{field}` of {path}: front matter gives {parsed}, but the pipeline default is {default}"
    )]
    DefaultMismatch {
        field: Field,
        parsed: String,
        default: String,
        path: PathBuf,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::DefaultMismatch { .. } => ErrorClass::Integration,
            Error::Io { .. } | Error::Config(_) => ErrorClass::Io,
            _ => ErrorClass::MalformedInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
