//! `date` / `updated` 的决策：front matter > 版本历史 > pipeline 默认值。

pub mod parse;

use std::fmt;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::front_matter;
use crate::history::{HistoryOracle, WorkTreeState};
use crate::report::Reporter;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Updated,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Updated => "updated",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 历史值与默认值的取舍方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// 有历史就用历史
    #[default]
    Precedence,
    /// 历史值只在早于默认值时才替换
    Earliest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    FrontMatter,
    History,
    Default,
    CleanTreeOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub at: DateTime<Utc>,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub date: Resolved,
    pub updated: Resolved,
}

/// 单次调用的输入，由宿主 pipeline 持有。
///
/// 调用方必须保证：front matter 中存在 `date` / `updated` 时，
/// 对应的默认值是用同一解析规则从 front matter 推导出的同一时刻。
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub raw: &'a str,
    pub path: &'a Path,
    pub default_date: DateTime<FixedOffset>,
    pub default_updated: DateTime<FixedOffset>,
    pub timezone: &'a str,
}

pub fn parse_timezone(name: &str, path: &Path) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| Error::UnknownTimezone {
        timezone: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// 按优先级决定单个字段。
///
/// front matter 值必须与默认值是同一时刻，否则说明上游推导有误。
pub fn resolve(
    field: Field,
    default: DateTime<FixedOffset>,
    front_matter: Option<&Value>,
    history: Option<&str>,
    tz: Tz,
    path: &Path,
    mode: ResolveMode,
) -> Result<Resolved> {
    let default = default.with_timezone(&Utc);

    if let Some(raw) = front_matter.filter(|v| !v.is_null()) {
        let at = parse::parse_value(raw, tz).ok_or_else(|| Error::InvalidTimestamp {
            field,
            value: parse::value_text(raw),
            path: path.to_path_buf(),
        })?;
        if at != default {
            return Err(Error::DefaultMismatch {
                field,
                parsed: at.to_rfc3339(),
                default: default.to_rfc3339(),
                path: path.to_path_buf(),
            });
        }
        return Ok(Resolved {
            at,
            source: Source::FrontMatter,
        });
    }

    if let Some(raw) = history {
        let at = parse::parse_text(raw, tz).ok_or_else(|| Error::InvalidHistoryTimestamp {
            field,
            value: raw.to_string(),
            path: path.to_path_buf(),
        })?;
        if mode == ResolveMode::Precedence || at < default {
            return Ok(Resolved {
                at,
                source: Source::History,
            });
        }
    }

    Ok(Resolved {
        at: default,
        source: Source::Default,
    })
}

pub struct Resolver<'a> {
    oracle: &'a dyn HistoryOracle,
    reporter: &'a dyn Reporter,
    mode: ResolveMode,
}

impl<'a> Resolver<'a> {
    pub fn new(oracle: &'a dyn HistoryOracle, reporter: &'a dyn Reporter) -> Self {
        Self {
            oracle,
            reporter,
            mode: ResolveMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// 解析一篇文档的 `date` 和 `updated`
    pub fn resolve_document(&self, ctx: &DocumentContext<'_>) -> Result<Resolution> {
        let tz = parse_timezone(ctx.timezone, ctx.path)?;
        let fm = front_matter::extract(ctx.raw, ctx.path)?;
        let history = self.oracle.query_history(ctx.path, self.reporter);

        let fm_value = |field: Field| fm.get(field.key()).filter(|v| !v.is_null());

        let date = resolve(
            Field::Date,
            ctx.default_date,
            fm_value(Field::Date),
            history.date.as_deref(),
            tz,
            ctx.path,
            self.mode,
        )?;

        let mut updated = resolve(
            Field::Updated,
            ctx.default_updated,
            fm_value(Field::Updated),
            history.updated.as_deref(),
            tz,
            ctx.path,
            self.mode,
        )?;

        // 有提交记录但没有可用的最近提交时间：工作区干净则 updated 跟随 date
        if fm_value(Field::Updated).is_none()
            && history.updated.is_none()
            && history.date.is_some()
        {
            match self.oracle.worktree_state(ctx.path, self.reporter) {
                WorkTreeState::Clean => {
                    updated = Resolved {
                        at: date.at,
                        source: Source::CleanTreeOverride,
                    };
                }
                state => self.reporter.debug(&format!(
                    "[resolve] keeping default updated for {} (working tree {:?})",
                    ctx.path.display(),
                    state
                )),
            }
        }

        validate::validate(date.at, updated.at, ctx.path, self.reporter);
        Ok(Resolution { date, updated })
    }
}
