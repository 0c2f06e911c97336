//! 宿主侧流程：收集文档、推导默认时间、调用引擎。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::front_matter;
use crate::history::HistoryOracle;
use crate::report::Reporter;
use crate::resolve::{self, DocumentContext, Field, Resolution, Resolver, Source};
use crate::utils::read_file_timestamps;

/// 单篇文档的输出
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub date: String,
    pub updated: String,
    pub date_source: Source,
    pub updated_source: Source,
}

impl DocumentReport {
    fn new(path: PathBuf, res: &Resolution) -> Self {
        Self {
            path,
            date: res.date.at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            updated: res.updated.at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            date_source: res.date.source,
            updated_source: res.updated.source,
        }
    }
}

pub struct Pipeline<'a> {
    config: &'a Config,
    oracle: &'a dyn HistoryOracle,
    reporter: &'a dyn Reporter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        oracle: &'a dyn HistoryOracle,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            oracle,
            reporter,
        }
    }

    /// 相对路径基于 `source_dir`
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.source_dir.join(path)
        };
        fs::canonicalize(&joined).unwrap_or(joined)
    }

    /// 展开输入：目录递归查找指定扩展名的文件，文件原样保留
    pub fn collect_documents(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut docs = Vec::new();

        for input in inputs {
            let path = self.resolve_path(input);
            if !path.is_dir() {
                docs.push(path);
                continue;
            }

            let mut found = Vec::new();
            let walker = WalkDir::new(&path).into_iter().filter_entry(|e| {
                e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
            });
            for entry in walker {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        self.reporter.warn(&format!("skip invalid dir entry: {}", e));
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let accepted = entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| self.config.accepts_extension(e));
                if accepted {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            docs.extend(found);
        }

        docs
    }

    /// 读取并解析一篇文档
    pub fn process(&self, path: &Path) -> Result<DocumentReport> {
        let path = self.resolve_path(path);
        let raw = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        let (default_date, default_updated) = self.defaults(&raw, &path)?;
        let ctx = DocumentContext {
            raw: &raw,
            path: &path,
            default_date,
            default_updated,
            timezone: &self.config.timezone,
        };

        let res = Resolver::new(self.oracle, self.reporter)
            .with_mode(self.config.mode)
            .resolve_document(&ctx)?;
        Ok(DocumentReport::new(path, &res))
    }

    /// 按宿主的方式推导默认值：front matter 优先，其次文件时间，最后当前时间
    fn defaults(
        &self,
        raw: &str,
        path: &Path,
    ) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let tz = resolve::parse_timezone(&self.config.timezone, path)?;
        let fm = front_matter::extract(raw, path)?;
        let times = read_file_timestamps(path);
        let now = Utc::now();

        let from_fm = |field: Field| {
            fm.get(field.key())
                .and_then(|v| resolve::parse::parse_value(v, tz))
        };

        let date = from_fm(Field::Date)
            .or(times.map(|t| t.created))
            .unwrap_or(now);
        let updated = from_fm(Field::Updated)
            .or(times.map(|t| t.modified))
            .unwrap_or(now);

        Ok((date.fixed_offset(), updated.fixed_offset()))
    }
}
