//! 为内容文档决定 `date` / `updated`：合并 front matter、git 历史和宿主给出的默认值，
//! 统一换算为 UTC，并检查时间先后是否矛盾。

pub mod config;
pub mod error;
pub mod front_matter;
pub mod history;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod utils;
pub mod validate;

pub use error::{Error, ErrorClass, Result};
pub use front_matter::{FrontMatter, extract};
pub use history::{HistoryOracle, HistoryRecord, StaticOracle, WorkTreeState, git::GitOracle};
pub use report::{LogReporter, RecordingReporter, Reporter};
pub use resolve::{
    DocumentContext, Field, Resolution, ResolveMode, Resolved, Resolver, Source, resolve,
};
pub use validate::validate;
