//! 版本历史查询。`HistoryOracle` 抽象了外部 VCS，生产实现见 [`git::GitOracle`]，
//! 测试使用 [`StaticOracle`] 返回固定结果。

pub mod git;

use std::path::Path;

use crate::report::Reporter;

/// 一个文件的提交时间范围，原样保留 VCS 输出的字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRecord {
    /// 最早一次提交
    pub date: Option<String>,
    /// 最近一次提交
    pub updated: Option<String>,
}

impl HistoryRecord {
    /// 由新到旧排列的时间列表构造
    pub fn from_newest_first<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list: Vec<String> = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            date: list.last().cloned(),
            updated: list.first().cloned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.updated.is_none()
    }
}

/// 工作区状态。只有 `Clean` 会触发 updated 跟随 date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkTreeState {
    Clean,
    Modified,
    /// 检查本身失败
    Unknown,
}

pub trait HistoryOracle {
    /// 查询文件历史；任何失败都退化为空记录
    fn query_history(&self, path: &Path, reporter: &dyn Reporter) -> HistoryRecord;

    /// 文件在工作区是否有未提交的修改
    fn worktree_state(&self, path: &Path, reporter: &dyn Reporter) -> WorkTreeState;
}

/// 固定返回值的 oracle
#[derive(Debug, Clone)]
pub struct StaticOracle {
    pub record: HistoryRecord,
    pub state: WorkTreeState,
}

impl StaticOracle {
    pub fn new(record: HistoryRecord, state: WorkTreeState) -> Self {
        Self { record, state }
    }

    /// 未被追踪的文件
    pub fn untracked() -> Self {
        Self::new(HistoryRecord::default(), WorkTreeState::Unknown)
    }
}

impl HistoryOracle for StaticOracle {
    fn query_history(&self, path: &Path, reporter: &dyn Reporter) -> HistoryRecord {
        if self.record.is_empty() {
            reporter.debug(&format!("[history] no commits for {}", path.display()));
        }
        self.record.clone()
    }

    fn worktree_state(&self, _path: &Path, _reporter: &dyn Reporter) -> WorkTreeState {
        self.state
    }
}
