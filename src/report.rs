//! 诊断输出通道。引擎只通过 `Reporter` 发出 debug / warning，
//! 方便测试断言，也不绑定具体日志后端。

use std::sync::Mutex;

pub trait Reporter {
    fn debug(&self, msg: &str);
    fn warn(&self, msg: &str);
}

/// 默认实现：转发到 `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn debug(&self, msg: &str) {
        log::debug!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{}", msg);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warn,
}

/// 记录所有消息，测试用
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|e| e.to_vec())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(lvl, _)| *lvl == Level::Warn)
            .map(|(_, msg)| msg)
            .collect()
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut e) = self.entries.lock() {
            e.push((level, msg.to_string()));
        }
    }
}

impl Reporter for RecordingReporter {
    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }
}
