use std::path::Path;
use std::process::{Command, Output};

use super::{HistoryOracle, HistoryRecord, WorkTreeState};
use crate::report::Reporter;

/// 通过 `git` 命令行查询历史
#[derive(Debug, Clone)]
pub struct GitOracle {
    program: String,
}

impl Default for GitOracle {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, path: &Path, args: &[&str]) -> std::io::Result<Output> {
        // 相对路径先按当前目录补全，否则切换目录后 pathspec 会错位
        let path = std::path::absolute(path)?;
        let mut cmd = Command::new(&self.program);
        // 在文件所在目录执行，保证落在正确的仓库里
        if let Some(dir) = path.parent() {
            cmd.current_dir(dir);
        }
        cmd.args(args).arg("--").arg(&path).output()
    }
}

impl HistoryOracle for GitOracle {
    fn query_history(&self, path: &Path, reporter: &dyn Reporter) -> HistoryRecord {
        // --follow 跟踪重命名；%aI 为带时区的严格 ISO 8601，由新到旧
        let output = match self.run(path, &["log", "--follow", "--format=%aI"]) {
            Ok(o) => o,
            Err(e) => {
                reporter.debug(&format!(
                    "[history] failed to run {} for {}: {}",
                    self.program,
                    path.display(),
                    e
                ));
                return HistoryRecord::default();
            }
        };

        if !output.status.success() {
            reporter.debug(&format!(
                "[history] git log exited with {} for {}: {}",
                output.status,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
            return HistoryRecord::default();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let record = HistoryRecord::from_newest_first(stdout.lines());
        if record.is_empty() {
            // 刚创建、尚未提交的文件
            reporter.debug(&format!("[history] no commits for {}", path.display()));
        }
        record
    }

    fn worktree_state(&self, path: &Path, reporter: &dyn Reporter) -> WorkTreeState {
        match self.run(path, &["diff", "--quiet", "HEAD"]) {
            Ok(o) => match o.status.code() {
                Some(0) => WorkTreeState::Clean,
                Some(1) => WorkTreeState::Modified,
                _ => {
                    reporter.warn(&format!(
                        "[history] cannot determine working tree state of {}: \
                         git diff exited with {}: {}",
                        path.display(),
                        o.status,
                        String::from_utf8_lossy(&o.stderr).trim()
                    ));
                    WorkTreeState::Unknown
                }
            },
            Err(e) => {
                reporter.warn(&format!(
                    "[history] cannot determine working tree state of {}: {}",
                    path.display(),
                    e
                ));
                WorkTreeState::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;

    #[test]
    fn missing_program_degrades_to_empty_history() {
        let oracle = GitOracle::new("gitstamp-no-such-vcs-binary");
        let reporter = RecordingReporter::new();

        let rec = oracle.query_history(Path::new("/tmp/post.md"), &reporter);
        assert!(rec.is_empty());
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn missing_program_makes_worktree_unknown_with_warning() {
        let oracle = GitOracle::new("gitstamp-no-such-vcs-binary");
        let reporter = RecordingReporter::new();

        let state = oracle.worktree_state(Path::new("/tmp/post.md"), &reporter);
        assert_eq!(state, WorkTreeState::Unknown);
        assert_eq!(reporter.warnings().len(), 1);
    }
}
