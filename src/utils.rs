use chrono::{DateTime, Utc};

use std::path::Path;

/// 文件系统时间：创建时间（不支持时退回修改时间）和修改时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

pub fn read_file_timestamps(path: &Path) -> Option<FileTimes> {
    let meta = std::fs::metadata(path).ok()?;
    let modified: DateTime<Utc> = meta.modified().ok()?.into();

    // 部分文件系统没有 birth time
    let created = match meta.created() {
        Ok(st) => st.into(),
        Err(_) => modified,
    };

    Some(FileTimes { created, modified })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_has_times() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("post.md");
        std::fs::write(&file, "hello").unwrap();

        let times = read_file_timestamps(&file).unwrap();
        assert!(times.created <= Utc::now());
        assert!(times.modified <= Utc::now());
    }

    #[test]
    fn missing_file_has_none() {
        assert_eq!(read_file_timestamps(Path::new("/nonexistent/post.md")), None);
    }
}
