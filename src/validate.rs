use std::path::Path;

use chrono::{DateTime, Utc};

use crate::report::Reporter;

/// `date` 晚于 `updated` 时只发警告，不修改任何值。返回是否一致。
pub fn validate(
    date: DateTime<Utc>,
    updated: DateTime<Utc>,
    path: &Path,
    reporter: &dyn Reporter,
) -> bool {
    if date > updated {
        reporter.warn(&format!(
            "[validate] {}: date {} is after updated {}",
            path.display(),
            date.to_rfc3339(),
            updated.to_rfc3339()
        ));
        return false;
    }
    true
}
