//! LogSpace locator
//!
//! Walks a LogSpace root (`region/client/app/major/version/...`) and reads the
//! `.error` / `.info` files of every directory whose path matches the requested
//! client, application and version. Matching is a case-insensitive substring
//! test against the directory path relative to the root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::LogKind;

/// A log file picked up by the locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLog {
    pub path: PathBuf,
    pub kind: LogKind,
    pub content: String,
}

/// Filter applied to every traversed directory
struct PathFilter {
    client: String,
    app_name: Option<String>,
    version: Option<String>,
}

impl PathFilter {
    fn new(client: &str, app_name: &str, version: Option<&str>) -> Self {
        let lower = |s: &str| {
            let s = s.trim().to_lowercase();
            (!s.is_empty()).then_some(s)
        };
        Self {
            client: client.trim().to_lowercase(),
            app_name: lower(app_name),
            version: version.and_then(lower),
        }
    }

    fn matches(&self, relative_dir: &str) -> bool {
        let path = relative_dir.to_lowercase();
        path.contains(&self.client)
            && self.app_name.as_ref().is_none_or(|app| path.contains(app))
            && self.version.as_ref().is_none_or(|v| path.contains(v))
    }
}

/// Locate matching log files under `root` and read them.
///
/// Unreadable files and walk errors are logged and skipped; files whose content
/// is blank are dropped. Returns an empty vec when nothing matches.
pub fn locate_logs(root: &Path, client: &str, app_name: &str, version: Option<&str>) -> Vec<LocatedLog> {
    let filter = PathFilter::new(client, app_name, version);
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable LogSpace entry");
                continue;
            }
        };
        // symlinked files are read through their target; dangling links fail the read below
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(kind) = LogKind::from_path(entry.path()) else {
            continue;
        };

        let dir = entry.path().parent().unwrap_or(root);
        let relative = dir.strip_prefix(root).unwrap_or(dir);
        if !filter.matches(&relative.to_string_lossy()) {
            continue;
        }

        match fs::read(entry.path()) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                if content.trim().is_empty() {
                    debug!(path = %entry.path().display(), "Skipping blank log file");
                    continue;
                }
                found.push(LocatedLog {
                    path: entry.path().to_path_buf(),
                    kind,
                    content,
                });
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to read log file");
            }
        }
    }

    debug!(root = %root.display(), client, app_name, found = found.len(), "LogSpace scan complete");
    found
}

/// Raw texts of every matching log file, in traversal order
pub fn locate_and_read_logs(root: &Path, client: &str, app_name: &str, version: Option<&str>) -> Vec<String> {
    locate_logs(root, client, app_name, version)
        .into_iter()
        .map(|log| log.content)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = PathFilter::new("Barclays", "unigy", Some("4.0.1"));
        assert!(filter.matches("EMEA/barclays/Unigy/4.0/4.0.1"));
        assert!(!filter.matches("EMEA/Barclays/Pulse/4.0/4.0.1"));
        assert!(!filter.matches("EMEA/Barclays/Unigy/3.0/3.0.1"));
    }

    #[test]
    fn test_filter_without_version_matches_all_versions() {
        let filter = PathFilter::new("sbi", "Touch", None);
        assert!(filter.matches("Asia/SBI/Touch/3.0/3.0.1"));
        assert!(filter.matches("Asia/SBI/Touch/4.0/4.0.1"));

        let blank = PathFilter::new("sbi", "Touch", Some("  "));
        assert!(blank.matches("Asia/SBI/Touch/4.0/4.0.1"));
    }
}
