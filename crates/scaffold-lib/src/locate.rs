//! Working-directory discovery.
//!
//! Walks a start directory and its ancestors for a marker directory
//! name and decides where the scaffold's runtime state is rooted. Two
//! incompatible policies exist in the wild; callers pick one via
//! [`ResolvePolicy`] instead of getting a merged behavior.

use std::path::{Path, PathBuf};

/// Default marker directory name.
pub const DEFAULT_MARKER: &str = "PrismQ";

/// How ancestor matches are resolved into a working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePolicy {
    /// Return the closest ancestor (start inclusive) whose name
    /// contains the marker as a substring.
    Nearest,
    /// Return the sibling `<marker>_WD` of the outermost ancestor
    /// whose name equals the marker exactly.
    #[default]
    Topmost,
}

/// Resolve the working directory for `marker` starting at `start`.
///
/// Falls back to `start` when no ancestor matches; this never fails.
/// The returned path is not created here and may not exist yet.
#[must_use]
pub fn resolve(start: &Path, marker: &str, policy: ResolvePolicy) -> PathBuf {
    match policy {
        ResolvePolicy::Nearest => resolve_nearest(start, marker),
        ResolvePolicy::Topmost => resolve_topmost(start, marker),
    }
}

fn resolve_nearest(start: &Path, marker: &str) -> PathBuf {
    for dir in start.ancestors() {
        if dir_name(dir).is_some_and(|name| name.contains(marker)) {
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}

fn resolve_topmost(start: &Path, marker: &str) -> PathBuf {
    let mut topmost: Option<&Path> = None;
    for dir in start.ancestors() {
        if dir_name(dir) == Some(marker) {
            topmost = Some(dir);
        }
    }

    match topmost.and_then(Path::parent) {
        Some(parent) => parent.join(format!("{marker}_WD")),
        // Marker at the filesystem root has no sibling slot; treat as no match.
        None => start.to_path_buf(),
    }
}

fn dir_name(dir: &Path) -> Option<&str> {
    dir.file_name().and_then(|name| name.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_prefers_closest_substring_match() {
        let start = Path::new("/home/user/PrismQ/modules/MyPrismQModule/src");
        let resolved = resolve(start, "PrismQ", ResolvePolicy::Nearest);
        assert_eq!(
            resolved,
            PathBuf::from("/home/user/PrismQ/modules/MyPrismQModule")
        );
    }

    #[test]
    fn test_topmost_returns_wd_sibling() {
        let start = Path::new("/home/user/PrismQ/subdirectory/nested");
        let resolved = resolve(start, "PrismQ", ResolvePolicy::Topmost);
        assert_eq!(resolved, PathBuf::from("/home/user/PrismQ_WD"));
    }

    #[test]
    fn test_topmost_skips_inner_matches() {
        let start = Path::new("/base/PrismQ/modules/PrismQ/submodule");
        let resolved = resolve(start, "PrismQ", ResolvePolicy::Topmost);
        assert_eq!(resolved, PathBuf::from("/base/PrismQ_WD"));
    }

    #[test]
    fn test_topmost_requires_exact_name() {
        let start = Path::new("/base/MyPrismQFork/src");
        let resolved = resolve(start, "PrismQ", ResolvePolicy::Topmost);
        assert_eq!(resolved, start.to_path_buf());
    }

    #[test]
    fn test_no_match_falls_back_to_start() {
        let start = Path::new("/var/tmp/workdir");
        assert_eq!(
            resolve(start, "PrismQ", ResolvePolicy::Nearest),
            start.to_path_buf()
        );
        assert_eq!(
            resolve(start, "PrismQ", ResolvePolicy::Topmost),
            start.to_path_buf()
        );
    }

    #[test]
    fn test_start_itself_matches_nearest() {
        let start = Path::new("/projects/PrismQ");
        assert_eq!(
            resolve(start, "PrismQ", ResolvePolicy::Nearest),
            start.to_path_buf()
        );
    }
}
