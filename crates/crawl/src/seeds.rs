//! Where a crawl starts.

use crate::job::Job;

/// Well-known metadata paths that either exist in every repository or are
/// likely enough to be worth one request each. Everything else is reached by
/// following what these point at.
pub const REF_SEEDS: &[&str] = &[
    ".git/HEAD",
    ".git/ORIG_HEAD",
    ".git/FETCH_HEAD",
    ".git/MERGE_HEAD",
    ".git/CHERRY_PICK_HEAD",
    ".git/REVERT_HEAD",
    ".git/packed-refs",
    ".git/info/refs",
    ".git/config",
    ".git/config.worktree",
    ".git/logs/HEAD",
    ".git/refs/heads/main",
    ".git/refs/heads/master",
    ".git/refs/remotes/origin/HEAD",
    ".git/refs/stash",
    ".git/logs/refs/stash",
];

pub fn ref_seeds() -> impl Iterator<Item = Job> {
    REF_SEEDS.iter().map(|path| Job::new(*path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::is_config;
    use std::collections::HashSet;

    #[test]
    fn test_seeds_are_unique() {
        let unique: HashSet<_> = REF_SEEDS.iter().collect();
        assert_eq!(unique.len(), REF_SEEDS.len());
    }

    #[test]
    fn test_seeds_cover_both_config_files() {
        assert_eq!(REF_SEEDS.iter().filter(|path| is_config(path)).count(), 2);
        assert!(ref_seeds().all(|job| job.path().starts_with(".git/") && !job.is_retry()));
    }
}
