//! Ref pointers and `FETCH_HEAD` branch declarations.

use crate::consts::{self, DEFAULT_REMOTE, GIT_DIR, LOGS_DIR};

/// Every ref-shaped token in `content`, in order of appearance.
///
/// Works on raw bytes: packed refs, reflogs and `HEAD` are text, but nothing
/// stops a server from handing back binary junk.
pub fn refs(content: &[u8]) -> impl Iterator<Item = String> + '_ {
    consts::REF_REGEX.find_iter(content).map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// Branch names declared as `branch '<name>'` or `branch "<name>"`.
pub fn branches(content: &[u8]) -> impl Iterator<Item = String> + '_ {
    consts::BRANCH_REGEX
        .captures_iter(content)
        .filter_map(|captures| captures.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// The ref itself plus its reflog: `.git/<ref>` and `.git/logs/<ref>`.
pub fn ref_paths(reference: &str) -> [String; 2] {
    [format!("{GIT_DIR}/{reference}"), format!("{LOGS_DIR}/{reference}")]
}

/// Remote-tracking ref of `branch` on `remote`, plus its reflog.
pub fn remote_tracking_paths(remote: &str, branch: &str) -> [String; 2] {
    ref_paths(&format!("refs/remotes/{remote}/{branch}"))
}

/// Paths to every ref mentioned in `content`.
///
/// ```
/// let paths = spelunk_extract::discover_refs(b"ref: refs/heads/main\n");
/// assert_eq!(paths, [".git/refs/heads/main", ".git/logs/refs/heads/main"]);
/// ```
pub fn discover_refs(content: &[u8]) -> Vec<String> {
    refs(content).flat_map(|reference| ref_paths(&reference)).collect()
}

/// Paths to the remote-tracking refs of every branch declared in `content`.
///
/// The remote is always assumed to be `origin`. `FETCH_HEAD` records the URL a
/// branch was fetched from, not the name of the remote, so this is a best guess
/// that is right for the vast majority of clones.
pub fn discover_branches(content: &[u8]) -> Vec<String> {
    branches(content).flat_map(|branch| remote_tracking_paths(DEFAULT_REMOTE, &branch)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_single_ref() {
        assert_eq!(discover_refs(b"refs/heads/main\n"), [".git/refs/heads/main", ".git/logs/refs/heads/main"]);
    }

    #[test]
    fn test_single_branch() {
        assert_eq!(
            discover_branches(br#"branch "dev""#),
            [".git/refs/remotes/origin/dev", ".git/logs/refs/remotes/origin/dev"]
        );
    }

    #[rstest]
    #[case(b"ref: refs/heads/main\n", &["refs/heads/main"])]
    #[case(b"refs/tags/v1.0.0-rc_1", &["refs/tags/v1.0.0-rc_1"])]
    #[case(b"+refs/heads/*:refs/remotes/origin/*", &["refs/heads/*", "refs/remotes/origin/*"])]
    #[case(b"4b825dc642cb6eb9a060e54bf8d69288fbee4904 refs/heads/feature/login\n", &["refs/heads/feature/login"])]
    #[case(b"refs", &[])]
    #[case(b"refs/", &[])]
    #[case(b"4b825dc642cb6eb9a060e54bf8d69288fbee4904\n", &[])]
    #[case(b"\xff\xferefs/heads/bin\x00", &["refs/heads/bin"])]
    fn test_refs(#[case] content: &[u8], #[case] expected: &[&str]) {
        assert_eq!(refs(content).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_packed_refs() {
        let packed = b"# pack-refs with: peeled fully-peeled sorted \n\
            0000000000000000000000000000000000000001 refs/heads/main\n\
            0000000000000000000000000000000000000002 refs/tags/v1\n\
            ^0000000000000000000000000000000000000003\n";
        assert_eq!(
            discover_refs(packed),
            [
                ".git/refs/heads/main",
                ".git/logs/refs/heads/main",
                ".git/refs/tags/v1",
                ".git/logs/refs/tags/v1"
            ]
        );
    }

    #[rstest]
    #[case(b"branch 'main' of https://example.com/repo", &["main"])]
    #[case(br#"branch "dev""#, &["dev"])]
    #[case(b"a1\t\tbranch 'main' of x\nb2\tnot-for-merge\tbranch 'feature/x' of x\n", &["main", "feature/x"])]
    #[case(b"tag 'v1.0' of https://example.com/repo", &[])]
    #[case(b"branch main", &[])]
    fn test_branches(#[case] content: &[u8], #[case] expected: &[&str]) {
        assert_eq!(branches(content).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_fetch_head_yields_both_families() {
        let fetch_head = b"0000000000000000000000000000000000000001\t\tbranch 'main' of https://example.com/repo\n";
        assert!(discover_refs(fetch_head).is_empty());
        assert_eq!(
            discover_branches(fetch_head),
            [".git/refs/remotes/origin/main", ".git/logs/refs/remotes/origin/main"]
        );
    }
}
