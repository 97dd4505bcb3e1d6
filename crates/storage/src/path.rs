//! Keeping mirror paths inside the mirror.
//!
//! Every path handed to the store ultimately comes from content served by a
//! remote we don't control (ref names scraped out of arbitrary files), so it
//! must never be able to leave the store root.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Confines a mirror path to the mirror root and returns its normalized form.
///
/// `..` is resolved lexically and rejected once it would climb above the
/// store root. Root and current-directory components are dropped, so
/// `/.git/HEAD` and `./.git/HEAD` both normalize to `.git/HEAD`.
///
/// > **Note:** Null bytes are rejected; backslashes and non-UTF8 bytes are
/// >           passed through untouched.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use spelunk_storage::confine_path;
/// assert!(confine_path(".git/refs/heads/main").is_ok());
/// assert!(confine_path(".git/refs/../HEAD").is_ok());
/// assert!(confine_path(".git/refs/../../../etc/passwd").is_err());
/// assert!(confine_path(".git/a\0b").is_err());
/// assert_eq!(
///     confine_path("./.git//refs/./heads/main/").unwrap(),
///     Path::new(".git/refs/heads/main")
/// );
/// ```
pub fn confine(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let refuse = || ErrorKind::InvalidPath(path.to_path_buf());
    // Ref names such as `refs/heads/../../../../home/x/.ssh/authorized_keys`
    // are entirely possible in hostile content, and would otherwise become a
    // write anywhere the crawler's user can write.
    let mut kept: Vec<&OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) if name.as_encoded_bytes().contains(&0) => exn::bail!(refuse()),
            Component::Normal(name) => kept.push(name),
            Component::ParentDir => {
                kept.pop().ok_or_else(refuse)?;
            },
            // `/.git/HEAD` is relative to the mirror, not the filesystem.
            Component::RootDir | Component::CurDir => {},
            Component::Prefix(_) => exn::bail!(refuse()),
        }
    }
    if kept.is_empty() {
        // The mirror root itself is not a file anything can be saved as.
        exn::bail!(refuse());
    }
    Ok(kept.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".git/HEAD", ".git/HEAD")]
    #[case(".git/refs/heads/main", ".git/refs/heads/main")]
    #[case(".git//refs//tags//v1.0", ".git/refs/tags/v1.0")]
    #[case("./.git/./logs/HEAD", ".git/logs/HEAD")]
    #[case("/.git/config.spelunk", ".git/config.spelunk")]
    #[case(".git/refs/heads/..", ".git/refs")]
    #[case(".git/refs/heads/feature/", ".git/refs/heads/feature")]
    fn test_valid_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(confine(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("./")]
    #[case("//")]
    #[case("..")]
    #[case("../.git/HEAD")]
    #[case(".git/refs/../../../HEAD")]
    #[case(".git/a\0b")]
    #[case(".git/refs/heads/../../../../home/dev/.ssh/authorized_keys")]
    fn test_invalid_paths(#[case] input: &str) {
        let err = confine(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_ref_names_with_dots_stay_inside_root() {
        // Ref-like tokens scraped from remote content may legally contain dots.
        assert_eq!(confine(".git/refs/tags/v1..2").unwrap(), Path::new(".git/refs/tags/v1..2"));
        assert!(confine(".git/refs/../../..").is_err());
    }
}
