use regex::bytes::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Anything shaped like a ref name: `refs/heads/main`, `refs/tags/v1.0`, and
/// the `refs/heads/*` globs found in fetch refspecs.
regex!(REF_REGEX, r"(?m)(refs(/[a-zA-Z0-9._*-]+)+)");
/// `branch 'main'` as written by `git fetch` into `FETCH_HEAD`.
regex!(BRANCH_REGEX, r#"(?m)branch ["'](.+)["']"#);
regex!(HTML_REGEX, r"(?i)<html|<!doctype\s+html");

/// Directory the exposed repository's metadata lives in.
pub const GIT_DIR: &str = ".git";
/// Mirror of [`GIT_DIR`] holding reflogs.
pub const LOGS_DIR: &str = ".git/logs";
/// Remote assumed for branches named in `FETCH_HEAD`; the file itself only
/// records the URL.
pub const DEFAULT_REMOTE: &str = "origin";
/// Config section prefix marking per-branch settings.
pub const BRANCH_SECTION_PREFIX: &str = "branch ";
/// Key naming a branch's upstream remote.
pub const REMOTE_KEY: &str = "remote";
