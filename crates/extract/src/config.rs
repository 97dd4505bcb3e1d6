//! Branch sections of `.git/config`.

use crate::consts::{BRANCH_SECTION_PREFIX, REMOTE_KEY};
use crate::error::{ErrorKind, Result};
use crate::refs::remote_tracking_paths;
use ini::{Ini, ParseOption};
use tracing::instrument;

/// A `[branch "<name>"]` section that names its upstream remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSection {
    pub branch: String,
    pub remote: String,
}
impl BranchSection {
    /// Remote-tracking ref of this branch on its configured remote, plus its
    /// reflog.
    pub fn paths(&self) -> [String; 2] {
        remote_tracking_paths(&self.remote, &self.branch)
    }
}

/// Rewrites the parts of git's config syntax that plain INI doesn't share:
/// inline `;`/`#` comments (outside double quotes) are dropped, and a bare
/// `key` line, git's shorthand for `key = true`, is spelled out. Left alone,
/// the INI parser would read a bare key on until the next `=`, swallowing the
/// sections in between.
fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for line in text.lines() {
        let line = strip_comment(line).trim();
        if !line.is_empty() && !line.starts_with('[') && !line.contains('=') {
            normalized.push_str(line);
            normalized.push_str(" = true");
        } else {
            normalized.push_str(line);
        }
        normalized.push('\n');
    }
    normalized
}

fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' | '#' if !quoted => return &line[..i],
            _ => {},
        }
    }
    line
}

/// Parses git config content and returns every branch section that has a
/// `remote` key. Sections without one are skipped.
///
/// Escape processing is disabled: git config values happily contain
/// backslashes (Windows paths, regexes) that an INI parser would otherwise
/// reject.
///
/// # Errors
///
/// Returns [`MalformedConfig`](ErrorKind::MalformedConfig) if the content
/// isn't INI.
#[instrument(level = "trace", skip(content), fields(size = content.len()))]
pub fn branch_sections(content: &[u8]) -> Result<Vec<BranchSection>> {
    let text = normalize(&String::from_utf8_lossy(content));
    let options = ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    };
    let config = Ini::load_from_str_opt(&text, options).map_err(|e| ErrorKind::MalformedConfig(e.to_string()))?;
    let mut sections = Vec::new();
    for (name, properties) in config.iter() {
        let Some(branch) = name.and_then(|name| name.strip_prefix(BRANCH_SECTION_PREFIX)) else {
            continue;
        };
        let branch = branch.trim().trim_matches('"');
        match properties.get(REMOTE_KEY) {
            Some(remote) => sections.push(BranchSection {
                branch: branch.to_string(),
                remote: remote.trim_matches('"').to_string(),
            }),
            None => tracing::debug!(branch, "branch section has no remote"),
        }
    }
    Ok(sections)
}

/// Paths to the remote-tracking refs of every branch configured in `content`.
///
/// ```
/// let config = b"[branch \"feature\"]\n\tremote = upstream\n\tmerge = refs/heads/feature\n";
/// let paths = spelunk_extract::discover_config(config).unwrap();
/// assert_eq!(paths, [".git/refs/remotes/upstream/feature", ".git/logs/refs/remotes/upstream/feature"]);
/// ```
pub fn discover_config(content: &[u8]) -> Result<Vec<String>> {
    Ok(branch_sections(content)?.iter().flat_map(BranchSection::paths).collect())
}
