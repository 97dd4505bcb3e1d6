//! Finding pointers to more metadata inside git metadata files.
//!
//! Three dialects are understood:
//! - anything containing ref names (`HEAD`, `packed-refs`, reflogs, ...),
//! - `FETCH_HEAD` branch declarations,
//! - the INI-like `.git/config`.
//!
//! Everything here is pure: bytes in, relative paths out.

mod config;
mod consts;
pub mod error;
mod filter;
mod refs;

pub use crate::config::{BranchSection, branch_sections, discover_config};
pub use crate::consts::{DEFAULT_REMOTE, GIT_DIR, LOGS_DIR};
pub use crate::filter::{is_empty, is_html};
pub use crate::refs::{branches, discover_branches, discover_refs, ref_paths, refs, remote_tracking_paths};
