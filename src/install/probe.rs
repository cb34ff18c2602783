//! Queries about the invoking user: privilege and home directory.

use std::path::PathBuf;

/// Source of the user facts path resolution depends on.
///
/// Both methods are asked again on every resolve; answers are never cached.
pub trait SystemProbe: Send + Sync {
    /// True when running with root privilege (effective uid 0).
    fn is_privileged(&self) -> bool;

    fn home_dir(&self) -> Option<PathBuf>;
}

/// Probe backed by the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl SystemProbe for OsProbe {
    #[cfg(unix)]
    fn is_privileged(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    fn is_privileged(&self) -> bool {
        false
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Probe with fixed answers, for tests and embedders that already know the user.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    pub privileged: bool,
    pub home: Option<PathBuf>,
}

impl FixedProbe {
    pub fn user(home: impl Into<PathBuf>) -> Self {
        Self {
            privileged: false,
            home: Some(home.into()),
        }
    }

    pub fn root() -> Self {
        Self {
            privileged: true,
            home: None,
        }
    }
}

impl SystemProbe for FixedProbe {
    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }
}
