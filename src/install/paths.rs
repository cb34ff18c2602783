//! Manifest locations per operating system, browser family and scope.
//!
//! See <https://developer.chrome.com/docs/extensions/develop/concepts/native-messaging#native-messaging-host-location>
//! and <https://developer.mozilla.org/en-US/docs/Mozilla/Add-ons/WebExtensions/Native_manifests#manifest_location>.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::install::error::{RegistrarError, Result};

/// Browser families a manifest is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Chrome,
    Firefox,
}

impl Browser {
    /// Resolution order. Chrome first, always.
    pub const ALL: [Browser; 2] = [Browser::Chrome, Browser::Firefox];

    pub fn key(self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where manifests go: per-user directories or machine-wide ones.
///
/// `System` is the privileged scope and is only chosen when running as root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    User,
    System,
}

impl Scope {
    pub fn from_privileged(privileged: bool) -> Self {
        if privileged {
            Scope::System
        } else {
            Scope::User
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::User => f.write_str("user"),
            Scope::System => f.write_str("system"),
        }
    }
}

/// Operating system families with a known manifest layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Linux,
    MacOs,
}

impl OsFamily {
    /// The family of the running target, if supported.
    pub fn current() -> Option<OsFamily> {
        if cfg!(target_os = "macos") {
            Some(OsFamily::MacOs)
        } else if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Some(OsFamily::Linux)
        } else {
            None
        }
    }

    pub fn resolver(self) -> &'static dyn PathResolver {
        match self {
            OsFamily::Linux => &LinuxResolver,
            OsFamily::MacOs => &MacResolver,
        }
    }
}

/// Base directory table for one OS family.
///
/// Implementations only supply directories; [`resolve_targets`] owns ordering
/// and file naming so the variants cannot drift apart.
pub trait PathResolver: Send + Sync {
    fn os_family(&self) -> OsFamily;

    /// Machine-wide manifest directory for `browser`.
    fn system_base(&self, browser: Browser) -> PathBuf;

    /// Per-user manifest directory for `browser`, relative to the home directory.
    fn user_base(&self, browser: Browser) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxResolver;

impl PathResolver for LinuxResolver {
    fn os_family(&self) -> OsFamily {
        OsFamily::Linux
    }

    fn system_base(&self, browser: Browser) -> PathBuf {
        match browser {
            Browser::Chrome => PathBuf::from("/etc/opt/chrome/native-messaging-hosts"),
            Browser::Firefox => PathBuf::from("/usr/lib/mozilla/native-messaging-hosts"),
        }
    }

    fn user_base(&self, browser: Browser) -> &'static str {
        match browser {
            Browser::Chrome => ".config/google-chrome/NativeMessagingHosts",
            Browser::Firefox => ".mozilla/native-messaging-hosts",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MacResolver;

impl PathResolver for MacResolver {
    fn os_family(&self) -> OsFamily {
        OsFamily::MacOs
    }

    fn system_base(&self, browser: Browser) -> PathBuf {
        match browser {
            Browser::Chrome => PathBuf::from("/Library/Google/Chrome/NativeMessagingHosts"),
            Browser::Firefox => {
                PathBuf::from("/Library/Application Support/Mozilla/NativeMessagingHosts")
            }
        }
    }

    fn user_base(&self, browser: Browser) -> &'static str {
        match browser {
            Browser::Chrome => "Library/Application Support/Google/Chrome/NativeMessagingHosts",
            Browser::Firefox => "Library/Application Support/Mozilla/NativeMessagingHosts",
        }
    }
}

/// One resolved manifest location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    pub browser: Browser,
    pub scope: Scope,
    pub path: PathBuf,
}

impl TargetPath {
    /// Directory holding the manifest.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }
}

/// Manifest file name for a host: always `<app_name>.json`.
pub fn manifest_file_name(app_name: &str) -> String {
    format!("{app_name}.json")
}

/// Checks `name` against the browsers' host name grammar: dot-separated
/// segments of `[a-z0-9_]`, no empty segment.
///
/// Anything else could carry a path separator or `..` out of the manifest
/// directory.
pub fn validate_host_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        });
    if valid {
        Ok(())
    } else {
        Err(RegistrarError::InvalidHostName(name.to_string()))
    }
}

/// Resolve the `[Chrome, Firefox]` manifest paths for `app_name`.
///
/// `home` is only consulted for [`Scope::User`]; a missing home directory in
/// that scope is an error rather than a silent fallback to `/`. Names outside
/// the host name grammar are rejected before any path is built.
pub fn resolve_targets(
    resolver: &dyn PathResolver,
    scope: Scope,
    home: Option<&Path>,
    app_name: &str,
) -> Result<Vec<TargetPath>> {
    validate_host_name(app_name)?;
    let file_name = manifest_file_name(app_name);

    Browser::ALL
        .iter()
        .map(|&browser| {
            let base = match scope {
                Scope::System => resolver.system_base(browser),
                Scope::User => {
                    let home = home
                        .filter(|h| !h.as_os_str().is_empty())
                        .ok_or(RegistrarError::HomeDirUnavailable)?;
                    home.join(resolver.user_base(browser))
                }
            };
            Ok(TargetPath {
                browser,
                scope,
                path: base.join(&file_name),
            })
        })
        .collect()
}
