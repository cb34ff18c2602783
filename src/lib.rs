//! # nm_registrar
//!
//! Registers a **browser native messaging host** so that Chrome/Chromium and
//! Firefox extensions can launch it, and removes it again.
//!
//! Registration on Linux and macOS is nothing more than a JSON manifest in a
//! directory the browser looks in. Which directory depends on the OS, the browser
//! and whether you run as root:
//!
//! | OS | scope | Chrome | Firefox |
//! |---|---|---|---|
//! | Linux | system | `/etc/opt/chrome/native-messaging-hosts` | `/usr/lib/mozilla/native-messaging-hosts` |
//! | Linux | user | `~/.config/google-chrome/NativeMessagingHosts` | `~/.mozilla/native-messaging-hosts` |
//! | macOS | system | `/Library/Google/Chrome/NativeMessagingHosts` | `/Library/Application Support/Mozilla/NativeMessagingHosts` |
//! | macOS | user | `~/Library/Application Support/Google/Chrome/NativeMessagingHosts` | `~/Library/Application Support/Mozilla/NativeMessagingHosts` |
//!
//! The manifest file is always named `<name>.json`.
//!
//! ---
//!
//! ## Most important gotchas
//!
//! - **Install is not atomic.** It stops at the first target that fails and
//!   leaves earlier targets installed. Running it again is safe and rewrites the
//!   same bytes.
//! - **Uninstall never fails.** Missing or locked files are logged as warnings.
//!   It also deletes the host executable and its `.chk` file, so treat the
//!   returned [`install::Uninstalled`] as the end of the program.
//! - **Never log to stdout** from a host. Events are emitted through `tracing`;
//!   point your subscriber at stderr.
//! - **User scope needs a home directory.** If it cannot be determined, install
//!   fails with [`install::RegistrarError::HomeDirUnavailable`] instead of writing
//!   under `/`.
//!
//! ---
//!
//! ## Quick start
//!
//! ```no_run
//! use nm_registrar::{HostIdentity, Manifest, Registrar};
//!
//! # fn main() -> Result<(), nm_registrar::RegistrarError> {
//! let manifest = Manifest::new("com.example.host", "Example host", "/opt/example/host")
//!     .with_allowed_origins(vec!["chrome-extension://aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa/".into()])
//!     .with_allowed_extensions(vec!["host@example.org".into()]);
//! let identity = HostIdentity::from(&manifest);
//!
//! let registrar = Registrar::native()?;
//! for target in registrar.install(&identity, &manifest)? {
//!     eprintln!("installed {}", target.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Uninstall from inside the host itself:
//!
//! ```no_run
//! use nm_registrar::{HostIdentity, Registrar};
//!
//! # fn main() -> Result<(), nm_registrar::RegistrarError> {
//! let identity = HostIdentity::new("com.example.host", std::env::current_exe().unwrap());
//! Registrar::native()?.uninstall(&identity).exit();
//! # }
//! ```
//!
//! ## Testing without touching the real profile
//!
//! Path resolution reads privilege and home directory through
//! [`install::SystemProbe`]. Swap in a [`install::FixedProbe`]:
//!
//! ```no_run
//! use nm_registrar::{FixedProbe, OsFamily, Registrar};
//!
//! let registrar = Registrar::for_os(OsFamily::Linux, FixedProbe::user("/tmp/sandbox-home"));
//! ```

pub mod install;

#[cfg(feature = "config")]
pub mod config;

#[doc(inline)]
pub use install::error::{RegistrarError, Result};
#[doc(inline)]
pub use install::manifest::{HostIdentity, Manifest, Registrar, Removal, Uninstalled};
#[doc(inline)]
pub use install::paths::{resolve_targets, validate_host_name, Browser, OsFamily, Scope, TargetPath};
#[doc(inline)]
pub use install::probe::{FixedProbe, OsProbe, SystemProbe};

#[cfg(feature = "config")]
#[doc(inline)]
pub use config::HostConfig;
