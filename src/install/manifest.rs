use serde::{Deserialize, Serialize};
use std::{
    ffi::OsString,
    fs::{self, DirBuilder, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::install::error::{RegistrarError, Result};
use crate::install::paths::{self, OsFamily, PathResolver, Scope, TargetPath};
use crate::install::probe::{OsProbe, SystemProbe};

/// Suffix of the checksum file kept next to the host executable.
pub const CHECKSUM_SUFFIX: &str = ".chk";

/// Represents a native messaging host manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
}

pub(crate) fn default_kind() -> String {
    "stdio".to_string()
}

impl Manifest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            path: path.into(),
            kind: default_kind(),
            allowed_origins: None,
            allowed_extensions: None,
        }
    }

    /// Chrome-family callers, e.g. `chrome-extension://<id>/`.
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = Some(origins);
        self
    }

    /// Firefox-family callers, e.g. `addon@example.org`.
    pub fn with_allowed_extensions(mut self, extensions: Vec<String>) -> Self {
        self.allowed_extensions = Some(extensions);
        self
    }
}

/// The host being registered: its name and the executable it launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub app_name: String,
    pub exec_path: PathBuf,
}

impl HostIdentity {
    pub fn new(app_name: impl Into<String>, exec_path: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            exec_path: exec_path.into(),
        }
    }

    pub fn manifest_file_name(&self) -> String {
        paths::manifest_file_name(&self.app_name)
    }

    /// `<exec_path>.chk`
    pub fn checksum_path(&self) -> PathBuf {
        let mut raw: OsString = self.exec_path.clone().into_os_string();
        raw.push(CHECKSUM_SUFFIX);
        PathBuf::from(raw)
    }
}

impl From<&Manifest> for HostIdentity {
    fn from(manifest: &Manifest) -> Self {
        HostIdentity::new(manifest.name.clone(), manifest.path.clone())
    }
}

/// Result of one removal attempt during uninstall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Failed(io::ErrorKind),
}

impl Removal {
    pub fn is_removed(self) -> bool {
        matches!(self, Removal::Removed)
    }
}

/// Removal results for the executable and its checksum file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFiles {
    pub executable: Removal,
    pub checksum: Removal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: TargetPath,
    pub manifest: Removal,
    pub host_files: HostFiles,
}

/// Completion report of [`Registrar::uninstall`].
///
/// The host executable may have just been deleted. Callers are expected to
/// stop doing work once they hold this value, typically by calling
/// [`Uninstalled::exit`].
#[must_use = "uninstall may have deleted the running executable; finish with `exit()`"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uninstalled {
    pub targets: Vec<TargetOutcome>,
    /// Set when no target could be resolved and only the host files were removed.
    pub orphaned: Option<HostFiles>,
}

impl Uninstalled {
    /// True if no manifest is left at any resolved target.
    pub fn manifests_gone(&self) -> bool {
        self.targets
            .iter()
            .all(|t| t.manifest.is_removed() || !t.target.path.exists())
    }

    /// Terminate the process with a success status.
    pub fn exit(self) -> ! {
        std::process::exit(0)
    }
}

/// Installs and removes native messaging manifests for one OS family.
pub struct Registrar {
    resolver: Box<dyn PathResolver>,
    probe: Box<dyn SystemProbe>,
}

impl Registrar {
    pub fn new(
        resolver: impl PathResolver + 'static,
        probe: impl SystemProbe + 'static,
    ) -> Self {
        Self {
            resolver: Box::new(resolver),
            probe: Box::new(probe),
        }
    }

    /// Registrar for `os` backed by the given probe.
    pub fn for_os(os: OsFamily, probe: impl SystemProbe + 'static) -> Self {
        match os {
            OsFamily::Linux => Self::new(paths::LinuxResolver, probe),
            OsFamily::MacOs => Self::new(paths::MacResolver, probe),
        }
    }

    /// Registrar for the running OS and user.
    pub fn native() -> Result<Self> {
        let os = OsFamily::current().ok_or(RegistrarError::UnsupportedPlatform)?;
        Ok(Self::for_os(os, OsProbe))
    }

    pub fn os_family(&self) -> OsFamily {
        self.resolver.os_family()
    }

    /// Scope implied by the current privilege level.
    pub fn scope(&self) -> Scope {
        Scope::from_privileged(self.probe.is_privileged())
    }

    /// Resolves `[Chrome, Firefox]` manifest paths for `identity`.
    pub fn targets(&self, identity: &HostIdentity) -> Result<Vec<TargetPath>> {
        let scope = self.scope();
        let home = match scope {
            Scope::User => self.probe.home_dir(),
            Scope::System => None,
        };
        let targets =
            paths::resolve_targets(&*self.resolver, scope, home.as_deref(), &identity.app_name)?;
        debug!(
            host = %identity.app_name,
            %scope,
            os = ?self.resolver.os_family(),
            targets = ?targets.iter().map(|t| &t.path).collect::<Vec<_>>(),
            "resolved manifest targets"
        );
        Ok(targets)
    }

    /// Writes `manifest` to every target, creating directories as needed.
    ///
    /// Stops at the first failing target. Targets written before the failure
    /// stay installed. Re-running over an existing install rewrites the same
    /// bytes.
    pub fn install<M: Serialize>(
        &self,
        identity: &HostIdentity,
        manifest: &M,
    ) -> Result<Vec<TargetPath>> {
        let bytes = serde_json::to_vec_pretty(manifest)?;
        let targets = self.targets(identity)?;

        for target in &targets {
            let dir = target.dir();
            create_manifest_dir(dir).map_err(|source| RegistrarError::DirectoryCreation {
                path: dir.to_path_buf(),
                source,
            })?;
            write_file(&target.path, &bytes).map_err(|source| RegistrarError::ManifestWrite {
                path: target.path.clone(),
                source,
            })?;
            info!(browser = %target.browser, path = %target.path.display(), "installed manifest");
        }

        Ok(targets)
    }

    /// Targets whose manifest file is currently present.
    pub fn verify(&self, identity: &HostIdentity) -> Result<Vec<TargetPath>> {
        Ok(self
            .targets(identity)?
            .into_iter()
            .filter(|t| t.path.is_file())
            .collect())
    }

    /// Removes the manifests, the executable and its checksum file.
    ///
    /// Every removal is attempted independently and failures are only logged.
    /// The returned report must be treated as the end of the program; see
    /// [`Uninstalled::exit`].
    pub fn uninstall(&self, identity: &HostIdentity) -> Uninstalled {
        let targets = match self.targets(identity) {
            Ok(targets) => targets,
            Err(err) => {
                warn!(host = %identity.app_name, error = %err, "cannot resolve manifest locations");
                return Uninstalled {
                    targets: Vec::new(),
                    orphaned: Some(remove_host_files(identity)),
                };
            }
        };

        let targets = targets
            .into_iter()
            .map(|target| {
                let manifest = remove_logged(&target.path, "might never have been installed");
                let host_files = remove_host_files(identity);
                info!(browser = %target.browser, path = %target.path.display(), "uninstalled manifest");
                TargetOutcome {
                    target,
                    manifest,
                    host_files,
                }
            })
            .collect();

        Uninstalled {
            targets,
            orphaned: None,
        }
    }

    /// [`Registrar::uninstall`], then exit the process.
    pub fn uninstall_and_exit(&self, identity: &HostIdentity) -> ! {
        self.uninstall(identity).exit()
    }
}

fn remove_host_files(identity: &HostIdentity) -> HostFiles {
    HostFiles {
        executable: remove_logged(&identity.exec_path, "might be locked by current process"),
        checksum: remove_logged(&identity.checksum_path(), "might not exist"),
    }
}

fn remove_logged(path: &Path, hint: &str) -> Removal {
    match fs::remove_file(path) {
        Ok(()) => Removal::Removed,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not remove file; it {hint}");
            Removal::Failed(err.kind())
        }
    }
}

fn create_manifest_dir(dir: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)
}
