#![allow(dead_code)]

use nm_registrar::{FixedProbe, HostIdentity, Manifest, OsFamily, Registrar};
use std::{collections::HashMap, env, fs, path::PathBuf};
use tempfile::TempDir;

/// Env guard that restores previous env vars on drop.
pub struct EnvGuard {
    old: HashMap<String, Option<String>>,
}

impl EnvGuard {
    pub fn set(vars: &[(&str, String)]) -> Self {
        let mut old = HashMap::new();
        for (k, v) in vars {
            old.insert((*k).to_string(), env::var(k).ok());
            env::set_var(k, v);
        }
        Self { old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (k, prev) in self.old.drain() {
            match prev {
                Some(v) => env::set_var(k, v),
                None => env::remove_var(k),
            }
        }
    }
}

/// A temp directory standing in for the user's home plus a fake host install.
pub struct Sandbox {
    pub dir: TempDir,
    pub home: PathBuf,
    pub identity: HostIdentity,
}

impl Sandbox {
    pub fn new(app_name: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let home = dir.path().join("home");
        fs::create_dir_all(&home).unwrap();

        let bin = dir.path().join("opt/host");
        fs::create_dir_all(&bin).unwrap();
        let exe = bin.join("host_bin");
        fs::write(&exe, b"#!/bin/sh\nexit 0\n").unwrap();

        let identity = HostIdentity::new(app_name, exe);
        fs::write(identity.checksum_path(), b"0123456789abcdef").unwrap();

        Self {
            dir,
            home,
            identity,
        }
    }

    /// Registrar for `os` acting as an unprivileged user whose home is the sandbox.
    pub fn registrar(&self, os: OsFamily) -> Registrar {
        Registrar::for_os(os, FixedProbe::user(&self.home))
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::new(
            self.identity.app_name.clone(),
            "Example host",
            self.identity.exec_path.clone(),
        )
        .with_allowed_origins(vec![
            "chrome-extension://aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa/".to_string()
        ])
        .with_allowed_extensions(vec!["native-test@example.com".to_string()])
    }
}
