mod common;

use nm_registrar::{
    resolve_targets, Browser, FixedProbe, HostIdentity, OsFamily, Registrar, RegistrarError,
    Scope, SystemProbe,
};
use serial_test::serial;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[test]
fn every_os_and_scope_yields_chrome_then_firefox() {
    let host = "com.example.testhost";
    let home = Path::new("/home/tester");

    for os in [OsFamily::Linux, OsFamily::MacOs] {
        for scope in [Scope::User, Scope::System] {
            let targets = resolve_targets(os.resolver(), scope, Some(home), host).unwrap();
            assert_eq!(targets.len(), 2, "{os:?}/{scope}");
            assert_eq!(targets[0].browser, Browser::Chrome);
            assert_eq!(targets[1].browser, Browser::Firefox);
            for t in &targets {
                assert_eq!(t.scope, scope);
                assert_eq!(t.path.file_name().unwrap(), "com.example.testhost.json");
                assert!(t.path.is_absolute(), "{:?}", t.path);
                assert_eq!(t.path.starts_with(home), scope == Scope::User);
            }
        }
    }
}

#[test]
fn privileged_linux_uses_machine_wide_paths() {
    let registrar = Registrar::for_os(OsFamily::Linux, FixedProbe::root());
    let identity = HostIdentity::new("com.example.host", "/usr/bin/true");

    let paths: Vec<PathBuf> = registrar
        .targets(&identity)
        .unwrap()
        .into_iter()
        .map(|t| t.path)
        .collect();

    assert_eq!(
        paths,
        vec![
            PathBuf::from("/etc/opt/chrome/native-messaging-hosts/com.example.host.json"),
            PathBuf::from("/usr/lib/mozilla/native-messaging-hosts/com.example.host.json"),
        ]
    );
}

#[test]
fn user_scope_without_home_fails() {
    let probe = FixedProbe {
        privileged: false,
        home: None,
    };
    let registrar = Registrar::for_os(OsFamily::MacOs, probe);
    let err = registrar
        .targets(&HostIdentity::new("h", "/usr/bin/true"))
        .unwrap_err();
    assert!(matches!(err, RegistrarError::HomeDirUnavailable));
}

/// Probe whose privilege can change between calls.
struct SwitchProbe(Arc<AtomicBool>);

impl SystemProbe for SwitchProbe {
    fn is_privileged(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/home/tester"))
    }
}

#[test]
fn privilege_is_probed_on_every_call() {
    let flag = Arc::new(AtomicBool::new(false));
    let registrar = Registrar::for_os(OsFamily::Linux, SwitchProbe(flag.clone()));
    let identity = HostIdentity::new("h", "/usr/bin/true");

    assert_eq!(registrar.targets(&identity).unwrap()[0].scope, Scope::User);
    flag.store(true, Ordering::SeqCst);
    assert_eq!(registrar.targets(&identity).unwrap()[0].scope, Scope::System);
}

#[test]
#[serial]
#[cfg(any(target_os = "linux", target_os = "macos"))]
fn native_registrar_follows_home_for_unprivileged_users() {
    let td = tempfile::tempdir().unwrap();
    let _env = common::EnvGuard::set(&[("HOME", td.path().to_string_lossy().to_string())]);

    let registrar = Registrar::native().unwrap();
    let targets = registrar
        .targets(&HostIdentity::new("com.example.native", "/usr/bin/true"))
        .unwrap();

    // CI containers frequently run as root; both outcomes are valid.
    match registrar.scope() {
        Scope::User => assert!(targets.iter().all(|t| t.path.starts_with(td.path()))),
        Scope::System => assert!(targets.iter().all(|t| !t.path.starts_with(td.path()))),
    }
}
