mod common;

use common::Sandbox;
use nm_registrar::{FixedProbe, HostIdentity, OsFamily, Registrar};
use std::{env, path::PathBuf, process::Command};

const CHILD_HOME: &str = "NM_REGISTRAR_CHILD_HOME";
const CHILD_EXE: &str = "NM_REGISTRAR_CHILD_EXE";

/// Re-runs this test binary so the child can exit without taking the harness down.
#[test]
fn uninstall_and_exit_terminates_with_success() {
    if let (Ok(home), Ok(exe)) = (env::var(CHILD_HOME), env::var(CHILD_EXE)) {
        let registrar = Registrar::for_os(OsFamily::Linux, FixedProbe::user(home));
        let identity = HostIdentity::new("com.example.exit", PathBuf::from(exe));
        registrar.uninstall_and_exit(&identity);
    }

    let sb = Sandbox::new("com.example.exit");
    let output = Command::new(env::current_exe().unwrap())
        .args([
            "--exact",
            "uninstall_and_exit_terminates_with_success",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(CHILD_HOME, &sb.home)
        .env(CHILD_EXE, &sb.identity.exec_path)
        .output()
        .expect("spawn child test");

    assert!(output.status.success(), "{output:?}");
    // The harness never got to print its summary.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("test result:"), "{stdout}");

    // Nothing was installed; the host files were still removed.
    assert!(!sb.identity.exec_path.exists());
    assert!(!sb.identity.checksum_path().exists());
}
