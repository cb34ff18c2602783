use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nm_registrar::{HostConfig, Registrar};

#[derive(Parser, Debug)]
#[command(name = "nm-registrar")]
#[command(about = "Register a native messaging host with Chrome and Firefox", long_about = None)]
struct Cli {
    /// Host description (TOML).
    #[arg(long, short)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the manifest for every browser.
    Install,
    /// Remove manifests, the host executable and its checksum file.
    Uninstall,
    /// Show where manifests go and whether they are present.
    Targets,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout only carries command output.
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = HostConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let identity = config.identity();
    let registrar = Registrar::native()?;

    match cli.command {
        Commands::Install => {
            let installed = registrar
                .install(&identity, &config.manifest())
                .with_context(|| format!("installing {}", identity.app_name))?;
            for target in installed {
                println!("{}", target.path.display());
            }
            Ok(())
        }
        Commands::Uninstall => registrar.uninstall_and_exit(&identity),
        Commands::Targets => {
            let present = registrar.verify(&identity)?;
            for target in registrar.targets(&identity)? {
                let state = if present.contains(&target) {
                    "installed"
                } else {
                    "missing"
                };
                println!("{}\t{}\t{}", target.browser, state, target.path.display());
            }
            Ok(())
        }
    }
}
