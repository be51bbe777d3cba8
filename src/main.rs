use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use drush_task::build::Build;
use drush_task::config::BuildFile;
use drush_task::exec::ShellExecutor;
use drush_task::props::{MemoryStore, PropertyStore};
use drush_task::render::ExecMode;

#[derive(Parser)]
#[command(name = "drush-task")]
#[command(author, version, about = "Run Drush tasks declared in a YAML build file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute every task in the build file
    Run {
        /// Path to the YAML build file
        file: PathBuf,

        /// Set a property, e.g. -D drush.root=/var/www
        #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
        defines: Vec<String>,

        /// Spawn Drush directly instead of through the shell
        #[arg(long)]
        direct: bool,
    },
    /// Print the command line of every task without executing
    Plan {
        /// Path to the YAML build file
        file: PathBuf,

        /// Set a property, e.g. -D drush.root=/var/www
        #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
        defines: Vec<String>,
    },
}

fn store_from(defines: &[String]) -> Result<MemoryStore, Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    for d in defines {
        let (k, v) = d.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{}'", d))?;
        store.set(k.trim(), v);
    }
    Ok(store)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, defines, direct } => {
            let build_file = BuildFile::load(&file)?;
            info!("Loaded {} task(s) from: {}", build_file.tasks.len(), file.display());
            let mut build = Build::new(store_from(&defines)?);
            if direct {
                build = build.with_mode(ExecMode::Direct);
            }
            match build.run(&build_file, &ShellExecutor) {
                Ok(report) => {
                    for t in report.tasks.iter().filter(|t| t.had_error) {
                        info!("Task '{}' reported an error", t.label);
                    }
                    Ok(())
                }
                Err(e) => {
                    error!("BUILD FAILED: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Plan { file, defines } => {
            let build_file = BuildFile::load(&file)?;
            for line in Build::new(store_from(&defines)?).plan(&build_file)? {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
