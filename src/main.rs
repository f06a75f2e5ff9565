use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codedocs::ai::SharedBackend;
use codedocs::{
    Config, ConfigLoader, GenerationOrchestrator, GitHubClient, InMemoryJobStore, JobService,
    JobStore, OllamaClient, PipelineCoordinator, RepositoryHost,
};

#[derive(Parser)]
#[command(name = "codedocs")]
#[command(version, about = "AI-powered README generator for remote code repositories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Path to a specific config file")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, help = "Bind host override")]
        host: Option<String>,
        #[arg(long, short, help = "Bind port override")]
        port: Option<u16>,
    },

    /// Analyze one repository and print the generated README
    Analyze {
        #[arg(help = "GitHub repository URL")]
        repo_url: String,
        #[arg(long, help = "Free-text context passed to generation")]
        context: Option<String>,
        #[arg(long, short, help = "Write the document to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the merged configuration
    Show,
    /// Show configuration file paths
    Path,
    /// Write the default project configuration
    Init,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcodedocs encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if config.github.token.is_none() {
        config.github.token = std::env::var("GITHUB_TOKEN").ok();
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(config))?;
        }
        Commands::Analyze {
            repo_url,
            context,
            output,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(analyze_once(config, repo_url, context, output))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Path => {
                if let Some(global) = ConfigLoader::global_config_path() {
                    println!("global:  {}", global.display());
                }
                println!("project: {}", ConfigLoader::project_config_path().display());
            }
            ConfigAction::Init => {
                let path = ConfigLoader::init_project()?;
                println!("Wrote default configuration to {}", path.display());
            }
        },
    }

    Ok(())
}

/// Wire the store, host, backend, and coordinator into a job service.
fn build_service(config: &Config) -> anyhow::Result<(JobService, SharedBackend)> {
    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let host: Arc<dyn RepositoryHost> = Arc::new(GitHubClient::new(&config.github)?);
    let backend: SharedBackend = Arc::new(OllamaClient::new(&config.generation)?);
    let orchestrator = Arc::new(GenerationOrchestrator::from_config(
        backend.clone(),
        &config.generation,
    ));
    let coordinator = Arc::new(PipelineCoordinator::new(store.clone(), host, orchestrator));
    Ok((JobService::new(store, coordinator), backend))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let (service, backend) = build_service(&config)?;
    let state = codedocs::server::AppState { service, backend };
    codedocs::server::run(&config.server, state).await?;
    Ok(())
}

/// One-shot mode: submit a job, poll it to a terminal state, and emit
/// the document.
async fn analyze_once(
    config: Config,
    repo_url: String,
    context: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (service, _backend) = build_service(&config)?;
    let job_id = service.submit_job(&repo_url, context)?;

    let mut last_stage = String::new();
    let result = loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        let status = service.get_status(&job_id)?;
        if status.progress.stage != last_stage {
            last_stage = status.progress.stage.clone();
            eprintln!("[{:>3}%] {}", status.progress.percentage, last_stage);
        }

        match status.status {
            codedocs::types::JobStatus::Completed => break service.get_result(&job_id)?,
            codedocs::types::JobStatus::Failed => {
                anyhow::bail!(
                    "analysis failed: {}",
                    status.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
            codedocs::types::JobStatus::Processing => {}
        }
    };

    eprintln!(
        "Analyzed {} files: {} functions, {} classes, {} endpoints",
        result.metadata.files_analyzed,
        result.metadata.functions_found,
        result.metadata.classes_found,
        result.metadata.endpoints_found,
    );

    match output {
        Some(path) => {
            std::fs::write(&path, &result.document)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", result.document),
    }

    Ok(())
}
