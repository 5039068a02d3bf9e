use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Vigil — deployment health verification",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a verification session to completion.
    ///
    /// Probes every configured endpoint in bounded rounds until all
    /// classify healthy, the attempt budget runs out, or the run is
    /// interrupted. Exit code: 0 succeeded, 1 exhausted, 2 aborted.
    Verify {
        /// Path to the configuration file.
        #[arg(short, long, default_value = "vigil.toml")]
        config: String,
        /// Write the JSON report artifact to this path.
        #[arg(long)]
        report_file: Option<String>,
        /// Override [poll].max_attempts from the config.
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Override [poll].interval_secs from the config.
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Override [poll].timeout_secs from the config.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Generate a starter vigil.toml
    Init {
        /// Where to write the scaffold.
        #[arg(short, long, default_value = "vigil.toml")]
        path: String,
        /// Base URL of the service to verify.
        #[arg(long, default_value = "http://localhost:8080")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vigil_session=debug,vigil_probe=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            config,
            report_file,
            max_attempts,
            interval_secs,
            timeout_secs,
        } => {
            let overrides = commands::verify::PollOverrides {
                max_attempts,
                interval_secs,
                timeout_secs,
            };
            let outcome =
                commands::verify::run(&config, report_file.as_deref(), overrides).await?;
            let code = commands::verify::exit_code(outcome);
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Init { path, base_url } => commands::init::run(&path, &base_url),
    }
}
