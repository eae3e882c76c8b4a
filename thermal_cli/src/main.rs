//! # ThermalSim CLI Application
//!
//! Terminal front end for the composite wall, fin and heat exchanger
//! calculators. Each subcommand fills in one calculator form, submits it to
//! the backend and prints the results; `--export` also saves the PDF report.
//! `shell` opens an interactive composite wall editor.

mod cli;
mod output;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thermal_core::calculators::{Calculator, CompositeWall, Fin, HeatExchanger};
use thermal_core::client::CalcClient;
use thermal_core::config::ThermalConfig;
use thermal_core::session::Session;
use thermal_core::transport::{HttpTransport, Transport};
use thermal_core::{ThermalError, ThermalResult};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands, ExportArgs};
use output::{format_chart, print_error, print_results};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match ThermalConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e, cli.json);
            return ExitCode::FAILURE;
        }
    };
    config.apply_env();
    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
    }

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    debug!(config = ?config, "configuration loaded");

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e, cli.json);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// 2 for input rejected before anything was sent, 1 for everything else.
fn exit_status(err: &ThermalError) -> u8 {
    if err.is_local() {
        2
    } else {
        1
    }
}

async fn run(cli: &Cli, config: &ThermalConfig) -> ThermalResult<()> {
    let client = CalcClient::new(HttpTransport::new(&config.server)?);
    info!(base_url = client.transport().base_url(), "using backend");

    match &cli.command {
        Commands::Wall { wall, export } => {
            let session = submit::<CompositeWall, _>(&client, &wall.to_form(), cli.json).await?;
            export_if_requested(&client, session, export, config).await
        }
        Commands::Fin { fin, export } => {
            let session = submit::<Fin, _>(&client, &fin.to_form(), cli.json).await?;
            if !cli.json {
                if let Some(rendered) = session.rendered() {
                    print!("{}", format_chart(&rendered.outputs.chart));
                }
            }
            export_if_requested(&client, session, export, config).await
        }
        Commands::Exchanger { exchanger, export } => {
            let session = submit::<HeatExchanger, _>(&client, &exchanger.to_form(), cli.json).await?;
            export_if_requested(&client, session, export, config).await
        }
        Commands::Shell { out_dir } => {
            let dir = out_dir.clone().unwrap_or_else(|| config.reports.output_dir.clone());
            shell::run(&client, &dir).await.map_err(|e| {
                ThermalError::file_error("read", "stdin", e.to_string())
            })
        }
    }
}

async fn submit<C: Calculator, T: Transport>(
    client: &CalcClient<T>,
    form: &C::Form,
    json: bool,
) -> ThermalResult<Session<C>> {
    let mut session = Session::<C>::new();
    client.calculate(&mut session, form).await?;
    print_results(&session, json);
    Ok(session)
}

async fn export_if_requested<C: Calculator, T: Transport>(
    client: &CalcClient<T>,
    mut session: Session<C>,
    args: &ExportArgs,
    config: &ThermalConfig,
) -> ThermalResult<()> {
    if !args.export {
        return Ok(());
    }
    let dir: PathBuf = args.out_dir.clone().unwrap_or_else(|| config.reports.output_dir.clone());
    let path = client.export(&mut session, &dir).await?;
    println!("Report saved to {}", path.display());
    Ok(())
}
