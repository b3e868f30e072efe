use clap::{Parser, Subcommand};
use handlepay::application::controller::{PaymentFlowController, PayOutcome};
use handlepay::application::session::{Gate, SearchView};
use handlepay::config::{ChainConfig, Config, Environment};
use handlepay::interfaces::json::fixture_reader::FixtureReader;
use handlepay::interfaces::terminal::TerminalNotifier;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session fixture (JSON) describing the wallet and the searchable profiles
    #[arg(long)]
    fixture: PathBuf,

    /// Deployment environment; selects the network payments are sent on
    #[arg(long, env = "HANDLEPAY_ENV", value_enum, default_value_t = Environment::Development)]
    environment: Environment,

    /// Connect the wallet before running the command
    #[arg(long)]
    connect: bool,

    /// Ask the wallet to switch to the target network before running the command
    #[arg(long)]
    switch_network: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show network, balance and whether the payment UI is available
    Status,
    /// Search profiles by handle
    Search { query: String },
    /// Pay the profile with exactly this handle
    Pay { handle: String, amount: String },
}

fn prompt(gate: Gate, chain: &ChainConfig) -> Option<String> {
    match gate {
        Gate::ConnectWallet => Some("Connect your wallet to continue.".to_string()),
        Gate::SwitchNetwork { chain_id } => Some(format!(
            "Switch to {} (chain {}) to continue.",
            chain.name, chain_id
        )),
        Gate::Ready => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::for_environment(cli.environment);

    let file = File::open(&cli.fixture).into_diagnostic()?;
    let fixture = FixtureReader::new(file).read().into_diagnostic()?;
    let (wallet, directory) = fixture
        .into_collaborators(config.chain.native_decimals)
        .into_diagnostic()?;

    let controller = PaymentFlowController::new(
        config,
        Box::new(wallet),
        Box::new(directory),
        Box::new(TerminalNotifier::new(io::stdout())),
    );

    let mut gate = controller.sync_wallet().await.into_diagnostic()?;
    if cli.connect && gate == Gate::ConnectWallet {
        gate = controller.connect_wallet().await.into_diagnostic()?;
    }
    if cli.switch_network && matches!(gate, Gate::SwitchNetwork { .. }) {
        gate = controller.switch_network().await.into_diagnostic()?;
    }

    if let Command::Status = cli.command {
        println!("environment: {}", config.environment);
        println!("network: {} ({})", config.chain.name, config.chain.chain_id);
        match controller.balance().await {
            Some(balance) => println!("balance: {balance}"),
            None => println!("balance: unknown"),
        }
        println!(
            "{}",
            prompt(gate, &config.chain).unwrap_or_else(|| "Ready to pay.".to_string())
        );
        return Ok(());
    }

    if let Some(message) = prompt(gate, &config.chain) {
        println!("{message}");
        return Ok(());
    }

    match cli.command {
        Command::Status => {}
        Command::Search { query } => {
            controller.set_search_text(query).await;
            controller.wait_for_quiet().await;
            match controller.refresh_search().await.into_diagnostic()? {
                SearchView::Results(profiles) if !profiles.is_empty() => {
                    for profile in profiles {
                        println!(
                            "{}\t{}\t{}",
                            profile.handle,
                            profile.display_name(),
                            profile.owned_by
                        );
                    }
                }
                _ => println!("No profiles found."),
            }
        }
        Command::Pay { handle, amount } => {
            controller.set_search_text(handle.clone()).await;
            controller.wait_for_quiet().await;
            if let SearchView::Results(profiles) =
                controller.refresh_search().await.into_diagnostic()?
                && let Some(profile) = profiles
                    .into_iter()
                    .find(|profile| profile.handle.eq_ignore_ascii_case(handle.trim()))
            {
                controller.select_profile(profile).await;
            }
            controller.set_amount(amount).await;

            // Outcomes that matter to the user were already printed by the notifier.
            if let PayOutcome::Sent { .. } = controller.pay().await.into_diagnostic()?
                && let Some(balance) = controller.balance().await
            {
                println!("Remaining balance: {balance}");
            }
        }
    }

    Ok(())
}
