use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paysplit::application::checkout::CheckoutService;
use paysplit::application::dto::{ChargeSavedCardRequest, CheckoutRequest};
use paysplit::config::Config;
use paysplit::domain::ports::{PaymentProcessor, PaymentProcessorBox, SavedCard};
use paysplit::infrastructure::in_memory::InMemoryProcessor;
use paysplit::interfaces::csv::order_reader::OrderReader;
use paysplit::interfaces::csv::settlement_writer::SettlementWriter;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file. Without it, PAYSPLIT_* environment variables apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote settlements for a CSV batch of orders (order, total, debt, commission)
    Quote {
        /// Input orders CSV file
        input: PathBuf,
    },
    /// Run a checkout request (JSON) against an in-memory processor
    Checkout {
        /// Checkout request JSON file
        request: PathBuf,
    },
    /// Run a saved-card charge request (JSON) against an in-memory processor
    Charge {
        /// Charge request JSON file
        request: PathBuf,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).into_diagnostic()?;
    serde_json::from_reader(file).into_diagnostic()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;
    Ok(())
}

fn quote(service: &CheckoutService, input: &Path) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let reader = OrderReader::new(file);

    let stdout = io::stdout();
    let mut writer = SettlementWriter::new(stdout.lock());
    for order in reader.orders() {
        let quoted = order.and_then(|order| {
            let breakdown = service.quote(order.total, order.debt, order.commission)?;
            Ok((order, breakdown))
        });
        match quoted {
            Ok((order, breakdown)) => writer.write(&order.order, order.total, &breakdown)?,
            Err(e) => eprintln!("Error quoting order: {}", e),
        }
    }
    writer.flush()?;
    Ok(())
}

async fn checkout(config: Config, request: &Path) -> Result<()> {
    let request: CheckoutRequest = read_json(request)?;

    let processor = InMemoryProcessor::new();
    if let Some(customer_id) = &request.customer_id {
        processor.seed_customer(customer_id, "").await;
    }
    if let Some(account_id) = &request.connected_account_id {
        processor.seed_account(account_id, account_id).await;
    }

    let service = CheckoutService::new(Box::new(processor) as PaymentProcessorBox, config);
    let response = service.create_checkout_session(request).await?;
    print_json(&response)
}

async fn charge(config: Config, request: &Path) -> Result<()> {
    let request: ChargeSavedCardRequest = read_json(request)?;

    let processor = InMemoryProcessor::new();
    if let (Some(customer_id), Some(payment_method_id)) =
        (&request.customer_id, &request.payment_method_id)
    {
        processor.seed_customer(customer_id, "").await;
        processor
            .attach_card(
                customer_id,
                SavedCard {
                    id: payment_method_id.clone(),
                    brand: "visa".to_string(),
                    last4: "4242".to_string(),
                    exp_month: 12,
                    exp_year: 2030,
                },
            )
            .await?;
    }
    if let Some(account_id) = &request.connected_account_id {
        processor.seed_account(account_id, account_id).await;
    }

    let service = CheckoutService::new(Box::new(processor) as PaymentProcessorBox, config);
    let response = service.charge_saved_card(request).await?;
    print_json(&response)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Command::Quote { input } => {
            let service =
                CheckoutService::new(Box::new(InMemoryProcessor::new()) as PaymentProcessorBox, config);
            quote(&service, &input)
        }
        Command::Checkout { request } => checkout(config, &request).await,
        Command::Charge { request } => charge(config, &request).await,
    }
}
