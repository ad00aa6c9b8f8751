use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use tfh_ledger::{
    config::{app, database},
    core::{
        LedgerEngine, entries_for_bookings, parse_base_amount, sort_for_display, summarize,
        summarize_for_helper,
        summary::{format_currency, format_entry_line},
    },
    errors::{Error, Result},
    store::SeaOrmLedgerStore,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tfh-ledger")]
#[command(about = "Escrow ledger admin for Time For Hire bookings")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Optional settings file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a paid booking (payment-completion hook)
    Record {
        booking_id: String,
        /// Agreed job price before fees, e.g. 100 or 49.99
        amount: String,
        #[arg(long)]
        payment_intent: Option<String>,
    },
    /// List every entry, newest first
    List,
    /// Show one entry
    Show { booking_id: String },
    /// Release a pending payout (after the payout gateway succeeded)
    Release { booking_id: String },
    /// Hold a pending payout
    Hold { booking_id: String },
    /// Platform-wide totals
    Summary,
    /// Earnings for the helper owning the given bookings
    Helper {
        #[arg(required = true)]
        booking_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so DATABASE_URL / RUST_LOG from it are visible to clap and tracing
    dotenv().ok();

    let cli = Cli::parse();
    let app_config = app::load_optional_config(&cli.config)?;

    let default_filter = app_config.log_filter.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let database_url = database::resolve_database_url(cli.database_url, &app_config);
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let engine = LedgerEngine::new(SeaOrmLedgerStore::new(db));
    run(&engine, cli.command)
        .await
        .inspect_err(|e| error!("{}", e))
}

async fn run(engine: &LedgerEngine<SeaOrmLedgerStore>, command: Command) -> Result<()> {
    match command {
        Command::Record {
            booking_id,
            amount,
            payment_intent,
        } => {
            let base_amount = parse_base_amount(&amount)?;
            let entry = engine
                .create_entry_with_payment_intent(&booking_id, base_amount, payment_intent)
                .await?;
            println!("{}", format_entry_line(&entry));
        }
        Command::List => {
            let mut entries = engine.list_entries().await?;
            sort_for_display(&mut entries);
            for entry in &entries {
                println!("{}", format_entry_line(entry));
            }
            info!("{} entries", entries.len());
        }
        Command::Show { booking_id } => {
            let entry = engine
                .get_entry(&booking_id)
                .await?
                .ok_or(Error::NotFound { booking_id })?;
            println!("{}", format_entry_line(&entry));
            println!("  base          {}", format_currency(entry.base_amount));
            println!("  stripe fee    {}", format_currency(entry.stripe_fee));
            println!("  platform fee  {}", format_currency(entry.platform_fee));
            println!("  charity       {}", format_currency(entry.charity_amount));
            if let Some(intent) = &entry.payment_intent_id {
                println!("  payment ref   {intent}");
            }
        }
        Command::Release { booking_id } => {
            let entry = engine.release_payout(&booking_id).await?;
            println!("{}", format_entry_line(&entry));
        }
        Command::Hold { booking_id } => {
            let entry = engine.hold_payout(&booking_id).await?;
            println!("{}", format_entry_line(&entry));
        }
        Command::Summary => {
            let summary = summarize(&engine.list_entries().await?);
            println!("Total volume       {}", format_currency(summary.total_volume));
            println!("Helper earnings    {}", format_currency(summary.total_helper_earnings));
            println!("Platform revenue   {}", format_currency(summary.total_platform_revenue));
            println!("Charity            {}", format_currency(summary.total_charity));
            println!("Stripe fees        {}", format_currency(summary.total_stripe_fees));
            println!("Jobs               {}", summary.total_jobs);
        }
        Command::Helper { booking_ids } => {
            let entries = engine.list_entries().await?;
            let earnings = summarize_for_helper(&entries_for_bookings(&entries, &booking_ids));
            println!("Pending   {}", format_currency(earnings.total_pending()));
            println!("Released  {}", format_currency(earnings.total_released()));
            println!("Held      {}", format_currency(earnings.held.total));
            for entry in earnings
                .pending
                .entries
                .iter()
                .chain(&earnings.released.entries)
                .chain(&earnings.held.entries)
            {
                println!("  {}", format_entry_line(entry));
            }
        }
    }
    Ok(())
}
