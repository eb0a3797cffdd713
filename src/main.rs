use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use trippay::application::engine::PaymentEngine;
use trippay::config::{DEFAULT_FALLBACK_PRICE, PaymentConfig};
use trippay::domain::booking::parse_trip_date;
use trippay::domain::card::CardDetails;
use trippay::domain::ports::{BookingStoreBox, PaymentProcessorBox};
use trippay::infrastructure::in_memory::InMemoryBookingStore;
use trippay::infrastructure::simulated_processor::SimulatedCardProcessor;
use trippay::interfaces::csv::schedule_writer::ScheduleWriter;
use trippay::interfaces::json::booking_reader::BookingReader;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bookings JSON file (one booking or an array) to load into the store
    #[arg(long)]
    bookings: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Clock override, RFC 3339 or YYYY-MM-DD (defaults to the current time)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Total price used when a booking's listing has no price
    #[arg(long, default_value_t = DEFAULT_FALLBACK_PRICE)]
    fallback_price: Decimal,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the payment schedule of one booking, or of every stored booking
    Schedule {
        #[arg(long)]
        booking: Option<String>,
    },
    /// Pay one milestone of a booking and print its refreshed schedule
    Pay {
        #[arg(long)]
        booking: String,

        /// Milestone to pay: 1 (deposit), 2 (second installment) or 3 (final)
        #[arg(long)]
        milestone: u8,

        #[arg(long)]
        cardholder: String,

        #[arg(long)]
        card_number: String,

        /// Card expiry, MM/YY
        #[arg(long)]
        expiry: String,

        #[arg(long)]
        cvv: String,

        /// Simulated card processing time in milliseconds
        #[arg(long, default_value_t = 2000)]
        processing_delay_ms: u64,
    },
}

fn parse_now(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_trip_date(raw).ok_or_else(|| format!("invalid timestamp: {raw}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<BookingStoreBox> {
    use trippay::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?)),
        None => Ok(Box::new(InMemoryBookingStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<BookingStoreBox> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(Box::new(InMemoryBookingStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);

    let mut config = PaymentConfig::default().with_fallback_price(cli.fallback_price);
    if let Command::Pay {
        processing_delay_ms,
        ..
    } = &cli.command
    {
        config = config.with_processing_delay(Duration::from_millis(*processing_delay_ms));
    }

    let store = open_store(cli.db_path)?;
    let processor: PaymentProcessorBox = Box::new(SimulatedCardProcessor::from_config(&config));
    let engine = PaymentEngine::new(store, processor, config);

    if let Some(path) = cli.bookings {
        let file = File::open(path).into_diagnostic()?;
        let bookings = BookingReader::new(file).bookings().into_diagnostic()?;
        for booking in bookings {
            let booking_id = booking.id.clone();
            if let Err(e) = engine.seed_booking(booking).await {
                tracing::error!(%booking_id, "Error storing booking: {}", e);
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = ScheduleWriter::new(stdout.lock());

    match cli.command {
        Command::Schedule { booking: Some(id) } => {
            let overview = engine.overview(&id, now).await.into_diagnostic()?;
            writer
                .write_schedule(&overview.booking_id, &overview.schedule)
                .into_diagnostic()?;
        }
        Command::Schedule { booking: None } => {
            for overview in engine.overviews(now).await.into_diagnostic()? {
                writer
                    .write_schedule(&overview.booking_id, &overview.schedule)
                    .into_diagnostic()?;
            }
        }
        Command::Pay {
            booking,
            milestone,
            cardholder,
            card_number,
            expiry,
            cvv,
            ..
        } => {
            let card =
                CardDetails::new(&cardholder, &card_number, &expiry, &cvv).into_diagnostic()?;
            let receipt = engine
                .pay_milestone(&booking, milestone, &card, now)
                .await
                .into_diagnostic()?;
            eprintln!("Payment Successful! {}", receipt.message);
            tracing::info!(
                booking_id = %receipt.booking_id,
                milestone_id = receipt.milestone_id,
                amount = %receipt.amount,
                "Payment receipt issued"
            );
            writer
                .write_schedule(&receipt.booking_id, &receipt.schedule)
                .into_diagnostic()?;
        }
    }

    writer.finish().into_diagnostic()?;
    Ok(())
}
