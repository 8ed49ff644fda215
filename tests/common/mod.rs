#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use payout_console::application::console::PayoutConsole;
use payout_console::config::ConsoleConfig;
use payout_console::domain::money::{Amount, Balance};
use payout_console::domain::request::{PayoutMethod, PayoutRequest, PayoutStatus, Priority};
use payout_console::infrastructure::in_memory::{InMemoryExporter, InMemoryRequestStore};
use payout_console::infrastructure::seed::{REFERENCE_DATE, reference_requests};
use payout_console::interfaces::csv::request_writer::RequestWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::time::Duration;

const NAMES: [&str; 6] = [
    "Asha Rao",
    "Dev Shah",
    "Meera Iyer",
    "Kabir Malhotra",
    "Ishaan Bose",
    "Tara Menon",
];

/// Console over the reference dataset with no simulated latency.
pub fn seeded_console() -> (PayoutConsole, InMemoryExporter) {
    seeded_console_with_latency(Duration::ZERO)
}

pub fn seeded_console_with_latency(latency: Duration) -> (PayoutConsole, InMemoryExporter) {
    let store = InMemoryRequestStore::with_requests(reference_requests().unwrap()).unwrap();
    let exporter = InMemoryExporter::new();
    let config = ConsoleConfig::default()
        .with_today(REFERENCE_DATE)
        .with_latency(latency);
    let console = PayoutConsole::new(Box::new(store), Box::new(exporter.clone()), config);
    (console, exporter)
}

/// Deterministic pseudo-random payout requests, many sharing dates and amounts.
pub fn generated_requests(count: usize, seed: u64) -> Vec<PayoutRequest> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let priorities = [Priority::High, Priority::Medium, Priority::Low];

    (1..=count)
        .map(|i| {
            let name = *NAMES.choose(&mut rng).unwrap();
            let affiliate = rng.gen_range(1..=20);
            let slug = name.to_lowercase().replace(' ', ".");
            PayoutRequest {
                id: format!("GEN{i:04}"),
                affiliate_id: format!("AFF{affiliate:03}"),
                affiliate_name: name.to_string(),
                affiliate_email: format!("{slug}@example.com"),
                amount: Amount::new(Decimal::from(rng.gen_range(1..=40i64) * 500)).unwrap(),
                request_date: start + Days::new(rng.gen_range(0..10)),
                status: *PayoutStatus::ALL.choose(&mut rng).unwrap(),
                method: *PayoutMethod::ALL.choose(&mut rng).unwrap(),
                account_details: format!("acct-{i}"),
                earnings: Balance::new(Decimal::from(rng.gen_range(10_000..200_000i64))),
                previous_payouts: Balance::new(Decimal::from(rng.gen_range(0..10_000i64))),
                join_date: start,
                priority: *priorities.choose(&mut rng).unwrap(),
            }
        })
        .collect()
}

pub fn write_requests_csv(path: &Path, requests: &[PayoutRequest]) -> Result<(), Error> {
    let file = File::create(path)?;
    RequestWriter::new(file)
        .write_requests(requests)
        .map_err(Error::other)?;
    Ok(())
}
