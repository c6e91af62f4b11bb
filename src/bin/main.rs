// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Parser, Subcommand, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use payment_chain::scenarios::{self, OrderingComparison};
use payment_chain::{CURRENCY_SYMBOL, Payment, PaymentError, Quote, report};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Payment Chain - Price payments through ordered fee, tax and discount steps
///
/// Either prices every row of a CSV file, or walks through the built-in
/// scenarios with boxed console output.
#[derive(Parser, Debug)]
#[command(name = "payment-chain")]
#[command(about = "Applies ordered adjustment chains to payment amounts", long_about = None)]
struct Args {
    /// Log every priced row (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price each payment in a CSV file and print the quotes to stdout
    Price {
        /// Path to CSV file with payments
        ///
        /// Expected format: label,amount,adjustments
        /// Example: payment-chain price payments.csv > quotes.csv
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Walk through the built-in payment scenarios
    Demo,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Price { input, format } => price(&input, format),
        Command::Demo => run_demo(&mut io::stdout().lock()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs a compact stderr subscriber; stdout is reserved for output.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn price(input: &Path, format: Format) -> Result<(), CliError> {
    let file = File::open(input).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("cannot open '{}': {}", input.display(), e),
        )
    })?;

    let quotes = process_payments(BufReader::new(file))?;
    info!(priced = quotes.len(), "finished pricing");

    let stdout = io::stdout();
    write_quotes(&quotes, stdout.lock(), format)
}

/// Raw CSV record matching the input format.
///
/// Fields: `label, amount, adjustments`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    label: String,
    amount: Decimal,
    #[serde(default)]
    adjustments: String,
}

impl CsvRecord {
    /// Builds the chain described by this row.
    ///
    /// `adjustments` is a `;`-separated list of step specs, applied left to right.
    fn into_payment(self) -> Result<Payment, PaymentError> {
        let base = Payment::new(self.amount, self.label)?;
        self.adjustments
            .split(';')
            .map(str::trim)
            .filter(|spec| !spec.is_empty())
            .try_fold(base, |payment, spec| Ok(payment.wrap(spec.parse()?)))
    }
}

/// Prices payments from a CSV reader.
///
/// Rows are streamed one at a time. Malformed rows, rows whose chain
/// cannot be built and rows whose total overflows are skipped with a warning.
///
/// # CSV Format
///
/// Expected columns: `label, amount, adjustments`
/// - `label`: Payment instrument (UPI, Card, ...)
/// - `amount`: Non-negative decimal base amount
/// - `adjustments`: Step specs separated by `;` (may be empty)
///
/// # Example
///
/// ```csv
/// label,amount,adjustments
/// UPI,10000,gst;processing-fee
/// Net Banking,10000,gst;processing-fee;cashback:500
/// Card,2500,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
fn process_payments<R: Read>(reader: R) -> Result<Vec<Quote>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut quotes = Vec::new();
    for (index, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row, error = %e, "skipping malformed row");
                continue;
            }
        };

        match record.into_payment().and_then(|payment| payment.try_quote()) {
            Ok(quote) => {
                debug!(row, payment = %quote.payment, total = %quote.total, "priced");
                quotes.push(quote);
            }
            Err(e) => warn!(row, error = %e, "skipping invalid payment"),
        }
    }

    Ok(quotes)
}

/// Writes quotes in the requested format.
///
/// CSV columns: `payment, base, total, description`, amounts with two
/// decimal places. JSON is a pretty-printed array of the same objects.
fn write_quotes<W: Write>(quotes: &[Quote], mut writer: W, format: Format) -> Result<(), CliError> {
    match format {
        Format::Csv => {
            let mut wtr = Writer::from_writer(writer);
            for quote in quotes {
                wtr.serialize(quote)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, quotes)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Prints the narrated walkthrough of every scenario.
fn run_demo<W: Write>(out: &mut W) -> Result<(), CliError> {
    write!(out, "{}", report::header("PAYMENT CHAIN - FINTECH PAYMENT SYSTEM"))?;

    for scenario in scenarios::walkthrough()? {
        write!(out, "{}", report::section(scenario.title))?;
        writeln!(out, "{}\n", scenario.intro)?;
        write!(out, "{}", report::payment_details(&scenario.payment))?;
        writeln!(out, "\nResult: {}\n", scenario.outcome)?;
    }

    write!(out, "{}", report::section("SCENARIO 6: Does Step Order Matter?"))?;
    for comparison in scenarios::ordering_comparisons()? {
        write_comparison(out, &comparison)?;
    }
    writeln!(
        out,
        "Note: every step works on the running amount left by the step before it,"
    )?;
    writeln!(
        out,
        "so two steps only commute when their formulas happen to allow it.\n"
    )?;

    write!(out, "{}", report::header("DEMO COMPLETED"))?;
    Ok(())
}

fn write_comparison<W: Write>(out: &mut W, comparison: &OrderingComparison) -> Result<(), CliError> {
    for (i, payment) in [&comparison.first, &comparison.second].into_iter().enumerate() {
        let order: Vec<&str> = std::iter::once("Base")
            .chain(payment.steps().into_iter().map(|step| step.name()))
            .collect();
        writeln!(out, "ORDER {}: {}", i + 1, order.join(" → "))?;
        writeln!(out, "   Description: {}", payment.describe())?;
        writeln!(
            out,
            "   Final Amount: {CURRENCY_SYMBOL}{}",
            report::format_amount(payment.apply())
        )?;
    }

    if comparison.same_result() {
        writeln!(out, "\nResult: order does not change the amount for these steps\n")?;
    } else {
        writeln!(
            out,
            "\nResult: order DOES matter, difference {CURRENCY_SYMBOL}{}\n",
            report::format_amount(comparison.difference())
        )?;
    }
    Ok(())
}
