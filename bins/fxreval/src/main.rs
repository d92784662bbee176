//! fxreval runner
//!
//! Computes the open foreign-currency balances of one or more companies at a valuation
//! date and prints them as JSON.

mod args;

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxreval_core::revaluation::RevaluationRequest;
use fxreval_db::{CompanyRowFilter, RevaluationRepository, connect_with_config};
use fxreval_shared::{AppConfig, AppError};

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxreval=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Revaluation run failed");
            eprintln!("error: {err:#}");
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load().map_err(|e| AppError::Configuration(e.to_string()))?;

    let db = connect_with_config(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let repo = RevaluationRepository::new(db)
        .with_statement_timeout(config.revaluation.statement_timeout_secs);

    let accounts = if args.accounts.is_empty() {
        let mut flagged = BTreeSet::new();
        for &company in &args.companies {
            flagged.extend(
                repo.revaluation_account_ids(company)
                    .await
                    .map_err(AppError::from)?,
            );
        }
        flagged
    } else {
        args.accounts.iter().copied().collect()
    };
    info!(accounts = accounts.len(), "Resolved accounts");

    let mut request = RevaluationRequest::new(args.date)
        .with_accounts(accounts)
        .with_companies(args.companies.iter().copied());
    if let Some(functional) = args.functional_currency {
        request = request.with_functional_currency(functional);
    }

    let table = repo
        .compute_revaluations(&request, &CompanyRowFilter::new(args.companies.iter().copied()))
        .await
        .map_err(AppError::from)?;

    let mut stdout = io::stdout().lock();
    if args.rates.is_empty() {
        write_json(&mut stdout, &table, args.pretty)?;
    } else {
        let rates = args.rate_table();
        let revalued = table
            .revalue(|currency| rates.get(&currency).copied(), config.revaluation.decimal_places)
            .map_err(|e| AppError::Computation(e.to_string()))?;
        write_json(&mut stdout, &revalued, args.pretty)?;
    }
    writeln!(stdout)?;

    Ok(())
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(out, value)?;
    } else {
        serde_json::to_writer(out, value)?;
    }
    Ok(())
}
