//! Command-line arguments.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::Parser;
use fxreval_shared::types::{AccountId, CompanyId, CurrencyId};
use rust_decimal::Decimal;

/// Compute open foreign-currency balances to revalue at a valuation date.
#[derive(Parser, Debug)]
#[command(name = "fxreval", version, about)]
pub struct Args {
    /// Valuation date (YYYY-MM-DD).
    #[arg(short, long)]
    pub date: NaiveDate,

    /// Company to revalue; repeat to revalue several companies together.
    #[arg(short, long = "company", value_name = "COMPANY", required = true)]
    pub companies: Vec<CompanyId>,

    /// Accounts to revalue; defaults to the accounts flagged for revaluation.
    #[arg(short, long = "account", value_name = "ACCOUNT")]
    pub accounts: Vec<AccountId>,

    /// Period-end rate as CURRENCY=RATE; prints revalued rows when given.
    #[arg(short, long = "rate", value_name = "CURRENCY=RATE", value_parser = parse_rate)]
    pub rates: Vec<(CurrencyId, Decimal)>,

    /// Functional currency of the company; its lines are never revalued.
    #[arg(short, long)]
    pub functional_currency: Option<CurrencyId>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl Args {
    /// Returns the supplied rates keyed by currency; later values win.
    #[must_use]
    pub fn rate_table(&self) -> HashMap<CurrencyId, Decimal> {
        self.rates.iter().copied().collect()
    }
}

/// Parses `CURRENCY=RATE` with a positive decimal rate.
pub fn parse_rate(value: &str) -> Result<(CurrencyId, Decimal), String> {
    let (currency, rate) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CURRENCY=RATE, got '{value}'"))?;
    let currency = CurrencyId::from_str(currency.trim())
        .map_err(|e| format!("invalid currency id '{currency}': {e}"))?;
    let rate = Decimal::from_str(rate.trim()).map_err(|e| format!("invalid rate '{rate}': {e}"))?;
    if rate <= Decimal::ZERO {
        return Err(format!("rate must be positive, got {rate}"));
    }
    Ok((currency, rate))
}
