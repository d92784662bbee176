//! Property-based tests for `RevaluationService`.
//!
//! Feature: fx-revaluation
//! - Property 1: Idempotence
//! - Property 2: Conservation
//! - Property 3: Exclusion Correctness
//! - Property 4: Partner Segmentation
//! - Property 5: Deterministic Ordering

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use fxreval_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::classification::AccountType;
use super::filter::{AllowAll, select_candidates};
use super::fixtures::{LineBuilder, date, id, partial};
use super::reconciliation::ReconciliationIndex;
use super::service::RevaluationService;
use super::types::{LedgerLine, LedgerSnapshot, RevaluationRequest};

const RECEIVABLE: u128 = 1;
const BANK: u128 = 2;
const OTHER: u128 = 3;

fn classifier() -> HashMap<AccountId, AccountType> {
    HashMap::from([
        (id(RECEIVABLE), AccountType::AssetReceivable),
        (id(BANK), AccountType::AssetCash),
    ])
}

fn request(valuation_date: NaiveDate) -> RevaluationRequest {
    RevaluationRequest::new(valuation_date)
        .with_accounts([id(RECEIVABLE), id(BANK), id(OTHER)])
        .with_companies([id(1)])
}

fn day(offset: u64) -> NaiveDate {
    date(2024, 1, 1) + Days::new(offset)
}

/// Strategy to generate amounts in cents (0.01 to 1,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate one line shape: account, partner, currency, side,
/// amount, day offset and whether it is fully reconciled.
fn line_shape() -> impl Strategy<Value = (u128, Option<u128>, Option<u128>, bool, Decimal, u64, bool)>
{
    (
        RECEIVABLE..=OTHER,
        prop::option::of(5u128..=7),
        prop::option::weighted(0.9, 10u128..=12),
        any::<bool>(),
        amount(),
        0u64..60,
        any::<bool>(),
    )
}

/// Strategy to generate a snapshot with partial reconciliations between its lines.
fn snapshot() -> impl Strategy<Value = LedgerSnapshot> {
    (
        prop::collection::vec(line_shape(), 1..30),
        prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..15),
    )
        .prop_map(|(shapes, pairs)| {
            let lines: Vec<LedgerLine> = shapes
                .into_iter()
                .enumerate()
                .map(|(n, (account, partner, currency, is_debit, amount, offset, reconciled))| {
                    let n = n as u128 + 1;
                    let mut builder = if is_debit {
                        LineBuilder::debit(n, id(account), amount)
                    } else {
                        LineBuilder::credit(n, id(account), amount)
                    }
                    .dated(day(offset));
                    if let Some(partner) = partner {
                        builder = builder.partner(id(partner));
                    }
                    if let Some(currency) = currency {
                        builder = builder.currency(id(currency));
                    }
                    if reconciled {
                        builder = builder.reconciled(n);
                    }
                    builder.build()
                })
                .collect();

            let partials = pairs
                .into_iter()
                .enumerate()
                .map(|(n, (debit, credit))| {
                    let debit_line = debit.index(lines.len()) as u128 + 1;
                    let credit_line = credit.index(lines.len()) as u128 + 1;
                    partial(n as u128 + 1, debit_line, credit_line)
                })
                .collect();

            LedgerSnapshot::new(lines, partials)
        })
}

/// Returns the candidate lines of a request that are closed at its valuation date.
fn closed_lines(snapshot: &LedgerSnapshot, request: &RevaluationRequest) -> Vec<LedgerLine> {
    let index = ReconciliationIndex::build(snapshot).unwrap();
    select_candidates(snapshot.lines(), request, &AllowAll)
        .unwrap()
        .into_iter()
        .filter(|line| !index.is_open(line, request.valuation_date))
        .cloned()
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Feature: fx-revaluation, Property 1: Idempotence
    /// Two runs over the same snapshot yield identical content and ordering.
    #[test]
    fn prop_compute_is_idempotent(snapshot in snapshot(), offset in 0u64..60) {
        let request = request(day(offset));
        let first = RevaluationService::compute(&request, &snapshot, &AllowAll, &classifier()).unwrap();
        let second = RevaluationService::compute(&request, &snapshot, &AllowAll, &classifier()).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Feature: fx-revaluation, Property 2: Conservation
    /// Every row satisfies debit - credit = balance exactly, and totals match the open lines.
    #[test]
    fn prop_balances_are_conserved(snapshot in snapshot(), offset in 0u64..60) {
        let request = request(day(offset));
        let table = RevaluationService::compute(&request, &snapshot, &AllowAll, &classifier()).unwrap();

        for row in &table {
            prop_assert_eq!(row.debit - row.credit, row.balance);
        }

        let index = ReconciliationIndex::build(&snapshot).unwrap();
        let open: Vec<&LedgerLine> = select_candidates(snapshot.lines(), &request, &AllowAll)
            .unwrap()
            .into_iter()
            .filter(|line| index.is_open(line, request.valuation_date))
            .collect();

        let open_debit: Decimal = open.iter().map(|line| line.debit).sum();
        let open_foreign: Decimal = open.iter().map(|line| line.amount_currency).sum();
        prop_assert_eq!(table.rows().map(|row| row.debit).sum::<Decimal>(), open_debit);
        prop_assert_eq!(table.rows().map(|row| row.foreign_balance).sum::<Decimal>(), open_foreign);
    }

    /// Feature: fx-revaluation, Property 3: Exclusion Correctness
    /// Changing the amounts of closed lines never changes the table.
    #[test]
    fn prop_closed_lines_contribute_nothing(snapshot in snapshot(), offset in 0u64..60) {
        let request = request(day(offset));
        let closed = closed_lines(&snapshot, &request);
        let closed_ids: Vec<_> = closed.iter().map(|line| line.id).collect();

        // Doubling keeps the sign, so open/closed status is unchanged.
        let scaled: Vec<LedgerLine> = snapshot
            .lines()
            .iter()
            .cloned()
            .map(|mut line| {
                if closed_ids.contains(&line.id) {
                    line.debit *= Decimal::TWO;
                    line.credit *= Decimal::TWO;
                    line.amount_currency *= Decimal::TWO;
                }
                line
            })
            .collect();
        let scaled = LedgerSnapshot::new(scaled, snapshot.partials().to_vec());

        let original = RevaluationService::compute(&request, &snapshot, &AllowAll, &classifier()).unwrap();
        let mutated = RevaluationService::compute(&request, &scaled, &AllowAll, &classifier()).unwrap();
        prop_assert_eq!(original, mutated);

        for line in &closed {
            prop_assert!(line.is_fully_reconciled());
        }
    }

    /// Feature: fx-revaluation, Property 4: Partner Segmentation
    /// Rows of cash and unclassified accounts never carry a partner.
    #[test]
    fn prop_only_receivable_rows_have_partner(snapshot in snapshot(), offset in 0u64..60) {
        let table = RevaluationService::compute(&request(day(offset)), &snapshot, &AllowAll, &classifier()).unwrap();

        for row in &table {
            if row.account_id != id::<AccountId>(RECEIVABLE) {
                prop_assert!(row.partner_id.is_none());
            }
        }
    }

    /// Feature: fx-revaluation, Property 5: Deterministic Ordering
    /// Rows are strictly increasing by (account, partner with null first, currency).
    #[test]
    fn prop_rows_strictly_ordered(snapshot in snapshot(), offset in 0u64..60) {
        let table = RevaluationService::compute(&request(day(offset)), &snapshot, &AllowAll, &classifier()).unwrap();
        let keys: Vec<_> = table.rows().map(|row| row.key()).collect();

        for pair in keys.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
