//! Property-based tests for journal posting rules.
//!
//! - Balanced entries always produce a plan with equal totals
//! - Any imbalance is rejected with the actual totals
//! - Reversals mirror the original and net every account to zero

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::reversal::ReversalService;
use super::service::LedgerService;
use super::types::{
    EntrySource, EntryStatus, JournalEntry, JournalLine, LineSpec, NewJournalEntry,
};

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a small pool of account ids.
fn account_pool() -> impl Strategy<Value = Vec<Uuid>> {
    proptest::collection::vec(any::<u128>().prop_map(Uuid::from_u128), 2..6)
}

/// Strategy to generate balanced lines: random debits, credits split into
/// the same total.
fn balanced_lines() -> impl Strategy<Value = Vec<LineSpec>> {
    (
        account_pool(),
        proptest::collection::vec(positive_amount(), 1..5),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(accounts, debits, index)| {
            let total: Decimal = debits.iter().sum();
            let mut lines: Vec<LineSpec> = debits
                .iter()
                .enumerate()
                .map(|(i, amount)| LineSpec::debit(accounts[i % accounts.len()], *amount).unwrap())
                .collect();
            let credit_account = accounts[index.index(accounts.len())];
            lines.push(LineSpec::credit(credit_account, total).unwrap());
            lines
        })
}

fn make_entry(lines: Vec<LineSpec>) -> NewJournalEntry {
    NewJournalEntry {
        tenant_id: Uuid::nil(),
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "Test entry".to_string(),
        reference: None,
        source: EntrySource::Manual,
        source_id: None,
        created_by: None,
        lines,
    }
}

fn stored(entry: &NewJournalEntry) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        tenant_id: entry.tenant_id,
        entry_date: entry.entry_date,
        description: entry.description.clone(),
        reference: entry.reference.clone(),
        source: entry.source,
        source_id: entry.source_id,
        status: EntryStatus::Posted,
        reversed_by: None,
        created_by: entry.created_by,
        fiscal_year: 2026,
        created_at: Utc::now(),
        lines: entry
            .lines
            .iter()
            .map(|l| JournalLine {
                id: Uuid::new_v4(),
                account_id: l.account_id(),
                account_code: None,
                account_name: None,
                debit: l.debit_amount(),
                credit: l.credit_amount(),
                description: l.description().map(ToString::to_string),
            })
            .collect(),
    }
}

fn net_by_account(lines: &[LineSpec], into: &mut HashMap<Uuid, Decimal>) {
    for line in lines {
        *into.entry(line.account_id()).or_default() += line.debit_amount() - line.credit_amount();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balanced_entry_is_accepted(lines in balanced_lines()) {
        let entry = make_entry(lines);
        let plan = LedgerService::prepare(&entry).unwrap();
        prop_assert_eq!(plan.total_debit, plan.total_credit);
        prop_assert!(plan.total_debit > Decimal::ZERO);
        for line in &entry.lines {
            prop_assert!(plan.account_ids.contains(&line.account_id()));
        }
    }

    #[test]
    fn prop_imbalance_is_rejected(
        lines in balanced_lines(),
        extra in positive_amount(),
        account in any::<u128>().prop_map(Uuid::from_u128),
    ) {
        let mut lines = lines;
        let expected_debit: Decimal =
            lines.iter().map(LineSpec::debit_amount).sum::<Decimal>() + extra;
        lines.push(LineSpec::debit(account, extra).unwrap());
        let entry = make_entry(lines);

        match LedgerService::prepare(&entry) {
            Err(LedgerError::Unbalanced { debit, credit }) => {
                prop_assert_eq!(debit, expected_debit);
                prop_assert_eq!(debit - credit, extra);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    #[test]
    fn prop_reversal_nets_to_zero(lines in balanced_lines()) {
        let entry = make_entry(lines);
        let original = stored(&entry);
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let reversal = ReversalService::reversing_entry(&original, None, today).unwrap();

        LedgerService::prepare(&reversal).unwrap();
        prop_assert_eq!(reversal.lines.len(), entry.lines.len());

        let mut net = HashMap::new();
        net_by_account(&entry.lines, &mut net);
        net_by_account(&reversal.lines, &mut net);
        prop_assert!(net.values().all(Decimal::is_zero));
    }
}
