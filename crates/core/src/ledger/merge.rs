//! Merge engine: deduplicated union of stored and freshly fetched
//! transactions.

use std::collections::HashSet;

use super::model::ProviderTransaction;

/// Result of merging an incoming batch into an existing set.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub transactions: Vec<ProviderTransaction>,
    pub added: usize,
    pub duplicates_dropped: usize,
}

/// Union keyed by `transaction_id`; existing wins.
///
/// An incoming transaction whose id is already present is discarded, so
/// provider-side amendments to an already-ingested transaction are not
/// applied here. Existing order is preserved and new transactions append in
/// incoming order, which keeps repeated merges deterministic.
pub fn merge_transactions(
    existing: &[ProviderTransaction],
    incoming: Vec<ProviderTransaction>,
) -> MergeOutcome {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|tx| tx.transaction_id.clone())
        .collect();

    let mut merged = existing.to_vec();
    let mut added = 0usize;
    let mut duplicates_dropped = 0usize;

    for tx in incoming {
        if !seen.insert(tx.transaction_id.clone()) {
            duplicates_dropped += 1;
            continue;
        }
        merged.push(tx);
        added += 1;
    }

    MergeOutcome {
        transactions: merged,
        added,
        duplicates_dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(id: &str, amount: rust_decimal::Decimal) -> ProviderTransaction {
        ProviderTransaction {
            transaction_id: id.to_string(),
            account_id: "acc-1".to_string(),
            amount,
            iso_currency_code: Some("USD".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
            name: None,
            pending: false,
            category: Vec::new(),
        }
    }

    #[test]
    fn union_drops_duplicate_ids_and_existing_wins() {
        let existing = vec![tx("t1", dec!(10)), tx("t2", dec!(20))];
        // Same id as t2 but amended amount: the stored version must survive.
        let incoming = vec![tx("t2", dec!(99)), tx("t3", dec!(30))];

        let outcome = merge_transactions(&existing, incoming);

        assert_eq!(outcome.transactions.len(), 3);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.duplicates_dropped, 1);
        let t2 = outcome
            .transactions
            .iter()
            .find(|tx| tx.transaction_id == "t2")
            .expect("t2 present");
        assert_eq!(t2.amount, dec!(20));
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = vec![tx("t1", dec!(10)), tx("t2", dec!(20))];
        let once = merge_transactions(&existing, existing.clone());
        let twice = merge_transactions(&once.transactions, existing.clone());

        assert_eq!(once.transactions, existing);
        assert_eq!(twice.transactions, existing);
        assert_eq!(twice.added, 0);
    }

    #[test]
    fn subset_merge_order_does_not_change_final_set() {
        let a = vec![tx("t1", dec!(1)), tx("t2", dec!(2))];
        let b = vec![tx("t2", dec!(2)), tx("t3", dec!(3))];

        let ab = merge_transactions(&merge_transactions(&[], a.clone()).transactions, b.clone());
        let ba = merge_transactions(&merge_transactions(&[], b).transactions, a);

        let mut ids_ab: Vec<_> = ab
            .transactions
            .iter()
            .map(|tx| tx.transaction_id.clone())
            .collect();
        let mut ids_ba: Vec<_> = ba
            .transactions
            .iter()
            .map(|tx| tx.transaction_id.clone())
            .collect();
        ids_ab.sort();
        ids_ba.sort();
        assert_eq!(ids_ab, ids_ba);
        assert_eq!(ids_ab, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn duplicates_within_one_incoming_batch_collapse() {
        let incoming = vec![tx("t1", dec!(1)), tx("t1", dec!(1)), tx("t2", dec!(2))];
        let outcome = merge_transactions(&[], incoming);
        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.duplicates_dropped, 1);
    }
}
