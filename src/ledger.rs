//! Laundry lifecycle ledger.
//!
//! Per shipment key the database keeps two append-only event logs: garments
//! sent to the laundry and garments returned from it. This module folds those
//! logs into per-garment `LedgerEntry` values and derives the aggregate
//! shipment status. Everything here is pure; persistence and transaction
//! boundaries live in `db::repo`.

use crate::model::{Item, LaundryStatus, LedgerEntry};

/// Fold send and return events into one ledger entry per garment.
///
/// Quantities for the same garment accumulate across events (two sends of
/// "Polo" under one key show up as a single entry with the summed qty).
/// Entries come out in first-appearance order of the send history, which is
/// the order operators expect to see items in. Garments that were never sent
/// are omitted even if a return names them.
pub fn aggregate(sends: &[Vec<Item>], returns: &[Vec<Item>]) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = Vec::new();

    for event in sends {
        for item in event {
            match entries.iter_mut().find(|e| e.name == item.name) {
                Some(entry) => entry.sent += item.qty,
                None => entries.push(LedgerEntry {
                    name: item.name.clone(),
                    sent: item.qty,
                    returned: 0,
                    pending: 0,
                }),
            }
        }
    }

    for event in returns {
        for item in event {
            if let Some(entry) = entries.iter_mut().find(|e| e.name == item.name) {
                entry.returned += item.qty;
            }
        }
    }

    for entry in &mut entries {
        entry.pending = (entry.sent - entry.returned).max(0);
    }
    entries
}

/// Derive the aggregate status of a shipment from its entries.
///
/// Complete when nothing is pending, Partial once any return has been
/// recorded, Pending otherwise. Once Complete the status can only change
/// again through a new send event.
pub fn status(entries: &[LedgerEntry]) -> LaundryStatus {
    let all_zero = entries.iter().all(|e| e.pending == 0);
    let any_returned = entries.iter().any(|e| e.returned > 0);
    if all_zero {
        LaundryStatus::Complete
    } else if any_returned {
        LaundryStatus::Partial
    } else {
        LaundryStatus::Pending
    }
}

/// Drop blank names and non-positive quantities from a submitted item list,
/// trimming surrounding whitespace from the names that survive so a send of
/// `" Polo "` and a return of `"Polo"` land on the same ledger entry.
/// Callers validate the result is non-empty before recording an event.
pub fn sanitize_items(items: Vec<Item>) -> Vec<Item> {
    items
        .into_iter()
        .filter_map(|i| {
            let name = i.name.trim();
            (!name.is_empty() && i.qty > 0).then(|| Item::new(name, i.qty))
        })
        .collect()
}

/// Clamp a return request against the current ledger.
///
/// Each requested qty is capped at the garment's pending amount; items that
/// clamp to zero (or name a garment never sent) are dropped. This is the
/// authoritative server-side clamp, so a request can never drive pending
/// below zero no matter what the client computed.
pub fn clamp_returns(entries: &[LedgerEntry], requested: Vec<Item>) -> Vec<Item> {
    requested
        .into_iter()
        .filter_map(|item| {
            let pending = entries
                .iter()
                .find(|e| e.name == item.name)
                .map(|e| e.pending)
                .unwrap_or(0);
            let qty = item.qty.min(pending);
            (qty > 0).then(|| Item::new(item.name, qty))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(items: &[(&str, i64)]) -> Vec<Item> {
        items.iter().map(|(n, q)| Item::new(*n, *q)).collect()
    }

    #[test]
    fn aggregate_keeps_first_appearance_order() {
        let sends = vec![send(&[("Chaqueta", 2), ("Pantalon", 2)]), send(&[("Polo", 1)])];
        let entries = aggregate(&sends, &[]);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Chaqueta", "Pantalon", "Polo"]);
    }

    #[test]
    fn repeated_sends_accumulate() {
        let sends = vec![send(&[("Polo", 1)]), send(&[("Polo", 2)])];
        let entries = aggregate(&sends, &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sent, 3);
        assert_eq!(entries[0].pending, 3);
    }

    #[test]
    fn returns_reduce_pending_never_below_zero() {
        let sends = vec![send(&[("Toalla", 2)])];
        let returns = vec![send(&[("Toalla", 5)])];
        let entries = aggregate(&sends, &returns);
        assert_eq!(entries[0].returned, 5);
        assert_eq!(entries[0].pending, 0);
    }

    #[test]
    fn returns_for_unsent_garments_are_ignored() {
        let sends = vec![send(&[("Polo", 1)])];
        let returns = vec![send(&[("Chaqueta", 1)])];
        let entries = aggregate(&sends, &returns);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Polo");
    }

    #[test]
    fn status_transitions() {
        let sends = vec![send(&[("Chaqueta", 2), ("Pantalon", 2)])];
        let entries = aggregate(&sends, &[]);
        assert_eq!(status(&entries), LaundryStatus::Pending);

        let returns = vec![send(&[("Chaqueta", 1)])];
        let entries = aggregate(&sends, &returns);
        assert_eq!(status(&entries), LaundryStatus::Partial);

        let returns = vec![send(&[("Chaqueta", 2), ("Pantalon", 2)])];
        let entries = aggregate(&sends, &returns);
        assert_eq!(status(&entries), LaundryStatus::Complete);
    }

    #[test]
    fn complete_stays_complete_under_further_returns() {
        let sends = vec![send(&[("Polo", 1)])];
        let mut returns = vec![send(&[("Polo", 1)])];
        let entries = aggregate(&sends, &returns);
        assert_eq!(status(&entries), LaundryStatus::Complete);

        // A stray extra return (already clamped away in practice) cannot
        // move the shipment back to Pending or Partial.
        returns.push(send(&[("Polo", 1)]));
        let entries = aggregate(&sends, &returns);
        assert_eq!(status(&entries), LaundryStatus::Complete);
    }

    #[test]
    fn clamp_caps_to_pending_and_drops_zeroes() {
        let sends = vec![send(&[("Chaqueta", 2), ("Pantalon", 2)])];
        let returns = vec![send(&[("Chaqueta", 1)])];
        let entries = aggregate(&sends, &returns);

        let accepted = clamp_returns(&entries, send(&[("Chaqueta", 5), ("Pantalon", 0)]));
        assert_eq!(accepted, vec![Item::new("Chaqueta", 1)]);

        // Fully returned garment clamps to nothing.
        let returns = vec![send(&[("Chaqueta", 2)])];
        let entries = aggregate(&sends, &returns);
        let accepted = clamp_returns(&entries, send(&[("Chaqueta", 1)]));
        assert!(accepted.is_empty());
    }

    #[test]
    fn sanitize_filters_blank_and_nonpositive() {
        let items = vec![
            Item::new("Polo", 1),
            Item::new("  ", 4),
            Item::new("Toalla", 0),
            Item::new("Chaqueta", -2),
        ];
        assert_eq!(sanitize_items(items), vec![Item::new("Polo", 1)]);
    }

    #[test]
    fn sanitize_trims_names_so_padded_sends_and_returns_match() {
        let sent = sanitize_items(vec![Item::new(" Polo ", 2)]);
        assert_eq!(sent, vec![Item::new("Polo", 2)]);

        let returned = sanitize_items(vec![Item::new("Polo", 1)]);
        let entries = aggregate(&[sent], &[returned]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Polo");
        assert_eq!(entries[0].pending, 1);
    }

    #[test]
    fn pending_sum_matches_sent_minus_returned() {
        let sends = vec![send(&[("Polo", 3), ("Toalla", 2)]), send(&[("Polo", 2)])];
        let returns = vec![send(&[("Polo", 4)]), send(&[("Toalla", 1)])];
        let entries = aggregate(&sends, &returns);
        for e in &entries {
            assert_eq!(e.pending, (e.sent - e.returned).max(0));
            assert!(e.pending >= 0);
        }
        let total_pending: i64 = entries.iter().map(|e| e.pending).sum();
        let total_sent: i64 = entries.iter().map(|e| e.sent).sum();
        assert!(total_pending <= total_sent);
    }
}
