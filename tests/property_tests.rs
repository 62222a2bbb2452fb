//! Property-based tests for result materialization and row navigation.
//!
//! These verify the structural invariants of the table conversion:
//! - every executed query of N rows and C columns yields an N x C table
//! - sibling navigation agrees with row positions for every row
//! - values written through parameterized statements read back unchanged,
//!   with the asymmetric NULL coercion applied by the typed accessors

use proptest::prelude::*;
use rusqlite::params;

use dbfacade::Database;

fn ledger_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute_batch(
            "
            CREATE TABLE ledger (
                id INTEGER PRIMARY KEY,
                label TEXT,
                amount REAL
            );
        ",
        )
        .unwrap();
    db
}

proptest! {
    #[test]
    fn table_shape_matches_inserted_rows(rows in prop::collection::vec((any::<i32>(), "[a-z]{0,12}"), 0..25)) {
        let db = ledger_db();
        for (amount, label) in &rows {
            db.execute_with(
                "INSERT INTO ledger (label, amount) VALUES (?1, ?2)",
                params![label, f64::from(*amount)],
            ).unwrap();
        }

        let table = db.query("SELECT id, label, amount FROM ledger ORDER BY id").unwrap();
        prop_assert_eq!(table.row_count(), rows.len());
        prop_assert_eq!(table.column_count(), 3);
        prop_assert_eq!(table.is_empty(), rows.is_empty());
        prop_assert_eq!(table.first().is_none(), rows.is_empty());
        prop_assert_eq!(table.last().is_none(), rows.is_empty());
    }

    #[test]
    fn navigation_agrees_with_positions(n in 0usize..20) {
        let db = ledger_db();
        for i in 0..n {
            db.execute_with("INSERT INTO ledger (label) VALUES (?1)", params![format!("row-{i}")]).unwrap();
        }

        let table = db.query("SELECT * FROM ledger ORDER BY id").unwrap();
        for (k, row) in table.rows().enumerate() {
            prop_assert_eq!(row.position(), k);
            prop_assert_eq!(row.has_next(), k + 1 < n);
            prop_assert_eq!(row.has_previous(), k >= 1 && n > 1);
            if let Some(next) = row.next() {
                prop_assert_eq!(next.position(), k + 1);
            }
            if let Some(previous) = row.previous() {
                prop_assert_eq!(previous.position(), k - 1);
            }
        }
    }

    #[test]
    fn values_round_trip_through_the_driver(
        entries in prop::collection::vec((prop::option::of("[ -~]{0,20}"), any::<i32>()), 1..15)
    ) {
        let db = ledger_db();
        for (label, amount) in &entries {
            db.execute_with(
                "INSERT INTO ledger (label, amount) VALUES (?1, ?2)",
                params![label, f64::from(*amount)],
            ).unwrap();
        }

        let table = db.query("SELECT label, amount FROM ledger ORDER BY id").unwrap();
        prop_assert_eq!(table.row_count(), entries.len());
        for (row, (label, amount)) in table.rows().zip(entries.iter()) {
            prop_assert_eq!(row.get_string("label").unwrap(), label.as_deref());
            prop_assert_eq!(row.get_double("amount").unwrap(), f64::from(*amount));
            prop_assert_eq!(row.is_null("label").unwrap(), label.is_none());
        }
    }
}
