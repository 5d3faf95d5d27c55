use super::*;
use crate::normalize::{ColumnNormalizer, FieldNormalizer};
use crate::table::{Record, Table};

fn normalizer() -> FieldNormalizer {
    FieldNormalizer::new().expect("field normalizer should build")
}

fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut table = Table::with_columns(columns.iter().copied());
    for row in rows {
        let record: Record = columns.iter().copied().zip(row.iter().copied()).collect();
        table.push(record);
    }
    table
}

#[test]
fn key_columns_prefers_identifying_columns_in_fixed_order() {
    let keys = key_columns(&table(&["name", "city", "phone_number", "email"], &[]));
    assert_eq!(keys.columns, ["email", "phone_number", "name"]);
    assert!(!keys.fallback);
}

#[test]
fn key_columns_falls_back_to_every_column() {
    let keys = key_columns(&table(&["city", "platform"], &[]));
    assert_eq!(keys.columns, ["city", "platform"]);
    assert!(keys.fallback);
}

#[test]
fn duplicate_across_inputs_survives_once() {
    let first = table(&["name", "email"], &[&["ana", "ana@x.com"], &["luis", "luis@x.com"]]);
    let second = table(&["name", "email"], &[&["ana", "ana@x.com"]]);

    let result = consolidate(Table::new(), vec![first, second], &normalizer());

    assert_eq!(result.table.len(), 2);
    assert_eq!(result.report.incoming_records, 3);
    assert_eq!(result.report.rows_before_dedup, 3);
    assert_eq!(result.report.duplicates_removed, 1);
    assert_eq!(result.report.final_records, 2);
}

#[test]
fn base_record_wins_over_incoming_with_same_key() {
    let existing = table(
        &["name", "email", "city"],
        &[&["ana", "ana@x.com", "cali"]],
    );
    let incoming = table(
        &["name", "email", "city"],
        &[&["ana", "ana@x.com", "bogota"], &["eva", "eva@x.com", "pasto"]],
    );

    let result = consolidate(existing, vec![incoming], &normalizer());

    assert_eq!(result.report.base_duplicates, 1);
    assert_eq!(result.table.len(), 2);
    assert_eq!(result.table.records()[0].get("city"), "cali");
    assert_eq!(result.table.records()[1].get("name"), "eva");
}

#[test]
fn legacy_base_is_renormalized_before_matching() {
    let existing = table(
        &["name", "phone_number"],
        &[&["ANA", "p:+57 300-111"]],
    );
    let incoming = table(&["name", "phone_number"], &[&["ana", "+57300111"]]);

    let result = consolidate(existing, vec![incoming], &normalizer());

    assert_eq!(result.report.base_duplicates, 1);
    assert_eq!(result.table.len(), 1);
    assert_eq!(result.table.records()[0].get("name"), "ana");
    assert_eq!(result.table.records()[0].get("phone_number"), "+57300111");
}

#[test]
fn merge_unions_columns_and_pads_missing_cells() {
    let with_email = table(&["name", "email"], &[&["ana", "ana@x.com"]]);
    let with_phone = table(&["name", "phone_number"], &[&["luis", "300"]]);

    let result = consolidate(Table::new(), vec![with_email, with_phone], &normalizer());

    assert_eq!(result.table.columns(), ["name", "email", "phone_number"]);
    assert_eq!(result.table.records()[0].get("phone_number"), "");
    assert_eq!(result.table.records()[1].get("email"), "");
    assert_eq!(
        result.report.key_columns.columns,
        ["email", "phone_number", "name"]
    );
}

#[test]
fn key_column_missing_from_base_reads_as_empty() {
    let existing = table(&["name"], &[&["ana"]]);
    let incoming = table(
        &["name", "email"],
        &[&["ana", ""], &["ana", "ana@x.com"]],
    );

    let result = consolidate(existing, vec![incoming], &normalizer());

    assert_eq!(result.report.base_duplicates, 1);
    assert_eq!(result.table.len(), 2);
    assert_eq!(result.table.records()[1].get("email"), "ana@x.com");
}

#[test]
fn tables_without_key_columns_dedup_on_full_rows() {
    let incoming = table(
        &["city", "platform"],
        &[&["cali", "fb"], &["cali", "fb"], &["cali", "ig"]],
    );

    let result = consolidate(Table::new(), vec![incoming], &normalizer());

    assert!(result.report.key_columns.fallback);
    assert_eq!(result.table.len(), 2);
    assert_eq!(result.table.records()[1].get("platform"), "ig");
}

#[test]
fn normalized_input_collapses_case_variants() {
    let raw = table(&["Nombre", "Correo"], &[&["Ana", "ANA@X.COM"], &["ana", "ana@x.com"]]);
    let mut normalized = ColumnNormalizer::new().unwrap().apply(raw);
    let fields = normalizer();
    fields.apply(&mut normalized);

    let result = consolidate(Table::new(), vec![normalized], &fields);

    assert_eq!(result.table.len(), 1);
    assert_eq!(result.table.columns(), ["name", "email"]);
    let record = &result.table.records()[0];
    assert_eq!(record.get("name"), "ana");
    assert_eq!(record.get("email"), "ana@x.com");
}

#[test]
fn result_has_no_duplicate_keys() {
    let existing = table(
        &["email", "name"],
        &[&["a@x.com", "a"], &["b@x.com", "b"]],
    );
    let first = table(&["email", "name"], &[&["b@x.com", "b"], &["c@x.com", "c"]]);
    let second = table(
        &["email", "name", "city"],
        &[&["c@x.com", "c", "cali"], &["d@x.com", "d", ""], &["a@x.com", "a", "pasto"]],
    );

    let result = consolidate(existing, vec![first, second], &normalizer());

    let keys = &result.report.key_columns.columns;
    let mut seen = std::collections::HashSet::new();
    for record in result.table.records() {
        assert!(seen.insert(record.key_tuple(keys)));
    }
    assert_eq!(result.report.final_records, 4);
    assert_eq!(result.report.base_duplicates, 2);
}

#[test]
fn fallback_keys_against_populated_base_drop_nothing_from_base() {
    let existing = table(&["name", "email"], &[&["ana", "ana@x.com"]]);
    let incoming = table(&["city", "platform"], &[&["cali", "fb"], &["pasto", "ig"]]);

    let result = consolidate(existing, vec![incoming], &normalizer());

    assert_eq!(result.report.base_duplicates, 0);
    assert_eq!(result.report.rows_before_dedup, 3);
    assert_eq!(result.report.key_columns.columns, ["email", "name"]);
    assert!(!result.report.key_columns.fallback);
    assert_eq!(result.report.duplicates_removed, 1);
    assert_eq!(result.report.final_records, 2);
    assert_eq!(result.table.records()[0].get("email"), "ana@x.com");
    assert_eq!(result.table.records()[1].get("city"), "cali");
}
