//! CSV export
//!
//! Order-preserving CSV serialization of canonical record sets. Columns are
//! typed accessor functions rather than dotted-path lookups, so a missing
//! value renders as an empty string at the accessor and a renamed field is a
//! compile error instead of a silent blank column.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Journey, Metric, Purchase};

/// One CSV column: header label plus a typed value accessor
pub struct Column<T> {
    pub label: &'static str,
    pub accessor: fn(&T) -> String,
}

/// Serialize rows to CSV: a header row from the column labels, then one row
/// per record in input order.
pub fn to_csv<T>(rows: &[T], columns: &[Column<T>]) -> String {
    let mut csv = columns
        .iter()
        .map(|c| escape_csv_field(c.label))
        .collect::<Vec<_>>()
        .join(",");
    csv.push('\n');

    for row in rows {
        let line = columns
            .iter()
            .map(|c| escape_csv_field(&(c.accessor)(row)))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

/// Two-part export file name with an ISO date stamp, e.g.
/// `journeys-2023-12-01.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// Serialize rows and write them to `dir` under a date-stamped name,
/// returning the written path.
pub fn write_export<T>(
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
    rows: &[T],
    columns: &[Column<T>],
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(prefix, date));
    fs::write(&path, to_csv(rows, columns))?;
    Ok(path)
}

/// The journey table's export columns
pub fn journey_columns() -> Vec<Column<Journey>> {
    vec![
        Column {
            label: "Date",
            accessor: |j| j.travel_date.clone().unwrap_or_default(),
        },
        Column {
            label: "Mode",
            accessor: |j| j.mode.clone(),
        },
        Column {
            label: "Distance (km)",
            accessor: |j| csv_metric(&j.distance_km),
        },
        Column {
            label: "CO₂ (g)",
            accessor: |j| csv_metric(&j.co2_g),
        },
        Column {
            label: "Journey ID",
            accessor: |j| j.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        },
    ]
}

/// The transactions table's export columns
pub fn purchase_columns() -> Vec<Column<Purchase>> {
    vec![
        Column {
            label: "Date/Time",
            accessor: |p| p.transaction.date_time.clone().unwrap_or_default(),
        },
        Column {
            label: "Operator",
            accessor: |p| p.operator.name.clone().unwrap_or_default(),
        },
        Column {
            label: "Mode",
            accessor: |p| p.mode.clone(),
        },
        Column {
            label: "Amount (pence)",
            accessor: |p| csv_metric(&p.transaction.price.amount),
        },
        Column {
            label: "Transaction ID",
            accessor: |p| p.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        },
    ]
}

// Metrics export as the provider's wire value: the number, "unknown", the
// raw string, or empty for missing.
fn csv_metric(metric: &Metric) -> String {
    match metric {
        Metric::Known(value) => value.to_string(),
        Metric::Unavailable => "unknown".to_string(),
        Metric::Missing => String::new(),
        Metric::Raw(raw) => raw.clone(),
    }
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    #[test]
    fn fields_with_commas_are_quoted() {
        let rows = vec![Journey {
            id: Some(RecordId::Text("A,1".to_string())),
            ..Default::default()
        }];
        let columns = vec![Column::<Journey> {
            label: "ID",
            accessor: |j| j.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        }];

        let csv = to_csv(&rows, &columns);
        assert_eq!(csv, "ID\n\"A,1\"\n");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("plain"), "plain");
    }

    #[test]
    fn missing_values_export_as_empty_fields() {
        let rows = vec![Journey::default()];
        let csv = to_csv(&rows, &journey_columns());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,Mode,Distance (km),CO₂ (g),Journey ID"));
        assert_eq!(lines.next(), Some(",unknown,,,"));
    }

    #[test]
    fn known_metrics_export_the_number() {
        let rows = vec![Journey {
            distance_km: Metric::Known(12.4),
            co2_g: Metric::Unavailable,
            ..Default::default()
        }];
        let csv = to_csv(&rows, &journey_columns());
        assert!(csv.lines().nth(1).unwrap().contains("12.4,unknown"));
    }

    #[test]
    fn file_name_is_prefix_plus_date_stamp() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(export_file_name("journeys", date), "journeys-2023-12-01.csv");
    }

    #[test]
    fn write_export_creates_the_stamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let rows = vec![Purchase::default()];

        let path = write_export(dir.path(), "transactions", date, &rows, &purchase_columns())
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "transactions-2023-12-01.csv"
        );
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Date/Time,Operator,Mode,Amount (pence),Transaction ID\n"));
    }
}
