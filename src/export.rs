//! Tabular-ready representation of recorded gaze data.
//!
//! [`GazeTable`] is what a consumer feeds into a spreadsheet, DataFrame, or
//! terminal: ordered rows with fixed, named columns. It is a snapshot of a
//! session buffer; producing one never mutates the session.

use serde::Serialize;

use crate::types::GazeSample;

/// Column names, in row order.
pub const COLUMNS: [&str; 5] = ["sequence", "timestamp_us", "x", "y", "validity"];

/// One tabular row of recorded gaze data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GazeRow {
    pub sequence: u64,
    pub timestamp_us: i64,
    pub x: f32,
    pub y: f32,
    pub validity: &'static str,
}

impl From<&GazeSample> for GazeRow {
    fn from(sample: &GazeSample) -> Self {
        Self {
            sequence: sample.sequence,
            timestamp_us: sample.timestamp_us,
            x: sample.x,
            y: sample.y,
            validity: sample.validity.as_str(),
        }
    }
}

/// Ordered, tabular-ready snapshot of a session buffer.
///
/// Rows preserve insertion order, which the session guarantees is also
/// timestamp order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GazeTable {
    rows: Vec<GazeRow>,
}

impl GazeTable {
    /// Snapshot a sample slice into rows.
    pub fn from_samples(samples: &[GazeSample]) -> Self {
        Self { rows: samples.iter().map(GazeRow::from).collect() }
    }

    pub fn rows(&self) -> &[GazeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(32 * (self.rows.len() + 1));
        out.push_str(&COLUMNS.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                row.sequence, row.timestamp_us, row.x, row.y, row.validity
            ));
        }
        out
    }
}

impl std::fmt::Display for GazeTable {
    /// Aligned text table, one line per sample.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>8}  {:>14}  {:>10}  {:>10}  {:>8}",
            COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>8}  {:>14}  {:>10.2}  {:>10.2}  {:>8}",
                row.sequence, row.timestamp_us, row.x, row.y, row.validity
            )?;
        }
        write!(f, "[{} gaze points]", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Validity;

    fn samples() -> Vec<GazeSample> {
        vec![
            GazeSample { sequence: 0, timestamp_us: 0, x: 128.5, y: 720.0, validity: Validity::Valid },
            GazeSample {
                sequence: 1,
                timestamp_us: 16_667,
                x: 131.25,
                y: 718.5,
                validity: Validity::Invalid,
            },
        ]
    }

    #[test]
    fn rows_preserve_order_and_validity_strings() {
        let table = GazeTable::from_samples(&samples());
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].validity, "Valid");
        assert_eq!(table.rows()[1].validity, "Invalid");
        assert_eq!(table.rows()[1].timestamp_us, 16_667);
    }

    #[test]
    fn empty_table_renders_zero_points() {
        let table = GazeTable::from_samples(&[]);
        assert!(table.is_empty());
        assert!(table.to_string().contains("[0 gaze points]"));
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let table = GazeTable::from_samples(&samples());
        let csv = table.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "sequence,timestamp_us,x,y,validity");
        assert!(lines[1].starts_with("0,0,128.5,"));
        assert!(lines[2].ends_with(",Invalid"));
    }
}
