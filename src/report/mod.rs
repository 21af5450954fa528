//! Renders change records into the line-per-record textual diff format.
//! Pure line producer; the caller owns the output sink and exit status.

use crate::diff::{Change, ChangeRecord};

/// Renders one line per change record. Returns the lines and their count;
/// a non-zero count is the "differences found" signal.
pub fn render(records: &[ChangeRecord]) -> (Vec<String>, usize) {
    let lines: Vec<String> = records.iter().map(render_record).collect();
    let count = lines.len();
    (lines, count)
}

fn render_record(record: &ChangeRecord) -> String {
    match &record.change {
        Change::Added => format!(
            "{} {} found in {}, missing from {}",
            record.topic, record.key, record.owner_b, record.owner_a
        ),
        Change::Removed => format!(
            "{} {} found in {}, missing from {}",
            record.topic, record.key, record.owner_a, record.owner_b
        ),
        Change::Changed { value_a, value_b } => format!(
            "{} {} is {} in {}, {} in {}",
            record.topic, record.key, value_a, record.owner_a, value_b, record.owner_b
        ),
    }
}

/// The final summary line.
pub fn summary(count: usize) -> String {
    format!("Found {count} differences")
}
