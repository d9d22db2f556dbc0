use super::columns::RequiredColumns;
use calamine::Data;

/// Trim and collapse whitespace runs to a single space
pub fn clean_str(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a raw cell as cleaned text. Empty and error cells become "".
pub fn clean_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => clean_str(s),
        other => clean_str(&other.to_string()),
    }
}

fn cell_text(row: &[Data], idx: usize) -> String {
    row.get(idx).map(clean_text).unwrap_or_default()
}

/// The area label carried down a sheet until the next non-blank area cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaState {
    current: Option<String>,
}

impl AreaState {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub area: String,
    pub activity: String,
    pub criteria: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyRow,
    MissingText,
    NoArea,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted(NormalizedRow),
    Skipped(SkipReason),
}

/// Normalize one data row, returning the area state for the next row.
pub fn normalize_row(
    state: AreaState,
    row: &[Data],
    columns: &RequiredColumns,
) -> (AreaState, RowOutcome) {
    if row.is_empty() {
        return (state, RowOutcome::Skipped(SkipReason::EmptyRow));
    }

    let area = cell_text(row, columns.area);
    let state = if area.is_empty() {
        state
    } else {
        AreaState {
            current: Some(area),
        }
    };

    let activity = cell_text(row, columns.activity);
    let criteria = cell_text(row, columns.criteria);
    if activity.is_empty() || criteria.is_empty() {
        return (state, RowOutcome::Skipped(SkipReason::MissingText));
    }

    let outcome = match state.current() {
        Some(area) => RowOutcome::Accepted(NormalizedRow {
            area: area.to_string(),
            activity,
            criteria,
        }),
        None => RowOutcome::Skipped(SkipReason::NoArea),
    };

    (state, outcome)
}

/// Normalize the data rows of one sheet, pairing each outcome with the row's
/// 1-based position among the data rows. Area state starts empty.
pub fn normalize_sheet(rows: &[Vec<Data>], columns: &RequiredColumns) -> Vec<(i64, RowOutcome)> {
    rows.iter()
        .enumerate()
        .scan(AreaState::default(), |state, (idx, row)| {
            let (next, outcome) = normalize_row(std::mem::take(state), row, columns);
            *state = next;
            Some((idx as i64 + 1, outcome))
        })
        .collect()
}
