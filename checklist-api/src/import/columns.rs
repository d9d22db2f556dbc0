use super::normalize::clean_text;
use calamine::Data;
use shared_types::ColumnIndices;

/// Accepted header substrings for each logical field, checked lowercase
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub area: &'static [&'static str],
    pub activity: &'static [&'static str],
    pub criteria: &'static [&'static str],
}

pub const FIELD_ALIASES: FieldAliases = FieldAliases {
    area: &["area", "kategori", "category", "area of evaluation"],
    activity: &[
        "activity",
        "aktivitas",
        "feature evaluated",
        "aktivitas / fitur yang dievaluasi",
    ],
    criteria: &["criteria", "kriteria", "success criteria", "kriteria sukses"],
};

/// Index of the first header containing any of `aliases`
pub fn find_column(headers: &[Data], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|cell| {
        let header = clean_text(cell).to_lowercase();
        aliases
            .iter()
            .any(|alias| header.contains(&alias.to_lowercase()))
    })
}

pub fn locate_columns(headers: &[Data], aliases: &FieldAliases) -> ColumnIndices {
    ColumnIndices {
        area: find_column(headers, aliases.area),
        activity: find_column(headers, aliases.activity),
        criteria: find_column(headers, aliases.criteria),
    }
}

/// Resolved positions of every required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub area: usize,
    pub activity: usize,
    pub criteria: usize,
}

impl RequiredColumns {
    pub fn from_indices(indices: &ColumnIndices) -> Option<Self> {
        Some(Self {
            area: indices.area?,
            activity: indices.activity?,
            criteria: indices.criteria?,
        })
    }
}
