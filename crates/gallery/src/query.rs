//! Pure search and sort over capture records.

use std::cmp::Ordering;

use cosmic_storage::Capture;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Compares date directory names as strings; they must be zero-padded
    /// `YYYY-MM-DD` for this to be chronological.
    #[default]
    Date,
    Title,
    Location,
}

impl SortField {
    /// Unknown values sort by date.
    pub fn from_param(value: &str) -> Self {
        match value {
            "title" => Self::Title,
            "location" => Self::Location,
            _ => Self::Date,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Location => "location",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything but `asc` is descending.
    pub fn from_param(value: &str) -> Self {
        if value == "asc" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// `needle` must already be lowercase.
pub fn matches_search(capture: &Capture, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    contains(capture.title.as_str())
        || contains(capture.description.as_str())
        || contains(capture.location.as_str())
        || capture.tags.iter().any(|tag| contains(tag.as_str()))
}

/// Case-insensitive substring filter. An empty term keeps everything.
pub fn filter_captures(captures: &[Capture], term: &str) -> Vec<Capture> {
    if term.is_empty() {
        return captures.to_vec();
    }

    let needle = term.to_lowercase();
    captures
        .iter()
        .filter(|capture| matches_search(capture, &needle))
        .cloned()
        .collect()
}

fn sort_key(capture: &Capture, field: SortField) -> &str {
    match field {
        SortField::Date => &capture.date,
        SortField::Title => &capture.title,
        SortField::Location => &capture.location,
    }
}

/// Stable sort; records with equal keys keep their relative order in
/// both directions.
pub fn sort_captures(captures: &mut [Capture], field: SortField, order: SortOrder) {
    captures.sort_by(|a, b| {
        let ordering: Ordering = sort_key(a, field).cmp(sort_key(b, field));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
