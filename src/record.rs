//! The fixed per-trial output schema.

/// Placeholder for any field that could not be read from a detail page.
pub const SENTINEL: &str = "N/A";

/// Spreadsheet column headers, in output order.
pub const HEADERS: [&str; 8] = [
    "Study Start",
    "Primary Completion",
    "Study Completion",
    "Enrollment",
    "Study Type",
    "Phase",
    "NCT-ID",
    "URL",
];

/// The six detail-page fields, before the identifier and URL are attached.
/// Every field is either extracted text or exactly [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub study_start: String,
    pub primary_completion: String,
    pub study_completion: String,
    pub enrollment: String,
    pub study_type: String,
    pub phase: String,
}

impl Default for DetailFields {
    fn default() -> Self {
        Self {
            study_start: SENTINEL.to_string(),
            primary_completion: SENTINEL.to_string(),
            study_completion: SENTINEL.to_string(),
            enrollment: SENTINEL.to_string(),
            study_type: SENTINEL.to_string(),
            phase: SENTINEL.to_string(),
        }
    }
}

/// One output row: the detail fields plus the identifier and the detail URL
/// it was reached through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub study_start: String,
    pub primary_completion: String,
    pub study_completion: String,
    pub enrollment: String,
    pub study_type: String,
    pub phase: String,
    pub nct_id: String,
    pub url: String,
}

impl TrialRecord {
    pub fn new(nct_id: String, url: String, fields: DetailFields) -> Self {
        Self {
            study_start: fields.study_start,
            primary_completion: fields.primary_completion,
            study_completion: fields.study_completion,
            enrollment: fields.enrollment,
            study_type: fields.study_type,
            phase: fields.phase,
            nct_id,
            url,
        }
    }

    /// Cell values aligned with [`HEADERS`].
    pub fn row(&self) -> [&str; 8] {
        [
            &self.study_start,
            &self.primary_completion,
            &self.study_completion,
            &self.enrollment,
            &self.study_type,
            &self.phase,
            &self.nct_id,
            &self.url,
        ]
    }
}
