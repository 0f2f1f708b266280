use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One enrolled student, as the course enrollment lists them. Immutable for
/// the lifetime of a session view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub id: Uuid,
    pub full_name: String,
    pub father_name: Option<String>,
    pub admission_no: Option<String>,
    pub card_number: Option<String>,
}

impl RosterMember {
    /// Exact match against the card number or the admission number. Scans
    /// carry either, depending on which card stock the school prints.
    pub fn matches_code(&self, code: &str) -> bool {
        self.card_number.as_deref() == Some(code) || self.admission_no.as_deref() == Some(code)
    }
}
