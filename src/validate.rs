use crate::resource::ResourceKind;
use crate::row::Row;

/// Outcome of checking one row against its kind's required-field schema.
/// Computed once, before any API call, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid { reason: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

/// Checks that every field the kind requires is present and non-blank.
///
/// Pure: never contacts the API. All missing fields are reported together in
/// one reason string, not just the first.
pub fn validate(row: &Row, kind: ResourceKind) -> Validation {
    let missing: Vec<&str> = kind
        .required_fields()
        .iter()
        .copied()
        .filter(|field| row.is_blank(field))
        .collect();

    if missing.is_empty() {
        Validation::Valid
    } else {
        Validation::Invalid {
            reason: format!("missing required field(s): {}", missing.join(", ")),
        }
    }
}
