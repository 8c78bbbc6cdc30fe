use crate::field::FieldKind;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExpandError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{value} is out of range, expected {min}-{max}")]
    OutOfRange { value: u32, min: u32, max: u32 },

    #[error("Invalid Range {start}-{end}, start is greater than end")]
    InvertedRange { start: u32, end: u32 },

    #[error("Invalid Step {0}, expected a positive number")]
    InvalidStep(String),

    #[error("empty item in list '{0}'")]
    EmptyListItem(String),

    #[error("list item '{0}' refers back to its own list")]
    SelfReferentialList(String),

    #[error("'{0}' selects no values")]
    NoValues(String),

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("unsupported syntax '{0}'")]
    Unsupported(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("Invalid number of fields, expected {expected} (or {} with a year) but found {found}", .expected + 1)]
    Arity { expected: usize, found: usize },

    #[error("Invalid {field} '{token}': {reason}")]
    Field {
        field: FieldKind,
        token: String,
        #[source]
        reason: ExpandError,
    },
}

impl ValidationError {
    /// The field the error belongs to, `None` for an arity mismatch.
    pub fn field(&self) -> Option<FieldKind> {
        match self {
            ValidationError::Arity { .. } => None,
            ValidationError::Field { field, .. } => Some(*field),
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            ValidationError::Arity { .. } => None,
            ValidationError::Field { token, .. } => Some(token),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Warning {
    #[error("both day of month and day of week are restricted, a day runs when either one matches")]
    DayFieldsCombined,
}

/// Everything found wrong with an expression in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown locale {0}")]
pub struct UnknownLocale(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::Arity {
            expected: 5,
            found: 4,
        };
        assert_eq!(
            "Invalid number of fields, expected 5 (or 6 with a year) but found 4",
            err.to_string()
        );

        let err = ValidationError::Field {
            field: FieldKind::Minute,
            token: "60".into(),
            reason: ExpandError::OutOfRange {
                value: 60,
                min: 0,
                max: 59,
            },
        };
        assert_eq!(
            "Invalid minute '60': 60 is out of range, expected 0-59",
            err.to_string()
        );
        assert_eq!(Some(FieldKind::Minute), err.field());
        assert_eq!(Some("60"), err.token());

        let report = ValidationReport {
            errors: vec![
                err,
                ValidationError::Field {
                    field: FieldKind::Hour,
                    token: "*/0".into(),
                    reason: ExpandError::InvalidStep("0".into()),
                },
            ],
            warnings: vec![],
        };
        assert_eq!(
            "Invalid minute '60': 60 is out of range, expected 0-59; \
             Invalid hour '*/0': Invalid Step 0, expected a positive number",
            report.to_string()
        );
    }

    #[test]
    fn report_serializes_for_export() {
        let report = ValidationReport {
            errors: vec![ValidationError::Field {
                field: FieldKind::DayOfMonth,
                token: "0".into(),
                reason: ExpandError::OutOfRange {
                    value: 0,
                    min: 1,
                    max: 31,
                },
            }],
            warnings: vec![Warning::DayFieldsCombined],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["kind"], "field");
        assert_eq!(json["errors"][0]["field"], "dayOfMonth");
        assert_eq!(json["errors"][0]["token"], "0");
        assert_eq!(json["warnings"][0], "DayFieldsCombined");
        assert!(!report.is_valid());
    }
}
