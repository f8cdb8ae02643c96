use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

// ---------------------------------------------------------------------------
// OperatorKind – every comparison a filter row can use
// ---------------------------------------------------------------------------

/// Comparison operators across all column types. Not every operator is
/// offered for every type; see [`operators_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    #[serde(rename = "greater_than_or_equal")]
    GreaterOrEqual,
    #[serde(rename = "less_than_or_equal")]
    LessOrEqual,
    IsEmpty,
    IsNotEmpty,
}

const NUMERIC_OPERATORS: &[OperatorKind] = &[
    OperatorKind::Equals,
    OperatorKind::NotEquals,
    OperatorKind::GreaterThan,
    OperatorKind::LessThan,
    OperatorKind::GreaterOrEqual,
    OperatorKind::LessOrEqual,
    OperatorKind::IsEmpty,
    OperatorKind::IsNotEmpty,
];

const TEXT_OPERATORS: &[OperatorKind] = &[
    OperatorKind::Equals,
    OperatorKind::NotEquals,
    OperatorKind::Contains,
    OperatorKind::NotContains,
    OperatorKind::StartsWith,
    OperatorKind::EndsWith,
    OperatorKind::IsEmpty,
    OperatorKind::IsNotEmpty,
];

/// Offered when the column type cannot be determined.
pub const FALLBACK_OPERATORS: &[OperatorKind] = &[
    OperatorKind::Equals,
    OperatorKind::Contains,
    OperatorKind::IsEmpty,
    OperatorKind::IsNotEmpty,
];

/// Operators offered for a column type, in display order.
/// `None` stands for an unrecognised type and yields [`FALLBACK_OPERATORS`].
pub fn operators_for(column_type: Option<ColumnType>) -> &'static [OperatorKind] {
    match column_type {
        Some(ColumnType::Number | ColumnType::Percentage) => NUMERIC_OPERATORS,
        Some(ColumnType::Text) => TEXT_OPERATORS,
        None => FALLBACK_OPERATORS,
    }
}

impl OperatorKind {
    /// IsEmpty / IsNotEmpty ignore the filter value.
    pub fn is_emptiness_check(self) -> bool {
        matches!(self, OperatorKind::IsEmpty | OperatorKind::IsNotEmpty)
    }

    /// String-matching operators only make sense on Text columns.
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            OperatorKind::Contains
                | OperatorKind::NotContains
                | OperatorKind::StartsWith
                | OperatorKind::EndsWith
        )
    }

    /// Ordering operators only make sense on numeric columns.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            OperatorKind::GreaterThan
                | OperatorKind::LessThan
                | OperatorKind::GreaterOrEqual
                | OperatorKind::LessOrEqual
        )
    }

    /// Whether this operator can be evaluated on a column of `column_type`.
    pub fn applies_to(self, column_type: ColumnType) -> bool {
        if column_type.is_numeric() {
            !self.is_text_only()
        } else {
            !self.is_ordering()
        }
    }

    /// Stable identifier, matching the serialized form.
    pub fn id(self) -> &'static str {
        match self {
            OperatorKind::Equals => "equals",
            OperatorKind::NotEquals => "not_equals",
            OperatorKind::Contains => "contains",
            OperatorKind::NotContains => "not_contains",
            OperatorKind::StartsWith => "starts_with",
            OperatorKind::EndsWith => "ends_with",
            OperatorKind::GreaterThan => "greater_than",
            OperatorKind::LessThan => "less_than",
            OperatorKind::GreaterOrEqual => "greater_than_or_equal",
            OperatorKind::LessOrEqual => "less_than_or_equal",
            OperatorKind::IsEmpty => "is_empty",
            OperatorKind::IsNotEmpty => "is_not_empty",
        }
    }

    /// Label shown in the operator picker. Numeric columns use symbols.
    pub fn label(self, column_type: Option<ColumnType>) -> &'static str {
        let numeric = column_type.is_some_and(ColumnType::is_numeric);
        match (self, numeric) {
            (OperatorKind::Equals, true) => "=",
            (OperatorKind::NotEquals, true) => "!=",
            (OperatorKind::Equals, false) => "Equals",
            (OperatorKind::NotEquals, false) => "Not Equals",
            (OperatorKind::Contains, _) => "Contains",
            (OperatorKind::NotContains, _) => "Does Not Contain",
            (OperatorKind::StartsWith, _) => "Starts With",
            (OperatorKind::EndsWith, _) => "Ends With",
            (OperatorKind::GreaterThan, _) => ">",
            (OperatorKind::LessThan, _) => "<",
            (OperatorKind::GreaterOrEqual, _) => ">=",
            (OperatorKind::LessOrEqual, _) => "<=",
            (OperatorKind::IsEmpty, _) => "Is Empty",
            (OperatorKind::IsNotEmpty, _) => "Is Not Empty",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_percentage_share_operators() {
        assert_eq!(
            operators_for(Some(ColumnType::Number)),
            operators_for(Some(ColumnType::Percentage))
        );
        assert_eq!(
            operators_for(Some(ColumnType::Number)),
            &[
                OperatorKind::Equals,
                OperatorKind::NotEquals,
                OperatorKind::GreaterThan,
                OperatorKind::LessThan,
                OperatorKind::GreaterOrEqual,
                OperatorKind::LessOrEqual,
                OperatorKind::IsEmpty,
                OperatorKind::IsNotEmpty,
            ]
        );
    }

    #[test]
    fn test_text_operators_in_display_order() {
        assert_eq!(
            operators_for(Some(ColumnType::Text)),
            &[
                OperatorKind::Equals,
                OperatorKind::NotEquals,
                OperatorKind::Contains,
                OperatorKind::NotContains,
                OperatorKind::StartsWith,
                OperatorKind::EndsWith,
                OperatorKind::IsEmpty,
                OperatorKind::IsNotEmpty,
            ]
        );
    }

    #[test]
    fn test_unknown_type_uses_fallback() {
        assert_eq!(operators_for(None), FALLBACK_OPERATORS);
    }

    #[test]
    fn test_catalog_operators_apply_to_their_type() {
        for ty in [ColumnType::Number, ColumnType::Percentage, ColumnType::Text] {
            for op in operators_for(Some(ty)) {
                assert!(op.applies_to(ty), "{op} should apply to {ty}");
            }
        }
    }

    #[test]
    fn test_serde_ids_match_id() {
        for op in operators_for(Some(ColumnType::Number))
            .iter()
            .chain(operators_for(Some(ColumnType::Text)))
        {
            let json = serde_json::to_string(op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.id()));
        }
    }

    #[test]
    fn test_labels_depend_on_type() {
        assert_eq!(OperatorKind::Equals.label(Some(ColumnType::Number)), "=");
        assert_eq!(OperatorKind::Equals.label(Some(ColumnType::Text)), "Equals");
        assert_eq!(OperatorKind::Equals.label(None), "Equals");
    }
}
