// ============================================================
// Layer 3 - Schema
// ============================================================
// Describes the columns a component reads or produces.
//
// The model artifact records the input schema it was trained
// against. When loading, the caller passes the schema it is able
// to supply; every column the artifact needs must be present with
// the same kind, otherwise the load fails with SchemaMismatch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::QnaError;

/// Name of the question text column
pub const QUESTION: &str = "Question";
/// Name of the answer text column
pub const ANSWER: &str = "Answer";
/// Label key column produced by the label mapping
pub const LABEL: &str = "Label";
/// Raw text feature column
pub const FEATURES: &str = "Features";
/// Concatenated + normalized classifier input
pub const INPUT: &str = "Input";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Key,
    Vector,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Text   => "text",
            ColumnKind::Key    => "key",
            ColumnKind::Vector => "vector",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema of a raw Record: two text columns.
    pub fn qna_input() -> Self {
        Self::new()
            .with_column(QUESTION, ColumnKind::Text)
            .with_column(ANSWER, ColumnKind::Text)
    }

    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        // Re-declaring a column replaces it in place
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.kind = kind,
            None      => self.columns.push(ColumnSpec { name, kind }),
        }
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check that `provided` can feed a component that expects `self`.
    pub fn satisfied_by(&self, provided: &Schema) -> Result<(), QnaError> {
        for needed in &self.columns {
            match provided.get(&needed.name) {
                None => {
                    return Err(QnaError::SchemaMismatch {
                        column: needed.name.clone(),
                        reason: "column is not provided".to_string(),
                    })
                }
                Some(have) if have.kind != needed.kind => {
                    return Err(QnaError::SchemaMismatch {
                        column: needed.name.clone(),
                        reason: format!("expected {} but found {}", needed.kind, have.kind),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.kind))
            .collect();
        write!(f, "[{}]", cols.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_schema_is_compatible() {
        let s = Schema::qna_input();
        assert!(s.satisfied_by(&Schema::qna_input()).is_ok());
    }

    #[test]
    fn test_extra_provided_columns_are_fine() {
        let needed   = Schema::new().with_column(QUESTION, ColumnKind::Text);
        let provided = Schema::qna_input().with_column("Extra", ColumnKind::Vector);
        assert!(needed.satisfied_by(&provided).is_ok());
    }

    #[test]
    fn test_missing_column_is_a_mismatch() {
        let needed = Schema::qna_input().with_column("X", ColumnKind::Text);
        let err    = needed.satisfied_by(&Schema::qna_input()).unwrap_err();
        match err {
            QnaError::SchemaMismatch { column, .. } => assert_eq!(column, "X"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kind_change_is_a_mismatch() {
        let needed   = Schema::new().with_column(QUESTION, ColumnKind::Vector);
        let provided = Schema::qna_input();
        assert!(matches!(
            needed.satisfied_by(&provided),
            Err(QnaError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_redeclared_column_replaces_kind() {
        let s = Schema::new()
            .with_column("A", ColumnKind::Text)
            .with_column("A", ColumnKind::Key);
        assert_eq!(s.columns().len(), 1);
        assert_eq!(s.get("A").map(|c| c.kind), Some(ColumnKind::Key));
    }
}
