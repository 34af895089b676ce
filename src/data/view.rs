// ============================================================
// Layer 4 - DataView (column table)
// ============================================================
// The in-memory table that flows through the feature pipeline.
// Each transform reads some columns and adds (or replaces) others.
//
// Columns are stored by name in insertion order. Every column must
// have the same number of rows as the view itself.

use crate::domain::error::{QnaError, Result};
use crate::domain::record::{Dataset, Record};
use crate::domain::schema::{self, ColumnKind, Schema};

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Key(Vec<Option<u32>>),
    Vector(Vec<Vec<f32>>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Text(_)   => ColumnKind::Text,
            Column::Key(_)    => ColumnKind::Key,
            Column::Vector(_) => ColumnKind::Vector,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text(v)   => v.len(),
            Column::Key(v)    => v.len(),
            Column::Vector(v) => v.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataView {
    rows:    usize,
    columns: Vec<(String, Column)>,
}

impl DataView {
    pub fn new(rows: usize) -> Self {
        Self { rows, columns: Vec::new() }
    }

    /// Build the two text columns (Question, Answer) from a Dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::from_records(dataset.records())
    }

    pub fn from_records(records: &[Record]) -> Self {
        let questions = records.iter().map(|r| r.question.clone()).collect();
        let answers   = records.iter().map(|r| r.answer.clone()).collect();
        let mut view  = Self::new(records.len());
        view.columns.push((schema::QUESTION.to_string(), Column::Text(questions)));
        view.columns.push((schema::ANSWER.to_string(), Column::Text(answers)));
        view
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn schema(&self) -> Schema {
        self.columns
            .iter()
            .fold(Schema::new(), |s, (name, col)| s.with_column(name.clone(), col.kind()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| QnaError::MissingColumn(name.to_string()))
    }

    /// Add a column, replacing any existing column with the same name.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if column.len() != self.rows {
            return Err(QnaError::RowCount {
                column:   name,
                expected: self.rows,
                found:    column.len(),
            });
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None       => self.columns.push((name, column)),
        }
        Ok(self)
    }

    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            other => Err(kind_error(name, ColumnKind::Text, other)),
        }
    }

    pub fn keys(&self, name: &str) -> Result<&[Option<u32>]> {
        match self.column(name)? {
            Column::Key(v) => Ok(v),
            other => Err(kind_error(name, ColumnKind::Key, other)),
        }
    }

    pub fn vectors(&self, name: &str) -> Result<&[Vec<f32>]> {
        match self.column(name)? {
            Column::Vector(v) => Ok(v),
            other => Err(kind_error(name, ColumnKind::Vector, other)),
        }
    }

    /// Remove a vector column and hand its rows to the caller.
    ///
    /// Feature vectors are as wide as the n-gram dictionary, so the
    /// stages after featurization move them instead of copying.
    pub fn take_vectors(&mut self, name: &str) -> Result<Vec<Vec<f32>>> {
        let idx = self
            .columns
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| QnaError::MissingColumn(name.to_string()))?;
        if self.columns[idx].1.kind() != ColumnKind::Vector {
            return Err(kind_error(name, ColumnKind::Vector, &self.columns[idx].1));
        }
        match self.columns.remove(idx).1 {
            Column::Vector(v) => Ok(v),
            other => Err(kind_error(name, ColumnKind::Vector, &other)),
        }
    }
}

fn kind_error(name: &str, expected: ColumnKind, found: &Column) -> QnaError {
    QnaError::ColumnType {
        column:   name.to_string(),
        expected: expected.to_string(),
        found:    found.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> DataView {
        DataView::from_records(&[Record::new("a?", "x"), Record::new("b?", "y")])
    }

    #[test]
    fn test_from_records_builds_text_columns() {
        let v = view();
        assert_eq!(v.rows(), 2);
        assert_eq!(v.text(schema::QUESTION).unwrap(), &["a?".to_string(), "b?".to_string()]);
        assert_eq!(v.schema(), Schema::qna_input());
    }

    #[test]
    fn test_with_column_rejects_wrong_row_count() {
        let err = view().with_column("K", Column::Key(vec![Some(0)])).unwrap_err();
        assert!(matches!(err, QnaError::RowCount { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_with_column_replaces_existing() {
        let v = view()
            .with_column(schema::ANSWER, Column::Key(vec![Some(1), None]))
            .unwrap();
        assert_eq!(v.keys(schema::ANSWER).unwrap(), &[Some(1), None]);
        assert_eq!(v.schema().columns().len(), 2);
    }

    #[test]
    fn test_take_vectors_removes_the_column() {
        let mut v = view()
            .with_column("V", Column::Vector(vec![vec![1.0], vec![2.0]]))
            .unwrap();
        assert_eq!(v.take_vectors("V").unwrap(), vec![vec![1.0], vec![2.0]]);
        assert!(matches!(v.column("V"), Err(QnaError::MissingColumn(_))));
        assert_eq!(v.schema(), Schema::qna_input());
    }

    #[test]
    fn test_take_vectors_keeps_column_of_other_kind() {
        let mut v = view();
        assert!(matches!(v.take_vectors(schema::QUESTION), Err(QnaError::ColumnType { .. })));
        assert!(v.text(schema::QUESTION).is_ok());
    }

    #[test]
    fn test_typed_accessor_reports_kind() {
        let err = view().vectors(schema::QUESTION).unwrap_err();
        assert!(matches!(err, QnaError::ColumnType { .. }));
    }
}
