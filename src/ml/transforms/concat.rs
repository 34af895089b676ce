// ============================================================
// Concatenate - vector columns → one Input column
// ============================================================
// Joins several vector columns end to end, row by row.
// The source columns are consumed: after this stage the view
// holds the joined Input column only. With a single source
// (the default pipeline) the rows are moved, not copied.

use serde::{Deserialize, Serialize};

use crate::data::view::{Column, DataView};
use crate::domain::error::Result;
use crate::ml::transforms::Transformer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concatenator {
    output: String,
    inputs: Vec<String>,
}

impl Concatenator {
    pub fn new(output: impl Into<String>, inputs: Vec<String>) -> Self {
        Self { output: output.into(), inputs }
    }

}

impl Transformer for Concatenator {
    fn transform(&self, mut view: DataView) -> Result<DataView> {
        let mut sources = self
            .inputs
            .iter()
            .map(|name| view.take_vectors(name))
            .collect::<Result<Vec<_>>>()?;

        let rows: Vec<Vec<f32>> = match sources.len() {
            1 => sources.remove(0),
            _ => (0..view.rows())
                .map(|row| {
                    sources
                        .iter_mut()
                        .flat_map(|col| std::mem::take(&mut col[row]))
                        .collect()
                })
                .collect(),
        };

        view.with_column(self.output.clone(), Column::Vector(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenates_in_order() {
        let view = DataView::new(2)
            .with_column("A", Column::Vector(vec![vec![1.0], vec![2.0]]))
            .unwrap()
            .with_column("B", Column::Vector(vec![vec![3.0, 4.0], vec![5.0, 6.0]]))
            .unwrap();
        let c   = Concatenator::new("Input", vec!["A".into(), "B".into()]);
        let out = c.transform(view).unwrap();
        assert_eq!(
            out.vectors("Input").unwrap(),
            &[vec![1.0, 3.0, 4.0], vec![2.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn test_single_source_is_moved() {
        let view = DataView::new(1)
            .with_column("Features", Column::Vector(vec![vec![0.5, 0.25]]))
            .unwrap();
        let out = Concatenator::new("Input", vec!["Features".into()])
            .transform(view)
            .unwrap();
        assert_eq!(out.vectors("Input").unwrap(), &[vec![0.5, 0.25]]);
        assert!(out.column("Features").is_err());
    }

    #[test]
    fn test_missing_source_fails() {
        let view = DataView::new(1);
        let err  = Concatenator::new("Input", vec!["Features".into()]).transform(view);
        assert!(err.is_err());
    }
}
