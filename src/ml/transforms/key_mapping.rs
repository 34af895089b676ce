// ============================================================
// MapValueToKey - answer text → label key
// ============================================================
// Learns a dictionary from the distinct values of a text column
// and replaces each value with its key. Keys are assigned in the
// order values are first seen in the fit-time data.
//
//   "Bot", "Fine", "Bot"  →  dictionary ["Bot", "Fine"]
//                         →  keys [0, 1, 0]
//
// After fitting the dictionary is frozen. A value that was not in
// the fit data (including an empty string) becomes a missing key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::view::{Column, DataView};
use crate::domain::error::Result;
use crate::ml::transforms::Transformer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMapping {
    input:  String,
    output: String,
    values: Vec<String>,
}

impl KeyMapping {
    pub fn fit(view: &DataView, input: &str, output: &str) -> Result<Self> {
        let mut values: Vec<String>        = Vec::new();
        let mut seen:   HashMap<&str, u32> = HashMap::new();

        for v in view.text(input)? {
            if v.is_empty() || seen.contains_key(v.as_str()) {
                continue;
            }
            seen.insert(v.as_str(), values.len() as u32);
            values.push(v.clone());
        }

        tracing::debug!("'{}' → '{}': {} distinct keys", input, output, values.len());
        Ok(Self {
            input:  input.to_string(),
            output: output.to_string(),
            values,
        })
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Number of keys (distinct fit-time values)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Key → original value, in key order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Transformer for KeyMapping {
    fn transform(&self, view: DataView) -> Result<DataView> {
        let lookup: HashMap<&str, u32> = self
            .values
            .iter()
            .enumerate()
            .map(|(k, v)| (v.as_str(), k as u32))
            .collect();

        let keys: Vec<Option<u32>> = view
            .text(&self.input)?
            .iter()
            .map(|v| lookup.get(v.as_str()).copied())
            .collect();

        view.with_column(self.output.clone(), Column::Key(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;

    fn view(answers: &[&str]) -> DataView {
        let records: Vec<Record> = answers.iter().map(|a| Record::new("q", *a)).collect();
        DataView::from_records(&records)
    }

    #[test]
    fn test_keys_assigned_first_seen() {
        let m = KeyMapping::fit(&view(&["Bot", "Fine", "Bot"]), "Answer", "Label").unwrap();
        assert_eq!(m.values(), &["Bot".to_string(), "Fine".to_string()]);
        let out = m.transform(view(&["Bot", "Fine", "Bot"])).unwrap();
        assert_eq!(out.keys("Label").unwrap(), &[Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_unseen_and_empty_values_are_missing() {
        let m   = KeyMapping::fit(&view(&["Bot", ""]), "Answer", "Label").unwrap();
        let out = m.transform(view(&["Nope", "", "Bot"])).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(out.keys("Label").unwrap(), &[None, None, Some(0)]);
    }

    #[test]
    fn test_values_are_in_key_order() {
        let m = KeyMapping::fit(&view(&["a", "b"]), "Answer", "Label").unwrap();
        assert_eq!(m.values().get(1).map(String::as_str), Some("b"));
        assert_eq!(m.values().get(2), None);
    }
}
