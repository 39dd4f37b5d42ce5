//! Per-Group Feature Table

use crate::extractor::FeatureValue;
use crate::group::FeatureGroup;
use label_mask::Label;
use std::collections::HashMap;

/// Column header for a label
pub fn column_header(label: Label) -> String {
    format!("label{}", label)
}

/// One feature name and its per-label cells
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub name: String,
    /// One cell per table column; `None` when the label did not produce the feature
    pub cells: Vec<Option<FeatureValue>>,
}

/// Features of one group across labels: columns are labels, rows are feature names
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    group: FeatureGroup,
    columns: Vec<Label>,
    rows: Vec<FeatureRow>,
    row_index: HashMap<String, usize>,
}

impl FeatureTable {
    /// Empty table with no columns
    pub fn new(group: FeatureGroup) -> Self {
        Self {
            group,
            columns: Vec::new(),
            rows: Vec::new(),
            row_index: HashMap::new(),
        }
    }

    pub fn group(&self) -> FeatureGroup {
        self.group
    }

    /// Append a column for `label`.
    ///
    /// Existing rows the label did not produce get an empty cell; new feature
    /// names become rows appended after the existing ones, empty for earlier
    /// labels.
    pub fn push_column<I>(&mut self, label: Label, features: I)
    where
        I: IntoIterator<Item = (String, FeatureValue)>,
    {
        debug_assert!(!self.columns.contains(&label), "duplicate column {}", label);
        let width = self.columns.len();
        self.columns.push(label);
        for row in &mut self.rows {
            row.cells.push(None);
        }

        for (name, value) in features {
            let existing = self.row_index.get(&name).copied();
            let idx = match existing {
                Some(idx) => idx,
                None => {
                    let idx = self.rows.len();
                    self.row_index.insert(name.clone(), idx);
                    self.rows.push(FeatureRow {
                        name,
                        cells: vec![None; width + 1],
                    });
                    idx
                }
            };
            self.rows[idx].cells[width] = Some(value);
        }
    }

    /// Labels in column order
    pub fn columns(&self) -> &[Label] {
        &self.columns
    }

    /// `label<N>` headers in column order
    pub fn column_headers(&self) -> Vec<String> {
        self.columns.iter().map(|&l| column_header(l)).collect()
    }

    /// Rows in first-seen order
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Cell for a feature and label, `None` if empty or absent
    pub fn get(&self, feature: &str, label: Label) -> Option<&FeatureValue> {
        let col = self.columns.iter().position(|&l| l == label)?;
        let row = self.row_index.get(feature)?;
        self.rows[*row].cells[col].as_ref()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when no label has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(pairs: &[(&str, f64)]) -> Vec<(String, FeatureValue)> {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), FeatureValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_rows_are_union_in_first_seen_order() {
        let mut table = FeatureTable::new(FeatureGroup::Original);
        table.push_column(1, features(&[("original_b", 1.0), ("original_a", 2.0)]));
        table.push_column(2, features(&[("original_c", 3.0), ("original_b", 4.0)]));

        let names: Vec<&str> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["original_b", "original_a", "original_c"]);
        assert_eq!(table.column_headers(), vec!["label1", "label2"]);
    }

    #[test]
    fn test_missing_cells_stay_empty() {
        let mut table = FeatureTable::new(FeatureGroup::Original);
        table.push_column(1, features(&[("original_a", 1.0)]));
        table.push_column(2, features(&[("original_b", 2.0)]));
        table.push_column(3, features(&[("original_a", 3.0)]));

        assert_eq!(table.get("original_a", 1), Some(&FeatureValue::Number(1.0)));
        assert_eq!(table.get("original_a", 2), None);
        assert_eq!(table.get("original_a", 3), Some(&FeatureValue::Number(3.0)));
        assert_eq!(table.get("original_b", 1), None);
        assert_eq!(table.get("original_b", 2), Some(&FeatureValue::Number(2.0)));
        assert_eq!(table.get("original_b", 3), None);
        assert!(table.rows().iter().all(|r| r.cells.len() == 3));
    }

    #[test]
    fn test_empty_column_still_added() {
        let mut table = FeatureTable::new(FeatureGroup::LoG);
        table.push_column(4, Vec::new());
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.num_rows(), 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = FeatureTable::new(FeatureGroup::Exponential);
        assert!(table.is_empty());
        assert_eq!(table.group(), FeatureGroup::Exponential);
        assert_eq!(table.get("anything", 1), None);
    }
}
