//! Schema of the hierarchical fragmentation-data resource.
//!
//! The group and dataset naming is a fixed external contract: four
//! particle-category groups (`high_gauge`, `high_higgs`, `high_leptons`,
//! `high_quarks`) each carrying a `high_flavors` code list and per-final-
//! state datasets `x_<fid>`, `Q_<fid>`, `FF_<fid>`, plus a `delta_coeff`
//! group keyed by `<initial>_2_<final>` transition strings. Dataset payloads
//! are typed lazily so a corrupt or missing table only fails the query that
//! touches it.

use crate::domain::{SpectrumError, SpectrumResult};
use crate::numerics::DenseRealMatrix;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(super) struct ResourceDocument {
    pub high_gauge: GroupDocument,
    pub high_higgs: GroupDocument,
    pub high_leptons: GroupDocument,
    pub high_quarks: GroupDocument,
    pub delta_coeff: DeltaDocument,
}

#[derive(Debug, Deserialize)]
pub(super) struct GroupDocument {
    pub high_flavors: Vec<i32>,
    #[serde(flatten)]
    datasets: BTreeMap<String, serde_json::Value>,
}

impl GroupDocument {
    pub(super) fn flavor_row(&self, initial_code: i32) -> Option<usize> {
        self.high_flavors
            .iter()
            .position(|flavor| *flavor == initial_code)
    }

    pub(super) fn dataset_1d(&self, group: &str, dataset: &str) -> SpectrumResult<Vec<f64>> {
        let value = self.raw_dataset(group, dataset)?;
        serde_json::from_value(value.clone()).map_err(|error| {
            SpectrumError::missing_data(
                format!("{group}/{dataset}"),
                format!("expected a 1D numeric array: {error}"),
            )
        })
    }

    /// Read the `[flavor][Q][x]` value dataset and select one flavor row as
    /// a dense (Q, x) matrix.
    pub(super) fn dataset_grid(
        &self,
        group: &str,
        dataset: &str,
        flavor_row: usize,
    ) -> SpectrumResult<DenseRealMatrix> {
        let value = self.raw_dataset(group, dataset)?;
        let stacked: Vec<Vec<Vec<f64>>> = serde_json::from_value(value.clone()).map_err(|error| {
            SpectrumError::missing_data(
                format!("{group}/{dataset}"),
                format!("expected a [flavor][Q][x] numeric array: {error}"),
            )
        })?;

        let rows = stacked.get(flavor_row).ok_or_else(|| {
            SpectrumError::missing_data(
                format!("{group}/{dataset}"),
                format!(
                    "flavor row {flavor_row} absent, dataset holds {} rows",
                    stacked.len()
                ),
            )
        })?;

        let q_count = rows.len();
        let x_count = rows.first().map(Vec::len).unwrap_or(0);
        if q_count == 0 || x_count == 0 || rows.iter().any(|row| row.len() != x_count) {
            return Err(SpectrumError::missing_data(
                format!("{group}/{dataset}"),
                "value grid is empty or ragged",
            ));
        }

        Ok(DenseRealMatrix::from_fn(q_count, x_count, |q, x| {
            rows[q][x]
        }))
    }

    fn raw_dataset(&self, group: &str, dataset: &str) -> SpectrumResult<&serde_json::Value> {
        self.datasets.get(dataset).ok_or_else(|| {
            SpectrumError::missing_data(
                format!("{group}/{dataset}"),
                "dataset absent from resource group",
            )
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DeltaDocument {
    #[serde(rename = "Q")]
    pub log_q: Vec<f64>,
    #[serde(flatten)]
    pub transitions: BTreeMap<String, Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::ResourceDocument;
    use crate::domain::SpectrumError;

    fn minimal_document() -> ResourceDocument {
        serde_json::from_value(serde_json::json!({
            "high_gauge": { "high_flavors": [1921, 2921] },
            "high_higgs": { "high_flavors": [25] },
            "high_leptons": { "high_flavors": [1911, 2911] },
            "high_quarks": {
                "high_flavors": [1902, 2902],
                "x_22": [0.0, 0.5, 1.0],
                "Q_22": [3.0, 19.0],
                "FF_22": [
                    [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
                    [[1.1, 1.2, 1.3], [1.4, 1.5, 1.6]]
                ],
                "FF_11": [[[0.1, 0.2]]]
            },
            "delta_coeff": { "Q": [3.0, 19.0], "1911_2_11": [1.0, 1.0] }
        }))
        .expect("document should deserialize")
    }

    #[test]
    fn datasets_resolve_by_contract_names() {
        let document = minimal_document();
        assert_eq!(document.high_quarks.flavor_row(2902), Some(1));
        assert_eq!(document.high_quarks.flavor_row(1905), None);

        let x = document
            .high_quarks
            .dataset_1d("high_quarks", "x_22")
            .expect("x grid");
        assert_eq!(x, vec![0.0, 0.5, 1.0]);

        let grid = document
            .high_quarks
            .dataset_grid("high_quarks", "FF_22", 1)
            .expect("value grid");
        assert_eq!(grid.nrows(), 2);
        assert_eq!(grid.ncols(), 3);
        assert_eq!(grid[(1, 2)], 1.6);
    }

    #[test]
    fn missing_and_malformed_datasets_surface_as_missing_data() {
        let document = minimal_document();
        let missing = document
            .high_quarks
            .dataset_1d("high_quarks", "x_2212")
            .expect_err("absent dataset");
        assert!(matches!(missing, SpectrumError::MissingData { .. }));

        let short = document
            .high_quarks
            .dataset_grid("high_quarks", "FF_11", 1)
            .expect_err("flavor row beyond dataset");
        assert!(matches!(short, SpectrumError::MissingData { .. }));

        let wrong_shape = document
            .high_quarks
            .dataset_grid("high_quarks", "x_22", 0)
            .expect_err("1D dataset read as grid");
        assert!(matches!(wrong_shape, SpectrumError::MissingData { .. }));
    }

    #[test]
    fn delta_group_exposes_transition_arrays() {
        let document = minimal_document();
        assert_eq!(document.delta_coeff.log_q, vec![3.0, 19.0]);
        assert_eq!(
            document.delta_coeff.transitions.get("1911_2_11"),
            Some(&vec![1.0, 1.0])
        );
        assert!(!document.delta_coeff.transitions.contains_key("1902_2_22"));
    }
}
