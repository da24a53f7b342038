//! Access to the persisted fragmentation-function tables.
//!
//! The backing resource is read-only and reached through the
//! [`FragmentationTableSource`] capability trait so long-running services
//! can memoize parsed grids; [`JsonTableSource`] is the shipped provider
//! and parses the resource once at open.

mod model;
mod parser;

pub use model::{DeltaProfile, FragmentationTable, TableGroup};

use crate::domain::{SpectrumError, SpectrumResult};
use crate::states::FinalState;
use parser::{GroupDocument, ResourceDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Transitions with a non-zero delta-function coefficient, keyed
/// `<initial>_2_<final>`. Every other transition contributes exactly zero.
pub const DELTA_TRANSITIONS: [&str; 14] = [
    "1911_2_11",
    "-1911_2_-11",
    "2911_2_11",
    "-2911_2_-11",
    "1912_2_12",
    "-1912_2_-12",
    "1914_2_14",
    "-1914_2_-14",
    "1916_2_16",
    "-1916_2_-16",
    "1922_2_22",
    "2922_2_22",
    "1923_2_22",
    "2923_2_22",
];

pub fn is_delta_transition(key: &str) -> bool {
    DELTA_TRANSITIONS.contains(&key)
}

/// Capability interface over the fragmentation-data resource.
pub trait FragmentationTableSource {
    /// Retrieve the (x, log10 Q, values) triple stored for the given final
    /// state and canonical polarized initial code.
    fn fragmentation_table(
        &self,
        final_state: FinalState,
        initial_code: i32,
    ) -> SpectrumResult<FragmentationTable>;

    /// Retrieve the delta-coefficient profile for a transition key, or
    /// `None` when the resource stores no such transition.
    fn delta_profile(&self, transition: &str) -> SpectrumResult<Option<DeltaProfile>>;
}

/// Table provider over a JSON rendering of the hierarchical resource. The
/// document is parsed once at `open` and every query is served from memory.
#[derive(Debug)]
pub struct JsonTableSource {
    path: PathBuf,
    document: ResourceDocument,
}

impl JsonTableSource {
    pub fn open(path: impl AsRef<Path>) -> SpectrumResult<Self> {
        let path = path.as_ref().to_path_buf();
        let source = fs::read_to_string(&path).map_err(|source| SpectrumError::ResourceRead {
            path: path.clone(),
            source,
        })?;
        let document =
            serde_json::from_str(&source).map_err(|source| SpectrumError::ResourceParse {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn group(&self, group: TableGroup) -> &GroupDocument {
        match group {
            TableGroup::GaugeBosons => &self.document.high_gauge,
            TableGroup::Higgs => &self.document.high_higgs,
            TableGroup::Leptons => &self.document.high_leptons,
            TableGroup::Quarks => &self.document.high_quarks,
        }
    }

    /// The category groups are disjoint by construction of the code scheme,
    /// so membership in a group's own flavor list uniquely locates a row.
    fn locate(&self, initial_code: i32) -> SpectrumResult<(TableGroup, usize)> {
        TableGroup::ALL
            .into_iter()
            .find_map(|group| {
                self.group(group)
                    .flavor_row(initial_code)
                    .map(|row| (group, row))
            })
            .ok_or_else(|| {
                SpectrumError::missing_data(
                    format!("high_flavors entry {initial_code}"),
                    "no particle-category group lists this initial state",
                )
            })
    }
}

impl FragmentationTableSource for JsonTableSource {
    fn fragmentation_table(
        &self,
        final_state: FinalState,
        initial_code: i32,
    ) -> SpectrumResult<FragmentationTable> {
        let (group, row) = self.locate(initial_code)?;
        let group_name = group.resource_name();
        let final_code = final_state.pdg_code();
        tracing::debug!(
            group = group_name,
            initial_code,
            final_code,
            "fetching fragmentation table"
        );

        let document = self.group(group);
        let x = document.dataset_1d(group_name, &format!("x_{final_code}"))?;
        let log_q = document.dataset_1d(group_name, &format!("Q_{final_code}"))?;
        let values = document.dataset_grid(group_name, &format!("FF_{final_code}"), row)?;

        Ok(FragmentationTable { x, log_q, values })
    }

    fn delta_profile(&self, transition: &str) -> SpectrumResult<Option<DeltaProfile>> {
        let Some(coefficients) = self.document.delta_coeff.transitions.get(transition) else {
            return Ok(None);
        };
        if coefficients.len() != self.document.delta_coeff.log_q.len() {
            return Err(SpectrumError::missing_data(
                format!("delta_coeff/{transition}"),
                format!(
                    "coefficient array length {} does not match Q grid length {}",
                    coefficients.len(),
                    self.document.delta_coeff.log_q.len()
                ),
            ));
        }
        Ok(Some(DeltaProfile {
            log_q: self.document.delta_coeff.log_q.clone(),
            coefficients: coefficients.clone(),
        }))
    }
}
