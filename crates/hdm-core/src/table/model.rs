use crate::common::constants::X_MIN;
use crate::numerics::DenseRealMatrix;

/// One stored fragmentation table: coaligned x and log10(Q) grids plus the
/// value grid indexed (Q, x). Values follow the d(x) = x·dN/dx convention.
#[derive(Debug, Clone)]
pub struct FragmentationTable {
    pub x: Vec<f64>,
    pub log_q: Vec<f64>,
    pub values: DenseRealMatrix,
}

impl FragmentationTable {
    /// The stored x grids begin with a nominal zero bin; interpolation uses
    /// this copy with the first point clamped to the tabulated lower edge.
    pub fn interpolation_x_grid(&self) -> Vec<f64> {
        let mut grid = self.x.clone();
        if let Some(first) = grid.first_mut()
            && *first < X_MIN
        {
            *first = X_MIN;
        }
        grid
    }
}

/// A delta-function coefficient profile over the shared log10(Q) grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaProfile {
    pub log_q: Vec<f64>,
    pub coefficients: Vec<f64>,
}

/// The four mutually exclusive particle-category groups of the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableGroup {
    GaugeBosons,
    Higgs,
    Leptons,
    Quarks,
}

impl TableGroup {
    pub const ALL: [TableGroup; 4] = [
        TableGroup::GaugeBosons,
        TableGroup::Higgs,
        TableGroup::Leptons,
        TableGroup::Quarks,
    ];

    /// Top-level group name in the backing resource.
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::GaugeBosons => "high_gauge",
            Self::Higgs => "high_higgs",
            Self::Leptons => "high_leptons",
            Self::Quarks => "high_quarks",
        }
    }
}
