//! Particle-state identification.
//!
//! Maps user-facing labels and PDG-style numeric codes onto the canonical
//! polarized codes the fragmentation tables are stored under. Polarization
//! is encoded as a code offset: +1900 left-handed, +2900 right-handed,
//! +3900 longitudinal; the sign distinguishes particle from antiparticle.
//!
//! Everything here is a pure function over fixed tables; classification is
//! done on typed enumerations validated at construction, never by numeric
//! range arithmetic.

use crate::common::constants::{LEFT_HANDED_OFFSET, LONGITUDINAL_OFFSET, RIGHT_HANDED_OFFSET};
use crate::domain::{ParticleId, SpectrumError, SpectrumResult};
use std::fmt::{Display, Formatter};

/// Helicity/polarization tag of an initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarization {
    Left,
    Right,
    Longitudinal,
}

impl Polarization {
    pub const fn code_offset(self) -> i32 {
        match self {
            Self::Left => LEFT_HANDED_OFFSET,
            Self::Right => RIGHT_HANDED_OFFSET,
            Self::Longitudinal => LONGITUDINAL_OFFSET,
        }
    }

    pub const fn suffix(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
            Self::Longitudinal => '0',
        }
    }

    pub const fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            '0' => Some(Self::Longitudinal),
            _ => None,
        }
    }
}

/// Initial-state species the tables cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Down,
    Up,
    Strange,
    Charm,
    Bottom,
    Top,
    Electron,
    ElectronNeutrino,
    Muon,
    MuonNeutrino,
    Tau,
    TauNeutrino,
    Gluon,
    Photon,
    ZBoson,
    WBoson,
    Higgs,
}

const QUARK_AND_CHARGED_POLARIZATIONS: [Polarization; 2] = [Polarization::Left, Polarization::Right];
const NEUTRINO_POLARIZATIONS: [Polarization; 1] = [Polarization::Left];
const MASSIVE_VECTOR_POLARIZATIONS: [Polarization; 3] = [
    Polarization::Left,
    Polarization::Right,
    Polarization::Longitudinal,
];

impl Species {
    pub const ALL: [Species; 17] = [
        Species::Down,
        Species::Up,
        Species::Strange,
        Species::Charm,
        Species::Bottom,
        Species::Top,
        Species::Electron,
        Species::ElectronNeutrino,
        Species::Muon,
        Species::MuonNeutrino,
        Species::Tau,
        Species::TauNeutrino,
        Species::Gluon,
        Species::Photon,
        Species::ZBoson,
        Species::WBoson,
        Species::Higgs,
    ];

    pub const fn pdg_code(self) -> i32 {
        match self {
            Self::Down => 1,
            Self::Up => 2,
            Self::Strange => 3,
            Self::Charm => 4,
            Self::Bottom => 5,
            Self::Top => 6,
            Self::Electron => 11,
            Self::ElectronNeutrino => 12,
            Self::Muon => 13,
            Self::MuonNeutrino => 14,
            Self::Tau => 15,
            Self::TauNeutrino => 16,
            Self::Gluon => 21,
            Self::Photon => 22,
            Self::ZBoson => 23,
            Self::WBoson => 24,
            Self::Higgs => 25,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Down => "d",
            Self::Up => "u",
            Self::Strange => "s",
            Self::Charm => "c",
            Self::Bottom => "b",
            Self::Top => "t",
            Self::Electron => "e",
            Self::ElectronNeutrino => "nue",
            Self::Muon => "mu",
            Self::MuonNeutrino => "numu",
            Self::Tau => "tau",
            Self::TauNeutrino => "nutau",
            Self::Gluon => "g",
            Self::Photon => "gamma",
            Self::ZBoson => "Z",
            Self::WBoson => "W",
            Self::Higgs => "h",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|species| species.label() == label)
    }

    pub fn from_pdg_code(code: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|species| species.pdg_code() == code)
    }

    /// Polarization multiplicity of the stored tables, per species. An
    /// unpolarized query expands to exactly this set and is averaged over
    /// it. The Higgs is stored as a single unpolarized state.
    pub const fn polarizations(self) -> &'static [Polarization] {
        match self {
            Self::Down
            | Self::Up
            | Self::Strange
            | Self::Charm
            | Self::Bottom
            | Self::Top
            | Self::Electron
            | Self::Muon
            | Self::Tau
            | Self::Gluon
            | Self::Photon => &QUARK_AND_CHARGED_POLARIZATIONS,
            Self::ElectronNeutrino | Self::MuonNeutrino | Self::TauNeutrino => {
                &NEUTRINO_POLARIZATIONS
            }
            Self::ZBoson | Self::WBoson => &MASSIVE_VECTOR_POLARIZATIONS,
            Self::Higgs => &[],
        }
    }

    /// States with no distinct antiparticle: gluon, photon, Z and Higgs.
    pub const fn is_self_conjugate(self) -> bool {
        matches!(
            self,
            Self::Gluon | Self::Photon | Self::ZBoson | Self::Higgs
        )
    }
}

/// A validated polarized initial state, the key under which fragmentation
/// functions are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InitialState {
    species: Species,
    polarization: Option<Polarization>,
    antiparticle: bool,
}

impl InitialState {
    pub fn new(
        species: Species,
        polarization: Option<Polarization>,
        antiparticle: bool,
    ) -> SpectrumResult<Self> {
        let state = Self {
            species,
            polarization,
            antiparticle,
        };
        match polarization {
            Some(polarization) if !species.polarizations().contains(&polarization) => {
                return Err(SpectrumError::unrecognized(state));
            }
            None if species != Species::Higgs => {
                return Err(SpectrumError::unrecognized(state));
            }
            _ => {}
        }
        if antiparticle && species.is_self_conjugate() {
            return Err(SpectrumError::NoAntiparticle {
                id: state.to_string(),
            });
        }
        Ok(state)
    }

    pub const fn species(self) -> Species {
        self.species
    }

    pub const fn polarization(self) -> Option<Polarization> {
        self.polarization
    }

    pub const fn is_antiparticle(self) -> bool {
        self.antiparticle
    }

    /// Canonical table code: PDG id plus polarization offset, negated for
    /// antiparticles.
    pub fn code(self) -> i32 {
        let offset = self
            .polarization
            .map(Polarization::code_offset)
            .unwrap_or(0);
        let magnitude = self.species.pdg_code() + offset;
        if self.antiparticle { -magnitude } else { magnitude }
    }

    /// Parse an already-polarized canonical code. Unpolarized species codes
    /// are not accepted here; [`resolve_initial`] expands those instead.
    pub fn from_code(code: i32) -> SpectrumResult<Self> {
        let antiparticle = code < 0;
        let magnitude = code.abs();

        if magnitude == Species::Higgs.pdg_code() {
            return Self::new(Species::Higgs, None, antiparticle)
                .map_err(|error| rename_unrecognized(error, code));
        }

        for polarization in [
            Polarization::Left,
            Polarization::Right,
            Polarization::Longitudinal,
        ] {
            let species_code = magnitude - polarization.code_offset();
            if let Some(species) = Species::from_pdg_code(species_code) {
                return Self::new(species, Some(polarization), antiparticle)
                    .map_err(|error| rename_unrecognized(error, code));
            }
        }

        Err(SpectrumError::unrecognized(code))
    }

    pub fn conjugate(self) -> SpectrumResult<Self> {
        Self::new(self.species, self.polarization, !self.antiparticle)
    }

    /// Key fragment used by the delta-coefficient tables.
    pub fn transition_key_to(self, final_state: FinalState) -> String {
        format!("{}_2_{}", self.code(), final_state.pdg_code())
    }
}

impl Display for InitialState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.antiparticle {
            f.write_str("-")?;
        }
        f.write_str(self.species.label())?;
        if let Some(polarization) = self.polarization {
            write!(f, "{}", polarization.suffix())?;
        }
        Ok(())
    }
}

/// Stable final states the tables are resolved onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinalState {
    Electron,
    Positron,
    ElectronNeutrino,
    AntiElectronNeutrino,
    MuonNeutrino,
    AntiMuonNeutrino,
    TauNeutrino,
    AntiTauNeutrino,
    Photon,
    Proton,
    AntiProton,
}

impl FinalState {
    pub const ALL: [FinalState; 11] = [
        FinalState::Electron,
        FinalState::Positron,
        FinalState::ElectronNeutrino,
        FinalState::AntiElectronNeutrino,
        FinalState::MuonNeutrino,
        FinalState::AntiMuonNeutrino,
        FinalState::TauNeutrino,
        FinalState::AntiTauNeutrino,
        FinalState::Photon,
        FinalState::Proton,
        FinalState::AntiProton,
    ];

    pub const fn pdg_code(self) -> i32 {
        match self {
            Self::Electron => 11,
            Self::Positron => -11,
            Self::ElectronNeutrino => 12,
            Self::AntiElectronNeutrino => -12,
            Self::MuonNeutrino => 14,
            Self::AntiMuonNeutrino => -14,
            Self::TauNeutrino => 16,
            Self::AntiTauNeutrino => -16,
            Self::Photon => 22,
            Self::Proton => 2212,
            Self::AntiProton => -2212,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Electron => "e",
            Self::Positron => "ae",
            Self::ElectronNeutrino => "nue",
            Self::AntiElectronNeutrino => "anue",
            Self::MuonNeutrino => "numu",
            Self::AntiMuonNeutrino => "anumu",
            Self::TauNeutrino => "nutau",
            Self::AntiTauNeutrino => "anutau",
            Self::Photon => "gamma",
            Self::Proton => "p",
            Self::AntiProton => "ap",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.label() == label)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.pdg_code() == code)
    }

    /// The proton channel takes the finite-mass correction path.
    pub const fn is_proton(self) -> bool {
        matches!(self, Self::Proton | Self::AntiProton)
    }
}

impl Display for FinalState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolve a (final, initial) identifier pair into canonical table states.
///
/// Unpolarized initial identifiers expand into the full polarization set to
/// be averaged by the caller; already-polarized codes resolve to themselves.
pub fn resolve(
    final_id: &ParticleId,
    initial_id: &ParticleId,
) -> SpectrumResult<(FinalState, Vec<InitialState>)> {
    Ok((resolve_final(final_id)?, resolve_initial(initial_id)?))
}

pub fn resolve_final(id: &ParticleId) -> SpectrumResult<FinalState> {
    let resolved = match id {
        ParticleId::Label(label) => FinalState::from_label(label),
        ParticleId::Code(code) => FinalState::from_code(*code),
    };
    resolved.ok_or_else(|| SpectrumError::unrecognized(id))
}

pub fn resolve_initial(id: &ParticleId) -> SpectrumResult<Vec<InitialState>> {
    match id {
        ParticleId::Label(label) => resolve_initial_label(label),
        ParticleId::Code(code) => resolve_initial_code(*code),
    }
}

fn resolve_initial_label(label: &str) -> SpectrumResult<Vec<InitialState>> {
    if let Some(species) = Species::from_label(label) {
        return expand_unpolarized(species, false);
    }

    let mut characters = label.chars();
    let suffix = characters.next_back();
    let stem: String = characters.collect();
    let state = suffix
        .and_then(Polarization::from_suffix)
        .zip(Species::from_label(&stem))
        .map(|(polarization, species)| InitialState::new(species, Some(polarization), false));

    match state {
        Some(Ok(state)) => Ok(vec![state]),
        Some(Err(SpectrumError::UnrecognizedState { .. })) | None => {
            Err(SpectrumError::unrecognized(label))
        }
        Some(Err(error)) => Err(error),
    }
}

fn resolve_initial_code(code: i32) -> SpectrumResult<Vec<InitialState>> {
    let antiparticle = code < 0;
    match Species::from_pdg_code(code.abs()) {
        Some(species) => expand_unpolarized(species, antiparticle),
        None => Ok(vec![InitialState::from_code(code)?]),
    }
}

fn expand_unpolarized(species: Species, antiparticle: bool) -> SpectrumResult<Vec<InitialState>> {
    if species == Species::Higgs {
        return Ok(vec![InitialState::new(species, None, antiparticle)?]);
    }
    species
        .polarizations()
        .iter()
        .map(|polarization| InitialState::new(species, Some(*polarization), antiparticle))
        .collect()
}

fn rename_unrecognized(error: SpectrumError, code: i32) -> SpectrumError {
    match error {
        SpectrumError::UnrecognizedState { .. } => SpectrumError::unrecognized(code),
        other => other,
    }
}
