use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One physical production station a purchase order passes through.
/// The set is fixed at compile time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Station {
    Cad,
    Cnc,
    Sanding,
    Bending,
    Welding,
    Paint,
    Assembly,
    Qc,
    Logistics,
}

/// All stations in shop-floor order.
pub const STATIONS: [Station; 9] = [
    Station::Cad,
    Station::Cnc,
    Station::Sanding,
    Station::Bending,
    Station::Welding,
    Station::Paint,
    Station::Assembly,
    Station::Qc,
    Station::Logistics,
];

impl Station {
    pub fn as_str(&self) -> &'static str {
        match self {
            Station::Cad => "CAD",
            Station::Cnc => "CNC",
            Station::Sanding => "SANDING",
            Station::Bending => "BENDING",
            Station::Welding => "WELDING",
            Station::Paint => "PAINT",
            Station::Assembly => "ASSEMBLY",
            Station::Qc => "QC",
            Station::Logistics => "LOGISTICS",
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-station progress state of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageState {
    NotStarted,
    Queued,
    InProgress,
    Blocked,
    Rework,
    Completed,
}

impl StageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageState::NotStarted => "NOT_STARTED",
            StageState::Queued => "QUEUED",
            StageState::InProgress => "IN_PROGRESS",
            StageState::Blocked => "BLOCKED",
            StageState::Rework => "REWORK",
            StageState::Completed => "COMPLETED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageState::NotStarted => "Not started",
            StageState::Queued => "Queued",
            StageState::InProgress => "In progress",
            StageState::Blocked => "Blocked",
            StageState::Rework => "Rework",
            StageState::Completed => "Completed",
        }
    }

    /// Legal follow-up states. COMPLETED is terminal. The table is advisory
    /// at commit-application time; the intent layer enforces it before a
    /// stage-change request is created.
    pub fn allowed_next(&self) -> &'static [StageState] {
        use StageState::*;
        match self {
            NotStarted => &[Queued, InProgress, Blocked],
            Queued => &[InProgress, Blocked],
            InProgress => &[Rework, Blocked, Completed],
            Rework => &[InProgress, Blocked, Completed],
            Blocked => &[InProgress, Rework],
            Completed => &[],
        }
    }

    pub fn can_transition(&self, next: StageState) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a station's output was sent back for correction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReworkReason {
    Recut,
    Resand,
    Rebend,
    Reweld,
    Repaint,
    Reassemble,
    Recheck,
    Custom,
}

impl ReworkReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReworkReason::Recut => "Re-cut",
            ReworkReason::Resand => "Re-sand",
            ReworkReason::Rebend => "Re-bend",
            ReworkReason::Reweld => "Re-weld",
            ReworkReason::Repaint => "Re-paint",
            ReworkReason::Reassemble => "Re-assemble",
            ReworkReason::Recheck => "Re-check",
            ReworkReason::Custom => "Custom",
        }
    }
}

/// One logged rework event. Cycles accumulate and are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCycle {
    pub idx: u32,
    pub station: Station,
    pub reason: ReworkReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub at: String,
    pub by: String,
}

/// Total per-station stage map. Normalization guarantees every station has
/// an entry.
pub type StageMap = BTreeMap<Station, StageState>;

/// A total map with every station NOT_STARTED.
pub fn blank_stages() -> StageMap {
    STATIONS
        .iter()
        .map(|station| (*station, StageState::NotStarted))
        .collect()
}
