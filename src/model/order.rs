use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{
    Branch, ChangeRequest, Commit, Id, Revision, ReworkReason, StageCycle, StageMap, StageState,
    Station, STATIONS,
};

/// Status badge shown on an order card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Open,
    InProgress,
    Blocked,
    ReadyToShip,
    Done,
    Urgent,
    LowStock,
    #[serde(rename = "R&D")]
    Rd,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
    Cdr,
    Other,
}

/// A stored artifact owned by the external file-storage collaborator.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: Id,
    pub name: String,
    pub path: String,
    pub kind: FileKind,
}

impl Default for FileRef {
    fn default() -> Self {
        Self {
            id: Id::default(),
            name: String::new(),
            path: String::new(),
            kind: FileKind::Other,
        }
    }
}

/// A `{key, label, value}` triple used for free-form metadata fields and
/// material-usage lines. No uniqueness is enforced here; commit application
/// is last-write-wins on the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// The root entity: a purchase order represented as a small version-control
/// repository. The working-snapshot fields (`badges`, `fields`, `materials`,
/// `progress`, `stages`, `cycles`, `default_revision_id`) are a cache of the
/// fold of the default branch's commits, kept in sync incrementally on every
/// commit, merge and rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// PO number, globally unique.
    pub id: Id,
    pub title: String,
    pub client: String,
    pub due: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(rename = "isRD", default)]
    pub is_rd: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rd_notes: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdr_file: Option<FileRef>,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub materials: Vec<Field>,
    /// 0..100 per station.
    #[serde(default)]
    pub progress: BTreeMap<Station, u8>,
    #[serde(default)]
    pub stages: StageMap,
    #[serde(default)]
    pub cycles: Vec<StageCycle>,
    /// Stations flagged for redo, with the reason per station. Direct
    /// mutations, not commits.
    #[serde(default)]
    pub redo: Vec<Station>,
    #[serde(default)]
    pub redo_reasons: BTreeMap<Station, ReworkReason>,
    pub default_branch: String,
    pub branches: Vec<Branch>,
    pub prs: Vec<ChangeRequest>,
    /// File history, newest first.
    pub revisions: Vec<Revision>,
    pub default_revision_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
}

impl Order {
    /// Fill gaps left by older stored shapes: the stage map must be total.
    /// Applied by every read accessor before an order is returned.
    pub fn normalize(&mut self) {
        for station in STATIONS {
            self.stages.entry(station).or_insert(StageState::NotStarted);
        }
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    pub fn branch_mut(&mut self, name: &str) -> Option<&mut Branch> {
        self.branches.iter_mut().find(|b| b.name == name)
    }

    pub fn revision(&self, id: &str) -> Option<&Revision> {
        self.revisions.iter().find(|r| r.id == id)
    }

    /// The initial upload: the oldest revision in the (newest-first) list.
    pub fn initial_revision(&self) -> Option<&Revision> {
        self.revisions.last()
    }

    // Badge mutations bypass the commit log. Change-request-proposed badge
    // changes go through it instead; both paths exist on purpose.

    pub fn add_badge(&mut self, badge: Badge) {
        if !self.badges.contains(&badge) {
            self.badges.push(badge);
        }
    }

    pub fn remove_badge(&mut self, badge: Badge) {
        self.badges.retain(|b| *b != badge);
    }

    pub fn set_badges(&mut self, badges: Vec<Badge>) {
        self.badges = badges;
    }

    /// Flag a station for redo. Same commit-log bypass as badges.
    pub fn add_redo_flag(&mut self, station: Station, reason: ReworkReason) {
        if !self.redo.contains(&station) {
            self.redo.push(station);
        }
        self.redo_reasons.insert(station, reason);
    }

    pub fn clear_redo_flag(&mut self, station: Station) {
        self.redo.retain(|s| *s != station);
        self.redo_reasons.remove(&station);
    }

    /// Mean of the per-station progress over all stations (missing = 0).
    pub fn overall_progress(&self) -> u8 {
        let total: u32 = STATIONS
            .iter()
            .map(|s| u32::from(*self.progress.get(s).unwrap_or(&0)))
            .sum();
        (total / STATIONS.len() as u32) as u8
    }

    /// Rework counters per station, from the accumulated cycle log.
    pub fn rework_counts(&self) -> BTreeMap<Station, usize> {
        self.cycles
            .iter()
            .map(|c| c.station)
            .counts()
            .into_iter()
            .collect()
    }
}

/// Input model for creating an order. Expands into a full aggregate with an
/// init commit on `main` and the initial file revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewOrder {
    pub id: Id,
    pub title: String,
    pub client: String,
    pub due: String,
    pub file: FileRef,
    pub badges: Vec<Badge>,
    pub fields: Vec<Field>,
    pub materials: Vec<Field>,
    pub stages: Option<StageMap>,
    pub progress: BTreeMap<Station, u8>,
    #[serde(rename = "isRD")]
    pub is_rd: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rd_notes: Option<String>,
}

impl NewOrder {
    /// Convert to a full Order with server-generated history: the initial
    /// revision and the empty init commit on `main`.
    pub fn into_order(self, author: &str) -> Order {
        let revision = Revision::new(
            None,
            author,
            format!("Initial upload for {}", self.id),
            self.file.clone(),
        );
        let init = Commit::initial();

        let mut stages = self.stages.unwrap_or_default();
        for station in STATIONS {
            stages.entry(station).or_insert(StageState::NotStarted);
        }

        Order {
            id: self.id,
            title: self.title,
            client: self.client,
            due: self.due,
            loading_date: None,
            loading_event_id: None,
            carrier: None,
            is_rd: self.is_rd,
            rd_notes: self.rd_notes,
            is_draft: false,
            cdr_file: None,
            badges: self.badges,
            fields: self.fields,
            materials: self.materials,
            progress: self.progress,
            stages,
            cycles: Vec::new(),
            redo: Vec::new(),
            redo_reasons: BTreeMap::new(),
            default_branch: "main".to_string(),
            branches: vec![Branch::new_main(init)],
            prs: Vec::new(),
            default_revision_id: revision.id.clone(),
            revisions: vec![revision],
            file: Some(self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> NewOrder {
        NewOrder {
            id: "PO-250311".to_string(),
            title: "Backlit fascia".to_string(),
            client: "Nordic Retail".to_string(),
            due: "2026-08-28".to_string(),
            file: FileRef {
                id: "f-1".to_string(),
                name: "fascia.pdf".to_string(),
                path: "/files/fascia.pdf".to_string(),
                kind: FileKind::Pdf,
            },
            ..Default::default()
        }
    }

    #[test]
    fn seeding_creates_init_commit_and_first_revision() {
        let order = seed().into_order("admin");
        assert_eq!(order.default_branch, "main");
        assert_eq!(order.branches.len(), 1);
        let main = &order.branches[0];
        assert!(main.is_default);
        assert_eq!(main.commits.len(), 1);
        assert_eq!(main.head, "init");
        assert_eq!(order.revisions.len(), 1);
        assert_eq!(order.default_revision_id, order.revisions[0].id);
        assert_eq!(order.revisions[0].parent_id, None);
        assert_eq!(order.stages.len(), STATIONS.len());
    }

    #[test]
    fn add_badge_is_idempotent() {
        let mut order = seed().into_order("admin");
        order.add_badge(Badge::Urgent);
        order.add_badge(Badge::Urgent);
        assert_eq!(
            order.badges.iter().filter(|b| **b == Badge::Urgent).count(),
            1
        );
        order.remove_badge(Badge::Urgent);
        assert!(!order.badges.contains(&Badge::Urgent));
    }

    #[test]
    fn redo_flag_lifecycle() {
        let mut order = seed().into_order("admin");
        order.add_redo_flag(Station::Cnc, ReworkReason::Recut);
        order.add_redo_flag(Station::Cnc, ReworkReason::Recut);
        assert_eq!(order.redo, vec![Station::Cnc]);
        assert_eq!(
            order.redo_reasons.get(&Station::Cnc),
            Some(&ReworkReason::Recut)
        );
        order.clear_redo_flag(Station::Cnc);
        assert!(order.redo.is_empty());
        assert!(order.redo_reasons.get(&Station::Cnc).is_none());
    }

    #[test]
    fn normalize_fills_missing_stations() {
        let mut order = seed().into_order("admin");
        order.stages.clear();
        order.stages.insert(Station::Paint, StageState::Blocked);
        order.normalize();
        assert_eq!(order.stages.len(), STATIONS.len());
        assert_eq!(order.stages.get(&Station::Paint), Some(&StageState::Blocked));
        assert_eq!(
            order.stages.get(&Station::Cad),
            Some(&StageState::NotStarted)
        );
    }

    #[test]
    fn badge_wire_name_for_rd() {
        assert_eq!(serde_json::to_string(&Badge::Rd).unwrap(), "\"R&D\"");
        assert_eq!(
            serde_json::to_string(&Badge::ReadyToShip).unwrap(),
            "\"READY_TO_SHIP\""
        );
    }

    #[test]
    fn rework_counts_come_from_the_cycle_log() {
        let mut order = seed().into_order("admin");
        for (idx, station) in [Station::Cnc, Station::Cnc, Station::Paint]
            .into_iter()
            .enumerate()
        {
            order.cycles.push(StageCycle {
                idx: idx as u32 + 1,
                station,
                reason: ReworkReason::Custom,
                note: None,
                at: crate::model::now_iso(),
                by: "admin".to_string(),
            });
        }
        let counts = order.rework_counts();
        assert_eq!(counts.get(&Station::Cnc), Some(&2));
        assert_eq!(counts.get(&Station::Paint), Some(&1));
        assert_eq!(counts.get(&Station::Qc), None);
    }

    #[test]
    fn overall_progress_averages_all_stations() {
        let mut order = seed().into_order("admin");
        order.progress.insert(Station::Cad, 90);
        assert_eq!(order.overall_progress(), 10);
    }
}
