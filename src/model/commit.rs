use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{
    generate_id, now_iso, Badge, Field, Id, Order, StageCycle, StageState, Station,
};

/// A partial patch to an order's metadata. A commit carries only the delta,
/// never the full state, which keeps history compact and makes replay
/// well-defined.
///
/// Application rule: present keys overwrite the snapshot, absent keys leave
/// it untouched. `progress` and `stages` shallow-merge per station; every
/// other key is a full replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badges: Option<Vec<Badge>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<BTreeMap<Station, u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_revision_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<BTreeMap<Station, StageState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<StageCycle>>,
    #[serde(rename = "isRD", skip_serializing_if = "Option::is_none")]
    pub is_rd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rd_notes: Option<String>,
}

impl ChangeSet {
    /// Fold this change set into a working snapshot. The destructuring is
    /// deliberate: adding a key to the struct without extending this table
    /// fails to compile.
    pub fn apply_to(&self, order: &mut Order) {
        let ChangeSet {
            title,
            client,
            due,
            fields,
            materials,
            badges,
            progress,
            default_revision_id,
            loading_date,
            stages,
            cycles,
            is_rd,
            rd_notes,
        } = self;

        if let Some(v) = title {
            order.title = v.clone();
        }
        if let Some(v) = client {
            order.client = v.clone();
        }
        if let Some(v) = due {
            order.due = v.clone();
        }
        if let Some(v) = fields {
            order.fields = v.clone();
        }
        if let Some(v) = materials {
            order.materials = v.clone();
        }
        if let Some(v) = badges {
            order.badges = v.clone();
        }
        if let Some(patch) = progress {
            for (station, pct) in patch {
                order.progress.insert(*station, *pct);
            }
        }
        if let Some(v) = default_revision_id {
            order.default_revision_id = v.clone();
        }
        if let Some(v) = loading_date {
            order.loading_date = Some(v.clone());
        }
        if let Some(patch) = stages {
            for (station, state) in patch {
                order.stages.insert(*station, *state);
            }
        }
        if let Some(v) = cycles {
            order.cycles = v.clone();
        }
        if let Some(v) = is_rd {
            order.is_rd = *v;
        }
        if let Some(v) = rd_notes {
            order.rd_notes = Some(v.clone());
        }
    }
}

/// An immutable, timestamped partial patch on a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: Id,
    /// RFC 3339, taken when the commit was created.
    pub ts: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<Station>,
    pub message: String,
    #[serde(default)]
    pub changes: ChangeSet,
}

impl Commit {
    pub fn new(
        author: impl Into<String>,
        station: Option<Station>,
        message: impl Into<String>,
        changes: ChangeSet,
    ) -> Self {
        Self {
            id: generate_id(),
            ts: now_iso(),
            author: author.into(),
            station,
            message: message.into(),
            changes,
        }
    }

    /// The empty commit that seeds every order's default branch.
    pub fn initial() -> Self {
        Self {
            id: "init".to_string(),
            ts: now_iso(),
            author: "System".to_string(),
            station: None,
            message: "Order created".to_string(),
            changes: ChangeSet::default(),
        }
    }
}

/// Input model for a direct commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCommit {
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<Station>,
    pub message: String,
    #[serde(default)]
    pub changes: ChangeSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{blank_stages, FileKind, FileRef, NewOrder};

    fn test_order() -> Order {
        NewOrder {
            id: "PO-1".to_string(),
            title: "Entrance sign".to_string(),
            client: "Acme".to_string(),
            due: "2026-09-01".to_string(),
            file: FileRef {
                id: "f1".to_string(),
                name: "po-1.pdf".to_string(),
                path: "/files/po-1.pdf".to_string(),
                kind: FileKind::Pdf,
            },
            ..Default::default()
        }
        .into_order("admin")
    }

    #[test]
    fn absent_keys_leave_the_snapshot_untouched() {
        let mut order = test_order();
        order.title = "Original".to_string();
        ChangeSet {
            client: Some("New client".to_string()),
            ..Default::default()
        }
        .apply_to(&mut order);
        assert_eq!(order.title, "Original");
        assert_eq!(order.client, "New client");
    }

    #[test]
    fn stages_and_progress_shallow_merge() {
        let mut order = test_order();
        order.stages = blank_stages();
        order.stages.insert(Station::Cad, StageState::Completed);
        order.progress.insert(Station::Cad, 100);

        ChangeSet {
            stages: Some([(Station::Cnc, StageState::InProgress)].into()),
            progress: Some([(Station::Cnc, 40)].into()),
            ..Default::default()
        }
        .apply_to(&mut order);

        assert_eq!(order.stages.get(&Station::Cad), Some(&StageState::Completed));
        assert_eq!(
            order.stages.get(&Station::Cnc),
            Some(&StageState::InProgress)
        );
        assert_eq!(order.progress.get(&Station::Cad), Some(&100));
        assert_eq!(order.progress.get(&Station::Cnc), Some(&40));
    }

    #[test]
    fn scalar_keys_fully_replace() {
        let mut order = test_order();
        order.badges = vec![Badge::Open, Badge::Urgent];
        ChangeSet {
            badges: Some(vec![Badge::Done]),
            ..Default::default()
        }
        .apply_to(&mut order);
        assert_eq!(order.badges, vec![Badge::Done]);
    }

    #[test]
    fn replay_is_deterministic() {
        let patches = vec![
            ChangeSet {
                title: Some("v2".to_string()),
                ..Default::default()
            },
            ChangeSet {
                progress: Some([(Station::Welding, 60)].into()),
                stages: Some([(Station::Welding, StageState::InProgress)].into()),
                ..Default::default()
            },
            ChangeSet {
                badges: Some(vec![Badge::InProgress]),
                ..Default::default()
            },
        ];

        let fold = |base: &Order| {
            let mut snapshot = base.clone();
            for patch in &patches {
                patch.apply_to(&mut snapshot);
            }
            snapshot
        };

        let base = test_order();
        assert_eq!(fold(&base), fold(&base));
    }

    #[test]
    fn change_set_round_trips_with_wire_names() {
        let changes = ChangeSet {
            default_revision_id: Some("rev-2".to_string()),
            is_rd: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_string(&changes).unwrap();
        assert!(json.contains("\"defaultRevisionId\""));
        assert!(json.contains("\"isRD\""));
        let parsed: ChangeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, changes);
    }
}
