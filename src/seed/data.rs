use anyhow::Result;

use crate::logic::{AdminActions, ChangeRequestOperations, OrderOperations};
use crate::model::{
    Badge, ChangeSet, Field, FileKind, FileRef, NewChangeRequest, NewOrder, StageState, Station,
};
use crate::notify::NullNotifier;
use crate::store::OrderStore;

fn pdf(id: &str, name: &str) -> FileRef {
    FileRef {
        id: id.to_string(),
        name: name.to_string(),
        path: format!("/files/{name}"),
        kind: FileKind::Pdf,
    }
}

fn field(key: &str, label: &str, value: &str) -> Field {
    Field {
        key: key.to_string(),
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// Load a couple of demonstration orders with some history: a merged stage
/// change, a pending change request, and a rework cycle.
pub async fn load_seed_data<S: OrderStore>(store: &S) -> Result<()> {
    let notifier = NullNotifier;

    let fascia = OrderOperations::create_order(
        store,
        NewOrder {
            id: "PO-250311".to_string(),
            title: "Backlit fascia — Nordic Retail".to_string(),
            client: "Nordic Retail AB".to_string(),
            due: "2026-09-12".to_string(),
            file: pdf("file-fascia-v1", "PO-250311.pdf"),
            badges: vec![Badge::Open],
            fields: vec![field("finish", "Finish", "Matte black")],
            materials: vec![field("alu-3mm", "Aluminium 3mm", "2.4 m²")],
            ..Default::default()
        },
        "admin",
    )
    .await?;

    AdminActions::apply_stage(
        store,
        &notifier,
        &fascia.id,
        Station::Cad,
        StageState::InProgress,
        "",
        "admin",
    )
    .await?;
    AdminActions::apply_stage(
        store,
        &notifier,
        &fascia.id,
        Station::Cad,
        StageState::Completed,
        "",
        "admin",
    )
    .await?;

    // Leave one request pending so the queue has something to review.
    ChangeRequestOperations::open(
        store,
        &fascia.id,
        NewChangeRequest {
            title: "CNC: queue".to_string(),
            author: "CNC".to_string(),
            message: Some("Sheets nested, ready to cut".to_string()),
            proposed: ChangeSet {
                stages: Some([(Station::Cnc, StageState::Queued)].into()),
                ..Default::default()
            },
        },
    )
    .await?;

    let letters = OrderOperations::create_order(
        store,
        NewOrder {
            id: "PO-250322".to_string(),
            title: "Lobby letters — brushed steel".to_string(),
            client: "Harbour Hotels".to_string(),
            due: "2026-08-30".to_string(),
            file: pdf("file-letters-v1", "PO-250322.pdf"),
            badges: vec![Badge::InProgress, Badge::Urgent],
            ..Default::default()
        },
        "admin",
    )
    .await?;

    AdminActions::apply_stage(
        store,
        &notifier,
        &letters.id,
        Station::Welding,
        StageState::InProgress,
        "",
        "admin",
    )
    .await?;
    AdminActions::send_to_rework(
        store,
        &notifier,
        &letters.id,
        Station::Welding,
        crate::model::ReworkReason::Reweld,
        "Seam visible on letter R",
        "admin",
    )
    .await?;

    log::info!("seed data loaded");
    Ok(())
}
