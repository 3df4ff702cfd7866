//! End-to-end editing: generate, edit, validate, persist, reopen

use std::sync::Arc;

use tempfile::TempDir;
use workflow_engine::block_config::FileStorageConfig;
use workflow_engine::{
    find_builtin_preset, standard_registry, BlockConfig, BlockType, DropOutcome, EngineSettings,
    VecEventSink, WorkflowEvent, WorkflowSession, WorkflowStore,
};

fn block_id(session: &WorkflowSession<'_, WorkflowStore>, branch: &str, t: BlockType) -> String {
    session
        .config()
        .unwrap()
        .find_branch(branch)
        .unwrap()
        .block_of_type(t)
        .unwrap()
        .id
        .clone()
}

#[test]
fn test_full_editing_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let settings = EngineSettings {
        persist_dir: Some(temp_dir.path().to_path_buf()),
        ..Default::default()
    };
    let sink = Arc::new(VecEventSink::new());
    let mut session = WorkflowSession::new(
        standard_registry(),
        WorkflowStore::with_persistence(temp_dir.path()),
        sink.clone(),
        settings.clone(),
    );

    session
        .apply_preset(&find_builtin_preset("full-production").unwrap(), "order-1001")
        .unwrap();
    assert!(session.validation().is_valid);

    // Replace the storage config wholesale
    let storage = block_id(&session, "photo", BlockType::FileStorage);
    assert!(session
        .update_config(
            "photo",
            &storage,
            Some(BlockConfig::FileStorage(FileStorageConfig {
                time_to_life: Some(90),
            })),
        )
        .unwrap());

    // Refused move: retouching below delivery
    let retouching = block_id(&session, "photo", BlockType::PhotoRetouching);
    let delivery = block_id(&session, "photo", BlockType::SendToClient);
    assert!(session.begin_drag("photo", &retouching));
    assert!(matches!(
        session.end_drag(&delivery).unwrap(),
        DropOutcome::Rejected(_)
    ));

    // Accepted move: delivery above storage
    assert!(session.begin_drag("photo", &delivery));
    assert!(session.end_drag(&storage).unwrap().is_committed());
    assert!(session.validation().is_valid);

    assert!(session.save().unwrap());
    let saved = session.config().unwrap().clone();

    let mut store = WorkflowStore::with_persistence(temp_dir.path());
    assert_eq!(store.load_from_disk().unwrap(), 1);

    let mut reopened = WorkflowSession::new(
        standard_registry(),
        store,
        Arc::new(VecEventSink::new()),
        settings,
    );
    assert!(reopened.open("order-1001").unwrap());
    assert_eq!(reopened.config(), Some(&saved));

    let json = serde_json::to_value(
        reopened
            .config()
            .unwrap()
            .find_block("photo", &storage)
            .unwrap(),
    )
    .unwrap();
    assert_eq!(json["config"], serde_json::json!({"fileStorage": {"timeToLife": 90}}));

    let saved_events = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, WorkflowEvent::ConfigSaved { .. }))
        .count();
    assert_eq!(saved_events, 1);
}

#[test]
fn test_undo_walks_back_every_edit() {
    let mut session = WorkflowSession::new(
        standard_registry(),
        WorkflowStore::new(),
        Arc::new(VecEventSink::new()),
        EngineSettings::default(),
    );
    session
        .apply_preset(&find_builtin_preset("standard-photo").unwrap(), "p")
        .unwrap();
    let generated = session.config().unwrap().clone();

    let sst = block_id(&session, "photo", BlockType::Sst);
    let payment = block_id(&session, "general", BlockType::WaitPayment);
    session.toggle("photo", &sst).unwrap();
    session.toggle("general", &payment).unwrap();
    session.update_config("photo", &sst, None).unwrap();

    let mut steps = 0;
    while session.undo().unwrap() {
        steps += 1;
    }
    assert_eq!(steps, 3);
    assert_eq!(session.config(), Some(&generated));
}
