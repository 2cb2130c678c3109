use pathkeeper::notes::{by_category, search};
use pathkeeper::{
    BackupEnvelope, ContentItem, EngineError, GmNote, NoteCategory, builtin_builds,
    import_documents,
};

fn sample() -> BackupEnvelope {
    let characters = import_documents(builtin_builds()["kyra"], &[]).imported;
    let content = vec![
        ContentItem::image("Sandpoint map", "https://example.com/sandpoint.png"),
        ContentItem::youtube("Boss theme", "https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
    ];
    let notes = vec![
        GmNote::new("Session 1", "<p>The goblins attack the festival.</p>")
            .with_category(NoteCategory::Session)
            .with_tags(["goblins"]),
        GmNote::new("Ameiko", "Runs the Rusty Dragon").with_category(NoteCategory::Npc),
    ];
    BackupEnvelope::new(characters, content, notes)
}

#[test]
fn backup_round_trips() {
    let backup = sample();
    let json = backup.to_json().unwrap();
    assert!(json.contains("\"exportedAt\""));
    assert!(json.contains("\"gmNotes\""));
    let restored = BackupEnvelope::from_json(&json).unwrap();
    assert_eq!(restored, backup);
    assert_eq!(restored.version, "1.0.0");
}

#[test]
fn backup_missing_collection_is_rejected() {
    let json = r#"{"version": "1.0.0", "exportedAt": "2024-01-01T00:00:00Z", "characters": [], "content": []}"#;
    assert_eq!(
        BackupEnvelope::from_json(json),
        Err(EngineError::InvalidBackup("missing 'gmNotes' array".into()))
    );
}

#[test]
fn backup_without_version_is_rejected() {
    let json = r#"{"exportedAt": "2024-01-01T00:00:00Z", "characters": [], "content": [], "gmNotes": []}"#;
    assert!(matches!(
        BackupEnvelope::from_json(json),
        Err(EngineError::InvalidBackup(_))
    ));
}

#[test]
fn notes_search_and_filter() {
    let backup = sample();
    let hits = search(&backup.gm_notes, "GOBLIN");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Session 1");
    assert_eq!(search(&backup.gm_notes, "rusty").len(), 1);
    assert_eq!(by_category(&backup.gm_notes, NoteCategory::Npc)[0].title, "Ameiko");
}

#[test]
fn editing_a_note_bumps_updated_at() {
    let mut note = GmNote::new("Draft", "");
    let created = note.updated_at;
    note.edit("Final", "Body");
    assert_eq!(note.title, "Final");
    assert!(note.updated_at >= created);
    assert_eq!(note.created_at, created);
}
