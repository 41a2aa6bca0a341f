mod common;

use std::time::Duration;

use common::{ScriptedStore, body};
use quire_drafts::{
    DocumentId, DocumentStatus, DocumentStore, DraftError, DraftRecord, EditorConfig,
    EditorSession, LoadSource, RunOutcome,
};
use quire_editor_core::{
    Command, FixedRequester, Key, KeyCombo, KeybindingConfig, KeydownResult, NoRequester,
    SelectionRange, ToolbarButton, Trigger,
};

fn config() -> EditorConfig {
    EditorConfig::default().with_debounce(Duration::from_millis(300))
}

#[tokio::test(start_paused = true)]
async fn edits_are_autosaved_after_the_quiet_period() {
    let store = ScriptedStore::new();
    let mut session = EditorSession::create(store.clone(), &config());
    assert!(session.id().as_str().starts_with("new-"));
    assert!(!session.has_unsaved_changes());

    assert!(session.set_title("Draft title"));
    assert!(session.set_content("hello"));
    assert!(!session.set_content("hello"), "unchanged value is not an edit");
    assert!(session.has_unsaved_changes());

    tokio::time::sleep(Duration::from_millis(301)).await;
    session.autosave().settle().await;
    assert_eq!(store.completed_drafts(), vec![Some("hello".to_owned())]);

    let indicator = session.save_indicator();
    assert!(!indicator.saving);
    assert!(indicator.last_saved.is_some());
    assert_eq!(indicator.last_error, None);

    let draft = store.get_draft(session.id()).await.unwrap().unwrap();
    assert_eq!(draft.body.title, "Draft title");
}

#[tokio::test(start_paused = true)]
async fn failed_autosave_shows_in_indicator() {
    let store = ScriptedStore::new();
    store.fail_draft_writes(true);
    let mut session = EditorSession::create(store.clone(), &config());

    session.set_content("x");
    tokio::time::sleep(Duration::from_millis(301)).await;
    session.autosave().settle().await;

    let indicator = session.save_indicator();
    assert!(indicator.last_error.is_some());
    assert!(session.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn toolbar_and_shortcut_edit_the_same_way() {
    let keys = KeybindingConfig::default_for_platform(false);
    let KeydownResult::Handled(shortcut) = keys.handle_keydown(&KeyCombo::ctrl(Key::character("b")))
    else {
        panic!("ctrl+b should be bound");
    };

    let mut outputs = Vec::new();
    for (trigger, command) in [
        (Trigger::Toolbar, ToolbarButton::Bold.command()),
        (Trigger::Shortcut, shortcut),
    ] {
        let mut session = EditorSession::create(ScriptedStore::new(), &config());
        session.set_content("Hello world");
        session.set_selection(SelectionRange::new(0, 5));
        let outcome = session.run(trigger, &command, &NoRequester).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Edited));
        outputs.push((session.document().body.content.clone(), session.selection()));
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0].0, "**Hello** world");
    assert_eq!(outputs[0].1, SelectionRange::caret(9));
}

#[tokio::test(start_paused = true)]
async fn cancelled_link_prompt_changes_nothing() {
    let mut session = EditorSession::create(ScriptedStore::new(), &config());
    session.set_content("Click here");
    session.set_selection(SelectionRange::new(0, 10));

    let outcome = session
        .run(Trigger::Shortcut, &Command::Link, &FixedRequester::cancelled())
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Unchanged));
    assert_eq!(session.document().body.content, "Click here");

    session
        .run(Trigger::Toolbar, &Command::Link, &FixedRequester::new("https://x.io"))
        .await
        .unwrap();
    assert_eq!(session.document().body.content, "[Click here](https://x.io)");
}

#[tokio::test(start_paused = true)]
async fn save_command_commits() {
    let store = ScriptedStore::new();
    let mut session = EditorSession::create(store.clone(), &config());

    let err = session
        .run(Trigger::Shortcut, &Command::Save, &NoRequester)
        .await
        .unwrap_err();
    assert!(matches!(err, DraftError::Validation(_)));

    session.set_title("Published");
    session.set_content("body");
    session.set_status(DocumentStatus::Published);
    let outcome = session
        .run(Trigger::Toolbar, &Command::Save, &NoRequester)
        .await
        .unwrap();
    let RunOutcome::Committed(report) = outcome else {
        panic!("save should commit");
    };
    assert!(report.draft_synced());
    assert!(!session.has_unsaved_changes());
    assert_eq!(session.save_indicator().last_saved, Some(report.published_at));

    let published = store.get_published(session.id()).await.unwrap().unwrap();
    assert_eq!(published.body.status, DocumentStatus::Published);
    assert_eq!(published.body.content, "body");
}

#[tokio::test(start_paused = true)]
async fn reopening_resumes_newer_draft_as_unsaved() {
    let store = ScriptedStore::new();
    let id = DocumentId::new("note");
    store.inner.insert_draft(
        id.clone(),
        DraftRecord {
            body: body("T", "resumed"),
            is_draft: true,
            updated_at: common::t0(),
        },
    );

    let session = EditorSession::open(store.clone(), &id, &config()).await.unwrap();
    assert_eq!(session.source(), LoadSource::Draft);
    assert!(session.has_unsaved_changes());
    assert_eq!(session.document().body.content, "resumed");

    let missing = EditorSession::open(store, &DocumentId::new("nope"), &config()).await;
    assert!(matches!(missing, Err(DraftError::NotFound { .. })));
}

#[tokio::test(start_paused = true)]
async fn close_drops_pending_autosave() {
    let store = ScriptedStore::new();
    let mut session = EditorSession::create(store.clone(), &config());
    session.set_content("never saved");
    let document = session.close();
    assert_eq!(document.body.content, "never saved");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(store.draft_attempts(), 0);
}
