use richline::mention::MentionEntity;
use richline::{
    CreatedBy, CursorPosition, EditorConfig, EditorError, EditorSession, LineDocument, MarkType,
    MentionType, Selection,
};
use tempfile::TempDir;

fn setup_session(markdown: &str) -> EditorSession {
    EditorSession::from_markdown(markdown, EditorConfig::default()).unwrap()
}

#[test]
fn markdown_survives_a_trip_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.md");

    let mut session = setup_session("Title with **bold**\nping @user:42 about [[page:roadmap]]");
    session
        .insert_line(2, "closing _note_ for [[Old Page]]", CreatedBy::Ai)
        .unwrap();
    std::fs::write(&path, session.to_markdown()).unwrap();

    let stored = std::fs::read_to_string(&path).unwrap();
    let reloaded = LineDocument::from_markdown(&stored, CreatedBy::Human);
    assert_eq!(reloaded.to_markdown_lines(), session.document().to_markdown_lines());
    for (before, after) in session.lines().iter().zip(reloaded.lines()) {
        assert_eq!(before.display_text(), after.display_text());
        assert_eq!(before.marks(), after.marks());
    }
    assert_eq!(
        reloaded.plain_text(),
        "Title with bold\nping @42 about roadmap\nclosing note for Old Page"
    );
}

#[test]
fn windows_line_endings_load_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crlf.md");
    std::fs::write(&path, "one **1**\r\ntwo _2_\r\n").unwrap();

    let stored = std::fs::read_to_string(&path).unwrap();
    let session = setup_session(&stored);
    assert_eq!(session.lines()[0].display_text(), "one 1");
    assert_eq!(session.lines()[1].display_text(), "two 2");
    assert_eq!(session.lines()[2].markdown_text(), "");
}

#[test]
fn typing_session_with_wrap_split_merge_and_undo() {
    let config = EditorConfig {
        chars_per_line: 20,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::from_markdown("draft", config).unwrap();

    session
        .handle_auto_wrap(0, "a line that has **far too many** words in it")
        .unwrap();
    // Overflow moves to the continuation line whole; it is not re-wrapped.
    let rows = session.document().to_markdown_lines();
    assert_eq!(rows, vec!["a line that has", "**far too many** words in it"]);
    assert_eq!(session.cursor(), CursorPosition::new(1, 0));

    let first_id = session.lines()[0].id().to_string();
    session.split_line(0, 2).unwrap();
    assert_eq!(session.lines()[1].parent_id(), Some(first_id.as_str()));
    session.merge_line(1).unwrap();
    assert_eq!(session.document().to_markdown_lines(), rows);

    assert_eq!(session.history_len(), 3);
    while session.undo() {}
    assert_eq!(session.to_markdown(), "draft");
    while session.redo() {}
    assert_eq!(session.document().to_markdown_lines(), rows);
}

#[test]
fn cursor_lands_in_display_space_after_merge() {
    let mut session = setup_session("hello @user:7\n **world**");
    session.merge_line(1).unwrap();
    let merged = &session.lines()[0];
    assert_eq!(merged.display_text(), "hello @7 world");
    // "hello @7" is eight display chars.
    assert_eq!(session.cursor(), CursorPosition::new(0, 8));
    assert_eq!(merged.display_to_markdown(8), 13);
}

#[test]
fn invalid_edits_are_reported_and_ignored() {
    let mut session = setup_session("only line");
    assert_eq!(session.merge_line(0), Err(EditorError::NothingToMerge));
    assert_eq!(
        session.split_line(4, 0),
        Err(EditorError::LineOutOfRange { index: 4, len: 1 })
    );
    assert!(!session.can_undo());
    assert!(!session.undo());
    assert_eq!(session.to_markdown(), "only line");
}

#[test]
fn copy_selection_across_lines_keeps_formatting() {
    let mut session = setup_session("intro **bold text** end\nsee [[page:p1]] now");
    session.set_selection(Selection::new(
        CursorPosition::new(1, 6),
        CursorPosition::new(0, 11),
    ));
    assert_eq!(
        session.copy_selection().unwrap(),
        "**text** end\nsee [[page:p1]]"
    );
}

#[test]
fn mentions_resolve_through_the_session() {
    let mut session = setup_session("cc @user:u1 and @legacy on [[page:p1]]");
    let resolver = |id: &str, mention_type: MentionType| -> Result<String, EditorError> {
        Ok(format!("{}-{}", mention_type, id))
    };
    assert_eq!(session.resolve_mentions(&resolver), 2);

    let labels: Vec<String> = session.lines()[0]
        .marks()
        .iter()
        .filter(|mark| mark.mark_type() == MarkType::Mention)
        .filter_map(|mark| mark.as_mention())
        .map(|mention| mention.label())
        .collect();
    assert_eq!(labels, vec!["@user-u1", "@legacy", "page-p1"]);

    let now = chrono::Utc::now();
    let cache = session.mention_cache_mut();
    cache.record_usage(MentionEntity::new(MentionType::User, "u1", "Ursula"), "doc", now);
    assert_eq!(cache.stats().recent, 1);
    assert_eq!(cache.sweep_expired(now + chrono::Duration::seconds(301)), 2);
}

#[test]
fn decoded_lines_serialize_for_tooling() {
    let session = setup_session("**hi** @user:9");
    let json = serde_json::to_value(session.lines()).unwrap();
    let marks = json[0]["marks"].as_array().unwrap();
    assert_eq!(marks[0]["type"], "bold");
    assert_eq!(marks[1]["type"], "mention");
    assert_eq!(marks[1]["mention_type"], "user");
    assert_eq!(json[0]["display_text"], "hi @9");
    assert_eq!(json[0]["created_by"], "human");
}
