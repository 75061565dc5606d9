//! Editing session: the document plus everything a UI layer drives.
//!
//! Content edits take a snapshot first and only record it in history once the
//! edit succeeds, so a rejected edit leaves both the document and the history
//! untouched. Cursor, selection, view, search and mention changes never touch
//! history.

use crate::config::EditorConfig;
use crate::constants::INITIAL_LINE_TEXT;
use crate::document::{selection_markdown, LineDocument};
use crate::error::EditorError;
use crate::history::HistoryManager;
use crate::mention::{MentionCache, MentionResolver};
use crate::models::line::{CreatedBy, Line};
use crate::models::mark::MentionType;
use crate::models::template::{CursorPosition, DocumentTemplate, Selection, ViewState};
use crate::search::SearchState;
use crate::wrap::WrapPlan;
use chrono::Utc;
use std::collections::BTreeSet;

/// Everything undo restores.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub lines: Vec<Line>,
    pub cursor: CursorPosition,
    pub selection: Option<Selection>,
    pub view: ViewState,
    pub template: DocumentTemplate,
    pub search: SearchState,
}

/// Single-writer editing state for one document.
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: LineDocument,
    selection: Option<Selection>,
    view: ViewState,
    template: DocumentTemplate,
    search: SearchState,
    history: HistoryManager<EditorSnapshot>,
    mentions: MentionCache,
    is_typing: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_document(
            LineDocument::from_lines(vec![Line::new(INITIAL_LINE_TEXT, CreatedBy::Human)]),
            &EditorConfig::default(),
        )
    }
}

impl EditorSession {
    /// Start a session holding the introductory line.
    ///
    /// # Errors
    /// [`EditorError::InvalidConfig`] when `config` fails validation.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let first = Line::new(INITIAL_LINE_TEXT, CreatedBy::Human);
        Ok(Self::with_document(LineDocument::from_lines(vec![first]), &config))
    }

    /// Start a session from stored markdown, one line per row.
    pub fn from_markdown(text: &str, config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let document = LineDocument::from_markdown(text, CreatedBy::Human);
        tracing::debug!(lines = document.len(), "loaded document");
        Ok(Self::with_document(document, &config))
    }

    fn with_document(document: LineDocument, config: &EditorConfig) -> Self {
        let template = DocumentTemplate {
            chars_per_line: config.chars_per_line,
            lines_per_page: config.lines_per_page,
            ..DocumentTemplate::default()
        };
        let view = ViewState {
            show_page_breaks: config.show_page_breaks,
            ..ViewState::default()
        };
        Self {
            document,
            selection: None,
            view,
            template,
            search: SearchState::default(),
            history: HistoryManager::with_limit(config.history_limit),
            mentions: MentionCache::from_config(config),
            is_typing: false,
        }
    }

    pub fn lines(&self) -> &[Line] {
        self.document.lines()
    }

    pub fn document(&self) -> &LineDocument {
        &self.document
    }

    pub fn cursor(&self) -> CursorPosition {
        self.document.cursor()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn template(&self) -> &DocumentTemplate {
        &self.template
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn mention_cache(&self) -> &MentionCache {
        &self.mentions
    }

    pub fn mention_cache_mut(&mut self) -> &mut MentionCache {
        &mut self.mentions
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// Number of undo steps available.
    pub fn history_len(&self) -> usize {
        self.history.past_len()
    }

    /// Number of redo steps available.
    pub fn future_len(&self) -> usize {
        self.history.future_len()
    }

    /// Copy of the state undo would capture right now.
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            lines: self.document.lines().to_vec(),
            cursor: self.document.cursor(),
            selection: self.selection,
            view: self.view.clone(),
            template: self.template.clone(),
            search: self.search.clone(),
        }
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.document.restore(snapshot.lines, snapshot.cursor);
        self.selection = snapshot.selection;
        self.view = snapshot.view;
        self.template = snapshot.template;
        self.search = snapshot.search;
        self.annotate_mentions();
    }

    /// Run a content edit, recording history only when it succeeds.
    fn edit<T>(
        &mut self,
        operation: &'static str,
        apply: impl FnOnce(&mut LineDocument, &DocumentTemplate) -> Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        let before = self.snapshot();
        match apply(&mut self.document, &self.template) {
            Ok(value) => {
                self.commit(operation, before);
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "edit rejected");
                Err(err)
            }
        }
    }

    /// Record `before` as an undo step for an edit that has been applied.
    fn commit(&mut self, operation: &'static str, before: EditorSnapshot) {
        self.history.checkpoint(before);
        tracing::trace!(operation, undo_depth = self.history.past_len(), "checkpoint");
        self.annotate_mentions();
        tracing::debug!(
            operation,
            lines = self.document.len(),
            cursor_line = self.document.cursor().line_index,
            "edit applied"
        );
    }

    /// Replace every line.
    pub fn set_lines(&mut self, lines: Vec<Line>) {
        let before = self.snapshot();
        self.document.replace_lines(lines);
        self.commit("set_lines", before);
    }

    pub fn insert_line(
        &mut self,
        index: usize,
        text: &str,
        created_by: CreatedBy,
    ) -> Result<(), EditorError> {
        self.edit("insert_line", |document, _| {
            document.insert_line(index, text, created_by)
        })
    }

    pub fn update_line(&mut self, index: usize, markdown_text: &str) -> Result<(), EditorError> {
        self.edit("update_line", |document, _| {
            document.update_line(index, markdown_text)
        })
    }

    /// Replace a line's markdown on behalf of a non-human author.
    pub fn update_line_as(
        &mut self,
        index: usize,
        markdown_text: &str,
        created_by: CreatedBy,
    ) -> Result<(), EditorError> {
        self.edit("update_line", |document, _| {
            document.update_line_as(index, markdown_text, created_by)
        })
    }

    pub fn delete_line(&mut self, index: usize) -> Result<(), EditorError> {
        self.edit("delete_line", |document, _| document.delete_line(index))
    }

    /// Split at a markdown char offset.
    pub fn split_line(&mut self, index: usize, char_index: usize) -> Result<(), EditorError> {
        self.edit("split_line", |document, _| {
            document.split_line(index, char_index)
        })
    }

    pub fn merge_line(&mut self, index: usize) -> Result<(), EditorError> {
        self.edit("merge_line", |document, _| document.merge_line(index))
    }

    /// Fit edited text onto line `index` using the template's line budget.
    pub fn handle_auto_wrap(
        &mut self,
        index: usize,
        current_text: &str,
    ) -> Result<WrapPlan, EditorError> {
        self.edit("handle_auto_wrap", |document, template| {
            document.handle_auto_wrap(index, current_text, template.chars_per_line)
        })
    }

    /// Insert AI output at `index`, wrapped to the template's line budget.
    ///
    /// # Returns
    /// How many lines were added. Blank content adds nothing and records no
    /// undo step.
    pub fn insert_ai_content(
        &mut self,
        index: usize,
        text: &str,
        parent_id: Option<&str>,
    ) -> Result<usize, EditorError> {
        if text.trim().is_empty() {
            self.document.check_insert(index)?;
            return Ok(0);
        }
        self.edit("insert_ai_content", |document, template| {
            let lines =
                LineDocument::lines_from_ai_content(text, parent_id, template.chars_per_line);
            document.insert_lines(index, lines)
        })
    }

    /// Rewrite lines `start..=end` with AI output derived from the first of them.
    ///
    /// # Returns
    /// How many lines replaced the range. Blank content leaves the range in
    /// place and records no undo step.
    pub fn replace_with_ai_content(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<usize, EditorError> {
        if text.trim().is_empty() {
            self.document.check_range(start, end)?;
            return Ok(0);
        }
        self.edit("replace_with_ai_content", |document, template| {
            document.check_range(start, end)?;
            let parent_id = document.line(start).map(|line| line.id().to_string());
            let lines = LineDocument::lines_from_ai_content(
                text,
                parent_id.as_deref(),
                template.chars_per_line,
            );
            document.replace_range(start, end, lines)
        })
    }

    /// Markdown of lines `start..=end`, ready to hand to a model.
    pub fn markdown_range(&self, start: usize, end: usize) -> Result<String, EditorError> {
        self.document.markdown_range(start, end)
    }

    /// Move the caret; any selection is dropped.
    pub fn set_cursor(&mut self, cursor: CursorPosition) {
        self.document.set_cursor(cursor);
        self.selection = None;
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn set_typing(&mut self, is_typing: bool) {
        self.is_typing = is_typing;
    }

    pub fn set_zoom_level(&mut self, zoom: f32) {
        self.view.set_zoom_level(zoom);
    }

    /// Swap the layout template; its `chars_per_line` becomes the wrap budget.
    pub fn set_template(&mut self, template: DocumentTemplate) {
        tracing::debug!(template = %template.name, "template changed");
        self.template = template;
    }

    pub fn toggle_page_breaks(&mut self) {
        self.view.show_page_breaks = !self.view.show_page_breaks;
    }

    pub fn toggle_margins(&mut self) {
        self.view.show_margins = !self.view.show_margins;
    }

    /// Recompute page numbers with the template's page length.
    pub fn repaginate(&mut self) {
        self.document.repaginate(self.template.lines_per_page);
    }

    /// Search display text; the caret jumps to the first match.
    pub fn search(&mut self, query: &str) -> Option<CursorPosition> {
        let found = self.search.search(self.document.lines(), query);
        if let Some(position) = found {
            self.set_cursor(position);
        }
        found
    }

    pub fn next_match(&mut self) -> Option<CursorPosition> {
        let found = self.search.next();
        if let Some(position) = found {
            self.set_cursor(position);
        }
        found
    }

    pub fn previous_match(&mut self) -> Option<CursorPosition> {
        let found = self.search.previous();
        if let Some(position) = found {
            self.set_cursor(position);
        }
        found
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Resolve every stable mention in the document and annotate its mark.
    ///
    /// # Returns
    /// How many distinct mentions resolved. Failures are logged by the cache
    /// and leave their marks unannotated.
    pub fn resolve_mentions(&mut self, resolver: &dyn MentionResolver) -> usize {
        let now = Utc::now();
        let wanted: BTreeSet<(MentionType, String)> = self
            .document
            .lines()
            .iter()
            .flat_map(|line| line.marks().iter().filter_map(|mark| mark.as_mention()))
            .filter(|mention| mention.is_stable_id)
            .map(|mention| (mention.mention_type, mention.id.clone()))
            .collect();
        let resolved = wanted
            .iter()
            .filter(|(mention_type, id)| {
                self.mentions
                    .resolve(*mention_type, id, resolver, now)
                    .is_some()
            })
            .count();
        self.annotate_mentions();
        resolved
    }

    fn annotate_mentions(&mut self) {
        let now = Utc::now();
        let cache = &self.mentions;
        self.document
            .for_each_mention_mut(|mention| cache.annotate(mention, now));
    }

    /// Step back to the state before the last content edit.
    ///
    /// # Returns
    /// `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                tracing::trace!(
                    undo_depth = self.history.past_len(),
                    redo_depth = self.history.future_len(),
                    "undo"
                );
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                tracing::trace!(
                    undo_depth = self.history.past_len(),
                    redo_depth = self.history.future_len(),
                    "redo"
                );
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Markdown for the current selection, if anything is selected.
    pub fn copy_selection(&self) -> Option<String> {
        self.selection
            .filter(|selection| !selection.is_empty())
            .map(|selection| selection_markdown(self.document.lines(), &selection))
    }

    pub fn to_markdown(&self) -> String {
        self.document.to_markdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::MentionEntity;

    fn session(rows: &str) -> EditorSession {
        EditorSession::from_markdown(rows, EditorConfig::default()).expect("session")
    }

    #[test]
    fn new_session_starts_with_intro_line() {
        let session = EditorSession::new(EditorConfig::default()).expect("session");
        assert_eq!(session.to_markdown(), INITIAL_LINE_TEXT);
        assert!(!session.can_undo());
        assert_eq!(session.template().chars_per_line, 80);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EditorConfig {
            lines_per_page: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            EditorSession::new(config),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn history_is_capped_at_limit() {
        let mut session = session("start");
        for step in 0..60 {
            session
                .update_line(0, &format!("edit {}", step))
                .expect("update");
        }
        assert_eq!(session.history_len(), 50);
        while session.undo() {}
        // The ten oldest states were evicted.
        assert_eq!(session.to_markdown(), "edit 9");
    }

    #[test]
    fn undo_then_redo_restores_exact_state() {
        let mut session = session("abcdef\nsecond");
        session.split_line(0, 3).expect("split");
        session.merge_line(2).expect("merge");
        let after = session.snapshot();

        assert!(session.undo());
        assert_eq!(session.to_markdown(), "abc\ndef\nsecond");
        assert!(session.redo());
        assert_eq!(session.snapshot(), after);
        assert!(!session.can_redo());
    }

    #[test]
    fn new_edit_after_undo_clears_future() {
        let mut session = session("a");
        session.update_line(0, "b").expect("update");
        assert!(session.undo());
        assert_eq!(session.future_len(), 1);
        session.update_line(0, "c").expect("update");
        assert_eq!(session.future_len(), 0);
        assert!(!session.redo());
    }

    #[test]
    fn cursor_view_and_search_changes_do_not_checkpoint() {
        let mut session = session("find me\nand me");
        session.set_cursor(CursorPosition::new(1, 2));
        session.set_selection(Selection::new(
            CursorPosition::new(0, 0),
            CursorPosition::new(0, 4),
        ));
        session.set_zoom_level(1.5);
        session.toggle_margins();
        session.set_typing(true);
        session.search("me");
        session.next_match();
        session.repaginate();
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.cursor(), CursorPosition::new(1, 4));
        assert!(session.is_typing());
    }

    #[test]
    fn rejected_edits_leave_history_untouched() {
        let mut session = session("only");
        assert_eq!(session.merge_line(0), Err(EditorError::NothingToMerge));
        assert!(session.delete_line(3).is_err());
        assert!(session.insert_line(5, "x", CreatedBy::Human).is_err());
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.to_markdown(), "only");
    }

    #[test]
    fn set_lines_is_a_single_undo_step() {
        let mut session = session("before");
        session.set_lines(vec![
            Line::new("one", CreatedBy::Human),
            Line::new("two", CreatedBy::Human),
        ]);
        assert_eq!(session.to_markdown(), "one\ntwo");
        assert_eq!(session.history_len(), 1);
        assert!(session.undo());
        assert_eq!(session.to_markdown(), "before");
    }

    #[test]
    fn ai_content_round_trips_through_a_line_range() {
        let mut session = session("intro\nold one\nold two\nend");
        session.set_template(DocumentTemplate {
            chars_per_line: 12,
            ..DocumentTemplate::default()
        });

        let added = session
            .insert_ai_content(1, "Alpha beta gamma\n\nDelta", Some("src"))
            .expect("insert");
        assert_eq!(added, 3);
        assert_eq!(
            session.to_markdown(),
            "intro\nAlpha beta\ngamma\nDelta\nold one\nold two\nend"
        );
        assert_eq!(session.lines()[1].parent_id(), Some("src"));
        assert_eq!(session.cursor(), CursorPosition::new(3, 5));
        assert_eq!(session.history_len(), 1);

        assert_eq!(session.insert_ai_content(0, " \n\n", None), Ok(0));
        assert_eq!(
            session.insert_ai_content(99, " ", None),
            Err(EditorError::InsertOutOfRange { index: 99, len: 7 })
        );
        assert_eq!(session.history_len(), 1);

        assert_eq!(
            session.markdown_range(4, 5).expect("range"),
            "old one\nold two"
        );
        let source_id = session.lines()[4].id().to_string();
        assert_eq!(session.replace_with_ai_content(4, 5, "**New** text"), Ok(1));
        assert_eq!(
            session.to_markdown(),
            "intro\nAlpha beta\ngamma\nDelta\n**New** text\nend"
        );
        assert_eq!(session.lines()[4].parent_id(), Some(source_id.as_str()));
        assert_eq!(*session.lines()[4].created_by(), CreatedBy::Ai);
        assert_eq!(session.history_len(), 2);

        assert_eq!(
            session.replace_with_ai_content(3, 2, "x"),
            Err(EditorError::InvalidRange {
                start: 3,
                end: 2,
                len: 6
            })
        );
        assert_eq!(session.history_len(), 2);

        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.to_markdown(), "intro\nold one\nold two\nend");
    }

    #[test]
    fn set_cursor_clears_selection() {
        let mut session = session("some words");
        session.set_selection(Selection::new(
            CursorPosition::new(0, 0),
            CursorPosition::new(0, 4),
        ));
        assert_eq!(session.copy_selection().as_deref(), Some("some"));
        session.set_cursor(CursorPosition::new(0, 1));
        assert_eq!(session.selection(), None);
        assert_eq!(session.copy_selection(), None);
    }

    #[test]
    fn auto_wrap_follows_template_budget() {
        let mut session = session("x");
        session.set_template(DocumentTemplate {
            chars_per_line: 9,
            ..DocumentTemplate::default()
        });
        let plan = session
            .handle_auto_wrap(0, "aaaa bbbb cccc")
            .expect("wrap");
        assert!(plan.has_overflow());
        assert_eq!(session.to_markdown(), "aaaa bbbb\ncccc");
        assert_eq!(session.history_len(), 1);
        assert!(session.undo());
        assert_eq!(session.to_markdown(), "x");
    }

    #[test]
    fn resolved_names_survive_re_decoding() {
        let mut session = session("hi @user:42 and @user:missing");
        let resolver = |id: &str, _: MentionType| -> Result<String, EditorError> {
            match id {
                "42" => Ok("Ada".to_string()),
                other => Err(EditorError::MentionResolution(other.to_string())),
            }
        };
        assert_eq!(session.resolve_mentions(&resolver), 1);

        session
            .update_line(0, "bye @user:42 and @user:missing")
            .expect("update");
        let names: Vec<Option<String>> = session.lines()[0]
            .marks()
            .iter()
            .filter_map(|mark| mark.as_mention())
            .map(|mention| mention.display_name.clone())
            .collect();
        assert_eq!(names, vec![Some("Ada".to_string()), None]);
        assert_eq!(session.lines()[0].display_text(), "bye @42 and @missing");
    }

    #[test]
    fn recorded_usage_feeds_local_search() {
        let mut session = session("x");
        let now = Utc::now();
        session.mention_cache_mut().record_usage(
            MentionEntity::new(MentionType::Page, "p1", "Roadmap"),
            "doc-1",
            now,
        );
        let hits = session.mention_cache().search_local("road", Some("doc-1"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].to_markdown(), "[[page:p1]]");
    }
}
