//! Root crate facade for the Richline editing model.

pub use richline_core::{
    codec, config, constants, document, error, history, mention, models, position, search,
    session, text, wrap,
};
pub use richline_core::{
    decode, encode, CreatedBy, CursorPosition, DocumentTemplate, EditorConfig, EditorError,
    EditorSession, Line, LineDocument, Mark, MarkKind, MarkType, Mention, MentionType, Selection,
    ViewState,
};
