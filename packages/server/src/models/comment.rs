use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::comment;
use crate::models::form::{FieldKind, FieldView, FormView, Widget};
use crate::models::post::UserView;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: UserView,
}

impl CommentView {
    pub fn new(comment: comment::Model, author: UserView) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            created: comment.created,
            author,
        }
    }
}

/// Body of the add-comment form.
#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// The text to store, or `None` when the comment is blank.
    pub fn clean_text(&self) -> Option<&str> {
        (!self.text.trim().is_empty()).then_some(self.text.as_str())
    }
}

pub fn comment_form() -> FormView {
    FormView::new(vec![
        FieldView::new("text", "Comment", FieldKind::CharField, Widget::Textarea)
            .required()
            .help("Text of the comment"),
    ])
}
