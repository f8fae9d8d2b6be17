use crate::domain::Post;

use super::action::RequestId;

/// The single authoritative view of the post collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    /// Posts in insertion order. Ids are pairwise distinct.
    pub post_list: Vec<Post>,
    /// Snapshot of the post being edited, copied when editing started.
    ///
    /// It is not kept in sync with `post_list`: if the post is deleted or replaced while the
    /// form is open, the snapshot goes stale until editing is cancelled or submitted.
    pub editing_post: Option<Post>,
    /// True while the most recently started operation is outstanding.
    pub busy: bool,
    /// Operation that currently owns `busy`.
    pub active_request_id: Option<RequestId>,
}

/// Editing cursor, derived from [`CollectionState::editing_post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingMode<'a> {
    Idle,
    Editing(&'a Post),
}

impl CollectionState {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            post_list: posts,
            ..Default::default()
        }
    }

    pub fn find(&self, id: &str) -> Option<&Post> {
        self.post_list.iter().find(|p| p.id == id)
    }

    pub fn editing_mode(&self) -> EditingMode<'_> {
        match &self.editing_post {
            Some(post) => EditingMode::Editing(post),
            None => EditingMode::Idle,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_post.is_some()
    }
}
