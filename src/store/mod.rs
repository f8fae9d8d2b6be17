//! Reducer-style state container for the post collection.
//!
//! [`Store`] owns the current [`CollectionState`]. Local commands go straight through the
//! reducer; network operations (see `runtime`) emit their lifecycle actions through the same
//! path. Each reducer pass runs inside the watch channel's write lock, so subscribers only ever
//! observe whole states.

mod action;
mod reducer;
mod runtime;
mod state;


pub use action::{Action, EditingAction, Lifecycle, LocalAction, Phase, Rejection, RequestId};
pub use reducer::reduce;
pub use state::{CollectionState, EditingMode};

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{Post, PostDraft, PostId, new_local_id};
use crate::infra::http::PostsApi;

#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<CollectionState>>,
    api: Arc<dyn PostsApi>,
}

impl Store {
    pub fn new(api: Arc<dyn PostsApi>, initial_posts: Vec<Post>) -> Self {
        Self::with_state(api, CollectionState::new(initial_posts))
    }

    pub fn with_state(api: Arc<dyn PostsApi>, state: CollectionState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self {
            state: Arc::new(tx),
            api,
        }
    }

    pub fn dispatch(&self, action: Action) {
        log::debug!("dispatch {}", action.label());
        self.state.send_modify(|state| reducer::reduce(state, action));
    }

    pub fn snapshot(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every dispatched action.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }

    pub fn start_editing(&self, post_id: impl Into<PostId>) {
        self.dispatch(Action::Editing(EditingAction::Start(post_id.into())));
    }

    pub fn cancel_editing(&self) {
        self.dispatch(Action::Editing(EditingAction::Cancel));
    }

    /// Adds a post without contacting the service, assigning it a client-side id.
    pub fn add_local(&self, draft: PostDraft) -> Post {
        let post = Post::from_draft(new_local_id(), draft);
        self.dispatch(Action::Local(LocalAction::Add(post.clone())));
        post
    }

    pub fn delete_local(&self, post_id: impl Into<PostId>) {
        self.dispatch(Action::Local(LocalAction::Delete(post_id.into())));
    }

    pub fn finish_editing_local(&self, post: Post) {
        self.dispatch(Action::Local(LocalAction::Done(post)));
    }
}
