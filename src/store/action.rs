use std::fmt;

use crate::domain::{Post, PostId, ValidationErrors};

/// Opaque token identifying one issued async operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(uuid::Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Editing(EditingAction),
    Local(LocalAction),
    List(Lifecycle<Vec<Post>>),
    Create(Lifecycle<Post>),
    Update(Lifecycle<Post>),
    /// Fulfilled value is the id the caller asked to delete, never the response body.
    Delete(Lifecycle<PostId>),
    /// A cancelled operation gives up its claim on the busy flag. Carries no outcome.
    Cancelled { request_id: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditingAction {
    Start(PostId),
    Cancel,
}

/// Mutations applied without a round trip to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    /// The post already carries a client-generated id.
    Add(Post),
    Delete(PostId),
    /// Replace the post with the same id and leave edit mode.
    Done(Post),
}

/// One stage of an async operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<T> {
    Pending {
        request_id: RequestId,
    },
    Fulfilled {
        request_id: RequestId,
        value: T,
    },
    Rejected {
        request_id: RequestId,
        reason: Rejection,
    },
}

impl<T> Lifecycle<T> {
    pub fn request_id(&self) -> RequestId {
        match self {
            Lifecycle::Pending { request_id }
            | Lifecycle::Fulfilled { request_id, .. }
            | Lifecycle::Rejected { request_id, .. } => *request_id,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Lifecycle::Pending { .. } => Phase::Started,
            Lifecycle::Fulfilled { .. } | Lifecycle::Rejected { .. } => Phase::Settled,
        }
    }

    fn stage(&self) -> &'static str {
        match self {
            Lifecycle::Pending { .. } => "pending",
            Lifecycle::Fulfilled { .. } => "fulfilled",
            Lifecycle::Rejected { .. } => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Field-level rejection of a create or update.
    Validation(ValidationErrors),
    Failed(String),
}

/// Request bookkeeping view of an action, independent of which operation produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Started,
    Settled,
}

impl Action {
    pub fn request_phase(&self) -> Option<(Phase, RequestId)> {
        match self {
            Action::List(l) => Some((l.phase(), l.request_id())),
            Action::Create(l) | Action::Update(l) => Some((l.phase(), l.request_id())),
            Action::Delete(l) => Some((l.phase(), l.request_id())),
            Action::Cancelled { request_id } => Some((Phase::Settled, *request_id)),
            Action::Editing(_) | Action::Local(_) => None,
        }
    }

    /// Short label used in logs, e.g. `create/pending`.
    pub fn label(&self) -> String {
        match self {
            Action::Editing(EditingAction::Start(_)) => "editing/start".into(),
            Action::Editing(EditingAction::Cancel) => "editing/cancel".into(),
            Action::Local(LocalAction::Add(_)) => "local/add".into(),
            Action::Local(LocalAction::Delete(_)) => "local/delete".into(),
            Action::Local(LocalAction::Done(_)) => "local/done".into(),
            Action::List(l) => format!("list/{}", l.stage()),
            Action::Create(l) => format!("create/{}", l.stage()),
            Action::Update(l) => format!("update/{}", l.stage()),
            Action::Delete(l) => format!("delete/{}", l.stage()),
            Action::Cancelled { .. } => "request/cancelled".into(),
        }
    }
}
