use serde::{Deserialize, Serialize};

/// Identifier of a post, assigned by the remote service (or by the client for local posts).
pub type PostId = String;

/// A blog post as exchanged with the remote service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Sole identity key. Immutable once assigned.
    pub id: PostId,
    pub title: String,
    pub description: String,
    /// URL of the image shown with the post.
    pub featured_image: String,
    /// Publish date as entered by the author (`datetime-local` format).
    pub publish_date: String,
    #[serde(default)]
    pub published: bool,
}

/// A post that has not been assigned an id yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub featured_image: String,
    pub publish_date: String,
    #[serde(default)]
    pub published: bool,
}

impl Post {
    pub fn from_draft(id: impl Into<PostId>, draft: PostDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            featured_image: draft.featured_image,
            publish_date: draft.publish_date,
            published: draft.published,
        }
    }

    /// Copies the editable fields, dropping the id.
    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            featured_image: self.featured_image.clone(),
            publish_date: self.publish_date.clone(),
            published: self.published,
        }
    }
}

/// Generates a client-side id for posts created without a round trip.
pub fn new_local_id() -> PostId {
    uuid::Uuid::new_v4().simple().to_string()
}
