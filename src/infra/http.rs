//! HTTP collaborator for the `/posts` resource.
//!
//! Calls are cancelled by dropping their futures; `reqwest` aborts the underlying request when
//! that happens, so the store never has to reach into the transport.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::domain::{ApiError, Post, PostDraft};
use crate::infra::app_config::ClientConfig;

/// Remote operations the store relies on.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET /posts`
    async fn list(&self) -> Result<Vec<Post>, ApiError>;
    /// `POST /posts`; the response carries the server-assigned id.
    async fn create(&self, draft: &PostDraft) -> Result<Post, ApiError>;
    /// `PUT /posts/{id}`
    async fn update(&self, id: &str, post: &Post) -> Result<Post, ApiError>;
    /// `DELETE /posts/{id}`; the response body is not interpreted.
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct HttpPostsApi {
    client: Client,
    base_url: Url,
}

impl HttpPostsApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn posts_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("posts");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|err| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}

/// Turns non-2xx responses into [`ApiError::Status`], keeping the body when it is JSON.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let bytes = response.bytes().await?;
    let body = serde_json::from_slice(&bytes).ok();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = check_status(response).await?.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.posts_url(None);
        log::debug!("GET {url}");
        read_json(self.client.get(url).send().await?).await
    }

    async fn create(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let url = self.posts_url(None);
        log::debug!("POST {url}");
        read_json(self.client.post(url).json(draft).send().await?).await
    }

    async fn update(&self, id: &str, post: &Post) -> Result<Post, ApiError> {
        let url = self.posts_url(Some(id));
        log::debug!("PUT {url}");
        read_json(self.client.put(url).json(post).send().await?).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.posts_url(Some(id));
        log::debug!("DELETE {url}");
        check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}
