//! Network-backed operations.
//!
//! Every operation dispatches `Pending` before the call is polled, then exactly one of
//! `Fulfilled`, `Rejected` or `Cancelled`. `Cancelled` is also sent when the operation's future
//! is dropped mid-flight. Only create and update recover 422 responses into
//! [`OperationError::Rejected`]; everything else is handed back as [`OperationError::Failed`].

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::domain::{ApiError, OperationError, Post, PostDraft, PostId};

use super::Store;
use super::action::{Action, Lifecycle, Rejection, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationPath {
    Recover,
    Propagate,
}

impl Store {
    /// Refreshes the whole collection from the service.
    pub async fn list(&self, cancel: &CancellationToken) -> Result<Vec<Post>, OperationError> {
        let api = self.api.clone();
        self.run_operation(cancel, Action::List, ValidationPath::Propagate, async move {
            api.list().await
        })
        .await
    }

    pub async fn create(
        &self,
        draft: PostDraft,
        cancel: &CancellationToken,
    ) -> Result<Post, OperationError> {
        let api = self.api.clone();
        self.run_operation(cancel, Action::Create, ValidationPath::Recover, async move {
            api.create(&draft).await
        })
        .await
    }

    pub async fn update(
        &self,
        post_id: PostId,
        post: Post,
        cancel: &CancellationToken,
    ) -> Result<Post, OperationError> {
        let api = self.api.clone();
        self.run_operation(cancel, Action::Update, ValidationPath::Recover, async move {
            api.update(&post_id, &post).await
        })
        .await
    }

    /// Removes `post_id` once the service confirms; the response body is not consulted.
    pub async fn delete(
        &self,
        post_id: PostId,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        let api = self.api.clone();
        self.run_operation(cancel, Action::Delete, ValidationPath::Propagate, async move {
            api.delete(&post_id).await.map(|()| post_id)
        })
        .await
        .map(|_| ())
    }

    async fn run_operation<T, F>(
        &self,
        cancel: &CancellationToken,
        wrap: fn(Lifecycle<T>) -> Action,
        validation: ValidationPath,
        call: F,
    ) -> Result<T, OperationError>
    where
        T: Clone,
        F: Future<Output = Result<T, ApiError>>,
    {
        let request_id = RequestId::new();
        self.dispatch(wrap(Lifecycle::Pending { request_id }));
        let release = ReleaseOnDrop {
            store: self,
            request_id,
            armed: true,
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("request {request_id} cancelled");
                return Err(OperationError::Cancelled);
            }
            result = call => result,
        };
        release.disarm();

        match result {
            Ok(value) => {
                self.dispatch(wrap(Lifecycle::Fulfilled {
                    request_id,
                    value: value.clone(),
                }));
                Ok(value)
            }
            Err(err) => {
                if validation == ValidationPath::Recover
                    && let Some(errors) = err.validation_errors()
                {
                    log::debug!("request {request_id} rejected by validation: {errors}");
                    self.dispatch(wrap(Lifecycle::Rejected {
                        request_id,
                        reason: Rejection::Validation(errors.clone()),
                    }));
                    return Err(OperationError::Rejected(errors));
                }

                log::warn!("request {request_id} failed: {err}");
                self.dispatch(wrap(Lifecycle::Rejected {
                    request_id,
                    reason: Rejection::Failed(err.to_string()),
                }));
                Err(OperationError::Failed(err))
            }
        }
    }
}

/// Releases the busy claim of a request whose future goes away before it settles, whether
/// through its token or by being dropped.
struct ReleaseOnDrop<'a> {
    store: &'a Store,
    request_id: RequestId,
    armed: bool,
}

impl ReleaseOnDrop<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store.dispatch(Action::Cancelled {
                request_id: self.request_id,
            });
        }
    }
}
