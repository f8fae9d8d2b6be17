use std::collections::HashSet;

use crate::domain::{Post, PostId};

use super::super::action::{Lifecycle, LocalAction};
use super::super::state::CollectionState;

pub fn reduce_local(state: &mut CollectionState, action: LocalAction) {
    match action {
        LocalAction::Add(post) => add_post(state, post),
        LocalAction::Delete(post_id) => delete_post(state, &post_id),
        LocalAction::Done(post) => finish_update(state, post),
    }
}

pub fn reduce_list(state: &mut CollectionState, lifecycle: Lifecycle<Vec<Post>>) {
    if let Lifecycle::Fulfilled { value, .. } = lifecycle {
        replace_all(state, value);
    }
}

pub fn reduce_create(state: &mut CollectionState, lifecycle: Lifecycle<Post>) {
    if let Lifecycle::Fulfilled { value, .. } = lifecycle {
        add_post(state, value);
    }
}

pub fn reduce_update(state: &mut CollectionState, lifecycle: Lifecycle<Post>) {
    if let Lifecycle::Fulfilled { value, .. } = lifecycle {
        finish_update(state, value);
    }
}

pub fn reduce_delete(state: &mut CollectionState, lifecycle: Lifecycle<PostId>) {
    if let Lifecycle::Fulfilled { value, .. } = lifecycle {
        delete_post(state, &value);
    }
}

/// Replaces the whole list, keeping the first occurrence of any repeated id.
fn replace_all(state: &mut CollectionState, posts: Vec<Post>) {
    let mut seen: HashSet<PostId> = HashSet::with_capacity(posts.len());
    let mut unique: Vec<Post> = Vec::with_capacity(posts.len());
    for post in posts {
        if !seen.insert(post.id.clone()) {
            log::warn!("Dropping duplicate post {} from list response", post.id);
            continue;
        }
        unique.push(post);
    }
    state.post_list = unique;
}

fn add_post(state: &mut CollectionState, post: Post) {
    if let Some(existing) = state.post_list.iter_mut().find(|p| p.id == post.id) {
        log::warn!("Post {} already present; replacing instead of appending", post.id);
        *existing = post;
        return;
    }
    state.post_list.push(post);
}

/// Leaves edit mode whether or not the id was found.
fn finish_update(state: &mut CollectionState, post: Post) {
    if let Some(existing) = state.post_list.iter_mut().find(|p| p.id == post.id) {
        *existing = post;
    }
    state.editing_post = None;
}

fn delete_post(state: &mut CollectionState, post_id: &str) {
    if let Some(index) = state.post_list.iter().position(|p| p.id == post_id) {
        state.post_list.remove(index);
    }
}
