use super::super::action::EditingAction;
use super::super::state::CollectionState;

pub fn reduce(state: &mut CollectionState, action: EditingAction) {
    match action {
        EditingAction::Start(post_id) => {
            // Copy, not alias: form edits never touch the stored post.
            state.editing_post = state.find(&post_id).cloned();
        }
        EditingAction::Cancel => {
            state.editing_post = None;
        }
    }
}
