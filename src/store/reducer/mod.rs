pub mod editing;
pub mod posts;
pub mod requests;

use super::action::Action;
use super::state::CollectionState;

/// Applies one action to the state. Total over [`Action`]; never fails.
pub fn reduce(state: &mut CollectionState, action: Action) {
    let request_phase = action.request_phase();

    match action {
        Action::Editing(action) => editing::reduce(state, action),
        Action::Local(action) => posts::reduce_local(state, action),
        Action::List(lifecycle) => posts::reduce_list(state, lifecycle),
        Action::Create(lifecycle) => posts::reduce_create(state, lifecycle),
        Action::Update(lifecycle) => posts::reduce_update(state, lifecycle),
        Action::Delete(lifecycle) => posts::reduce_delete(state, lifecycle),
        Action::Cancelled { .. } => {}
    }

    if let Some((phase, request_id)) = request_phase {
        requests::track(state, phase, request_id);
    }
}
