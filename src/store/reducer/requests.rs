//! Busy-flag bookkeeping shared by every async operation.
//!
//! The newest started request always owns the flag. A settling request only clears it when it
//! is still the owner, so a slow older response cannot end the busy period of a newer one.

use super::super::action::{Phase, RequestId};
use super::super::state::CollectionState;

pub fn track(state: &mut CollectionState, phase: Phase, request_id: RequestId) {
    match phase {
        Phase::Started => {
            state.busy = true;
            state.active_request_id = Some(request_id);
        }
        Phase::Settled => {
            if state.active_request_id == Some(request_id) {
                state.busy = false;
                state.active_request_id = None;
            }
        }
    }
}
