//! What a view needs to render.

use access_guard::AccessDecision;
use console_types::Principal;

/// Render inputs for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub decision: AccessDecision,
    pub principal: Option<Principal>,
    pub unread_count: usize,
}

impl ViewState {
    pub fn should_render(&self) -> bool {
        self.decision == AccessDecision::Render
    }
}
