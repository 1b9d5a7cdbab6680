//! UI state machine.
//!
//! Two independent axes: panel visibility and reply activity.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Launcher shown, panel hidden.
    #[default]
    Closed,
    /// Panel shown, launcher hidden.
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    #[default]
    Idle,
    /// A reply is pending; the typing indicator is shown.
    AwaitingReply,
}

/// Combined UI state. Starts `Closed` and `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UiState {
    pub visibility: Visibility,
    pub activity: Activity,
}

impl UiState {
    /// Flip visibility and return the new value.
    pub fn toggle(&mut self) -> Visibility {
        self.visibility = match self.visibility {
            Visibility::Closed => Visibility::Open,
            Visibility::Open => Visibility::Closed,
        };
        self.visibility
    }

    pub fn begin_reply(&mut self) {
        self.activity = Activity::AwaitingReply;
    }

    pub fn finish_reply(&mut self) {
        self.activity = Activity::Idle;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.activity == Activity::AwaitingReply
    }
}
