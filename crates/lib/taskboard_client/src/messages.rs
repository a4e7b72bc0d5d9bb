//! User-facing banner text for failed requests.

use std::time::Duration;

/// How long an error banner stays up before the store's request state is
/// cleared.
pub const BANNER_DISMISS_AFTER: Duration = Duration::from_secs(7);

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// The user action a banner reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    Load,
    Create,
    Update,
    Delete,
}

impl Action {
    fn failed(self) -> &'static str {
        match self {
            Action::Login => "Could not sign in. Please try again.",
            Action::Register => "Could not register. Please try again.",
            Action::Load => "Could not load data. Please try again.",
            Action::Create => "Could not create the item. Please try again.",
            Action::Update => "Could not save changes. Please try again.",
            Action::Delete => "Could not delete the item. Please try again.",
        }
    }
}

/// Banner for `status` after `action` failed.
///
/// The login endpoint answers a wrong email/password pair with 409; only
/// there does that status mean "invalid credentials".
pub fn banner(action: Action, status: u16) -> &'static str {
    match (action, status) {
        (Action::Login, 409) => INVALID_CREDENTIALS,
        (_, 400) => "Invalid data.",
        (_, 401) => "Your session has expired. Please sign in again.",
        (_, 403) => "You do not have permission to do that.",
        (Action::Delete, 404) => "The item does not exist or was already deleted.",
        (_, 404) => "The item was not found.",
        (_, 409) => "An item with those details already exists.",
        (action, _) => action.failed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_conflict_reads_as_invalid_credentials() {
        assert_eq!(banner(Action::Login, 409), INVALID_CREDENTIALS);
    }

    #[test]
    fn conflict_elsewhere_is_a_duplicate() {
        assert_ne!(banner(Action::Create, 409), INVALID_CREDENTIALS);
        assert_ne!(banner(Action::Register, 409), INVALID_CREDENTIALS);
    }

    #[test]
    fn unmapped_status_falls_back_to_action_text() {
        assert_eq!(banner(Action::Update, 500), Action::Update.failed());
        assert_eq!(banner(Action::Load, 418), Action::Load.failed());
    }
}
