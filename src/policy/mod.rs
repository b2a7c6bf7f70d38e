//! Ownership checks for profile and feedback access. Pure predicates over
//! the request's session context; callers translate a denial into either a
//! login redirect (anonymous) or a redirect to the resource's owner page.

use crate::routes::feedback::model::Feedback;
use crate::session::SessionContext;

/// Any authenticated user may view any profile page. Deliberately
/// permissive; see DESIGN.md before tightening.
pub fn can_view_user(ctx: &SessionContext, _target_username: &str) -> bool {
    ctx.current_user().is_some()
}

pub fn can_modify_user(ctx: &SessionContext, target_username: &str) -> bool {
    ctx.current_user() == Some(target_username)
}

/// Feedback may only be authored by the owner of the profile it lives under.
pub fn can_create_feedback(ctx: &SessionContext, target_username: &str) -> bool {
    ctx.current_user() == Some(target_username)
}

pub fn can_modify_feedback(ctx: &SessionContext, feedback: &Feedback) -> bool {
    ctx.current_user() == Some(feedback.username.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymous() -> SessionContext {
        SessionContext::default()
    }

    fn logged_in(username: &str) -> SessionContext {
        SessionContext {
            session_id: Some("test-session".into()),
            username: Some(username.to_string()),
        }
    }

    fn feedback_owned_by(username: &str) -> Feedback {
        Feedback {
            id: 1,
            title: "Hi".into(),
            content: "Hello".into(),
            username: username.to_string(),
        }
    }

    #[test]
    fn anonymous_may_not_view_profiles() {
        assert!(!can_view_user(&anonymous(), "alice"));
    }

    #[test]
    fn any_authenticated_user_may_view_any_profile() {
        assert!(can_view_user(&logged_in("alice"), "alice"));
        assert!(can_view_user(&logged_in("bob"), "alice"));
    }

    #[test]
    fn only_the_owner_may_modify_a_user() {
        assert!(can_modify_user(&logged_in("alice"), "alice"));
        assert!(!can_modify_user(&logged_in("bob"), "alice"));
        assert!(!can_modify_user(&anonymous(), "alice"));
    }

    #[test]
    fn only_the_profile_owner_may_create_feedback() {
        assert!(can_create_feedback(&logged_in("alice"), "alice"));
        assert!(!can_create_feedback(&logged_in("bob"), "alice"));
        assert!(!can_create_feedback(&anonymous(), "alice"));
    }

    #[test]
    fn only_the_feedback_owner_may_modify_it() {
        let feedback = feedback_owned_by("alice");
        assert!(can_modify_feedback(&logged_in("alice"), &feedback));
        assert!(!can_modify_feedback(&logged_in("bob"), &feedback));
        assert!(!can_modify_feedback(&anonymous(), &feedback));
    }
}
