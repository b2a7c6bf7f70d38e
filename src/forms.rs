//! Typed request forms with field-level validation. Each form deserializes
//! from an urlencoded body via `axum::Form`; `validate` returns the per-field
//! error messages to re-render alongside the submitted values.

use serde::Deserialize;

#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn field(&self, field: &str) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

fn require(errors: &mut FormErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
        false
    } else {
        true
    }
}

fn limit(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Must be at most {} characters.", max));
    }
}

/// Minimal shape check: one '@', non-empty local part, dotted domain,
/// no whitespace. Anything stricter belongs to a confirmation email.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        if require(&mut errors, "username", &self.username) {
            limit(&mut errors, "username", &self.username, 20);
        }
        require(&mut errors, "password", &self.password);
        if require(&mut errors, "email", &self.email) {
            limit(&mut errors, "email", &self.email, 50);
            if !looks_like_email(self.email.trim()) {
                errors.add("email", "Not a valid email address.");
            }
        }
        if require(&mut errors, "first_name", &self.first_name) {
            limit(&mut errors, "first_name", &self.first_name, 30);
        }
        if require(&mut errors, "last_name", &self.last_name) {
            limit(&mut errors, "last_name", &self.last_name, 30);
        }

        errors
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        require(&mut errors, "username", &self.username);
        require(&mut errors, "password", &self.password);

        errors
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl FeedbackForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        if require(&mut errors, "title", &self.title) {
            limit(&mut errors, "title", &self.title, 100);
        }
        require(&mut errors, "content", &self.content);

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_form() -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            password: "secret1".into(),
            email: "a@x.com".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
        }
    }

    #[test]
    fn valid_registration_has_no_errors() {
        assert!(valid_register_form().validate().is_empty());
    }

    #[test]
    fn every_registration_field_is_required() {
        let form = RegisterForm::default();
        let errors = form.validate();
        for field in ["username", "password", "email", "first_name", "last_name"] {
            assert!(
                errors.field(field).next().is_some(),
                "expected an error for {}",
                field
            );
        }
    }

    #[test]
    fn whitespace_only_input_counts_as_missing() {
        let mut form = valid_register_form();
        form.password = "   ".into();
        let errors = form.validate();
        assert_eq!(errors.field("password").count(), 1);
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let mut form = valid_register_form();
        form.username = "a".repeat(21);
        form.first_name = "b".repeat(31);
        let errors = form.validate();
        assert!(errors.field("username").next().is_some());
        assert!(errors.field("first_name").next().is_some());
        assert!(errors.field("last_name").next().is_none());
    }

    #[test]
    fn length_limits_are_inclusive() {
        let mut form = valid_register_form();
        form.username = "a".repeat(20);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["not-an-email", "@x.com", "a@", "a@x", "a b@x.com", "a@@x.com"] {
            let mut form = valid_register_form();
            form.email = bad.into();
            assert!(
                form.validate().field("email").next().is_some(),
                "expected {} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn plausible_emails_are_accepted() {
        for good in ["a@x.com", "first.last@sub.example.org"] {
            let mut form = valid_register_form();
            form.email = good.into();
            assert!(
                form.validate().is_empty(),
                "expected {} to be accepted",
                good
            );
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate();
        assert_eq!(errors.len(), 2);

        let form = LoginForm {
            username: "alice".into(),
            password: "secret1".into(),
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn feedback_title_is_capped_but_content_is_not() {
        let form = FeedbackForm {
            title: "t".repeat(101),
            content: "c".repeat(10_000),
        };
        let errors = form.validate();
        assert!(errors.field("title").next().is_some());
        assert!(errors.field("content").next().is_none());
    }

    #[test]
    fn feedback_requires_title_and_content() {
        let errors = FeedbackForm::default().validate();
        assert!(errors.field("title").next().is_some());
        assert!(errors.field("content").next().is_some());
    }
}
