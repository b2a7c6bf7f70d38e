//! Server-rendered HTML. Kept as plain string builders behind small
//! functions; everything user-supplied goes through `escape`.

use axum::http::StatusCode;
use axum::response::Html;

use crate::forms::{FeedbackForm, FormErrors, LoginForm, RegisterForm};
use crate::routes::feedback::model::Feedback;
use crate::routes::user::model::User;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} | Feedback</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn field_errors(errors: &FormErrors, field: &str) -> String {
    let items: String = errors
        .field(field)
        .map(|msg| format!("<li class=\"error\">{}</li>", escape(msg)))
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!("<ul class=\"errors\">{}</ul>", items)
    }
}

fn text_input(name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        "<p><label for=\"{name}\">{label}</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\">{errs}</p>",
        name = name,
        label = escape(label),
        value = escape(value),
        errs = field_errors(errors, name),
    )
}

fn password_input(name: &str, label: &str, errors: &FormErrors) -> String {
    // Never echo a submitted password back into the page.
    format!(
        "<p><label for=\"{name}\">{label}</label>\n<input type=\"password\" id=\"{name}\" name=\"{name}\">{errs}</p>",
        name = name,
        label = escape(label),
        errs = field_errors(errors, name),
    )
}

pub fn register_page(form: &RegisterForm, errors: &FormErrors) -> Html<String> {
    let body = format!(
        "<h1>Register</h1>\n<form method=\"POST\" action=\"/register\">\n{}{}{}{}{}<button type=\"submit\">Register</button>\n</form>\n<p><a href=\"/login\">Already have an account? Log in</a></p>",
        text_input("username", "User Name", &form.username, errors),
        password_input("password", "Password", errors),
        text_input("email", "Email", &form.email, errors),
        text_input("first_name", "First Name", &form.first_name, errors),
        text_input("last_name", "Last Name", &form.last_name, errors),
    );
    Html(layout("Register", &body))
}

pub fn login_page(form: &LoginForm, errors: &FormErrors) -> Html<String> {
    let body = format!(
        "<h1>Log In</h1>\n<form method=\"POST\" action=\"/login\">\n{}{}<button type=\"submit\">Log In</button>\n</form>\n<p><a href=\"/register\">Need an account? Register</a></p>",
        text_input("username", "User Name", &form.username, errors),
        password_input("password", "Password", errors),
    );
    Html(layout("Log In", &body))
}

fn feedback_item(feedback: &Feedback, is_owner: bool) -> String {
    let controls = if is_owner {
        format!(
            "<p><a href=\"/feedback/{id}/update\">Edit</a></p>\n<form method=\"POST\" action=\"/feedback/{id}/delete\"><button type=\"submit\">Delete</button></form>",
            id = feedback.id,
        )
    } else {
        String::new()
    };
    format!(
        "<li>\n<h3>{}</h3>\n<p>{}</p>\n{}</li>",
        escape(&feedback.title),
        escape(&feedback.content),
        controls,
    )
}

pub fn profile_page(user: &User, feedback: &[Feedback], is_owner: bool) -> Html<String> {
    let items: String = feedback
        .iter()
        .map(|f| feedback_item(f, is_owner))
        .collect();

    let owner_controls = if is_owner {
        format!(
            "<p><a href=\"/users/{u}/feedback/add\">Add feedback</a></p>\n<form method=\"POST\" action=\"/users/{u}/delete\"><button type=\"submit\">Delete account</button></form>",
            u = escape(&user.username),
        )
    } else {
        String::new()
    };

    let body = format!(
        "<h1>{username}</h1>\n<p>{first} {last} &lt;{email}&gt;</p>\n{controls}<h2>Feedback</h2>\n<ul>{items}</ul>\n<p><a href=\"/logout\">Log out</a></p>",
        username = escape(&user.username),
        first = escape(&user.first_name),
        last = escape(&user.last_name),
        email = escape(&user.email),
        controls = owner_controls,
        items = items,
    );
    Html(layout(&user.username, &body))
}

pub fn feedback_form_page(
    heading: &str,
    action: &str,
    form: &FeedbackForm,
    errors: &FormErrors,
) -> Html<String> {
    let body = format!(
        "<h1>{heading}</h1>\n<form method=\"POST\" action=\"{action}\">\n{title}<p><label for=\"content\">Content</label>\n<textarea id=\"content\" name=\"content\">{content}</textarea>{content_errs}</p>\n<button type=\"submit\">Save</button>\n</form>",
        heading = escape(heading),
        action = escape(action),
        title = text_input("title", "Title", &form.title, errors),
        content = escape(&form.content),
        content_errs = field_errors(errors, "content"),
    );
    Html(layout(heading, &body))
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to start</a></p>",
        status.as_u16(),
        escape(message),
    );
    layout(message, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>alert(\"x&y\")</script>"),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn submitted_values_are_escaped_in_forms() {
        let form = RegisterForm {
            username: "<b>alice</b>".into(),
            ..RegisterForm::default()
        };
        let Html(page) = register_page(&form, &FormErrors::default());
        assert!(page.contains("&lt;b&gt;alice&lt;/b&gt;"));
        assert!(!page.contains("<b>alice</b>"));
    }

    #[test]
    fn passwords_are_never_echoed() {
        let form = LoginForm {
            username: "alice".into(),
            password: "secret1".into(),
        };
        let Html(page) = login_page(&form, &form.validate());
        assert!(!page.contains("secret1"));
    }

    #[test]
    fn profile_hides_owner_controls_from_other_viewers() {
        let user = User {
            username: "alice".into(),
            password_hash: "$2b$04$hash".into(),
            email: "a@x.com".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
        };
        let feedback = vec![Feedback {
            id: 7,
            title: "Hi".into(),
            content: "Hello".into(),
            username: "alice".into(),
        }];

        let Html(owner_view) = profile_page(&user, &feedback, true);
        assert!(owner_view.contains("/feedback/7/update"));
        assert!(owner_view.contains("/users/alice/delete"));

        let Html(visitor_view) = profile_page(&user, &feedback, false);
        assert!(visitor_view.contains("Hi"));
        assert!(!visitor_view.contains("/feedback/7/update"));
        assert!(!visitor_view.contains("/users/alice/delete"));
    }

    #[test]
    fn profile_never_leaks_the_password_hash() {
        let user = User {
            username: "alice".into(),
            password_hash: "$2b$04$topsecret".into(),
            email: "a@x.com".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
        };
        let Html(page) = profile_page(&user, &[], true);
        assert!(!page.contains("topsecret"));
    }
}
