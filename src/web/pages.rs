//! Server-rendered HTML for the tasork pages.

use crate::session::{DecodedIdentity, Notice};

fn layout(title: &str, body: &str) -> String {
    layout_with_head(title, "", body)
}

fn layout_with_head(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         {head}<title>{} | tasork</title>\n</head>\n<body>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        escape(title)
    )
}

/// Escape text for use in element content and double-quoted attributes.
pub(super) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Entry page. `login_url` is empty when the backend could not provide one.
pub(super) fn landing(login_url: &str, notice: Option<Notice>) -> String {
    let notice = notice.map_or_else(String::new, |notice| {
        format!(
            "<div class=\"notice\" role=\"alert\" data-notice=\"{}\">{}</div>\n",
            notice.code(),
            escape(notice.message())
        )
    });

    layout(
        "Welcome",
        &format!(
            "{notice}<h1>Welcome to tasork</h1>\n\
             <p>Plan, assign and track your team's tasks.</p>\n\
             <a class=\"button\" href=\"{}\">Get Started</a>",
            escape(login_url)
        ),
    )
}

pub(super) fn dashboard(identity: &DecodedIdentity) -> String {
    let tenant = identity.tenant_name().map_or_else(String::new, |name| {
        format!("<p class=\"tenant\">{}</p>\n", escape(name))
    });

    layout(
        "Dashboard",
        &format!(
            "<h1>Dashboard</h1>\n{tenant}<p>Signed in as <strong>{}</strong></p>\n\
             <form method=\"post\" action=\"/auth/logout\">\
             <button type=\"submit\">Log out</button></form>",
            escape(identity.email())
        ),
    )
}

/// Rendered by the resolve page after a successful exchange. The browser
/// continues to `next` with a same-origin navigation, so `SameSite=Strict`
/// session cookies are sent with it.
pub(super) fn signed_in(next: &str) -> String {
    let next = escape(next);
    layout_with_head(
        "Signing in",
        &format!("<meta http-equiv=\"refresh\" content=\"0; url={next}\">\n"),
        &format!(
            "<h1>Signed in</h1>\n<p>Taking you to your dashboard.</p>\n\
             <a class=\"button\" href=\"{next}\">Continue</a>"
        ),
    )
}

pub(super) fn unauthorized() -> String {
    layout(
        "Unauthorized",
        "<h1>Unauthorized Access</h1>\n\
         <p>You need to sign in to view this page.</p>\n\
         <a class=\"button\" href=\"/\">Go to Login</a>",
    )
}

pub(super) fn not_found() -> String {
    layout(
        "Not found",
        "<h1>Page not found</h1>\n<a href=\"/\">Back to tasork</a>",
    )
}
