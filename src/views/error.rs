use askama::Template;

/// Standalone error page, rendered without a session
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorView {
    pub status: u16,
    pub message: &'static str,
}
