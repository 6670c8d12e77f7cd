//! Form pages. Each keeps the submitted values so a rejected form is shown
//! again filled in.

use super::Layout;
use askama::Template;

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupView {
    pub layout: Layout,
    pub username: String,
    pub email: String,
    pub image_url: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginView {
    pub layout: Layout,
    pub username: String,
}

#[derive(Template)]
#[template(path = "message_new.html")]
pub struct MessageFormView {
    pub layout: Layout,
    pub text: String,
    pub max_length: usize,
}

#[derive(Template)]
#[template(path = "user_edit.html")]
pub struct ProfileEditView {
    pub layout: Layout,
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: String,
    pub location: String,
}
