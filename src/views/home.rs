//! Home page views

use super::Layout;
use crate::dtos::MessageDTO;
use crate::entities::User;
use askama::Template;

/// Landing page for visitors without a session
#[derive(Template)]
#[template(path = "home_anon.html")]
pub struct AnonHomeView {
    pub layout: Layout,
}

/// Timeline of the logged-in user
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeView {
    pub layout: Layout,
    pub user: User,
    pub messages: Vec<MessageDTO>,
    pub message_count: i64,
    pub following_count: i64,
    pub follower_count: i64,
}
