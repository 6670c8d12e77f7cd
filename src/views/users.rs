use super::Layout;
use crate::dtos::{MessageDTO, UserCardDTO};
use crate::entities::User;
use askama::Template;

/// Profile page with the user's messages
#[derive(Template)]
#[template(path = "user_detail.html")]
pub struct UserDetailView {
    pub layout: Layout,
    pub user: User,
    pub messages: Vec<MessageDTO>,
    pub message_count: i64,
    pub following_count: i64,
    pub follower_count: i64,
    pub is_own_profile: bool,
    pub viewer_follows: bool,
    pub can_follow: bool,
}

/// A list of user cards: search results, followers, following
#[derive(Template)]
#[template(path = "user_list.html")]
pub struct UserListView {
    pub layout: Layout,
    pub heading: String,
    pub users: Vec<UserCardDTO>,
    pub logged_in: bool,
    /// Id of the viewer, 0 without a session
    pub viewer_id: i32,
}
