use super::Layout;
use crate::entities::{Message, User};
use askama::Template;

#[derive(Template)]
#[template(path = "message_detail.html")]
pub struct MessageDetailView {
    pub layout: Layout,
    pub message: Message,
    pub author: User,
    pub is_owner: bool,
}
