pub mod auth_header;

pub use auth_header::{render_auth_header, AuthHeaderView, UserBadge};
