pub mod about;
pub mod auth;
pub mod fallback;
pub mod follow;
pub mod posts;
