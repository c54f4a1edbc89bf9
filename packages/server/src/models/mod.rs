pub mod auth;
pub mod comment;
pub mod form;
pub mod post;
pub mod shared;
