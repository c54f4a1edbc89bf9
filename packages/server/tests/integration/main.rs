
mod auth;
mod cache;
mod forms;
mod urls;
