pub mod config;
pub mod dates;
pub mod drag;
pub mod view;
