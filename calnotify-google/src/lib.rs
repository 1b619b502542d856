//! calnotify-google - Google Calendar backend for calnotify
//!
//! The backend manages its own credentials and sessions:
//!   ~/.config/calnotify/google/app_config.toml
//!   ~/.config/calnotify/google/session/{account}.toml

pub mod app_config;
pub mod auth;
pub mod calendar;
pub mod convert;
pub mod session;

pub use auth::authenticate;
pub use calendar::GoogleCalendar;
