pub mod attendance;
pub mod auth;
pub mod directory;
pub mod leave;
pub mod notifications;
pub mod overtime;
