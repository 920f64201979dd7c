//! Session management
//!
//! This crate provides:
//! - `SessionManager`: login, logout and startup rehydration
//! - `SessionContext` / `SessionView`: the cached user profile and read-only
//!   access to it
//! - `Navigator`: the redirect side effect performed after transitions

pub mod context;
pub mod error;
pub mod manager;
pub mod navigation;

pub use context::{SessionContext, SessionState, SessionView};
pub use error::SessionError;
pub use manager::{Rehydration, SessionManager, SessionRoutes};
pub use navigation::Navigator;
