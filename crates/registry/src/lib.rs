//! In-memory storage collaborators for the fuzzhub backend.
//!
//! Holds the security-tool catalog and the user directory. Both are
//! process-local: a restart resets them to their seeded state. The job
//! subsystem touches durable state through exactly one call here —
//! [`ToolRegistry::set_installed`] on install success.

pub mod tool;
pub mod tools;
pub mod user;
pub mod users;

pub use tool::{NewTool, Tool, ToolConfigUpdate, ToolKind};
pub use tools::ToolRegistry;
pub use user::{NewUser, PublicUser, User};
pub use users::UserDirectory;
