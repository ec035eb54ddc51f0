//! WebSocket terminal endpoint.
//!
//! One duplex connection per dashboard session; the client subscribes to a
//! job id and receives that job's terminal events as JSON text frames.

mod handler;

pub use handler::terminal_ws_handler;
