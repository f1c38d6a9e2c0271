//! Frame buffers and their rotation
//!
//! Three buffers rotate through three roles. The foreground writes the
//! `producer` frame, the transfer engine streams the `consumer` frame and
//! the `idle` frame waits to become the next producer.

pub mod layout;
pub mod pool;
pub mod roles;

pub use layout::Vcom;
pub use pool::{Consumer, FramePool, Producer};
pub use roles::RoleTable;
