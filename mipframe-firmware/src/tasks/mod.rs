//! Embassy async tasks

pub mod demo;
pub mod heartbeat;

pub use demo::demo_task;
pub use heartbeat::heartbeat_task;
