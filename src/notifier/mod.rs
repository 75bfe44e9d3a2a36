pub mod message;
pub mod runner;
pub mod time;

pub use runner::run_notification_pass;
