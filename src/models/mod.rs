pub mod attendance;
pub mod edit_log;
pub mod report;
pub mod session;
