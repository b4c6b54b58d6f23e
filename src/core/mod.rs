pub mod aggregate;
pub mod duration;
pub mod scheduler;
pub mod sweep;
