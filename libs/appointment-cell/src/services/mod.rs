pub mod calendar;
pub mod lifecycle;
pub mod scheduler;
