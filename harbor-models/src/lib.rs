pub mod errors;
pub mod gc;
pub mod schedule;
