//! Garbage-collection schedule handling for the Harbor CLI.
//!
//! [`schedule`] turns user input into a validated [`ScheduleDescriptor`];
//! [`GcService`] sends descriptors and execution requests to the registry and
//! translates registry failures into [`GcError`].

pub mod commands;
pub mod error;
pub mod schedule;

pub use commands::{GcService, ScheduleSnapshot};
pub use error::{GcError, Operation, ValidationError};
pub use schedule::{
    build_schedule, build_schedule_at, parse_next_run_time, CronExpression, CronKind,
    ScheduleDescriptor,
};
