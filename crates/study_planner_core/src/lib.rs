pub mod domain;
pub mod ports;
pub mod schedule;

pub use domain::{
    BlockKind, ExceptionAction, Frequency, Occurrence, Priority, RecurrenceRule, Schedule,
    ScheduleException, ScheduleUpdate, TimeBlock, User, UserCredentials,
};
pub use ports::{PortError, PortResult, ScheduleStore};
pub use schedule::{Occurrences, ScheduleError};
