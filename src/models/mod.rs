pub mod schedule;
pub mod subject;

pub use schedule::{NewScheduleRequest, Schedule, ScheduleItem, ScheduleItemRequest, ScheduleItemView};
pub use subject::{NewSubject, Subject};
