mod datetime;
mod reference;

pub use datetime::{CimDateTime, DateTimeParseError};
pub use reference::{KeyBinding, KeyValue, ObjectPath, ObjectPathParseError};
