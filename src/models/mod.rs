pub mod reading;

pub use reading::{NewReading, ReadingRecord, ReadingType};
