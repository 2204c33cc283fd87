pub mod timestamp;
pub mod weather_condition;
pub mod weather_record;
