pub mod aggregate;
pub mod error;
pub mod weather_table;
