pub mod http;
pub mod invoke;
pub mod payload;
