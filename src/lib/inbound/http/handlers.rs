pub mod health;
pub mod invoke_function;
