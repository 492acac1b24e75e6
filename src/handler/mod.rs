pub mod error;
pub mod health;
pub mod log;
pub mod register;
