pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod events;
pub mod platform;
pub mod session;
pub mod state;
pub mod storage;
