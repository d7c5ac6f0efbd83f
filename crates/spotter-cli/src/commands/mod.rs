//! Command implementations.

pub mod process;

pub use self::process::execute_process;
