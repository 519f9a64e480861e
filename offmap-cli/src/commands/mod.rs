pub mod clear;
pub mod config;
pub mod init;
pub mod list;
pub mod status;
pub mod sync;
