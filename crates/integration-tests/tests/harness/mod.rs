//! Shared fixtures; each test binary uses a different subset
#![allow(dead_code)]

pub mod config;
pub mod fake_stt;
pub mod mock_upstream;
pub mod server;
