// Frameworks: process configuration, tracing bootstrap and the headless runtime.

pub mod config;
pub mod runtime;
