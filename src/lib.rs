pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod platform;
pub mod utils;

#[cfg(test)]
mod tests;
