pub mod app_state;
pub mod cli;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub mod test_utils;
