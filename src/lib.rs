pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod dom;
pub mod loader;
pub mod output;
pub mod page;
pub mod projector;
pub mod render;
pub mod utils;

#[cfg(test)]
mod tests;
