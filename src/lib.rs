pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod function;
pub mod logging;
pub mod models;
pub mod search;
pub mod server;

#[cfg(test)]
mod test;
