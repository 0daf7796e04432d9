pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod state;
