pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod presence;
pub mod routes;
pub mod state;
