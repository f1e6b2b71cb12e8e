/// Local dashboard service for a space debris collision-risk API
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod render;
pub mod requests;
pub mod routes;
pub mod services;
pub mod utils;
