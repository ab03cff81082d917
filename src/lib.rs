#[macro_use]
mod macros;

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod database;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi_config;
pub mod repositories;
pub mod services;
