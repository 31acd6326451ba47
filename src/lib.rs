pub mod api;
pub mod auth;
pub mod config;
pub mod desktop;
pub mod encoder;
pub mod error;
pub mod services;
pub mod validation;
