//! Core translation engine module

pub mod adapter;
pub mod client;
pub mod config;
pub mod errors;
pub mod languages;
#[cfg(feature = "m2m100")]
pub mod m2m100;
pub mod models;
pub mod service;
