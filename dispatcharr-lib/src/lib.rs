//! Dispatcharr API client library
//!
//! An async client for the Dispatcharr REST API, exposing the stream and
//! channel endpoints as [`api::Gateway`] implementations that table
//! controllers page, filter and reorder through.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;

mod client;

pub use client::*;
