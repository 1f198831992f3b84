//! HTTP request pipeline.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
