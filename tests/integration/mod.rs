//! Integration tests for fanout-http

pub mod config_loading_tests;
pub mod reqwest_transport_tests;
