//! Integration tests for presence-node
//!
//! These tests pin the JSON shapes the REST API exchanges with clients.

mod rest_api;
