//! Integration tests for Profile-Harvest
//!
//! These tests run whole harvests with the HTTP-backed browser against
//! wiremock servers, writing every artifact into a temporary directory.

mod common;
mod harvest_tests;
mod resume_tests;
