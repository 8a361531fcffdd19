//! Unit tests for the apiary CLI
//!
//! These tests use mocked dependencies and run fast; the only I/O is scoped
//! to throwaway temp directories.

mod materializer_port;
mod provision_service;
