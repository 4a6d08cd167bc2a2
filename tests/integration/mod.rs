//! Shared fixtures for tests that talk to a mock chat-completions server

pub mod mock_server;
