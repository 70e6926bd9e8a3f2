//! Helpers for tests in this crate and its dependants. Enabled by the `test_utils` feature.
pub mod fakes;
pub mod prepare_env;
