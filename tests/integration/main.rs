//! Integration tests

mod config_test;
mod lifecycle_test;
mod strategy_test;
