//! Unit tests for the household module.

mod support;
