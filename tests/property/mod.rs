//! Property-based tests for composition guarantees

mod composition;
