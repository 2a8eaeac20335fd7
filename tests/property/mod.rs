//! Property-based tests

mod spaces_proptest;
