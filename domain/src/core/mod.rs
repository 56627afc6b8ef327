//! Core domain utilities shared across modules.

pub mod string;
