//! Storage layer: repository traits + the in-memory reference adapter.

pub mod memory;
pub mod repository;
