#![doc = include_str!("../README.md")]

/// This module provides a generic repository interface for storing and retrieving items.
pub mod repository;

/// In-memory repository implementation.
pub mod memory;

pub use memory::MemoryRepository;
pub use repository::{Repository, RepositoryError, RepositoryItem};
