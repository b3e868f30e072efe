//! Collaborator implementations that keep all state in process memory.

pub mod in_memory;
