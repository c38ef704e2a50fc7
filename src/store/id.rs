//! Task id generation.
//!
//! Locally created tasks get a random 128-bit token so that ids minted on
//! different machines (or while offline) do not clash when merged. Tests
//! inject [`SequentialIds`] instead to get predictable ids.

use crate::traits::IdGenerator;
use uuid::Uuid;

/// Random UUID v4 ids rendered as 32 lowercase hex characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic ids of the form `<prefix>-0000`, `<prefix>-0001`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
}

impl SequentialIds {
    /// Start a new sequence with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counter: 0 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("task")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{:04x}", self.prefix, self.counter);
        self.counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_format() {
        let id = RandomIds.next_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_random_ids_unique() {
        let mut ids = RandomIds;
        let seen: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_sequential_ids_increment() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "task-0000");
        assert_eq!(ids.next_id(), "task-0001");
        assert_eq!(ids.next_id(), "task-0002");
    }

    #[test]
    fn test_sequential_ids_prefix() {
        let mut ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t-0000");
    }
}
