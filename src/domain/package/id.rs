//! Identifier generation port

use super::entity::PackageId;

/// Source of collision-resistant package identifiers
pub trait PackageIdGenerator: Send + Sync + std::fmt::Debug {
    fn next_id(&self) -> PackageId;
}

/// UUID v4 generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl PackageIdGenerator for UuidGenerator {
    fn next_id(&self) -> PackageId {
        PackageId::generate()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Hands out a fixed sequence of IDs, then falls back to random ones
    #[derive(Debug, Default)]
    pub struct SequenceGenerator {
        ids: Mutex<Vec<PackageId>>,
    }

    impl SequenceGenerator {
        pub fn new(ids: Vec<PackageId>) -> Self {
            let mut ids = ids;
            ids.reverse();
            Self {
                ids: Mutex::new(ids),
            }
        }
    }

    impl PackageIdGenerator for SequenceGenerator {
        fn next_id(&self) -> PackageId {
            self.ids
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(PackageId::generate)
        }
    }
}
