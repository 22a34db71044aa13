use uuid::Uuid;

/// Fresh random column identifier (UUID v4)
pub fn new_column_id() -> String {
    Uuid::new_v4().to_string()
}

/// Source of `columnId` values for newly created columns.
///
/// `Random` is what editing sessions use; `Sequential` produces
/// `{seed}-{n}` ids so that tests and fixtures stay reproducible.
#[derive(Debug, Clone)]
pub enum IDGenerator {
    Random,
    Sequential { seed: String, count: u32 },
}

impl IDGenerator {
    pub fn random() -> Self {
        IDGenerator::Random
    }

    pub fn sequential(seed: impl Into<String>) -> Self {
        IDGenerator::Sequential {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate the next id
    pub fn new_id(&mut self) -> String {
        match self {
            IDGenerator::Random => new_column_id(),
            IDGenerator::Sequential { seed, count } => {
                *count += 1;
                format!("{}-{}", seed, count)
            }
        }
    }
}

impl Default for IDGenerator {
    fn default() -> Self {
        Self::random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_unique_uuids() {
        let mut gen = IDGenerator::random();
        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(&id1).is_ok());
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::sequential("col");

        assert_eq!(gen.new_id(), "col-1");
        assert_eq!(gen.new_id(), "col-2");
        assert_eq!(gen.new_id(), "col-3");
    }
}
