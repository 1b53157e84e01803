use uuid::Uuid;

/// Source of identifiers for newly added employees, event types and events.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs. Used by the application; safe under rapid successive calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `prefix` followed by a monotonically increasing counter.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIdGenerator::new("E");
        assert_eq!(ids.next_id(), "E1");
        assert_eq!(ids.next_id(), "E2");
        assert_eq!(ids.next_id(), "E3");
    }

    #[test]
    fn uuid_ids_do_not_repeat_in_a_tight_loop() {
        let mut ids = UuidIdGenerator;
        let generated: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 1000);
    }
}
