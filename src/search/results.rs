//! Hit aggregation and descending-count sort.
//!
//! Aggregates into a map keyed by title, preserving first-insertion order
//! for tie-breaking, and sorts by descending hit count.

use std::collections::HashMap;

#[derive(Default)]
pub struct Results {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hit for `title`, preserving the title's first-insertion
    /// position for tie-breaking.
    pub fn add(&mut self, title: impl Into<String>) {
        let title = title.into();
        match self.counts.get_mut(&title) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(title.clone(), 1);
                self.order.push(title);
            }
        }
    }

    /// Consume into titles sorted by descending hit count; ties preserve
    /// first-insertion order (the sort is stable).
    pub fn into_sorted(self) -> Vec<String> {
        let Self { mut order, counts } = self;
        order.sort_by_key(|title| std::cmp::Reverse(counts[title]));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_descending_by_hit_count() {
        let mut results = Results::new();
        results.add("gamma");
        results.add("alpha");
        results.add("alpha");
        assert_eq!(results.into_sorted(), vec!["alpha", "gamma"]);
    }

    #[test]
    fn ties_preserve_first_insertion_order() {
        let mut results = Results::new();
        results.add("first");
        results.add("second");
        assert_eq!(results.into_sorted(), vec!["first", "second"]);
    }
}
