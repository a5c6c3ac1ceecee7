#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use crate::domain::models::GenerationResult;

pub const HISTORY_LIMIT: usize = 5;

/// Most recent first list of past results, capped at `HISTORY_LIMIT`.
#[derive(Default)]
pub struct History {
    items: Vec<GenerationResult>,
}

impl History {
    pub fn record(&mut self, result: GenerationResult) {
        self.items.insert(0, result);
        self.items.truncate(HISTORY_LIMIT);
    }

    pub fn get(&self, idx: usize) -> Option<&GenerationResult> {
        return self.items.get(idx);
    }

    pub fn items(&self) -> &[GenerationResult] {
        return &self.items;
    }

    pub fn len(&self) -> usize {
        return self.items.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }
}
