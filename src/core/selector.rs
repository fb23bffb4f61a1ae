use crate::domain::ports::SourceSelector;
use rand::seq::IndexedRandom;

/// 每次掃描隨機選一個來源
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl SourceSelector for RandomSelector {
    fn select(&self, candidates: &[&'static str]) -> Option<&'static str> {
        candidates.choose(&mut rand::rng()).copied()
    }
}

/// 固定選第 `index` 個來源 (超出範圍時循環)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector {
    index: usize,
}

impl FixedSelector {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl SourceSelector for FixedSelector {
    fn select(&self, candidates: &[&'static str]) -> Option<&'static str> {
        if candidates.is_empty() {
            return None;
        }
        candidates.get(self.index % candidates.len()).copied()
    }
}
