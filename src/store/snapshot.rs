use serde::Serialize;

/// Immutable copy of the store's aggregate fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingSnapshot {
    /// Whole percent in `0..=100`
    pub progress: u8,
    pub loaded_count: usize,
    pub total_count: usize,
    /// Essential (tier <= 2) models and animations have their cheap variant
    pub low_res_ready: bool,
    /// Every asset has its full variant, or was deliberately satisfied without it
    pub high_res_ready: bool,
    pub complete: bool,
}

impl LoadingSnapshot {
    pub(crate) fn empty(total_count: usize) -> Self {
        Self {
            progress: 0,
            loaded_count: 0,
            total_count,
            low_res_ready: false,
            high_res_ready: false,
            complete: false,
        }
    }

    /// `round(100 * loaded / total)`, rounding halves up and clamped to 100.
    ///
    /// An empty registry is reported as fully loaded.
    pub fn percent(loaded: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        let rounded = (200 * loaded + total) / (2 * total);
        rounded.min(100) as u8
    }

    pub fn remaining(&self) -> usize {
        self.total_count.saturating_sub(self.loaded_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(LoadingSnapshot::percent(0, 3), 0);
        assert_eq!(LoadingSnapshot::percent(1, 3), 33);
        assert_eq!(LoadingSnapshot::percent(2, 3), 67);
        assert_eq!(LoadingSnapshot::percent(3, 3), 100);
        assert_eq!(LoadingSnapshot::percent(1, 8), 13);
        assert_eq!(LoadingSnapshot::percent(1, 200), 1);
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(LoadingSnapshot::percent(5, 3), 100);
        assert_eq!(LoadingSnapshot::percent(0, 0), 100);
    }

    #[test]
    fn test_remaining() {
        let mut snap = LoadingSnapshot::empty(11);
        snap.loaded_count = 4;
        assert_eq!(snap.remaining(), 7);
    }
}
