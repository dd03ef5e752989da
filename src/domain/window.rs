// ============================================================
// Layer 3 — Context Window
// ============================================================

use serde::{Deserialize, Serialize};

/// Token ids around one boundary candidate.
///
/// On a padded sequence every window is `2 * context_size + 1`
/// ids long and `center == context_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub ids: Vec<u32>,
    /// Position of the candidate inside `ids`
    pub center: usize,
    /// Index of the candidate in the (padded) token sequence
    pub token_index: usize,
}

impl ContextWindow {
    pub fn center_id(&self) -> u32 {
        self.ids[self.center]
    }

    /// Number of ids in the window.
    pub fn width(&self) -> usize {
        self.ids.len()
    }
}
