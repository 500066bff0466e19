//! Configuration for the dialog player.

use crate::player::MAX_CHOICES;

/// Configuration for a [`DialogPlayer`](crate::DialogPlayer).
///
/// The defaults are applied again at every `start()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Number of choices shown at once until a `limit` instruction runs.
    pub default_limit: usize,

    /// Whether chosen lines are said by the actor until a `parrot` instruction runs.
    pub default_parrot: bool,

    /// Label jumps allowed within one `update()` before yielding to the next frame.
    pub max_jumps_per_update: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_limit: 6,
            default_parrot: true,
            max_jumps_per_update: 256,
        }
    }
}

impl PlayerConfig {
    /// Creates a configuration where chosen lines are not echoed.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            default_parrot: false,
            ..Self::default()
        }
    }

    /// Creates a configuration that shows every choice slot.
    #[must_use]
    pub fn all_choices() -> Self {
        Self {
            default_limit: MAX_CHOICES,
            ..Self::default()
        }
    }

    /// Builder method to set the default choice limit.
    #[must_use]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Builder method to set the default parrot mode.
    #[must_use]
    pub fn with_default_parrot(mut self, parrot: bool) -> Self {
        self.default_parrot = parrot;
        self
    }

    /// Builder method to set the jump budget per update.
    #[must_use]
    pub fn with_max_jumps_per_update(mut self, jumps: usize) -> Self {
        self.max_jumps_per_update = jumps;
        self
    }
}
