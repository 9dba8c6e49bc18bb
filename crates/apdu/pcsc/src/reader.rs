//! Readers as seen during discovery

use pcsc::{ReaderState, State};

/// A PC/SC reader and whether it currently holds a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcscReader {
    name: String,
    has_card: bool,
}

impl PcscReader {
    /// A reader whose state could not be queried, listed as empty
    pub(crate) const fn unqueried(name: String) -> Self {
        Self {
            name,
            has_card: false,
        }
    }

    /// Build a reader from the state returned by a status change query
    pub(crate) fn from_reader_state(reader_state: &ReaderState) -> Self {
        Self {
            name: reader_state.name().to_string_lossy().into_owned(),
            has_card: card_present(reader_state.event_state()),
        }
    }

    /// Name to pass to [`PcscDeviceManager::open_reader`](crate::PcscDeviceManager::open_reader)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a card sits in the reader
    pub const fn has_card(&self) -> bool {
        self.has_card
    }
}

/// Some drivers flag `PRESENT` and `EMPTY` together while a card is pulled
fn card_present(state: State) -> bool {
    state.contains(State::PRESENT) && !state.contains(State::EMPTY)
}
