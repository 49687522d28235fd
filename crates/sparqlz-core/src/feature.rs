//! Capability flags a result implementation advertises

use bitflags::bitflags;

/// A single capability a result may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// The result can report its row count
    QuerySize,
    /// Only forward navigation with `next()` is possible
    ForwardOnly,
    /// `next()` fetches rows synchronously
    Sync,
}

bitflags! {
    /// Set of [`Feature`]s supported by a result. Empty by default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Features: u8 {
        const QUERY_SIZE = 0b001;
        const FORWARD_ONLY = 0b010;
        const SYNC = 0b100;
    }
}

impl From<Feature> for Features {
    fn from(feature: Feature) -> Self {
        match feature {
            Feature::QuerySize => Features::QUERY_SIZE,
            Feature::ForwardOnly => Features::FORWARD_ONLY,
            Feature::Sync => Features::SYNC,
        }
    }
}

impl Features {
    pub fn has(&self, feature: Feature) -> bool {
        self.contains(feature.into())
    }
}
