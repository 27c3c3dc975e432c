use std::collections::HashMap;

use crate::domain::ChannelId;

/// Static city → channel routing table.
///
/// Built once at startup from configuration, read-only afterwards (safe for
/// concurrent lookups). A missing city is an expected outcome, not an error.
#[derive(Clone, Debug, Default)]
pub struct ChannelMap {
    inner: HashMap<u32, ChannelId>,
}

impl ChannelMap {
    pub fn new(inner: HashMap<u32, ChannelId>) -> Self {
        Self { inner }
    }

    pub fn resolve(&self, city_id: u32) -> Option<&ChannelId> {
        self.inner.get(&city_id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<(u32, ChannelId)> for ChannelMap {
    fn from_iter<I: IntoIterator<Item = (u32, ChannelId)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_configured_city() {
        let map: ChannelMap = [(1, ChannelId("@baghdad".to_string()))].into_iter().collect();
        assert_eq!(map.resolve(1), Some(&ChannelId("@baghdad".to_string())));
    }

    #[test]
    fn miss_is_none_not_error() {
        let map = ChannelMap::default();
        assert_eq!(map.resolve(42), None);
    }
}
