use std::collections::HashMap;
use time::{Duration, OffsetDateTime};
use crate::models::Nominee;
use crate::settings::SearchScope;

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn matches(nominee: &Nominee, needle: &str, scope: SearchScope) -> bool {
    let contains = |field: Option<&str>| field.map_or(false, |f| f.to_lowercase().contains(needle));
    contains(nominee.name.as_deref())
        || (scope == SearchScope::NameAndCity && contains(nominee.city.as_deref()))
}

/// Indices into `nominees` matching `query`, in list order. An empty query matches everything.
pub fn filter_indices(nominees: &[Nominee], query: &str, scope: SearchScope) -> Vec<usize> {
    let needle = normalize_query(query);
    nominees.iter()
        .enumerate()
        .filter(|(_, n)| needle.is_empty() || matches(n, &needle, scope))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone)]
struct CachedResult {
    indices: Vec<usize>,
    stored_at: OffsetDateTime,
}

/// Query results memoized per nominee-list generation.
#[derive(Debug, Clone)]
pub struct SearchCache {
    generation: u64,
    ttl: Duration,
    capacity: usize,
    entries: HashMap<String, CachedResult>,
}

impl SearchCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self { generation: 0, ttl, capacity, entries: HashMap::new() }
    }

    /// Drops every entry once the nominee list has been replaced.
    pub fn sync_generation(&mut self, generation: u64) {
        if generation != self.generation {
            self.entries.clear();
            self.generation = generation;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(
        &mut self,
        nominees: &[Nominee],
        query: &str,
        scope: SearchScope,
        now: OffsetDateTime,
    ) -> Vec<usize> {
        let key = normalize_query(query);
        if let Some(hit) = self.entries.get(&key) {
            if now - hit.stored_at < self.ttl {
                return hit.indices.clone();
            }
        }

        let indices = filter_indices(nominees, &key, scope);
        self.evict(now);
        if self.entries.len() < self.capacity {
            self.entries.insert(key, CachedResult { indices: indices.clone(), stored_at: now });
        }
        indices
    }

    fn evict(&mut self, now: OffsetDateTime) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| now - e.stored_at < ttl);
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.entries.iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{nominee, nominee_in};

    fn list() -> Vec<Nominee> {
        vec![
            nominee_in(1, "Abel", "Mekelle", 2),
            nominee_in(2, "Sara", "Adigrat", 5),
            nominee_in(3, "Samrawit", "Axum", 0),
        ]
    }

    #[test]
    fn empty_query_keeps_order() {
        assert_eq!(filter_indices(&list(), "   ", SearchScope::Name), vec![0, 1, 2]);
    }

    #[test]
    fn case_insensitive_substring() {
        assert_eq!(filter_indices(&list(), "SA", SearchScope::Name), vec![1, 2]);
        assert_eq!(filter_indices(&list(), "axum", SearchScope::Name), Vec::<usize>::new());
        assert_eq!(filter_indices(&list(), "axum", SearchScope::NameAndCity), vec![2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let nominees = list();
        let once: Vec<Nominee> = filter_indices(&nominees, "a", SearchScope::Name)
            .into_iter().map(|i| nominees[i].clone()).collect();
        let twice = filter_indices(&once, "a", SearchScope::Name);
        assert_eq!(twice, (0..once.len()).collect::<Vec<_>>());
    }

    #[test]
    fn missing_name_never_matches() {
        let mut anonymous = nominee(9, "", 0);
        anonymous.name = None;
        assert!(filter_indices(&[anonymous], "x", SearchScope::NameAndCity).is_empty());
    }

    #[test]
    fn cache_invalidates_on_new_generation() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let mut cache = SearchCache::new(Duration::seconds(30), 8);
        let nominees = list();
        assert_eq!(cache.lookup(&nominees, "sa", SearchScope::Name, now), vec![1, 2]);
        assert_eq!(cache.len(), 1);

        // Hits are keyed by generation, not by list contents.
        assert_eq!(cache.lookup(&nominees[..1], "sa", SearchScope::Name, now), vec![1, 2]);

        cache.sync_generation(1);
        assert!(cache.is_empty());
        assert!(cache.lookup(&nominees[..1], "sa", SearchScope::Name, now).is_empty());
    }

    #[test]
    fn cache_entries_expire() {
        let start = OffsetDateTime::UNIX_EPOCH;
        let mut cache = SearchCache::new(Duration::seconds(30), 8);
        let nominees = list();
        cache.lookup(&nominees, "abel", SearchScope::Name, start);
        let later = start + Duration::seconds(31);
        assert_eq!(cache.lookup(&nominees[1..], "abel", SearchScope::Name, later), Vec::<usize>::new());
    }

    #[test]
    fn cache_is_bounded() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let mut cache = SearchCache::new(Duration::seconds(30), 2);
        let nominees = list();
        for q in ["a", "b", "c", "d"] {
            cache.lookup(&nominees, q, SearchScope::Name, now);
        }
        assert!(cache.len() <= 2);
    }
}
