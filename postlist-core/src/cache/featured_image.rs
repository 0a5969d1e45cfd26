//! src/cache/featured_image.rs
//! ============================================================================
//! # Featured Image Cache
//!
//! Resolves the featured image URL for a post through three tiers: cache hit,
//! local media lookup, async fetch dispatch. A fetch returns nothing for the
//! current pass; the URL shows up on the first render after the media-changed
//! event evicts the entry. Posts without a featured media id fall back to the
//! first embedded image found in their content.

use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::model::ids::RemoteMediaId;
use crate::stores::MediaStore;

static IMG_SRC: OnceLock<Regex> = OnceLock::new();

/// First `src` attribute of an `<img>` tag in raw post content, if any.
#[must_use]
pub fn scan_content_for_image(content: &str) -> Option<String> {
    let re = IMG_SRC.get_or_init(|| {
        Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"']+)["']"#).expect("img-src pattern is valid")
    });

    re.captures(content)
        .map(|caps| caps[1].to_string())
        .filter(|url| !url.is_empty())
}

/// Cache of resolved featured image URLs keyed by remote media id.
pub struct FeaturedImageCache {
    entries: FxHashMap<RemoteMediaId, String>,
    max_entries: usize,
}

impl FeaturedImageCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            max_entries,
        }
    }

    /// Three-tier resolution. Media known locally without a URL is left
    /// uncached so a later media-changed event can still fill it in.
    pub fn resolve(
        &mut self,
        media_id: Option<RemoteMediaId>,
        fallback_content: &str,
        media: &dyn MediaStore,
    ) -> Option<String> {
        let Some(media_id) = media_id else {
            return scan_content_for_image(fallback_content);
        };

        if let Some(url) = self.entries.get(&media_id) {
            return Some(url.clone());
        }

        if let Some(item) = media.lookup_local_media(media_id) {
            return match item.url {
                Some(url) => {
                    if self.entries.len() >= self.max_entries {
                        debug!(
                            entries = self.entries.len(),
                            "featured image cache at capacity, clearing"
                        );
                        self.entries.clear();
                    }
                    self.entries.insert(media_id, url.clone());
                    Some(url)
                }
                // Rare, but some media is known locally without a URL.
                None => None,
            };
        }

        // Media is not in the store yet; the URL appears on the first render
        // after the fetch completes and evicts this id.
        media.dispatch_fetch(media_id);
        None
    }

    /// Evict the listed media ids.
    pub fn invalidate(&mut self, ids: &[RemoteMediaId]) {
        for id in ids {
            self.entries.remove(id);
        }
    }

    #[must_use]
    pub fn contains(&self, id: RemoteMediaId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FeaturedImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturedImageCache")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MediaItem;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeMediaStore {
        local: FxHashMap<RemoteMediaId, MediaItem>,
        fetches: Mutex<Vec<RemoteMediaId>>,
    }

    impl MediaStore for FakeMediaStore {
        fn lookup_local_media(&self, id: RemoteMediaId) -> Option<MediaItem> {
            self.local.get(&id).cloned()
        }

        fn dispatch_fetch(&self, id: RemoteMediaId) {
            self.fetches.lock().unwrap().push(id);
        }
    }

    #[test]
    fn test_unresolved_media_dispatches_fetch_and_returns_none() {
        let store = FakeMediaStore::default();
        let mut cache = FeaturedImageCache::new(64);

        let url = cache.resolve(Some(RemoteMediaId(5)), "", &store);

        assert!(url.is_none());
        assert_eq!(store.fetches.lock().unwrap().as_slice(), &[RemoteMediaId(5)]);
    }

    #[test]
    fn test_local_media_is_cached_and_skips_further_lookups() {
        let mut store = FakeMediaStore::default();
        store.local.insert(
            RemoteMediaId(5),
            MediaItem {
                media_id: RemoteMediaId(5),
                url: Some("https://example.com/cat.jpg".into()),
            },
        );
        let mut cache = FeaturedImageCache::new(64);

        let first = cache.resolve(Some(RemoteMediaId(5)), "", &store);
        // Second lookup must come from the cache even if the store forgets.
        store.local.clear();
        let second = cache.resolve(Some(RemoteMediaId(5)), "", &store);

        assert_eq!(first.as_deref(), Some("https://example.com/cat.jpg"));
        assert_eq!(first, second);
        assert!(store.fetches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_media_known_without_url_is_not_cached() {
        let mut store = FakeMediaStore::default();
        store.local.insert(
            RemoteMediaId(9),
            MediaItem {
                media_id: RemoteMediaId(9),
                url: None,
            },
        );
        let mut cache = FeaturedImageCache::new(64);

        assert!(cache.resolve(Some(RemoteMediaId(9)), "", &store).is_none());
        assert!(cache.is_empty());
        assert!(store.fetches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalidate_evicts_entry() {
        let mut store = FakeMediaStore::default();
        store.local.insert(
            RemoteMediaId(5),
            MediaItem {
                media_id: RemoteMediaId(5),
                url: Some("https://example.com/a.png".into()),
            },
        );
        let mut cache = FeaturedImageCache::new(64);
        cache.resolve(Some(RemoteMediaId(5)), "", &store);

        cache.invalidate(&[RemoteMediaId(5)]);

        assert!(!cache.contains(RemoteMediaId(5)));
    }

    #[test]
    fn test_content_scan_fallback_without_media_id() {
        let store = FakeMediaStore::default();
        let mut cache = FeaturedImageCache::new(64);

        let url = cache.resolve(
            None,
            r#"<p>hi</p><img class="x" src="https://example.com/inline.png" />"#,
            &store,
        );

        assert_eq!(url.as_deref(), Some("https://example.com/inline.png"));
        assert!(cache.resolve(None, "<p>no image</p>", &store).is_none());
    }
}
