//! Write-once cache of type descriptions

use crate::domain::entities::MimeType;
use crate::domain::repositories::{CommentSource, NoComments};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

/// Caches descriptions per (type, language)
///
/// A missing key means "not yet loaded". Once a lookup has been stored,
/// including a lookup that found nothing, the source is never asked again.
pub struct CommentCache {
    source: Box<dyn CommentSource>,
    loaded: Mutex<HashMap<(MimeType, String), Option<String>>>,
}

impl CommentCache {
    pub fn new(source: Box<dyn CommentSource>) -> Self {
        Self {
            source,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, mime: &MimeType, lang: &str) -> Option<String> {
        let key = (mime.clone(), lang.to_string());
        if let Some(cached) = self.loaded.lock().get(&key) {
            return cached.clone();
        }

        // Loaded without the lock held; the first stored answer wins
        let comment = self.source.load_comment(mime, lang);
        self.loaded.lock().entry(key).or_insert(comment).clone()
    }

    /// Number of (type, language) pairs already looked up
    pub fn len(&self) -> usize {
        self.loaded.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CommentCache {
    fn default() -> Self {
        Self::new(Box::new(NoComments))
    }
}

impl fmt::Debug for CommentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentCache")
            .field("loaded", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    impl CommentSource for Counting {
        fn load_comment(&self, mime: &MimeType, lang: &str) -> Option<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            (mime == "text/plain" && lang == "en").then(|| "plain text document".to_string())
        }
    }

    #[test]
    fn test_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CommentCache::new(Box::new(Counting(calls.clone())));
        let plain = MimeType::new("text/plain");

        assert_eq!(cache.get(&plain, "en").as_deref(), Some("plain text document"));
        assert_eq!(cache.get(&plain, "en").as_deref(), Some("plain text document"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_comment_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CommentCache::new(Box::new(Counting(calls.clone())));
        let unknown = MimeType::new("application/x-does-not-exist");

        assert!(cache.get(&unknown, "en").is_none());
        assert!(cache.get(&unknown, "en").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_default_has_no_comments() {
        assert!(CommentCache::default().get(&MimeType::new("text/plain"), "en").is_none());
    }
}
