//! Frame-scoped patch storage.

use std::collections::HashMap;

use crate::classifier::Classifier;
use crate::features::{FeatureExtractor, Patch};
use crate::Rect;

#[derive(Debug, Clone)]
struct Entry {
    patch: Option<Patch>,
    classification: Option<(bool, f64)>,
}

/// Arena of the patches extracted for one frame, keyed by box.
///
/// Every box is extracted and classified at most once per frame. Keys are
/// arena indices and are invalidated by `sync` with a new version or `clear`.
#[derive(Debug, Clone, Default)]
pub(crate) struct PatchCache {
    version: Option<u64>,
    entries: Vec<Entry>,
    index: HashMap<Rect, usize>,
}

impl PatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries if they belong to another image version.
    pub fn sync(&mut self, version: u64) {
        if self.version != Some(version) {
            self.clear();
            self.version = Some(version);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.version = None;
    }

    /// Key of the patch centred at `(x, y)`, extracting it on first use.
    pub fn lookup(
        &mut self,
        extractor: &mut dyn FeatureExtractor,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> usize {
        let bounds = Rect::new(x - width / 2, y - height / 2, width, height);
        if let Some(&key) = self.index.get(&bounds) {
            return key;
        }
        let key = self.entries.len();
        self.entries.push(Entry {
            patch: extractor.extract(x, y, width, height),
            classification: None,
        });
        self.index.insert(bounds, key);
        key
    }

    /// Key of an already extracted box.
    pub fn find(&self, bounds: &Rect) -> Option<usize> {
        self.index.get(bounds).copied()
    }

    /// Patch behind `key`, `None` when the box was outside the image.
    pub fn patch(&self, key: usize) -> Option<&Patch> {
        self.entries.get(key).and_then(|e| e.patch.as_ref())
    }

    /// Classification of the patch behind `key`, computed on first use.
    pub fn classify<C: Classifier + ?Sized>(&mut self, key: usize, classifier: &C) -> Option<(bool, f64)> {
        let entry = self.entries.get_mut(key)?;
        if entry.classification.is_none() {
            let patch = entry.patch.as_ref()?;
            entry.classification = Some(classifier.classify(&patch.data));
        }
        entry.classification
    }

    /// Forget classifications after the classifier changed.
    pub fn forget_classifications(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.classification = None;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
