//! Candidate identity and display text.
//!
//! The widget never inspects a candidate directly. Identity comes from a
//! caller-supplied key extractor and display text from a label extractor.

use std::sync::Arc;

type KeyFn<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;
type LabelFn<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Key and label extractors for candidates of type `T`.
///
/// Cloning is cheap; clones share the extractor closures.
///
/// # Example
///
/// ```
/// use typeahead::Extractors;
///
/// #[derive(Clone)]
/// struct Fruit { id: u32, name: String }
///
/// let extractors = Extractors::new(|f: &Fruit| f.id, |f: &Fruit| f.name.clone());
/// let apple = Fruit { id: 1, name: "Apple".into() };
/// assert_eq!(extractors.key(&apple), 1);
/// assert_eq!(extractors.label(&apple), "Apple");
/// ```
pub struct Extractors<T, K> {
    key: KeyFn<T, K>,
    label: LabelFn<T>,
}

impl<T, K: PartialEq> Extractors<T, K> {
    /// Create extractors from a key function and a label function.
    ///
    /// The label function may return `String` or `Option<String>`; a missing
    /// label is treated as the empty string.
    pub fn new<KF, LF, L>(key: KF, label: LF) -> Self
    where
        KF: Fn(&T) -> K + Send + Sync + 'static,
        LF: Fn(&T) -> L + Send + Sync + 'static,
        L: Into<Option<String>>,
    {
        Self {
            key: Arc::new(key),
            label: Arc::new(move |item| label(item).into()),
        }
    }

    /// The identity key of a candidate.
    pub fn key(&self, item: &T) -> K {
        (self.key)(item)
    }

    /// The display label of a candidate; empty when the label is missing.
    pub fn label(&self, item: &T) -> String {
        (self.label)(item).unwrap_or_default()
    }

    /// Whether two candidates have the same identity.
    pub fn same(&self, a: &T, b: &T) -> bool {
        self.key(a) == self.key(b)
    }

    /// Position of `item` in `list`, compared by key.
    pub fn position_in(&self, item: &T, list: &[T]) -> Option<usize> {
        let key = self.key(item);
        list.iter().position(|candidate| self.key(candidate) == key)
    }
}

impl<T, K> Clone for Extractors<T, K> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            label: Arc::clone(&self.label),
        }
    }
}

impl<T, K> std::fmt::Debug for Extractors<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractors").finish_non_exhaustive()
    }
}
