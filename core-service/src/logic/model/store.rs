//! Lock-free model store with hot-swapping
//!
//! Readers take a [`Classifier`] snapshot without locking; a retrained model is
//! published with a single atomic swap. Snapshots taken before a swap keep the
//! old model alive until they are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::inference::Classifier;
use super::training::TrainedModel;

pub struct ModelStore {
    /// Current model, `None` means fallback mode
    current: ArcSwapOption<TrainedModel>,
    /// Bumped on every replace
    generation: AtomicU64,
}

impl ModelStore {
    /// Empty store (fallback mode)
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_model(model: TrainedModel) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(model),
            generation: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Classifier for one request
    pub fn snapshot(&self) -> Classifier {
        match self.current.load_full() {
            Some(model) => Classifier::Trained(model),
            None => Classifier::Fallback,
        }
    }

    pub fn current(&self) -> Option<Arc<TrainedModel>> {
        self.current.load_full()
    }

    /// Atomically publish a new model
    pub fn replace(&self, model: TrainedModel) {
        log::info!(
            "Model swapped in: {} trees, {} training samples",
            model.metadata.n_estimators,
            model.metadata.training_samples
        );
        self.current.store(Some(Arc::new(model)));
        self.generation.fetch_add(1, Ordering::Release);
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}
