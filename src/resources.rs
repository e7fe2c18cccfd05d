//! Image cache with one-shot readiness notification
//!
//! Generic over the decoded image type: the browser host stores
//! `HtmlImageElement`s, tests store plain values. Loading itself happens
//! outside; the host reports completions through `mark_loaded` /
//! `mark_failed`.

use std::collections::HashMap;

use crate::error::AssetError;

/// Callback run once every requested image is ready
pub type ReadyCallback = Box<dyn FnOnce()>;

/// Load status of one image id. Ids never requested have no entry.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus<I> {
    /// Fetch in flight; `attempts` counts fetches started so far
    Loading { attempts: u32 },
    Ready(I),
    Failed { attempts: u32 },
}

/// Image cache keyed by id (the image URL)
pub struct ResourceCache<I> {
    entries: HashMap<String, LoadStatus<I>>,
    /// Request order, for stable diagnostics
    order: Vec<String>,
    ready_callbacks: Vec<ReadyCallback>,
}

impl<I> Default for ResourceCache<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> ResourceCache<I> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            ready_callbacks: Vec::new(),
        }
    }

    /// Request ids. Already cached or in-flight ids are skipped; the
    /// returned ids are the ones the caller must start fetching.
    pub fn load<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<String> {
        let mut started = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if self.entries.contains_key(id) {
                continue;
            }
            self.entries
                .insert(id.to_string(), LoadStatus::Loading { attempts: 1 });
            self.order.push(id.to_string());
            started.push(id.to_string());
        }
        started
    }

    /// The decoded image, or `None` while it is not ready
    pub fn get(&self, id: &str) -> Option<&I> {
        match self.entries.get(id) {
            Some(LoadStatus::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// `None` means the id was never requested
    pub fn status(&self, id: &str) -> Option<&LoadStatus<I>> {
        self.entries.get(id)
    }

    /// Something was requested and all of it is ready
    pub fn is_ready(&self) -> bool {
        !self.entries.is_empty()
            && self
                .entries
                .values()
                .all(|s| matches!(s, LoadStatus::Ready(_)))
    }

    /// Ids requested but not ready yet, in request order
    pub fn pending(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| !matches!(self.entries.get(*id), Some(LoadStatus::Ready(_))))
            .cloned()
            .collect()
    }

    /// Queue a callback for when everything is loaded. Never runs inline,
    /// even if the cache is already ready; delivery only happens from a load
    /// completion.
    pub fn on_ready(&mut self, callback: impl FnOnce() + 'static) {
        self.ready_callbacks.push(Box::new(callback));
    }

    /// Record a decoded image. When this completes the set, the queued
    /// callbacks are handed back in registration order; run them after
    /// releasing any borrow of the cache.
    pub fn mark_loaded(&mut self, id: &str, image: I) -> Vec<ReadyCallback> {
        if !self.entries.contains_key(id) {
            log::warn!("Ignoring unrequested image {}", id);
            return Vec::new();
        }
        self.entries.insert(id.to_string(), LoadStatus::Ready(image));

        if self.is_ready() && !self.ready_callbacks.is_empty() {
            log::info!("All {} images loaded", self.entries.len());
            std::mem::take(&mut self.ready_callbacks)
        } else {
            Vec::new()
        }
    }

    /// Record a failed fetch
    pub fn mark_failed(&mut self, id: &str) {
        if let Some(status) = self.entries.get_mut(id) {
            if let LoadStatus::Loading { attempts } = *status {
                log::warn!("Image {} failed to load (attempt {})", id, attempts);
                *status = LoadStatus::Failed { attempts };
            }
        }
    }

    /// Move failed ids with attempts left back to loading; returns the ids
    /// to fetch again.
    pub fn retry_failed(&mut self, max_retries: u32) -> Vec<String> {
        let mut retried = Vec::new();
        for id in &self.order {
            if let Some(status) = self.entries.get_mut(id) {
                if let LoadStatus::Failed { attempts } = *status {
                    if attempts <= max_retries {
                        *status = LoadStatus::Loading {
                            attempts: attempts + 1,
                        };
                        retried.push(id.clone());
                    }
                }
            }
        }
        retried
    }

    /// Startup health: an image out of retries is `LoadFailed`; still
    /// waiting past `timeout_secs` is `StartupTimeout`.
    pub fn check_startup(
        &self,
        elapsed_secs: f64,
        timeout_secs: f64,
        max_retries: u32,
    ) -> Result<(), AssetError> {
        for id in &self.order {
            if let Some(LoadStatus::Failed { attempts }) = self.entries.get(id) {
                if *attempts > max_retries {
                    return Err(AssetError::LoadFailed {
                        id: id.clone(),
                        attempts: *attempts,
                    });
                }
            }
        }

        if !self.is_ready() && elapsed_secs >= timeout_secs {
            return Err(AssetError::StartupTimeout {
                waited_secs: elapsed_secs,
                pending: self.pending(),
            });
        }

        Ok(())
    }
}
