// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashSet;
use std::future::Future;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::dataset::Dataset;
use crate::dataset::DatasetSource;
use crate::dataset::load_or_fallback;
use crate::filter;
use crate::sampler;
use crate::sampler::Draw;
use crate::store::Store;
use crate::types::filter_config::FilterConfig;
use crate::types::quote::Quote;
use crate::types::quote::QuoteId;

/// The observable lifecycle of a manager.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ManagerState {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Quotes in the dataset.
    pub total: usize,
    /// Quotes marked as seen.
    pub seen: usize,
    /// Quotes that can still be drawn.
    pub remaining: usize,
}

enum Phase {
    Uninitialized,
    Loading(oneshot::Receiver<Dataset>),
    Ready(Loaded),
}

struct Loaded {
    all: Vec<Quote>,
    pool: Vec<Quote>,
    fallback: bool,
}

/// Owns the dataset, the eligible pool, and the seen-set, and is the only
/// thing that mutates them.
///
/// The manager is single-owner and does no locking. Callers that share it
/// across threads must put it behind a mutex.
pub struct QuoteManager {
    store: Store,
    seen: HashSet<QuoteId>,
    config: FilterConfig,
    phase: Phase,
    rng: StdRng,
}

impl QuoteManager {
    /// Create a manager, reading the seen-set and filters from `store`.
    pub fn new(store: Store) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: Store, rng: StdRng) -> Self {
        let seen = store.load_seen();
        let config = store.load_filters();
        log::debug!("Restored {} seen quotes and filters {config:?}.", seen.len());
        Self {
            store,
            seen,
            config,
            phase: Phase::Uninitialized,
            rng,
        }
    }

    /// Start loading the dataset in the background. Must be called from
    /// within a tokio runtime. Ignored unless uninitialized.
    pub fn begin_load(&mut self, source: DatasetSource) {
        self.begin_load_with(async move { load_or_fallback(&source).await });
    }

    /// Start loading the dataset produced by `load` in the background. Must be
    /// called from within a tokio runtime. Ignored unless uninitialized.
    pub fn begin_load_with<F>(&mut self, load: F)
    where
        F: Future<Output = Dataset> + Send + 'static,
    {
        if !matches!(self.phase, Phase::Uninitialized) {
            log::warn!("Quotes are already loading or loaded.");
            return;
        }
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            // The receiver is gone if the manager was dropped first.
            let _ = tx.send(load.await);
        });
        self.phase = Phase::Loading(rx);
    }

    /// Wait for a pending load to finish. Returns immediately in any other
    /// state.
    pub async fn wait_ready(&mut self) {
        let dataset = match &mut self.phase {
            Phase::Loading(rx) => match rx.await {
                Ok(dataset) => dataset,
                Err(_) => {
                    log::warn!("Quote loader stopped without a result, using the built-in sample set.");
                    Dataset::fallback()
                }
            },
            _ => return,
        };
        self.finish_load(dataset);
    }

    /// Begin loading and wait for the result.
    pub async fn load(&mut self, source: DatasetSource) {
        self.begin_load(source);
        self.wait_ready().await;
    }

    /// Move to `Ready` if the background load has completed. Never blocks.
    pub fn poll_load(&mut self) {
        let outcome = match &mut self.phase {
            Phase::Loading(rx) => rx.try_recv(),
            _ => return,
        };
        let dataset = match outcome {
            Ok(dataset) => dataset,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                log::warn!("Quote loader stopped without a result, using the built-in sample set.");
                Dataset::fallback()
            }
        };
        self.finish_load(dataset);
    }

    fn finish_load(&mut self, dataset: Dataset) {
        let fallback = dataset.is_fallback();
        let all = dataset.into_quotes();
        let pool = filter::apply(&all, &self.config, &self.seen);
        log::debug!(
            "Quotes ready: {} total, {} eligible.",
            all.len(),
            pool.len()
        );
        self.phase = Phase::Ready(Loaded {
            all,
            pool,
            fallback,
        });
    }

    pub fn state(&self) -> ManagerState {
        match self.phase {
            Phase::Uninitialized => ManagerState::Uninitialized,
            Phase::Loading(_) => ManagerState::Loading,
            Phase::Ready(_) => ManagerState::Ready,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == ManagerState::Ready
    }

    /// Whether the loaded dataset is the built-in sample set.
    pub fn is_fallback(&self) -> bool {
        match &self.phase {
            Phase::Ready(loaded) => loaded.fallback,
            _ => false,
        }
    }

    pub fn filters(&self) -> FilterConfig {
        self.config
    }

    /// Replace the filter settings and recompute the eligible pool. Before
    /// the dataset is ready the settings are kept and applied once it is.
    pub fn update_filters(&mut self, config: FilterConfig) {
        self.poll_load();
        self.config = config;
        if let Err(e) = self.store.save_filters(&config) {
            log::warn!("Failed to persist filters: {e}");
        }
        match &mut self.phase {
            Phase::Ready(loaded) => {
                loaded.pool = filter::apply(&loaded.all, &self.config, &self.seen);
            }
            _ => log::debug!("Quotes not loaded yet, filters will apply once they are."),
        }
    }

    /// Draw a random unseen quote and mark it as seen. Returns `None` when the
    /// pool is exhausted or the dataset is not loaded yet.
    ///
    /// A failure to persist the seen-set is logged and otherwise ignored.
    pub fn draw_next(&mut self) -> Option<Quote> {
        self.poll_load();
        let Phase::Ready(loaded) = &mut self.phase else {
            return None;
        };
        let pool = std::mem::take(&mut loaded.pool);
        match sampler::draw(pool, &mut self.rng) {
            Draw::Drawn { quote, pool } => {
                loaded.pool = pool;
                self.seen.insert(quote.id().clone());
                if let Err(e) = self.store.persist_seen(&self.seen) {
                    log::warn!("Failed to persist seen quotes: {e}");
                }
                Some(quote)
            }
            Draw::Exhausted => None,
        }
    }

    /// Forget every seen quote and refill the pool with the current filters.
    pub fn restore_defaults(&mut self) {
        self.poll_load();
        let Phase::Ready(loaded) = &mut self.phase else {
            log::debug!("Ignoring restore before quotes are loaded.");
            return;
        };
        self.seen.clear();
        if let Err(e) = self.store.clear_seen() {
            log::warn!("Failed to clear seen quotes: {e}");
        }
        loaded.pool = filter::apply(&loaded.all, &self.config, &self.seen);
    }

    /// Zeros until the dataset is ready.
    pub fn counts(&self) -> Counts {
        match &self.phase {
            Phase::Ready(loaded) => Counts {
                total: loaded.all.len(),
                seen: self.seen.len(),
                remaining: loaded.pool.len(),
            },
            _ => Counts::default(),
        }
    }

    #[cfg(test)]
    fn pool(&self) -> &[Quote] {
        match &self.phase {
            Phase::Ready(loaded) => &loaded.pool,
            _ => &[],
        }
    }
}
