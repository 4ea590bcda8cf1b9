use custmap_core::config::MAX_SEARCH_RESULTS;
use custmap_core::error::CustmapError;
use custmap_core::models::{GeoCoordinate, SearchCandidate};
use custmap_core::ports::GeocodingGateway;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::bounded::bounded;
use crate::debounce::Debouncer;
use crate::settings::PickerSettings;

/// Result of one `search` call
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Candidates in gateway relevance order (possibly empty)
    Completed(Vec<SearchCandidate>),
    /// A newer query arrived; this one was dropped or its result discarded
    Superseded,
}

impl SearchOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }

    /// The candidates, or `None` when superseded
    pub fn into_candidates(self) -> Option<Vec<SearchCandidate>> {
        match self {
            SearchOutcome::Completed(candidates) => Some(candidates),
            SearchOutcome::Superseded => None,
        }
    }
}

/// Debounced free-text address search
///
/// Queries go through a [`Debouncer`]; the surviving query is forward
/// geocoded, the top hits are reverse geocoded concurrently, and each hit
/// becomes a [`SearchCandidate`]. Gateway failures never reach the caller:
/// a failed search completes with no candidates, a failed enrichment yields
/// an "Unknown location" candidate.
pub struct AddressSearchController {
    gateway: Arc<dyn GeocodingGateway>,
    settings: PickerSettings,
    debouncer: Debouncer,
    in_flight: AtomicUsize,
}

impl AddressSearchController {
    pub fn new(gateway: Arc<dyn GeocodingGateway>, settings: PickerSettings) -> Self {
        Self {
            gateway,
            debouncer: Debouncer::new(settings.debounce),
            settings,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while a gateway round trip is running (drives the spinner)
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Search for `query`
    ///
    /// Blank queries complete immediately with no candidates and no gateway
    /// call; they still supersede any pending query.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.debouncer.supersede();

        if query.trim().is_empty() {
            return SearchOutcome::Completed(Vec::new());
        }

        if !self.debouncer.settle(ticket).await {
            tracing::debug!(query = %query, "Search superseded before dispatch");
            return SearchOutcome::Superseded;
        }

        let candidates = self.run(query).await;

        if !self.debouncer.is_current(ticket) {
            tracing::debug!(query = %query, "Discarding results of superseded search");
            return SearchOutcome::Superseded;
        }

        SearchOutcome::Completed(candidates)
    }

    async fn run(&self, query: &str) -> Vec<SearchCandidate> {
        let _loading = LoadingGuard::enter(&self.in_flight);

        let hits = match bounded(
            "forward geocode",
            self.settings.gateway_timeout,
            self.gateway.forward_geocode(query),
        )
        .await
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Address search failed");
                return Vec::new();
            }
        };

        if hits.is_empty() {
            tracing::debug!("{}", CustmapError::NotFound { query: query.to_string() });
            return Vec::new();
        }

        let limit = self.settings.max_results.min(MAX_SEARCH_RESULTS);
        let lookups = hits.into_iter().take(limit).map(|coordinate| self.enrich(coordinate));

        join_all(lookups).await
    }

    async fn enrich(&self, coordinate: GeoCoordinate) -> SearchCandidate {
        let result = bounded(
            "reverse geocode",
            self.settings.gateway_timeout,
            self.gateway.reverse_geocode(coordinate),
        )
        .await;

        match result {
            Ok(found) => match found.into_iter().next() {
                Some(details) if !details.is_empty() => {
                    SearchCandidate::resolved(coordinate, details)
                }
                _ => SearchCandidate::unresolved(coordinate),
            },
            Err(e) => {
                tracing::warn!(%coordinate, error = %e, "Reverse geocode of search hit failed");
                SearchCandidate::unresolved(coordinate)
            }
        }
    }
}

/// Keeps the in-flight counter raised for the lifetime of a round trip
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
