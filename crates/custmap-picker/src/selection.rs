//! Address picker session state.
//!
//! The session owns the authoritative {region, marker, address, details}
//! tuple plus the active search. Reverse geocodes are split into a
//! synchronous start (which bumps a monotonic lookup token), a detached
//! resolve, and a synchronous apply that discards anything but the most
//! recently started lookup.

use custmap_core::error::{CustmapError, Result};
use custmap_core::models::{
    format_address, AddressDetails, AddressSelection, GeoCoordinate, MapRegion, SearchCandidate,
};
use custmap_core::ports::{GeocodingGateway, MapSurface, PermissionStatus, PositionProvider};
use std::time::Duration;

use crate::bounded::bounded;
use crate::search::SearchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// Nothing chosen yet; showing the default region
    Idle,
    /// A location has been chosen by tap, drag, pick or position fix
    Located,
}

/// Gestures emitted by the map surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Tap(GeoCoordinate),
    MarkerDrag(GeoCoordinate),
}

impl MapEvent {
    pub fn coordinate(&self) -> GeoCoordinate {
        match self {
            MapEvent::Tap(coordinate) | MapEvent::MarkerDrag(coordinate) => *coordinate,
        }
    }
}

/// A reverse geocode that has been started but not yet resolved
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use = "a started lookup does nothing until resolved and applied"]
pub struct PendingLookup {
    token: u64,
    coordinate: GeoCoordinate,
}

impl PendingLookup {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    /// Run the reverse geocode; holds no reference to the session
    pub async fn resolve(
        self,
        gateway: &dyn GeocodingGateway,
        timeout: Duration,
    ) -> LookupResolution {
        let result =
            bounded("reverse geocode", timeout, gateway.reverse_geocode(self.coordinate)).await;
        LookupResolution { token: self.token, coordinate: self.coordinate, result }
    }
}

/// A finished reverse geocode waiting to be applied
#[derive(Debug)]
pub struct LookupResolution {
    pub token: u64,
    pub coordinate: GeoCoordinate,
    pub result: Result<Vec<AddressDetails>>,
}

/// Effect of applying a lookup (or attempting a position fix)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Address text and details were replaced
    Applied,
    /// The gateway resolved nothing for the coordinate
    Unresolved,
    /// A gateway or position failure; logged, state unchanged
    Failed,
    /// A newer lookup was started; result discarded
    Stale,
}

/// How a picker session ended
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome {
    Confirmed(AddressSelection),
    Cancelled,
}

impl PickerOutcome {
    pub fn selection(&self) -> Option<&AddressSelection> {
        match self {
            PickerOutcome::Confirmed(selection) => Some(selection),
            PickerOutcome::Cancelled => None,
        }
    }
}

/// One address picker session
#[derive(Debug, Clone)]
pub struct AddressSelectionState {
    status: SelectionStatus,
    region: MapRegion,
    marker: GeoCoordinate,
    address: String,
    details: Option<AddressDetails>,
    search_query: String,
    search_results: Vec<SearchCandidate>,
    results_visible: bool,
    latest_lookup: u64,
    pending_recenter: Option<MapRegion>,
}

impl AddressSelectionState {
    /// Open a session on `region` with the marker at its center
    pub fn new(initial_address: impl Into<String>, region: MapRegion) -> Self {
        Self {
            status: SelectionStatus::Idle,
            region,
            marker: region.center,
            address: initial_address.into(),
            details: None,
            search_query: String::new(),
            search_results: Vec::new(),
            results_visible: false,
            latest_lookup: 0,
            pending_recenter: None,
        }
    }

    pub fn status(&self) -> SelectionStatus {
        self.status
    }

    pub fn region(&self) -> &MapRegion {
        &self.region
    }

    pub fn marker(&self) -> GeoCoordinate {
        self.marker
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn details(&self) -> Option<&AddressDetails> {
        self.details.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> &[SearchCandidate] {
        &self.search_results
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    /// Record what the user typed into the search bar
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Show the outcome of a search for `query`
    ///
    /// Superseded outcomes and outcomes for a query the user has since
    /// replaced are ignored.
    pub fn show_search_results(&mut self, query: &str, outcome: SearchOutcome) {
        if query != self.search_query {
            tracing::debug!(query = %query, "Ignoring results for replaced query");
            return;
        }

        if let Some(candidates) = outcome.into_candidates() {
            self.results_visible = !query.trim().is_empty();
            self.search_results = candidates;
        }
    }

    /// The user edits the address text by hand
    pub fn edit_address(&mut self, text: impl Into<String>) {
        self.address = text.into();
    }

    /// Move the marker (region stays put) and start a reverse geocode
    ///
    /// Details from the previous position are dropped straight away so a
    /// lookup that never resolves cannot pair them with the new marker.
    pub fn handle_map_event(&mut self, event: MapEvent) -> PendingLookup {
        let coordinate = event.coordinate();
        self.marker = coordinate;
        self.details = None;
        self.status = SelectionStatus::Located;
        self.start_lookup(coordinate)
    }

    /// Jump to a search candidate
    ///
    /// Zooms in, moves the marker, takes the candidate's address, clears the
    /// search, and invalidates any reverse geocode still in flight.
    pub fn pick_candidate(&mut self, candidate: &SearchCandidate) {
        let region = MapRegion::zoomed(candidate.coordinate);

        self.region = region;
        self.marker = candidate.coordinate;
        self.address = candidate.formatted_address.clone();
        self.details = Some(candidate.details.clone()).filter(|d| !d.is_empty());
        self.search_query.clear();
        self.search_results.clear();
        self.results_visible = false;
        self.latest_lookup += 1;
        self.pending_recenter = Some(region);
        self.status = SelectionStatus::Located;
    }

    /// Recenter on a device position and start a reverse geocode for it
    pub fn recenter_on(&mut self, position: GeoCoordinate) -> PendingLookup {
        let region = MapRegion::around(position);

        self.region = region;
        self.marker = position;
        self.details = None;
        self.pending_recenter = Some(region);
        self.status = SelectionStatus::Located;
        self.start_lookup(position)
    }

    /// Apply a finished reverse geocode unless a newer one has been started
    pub fn apply_lookup(&mut self, resolution: LookupResolution) -> LookupOutcome {
        if resolution.token != self.latest_lookup {
            let stale =
                CustmapError::StaleResult { token: resolution.token, latest: self.latest_lookup };
            tracing::debug!(coordinate = %resolution.coordinate, "{}", stale);
            return LookupOutcome::Stale;
        }

        match resolution.result {
            Ok(found) => match found.into_iter().next().filter(|d| !d.is_empty()) {
                Some(details) => {
                    self.address = format_address(&details);
                    self.details = Some(details);
                    LookupOutcome::Applied
                }
                None => {
                    tracing::debug!(coordinate = %resolution.coordinate, "Reverse geocode found no address");
                    LookupOutcome::Unresolved
                }
            },
            Err(e) => {
                tracing::warn!(coordinate = %resolution.coordinate, error = %e, "Reverse geocode failed");
                LookupOutcome::Failed
            }
        }
    }

    /// Tap or drag, then resolve and apply in one step
    pub async fn resolve_map_event(
        &mut self,
        event: MapEvent,
        gateway: &dyn GeocodingGateway,
        timeout: Duration,
    ) -> LookupOutcome {
        let lookup = self.handle_map_event(event);
        let resolution = lookup.resolve(gateway, timeout).await;
        self.apply_lookup(resolution)
    }

    /// "Use current location"
    ///
    /// Permission denial or a missing fix is logged and leaves the session
    /// untouched; otherwise the map recenters and the address is reverse
    /// geocoded.
    pub async fn request_current_location(
        &mut self,
        positions: &dyn PositionProvider,
        gateway: &dyn GeocodingGateway,
        timeout: Duration,
    ) -> LookupOutcome {
        if positions.request_permission().await == PermissionStatus::Denied {
            tracing::warn!("Location permission denied");
            return LookupOutcome::Failed;
        }

        let position =
            match bounded("current position", timeout, positions.current_position()).await {
                Ok(position) => position,
                Err(e) => {
                    tracing::warn!(error = %e, "Error getting current location");
                    return LookupOutcome::Failed;
                }
            };

        let lookup = self.recenter_on(position);
        let resolution = lookup.resolve(gateway, timeout).await;
        self.apply_lookup(resolution)
    }

    /// Push the current view to the map, animating after programmatic moves
    pub fn render_to(&mut self, surface: &mut dyn MapSurface, animation: Duration) {
        if let Some(region) = self.pending_recenter.take() {
            surface.animate_to_region(&region, animation);
        }
        surface.render(&self.region, &self.marker);
    }

    /// End the session, handing the current selection to the caller
    pub fn confirm(self) -> PickerOutcome {
        let selection = AddressSelection {
            address: self.address,
            coordinate: self.marker,
            details: self.details,
        };
        tracing::info!(address = %selection.address, coordinate = %selection.coordinate, "Address confirmed");
        PickerOutcome::Confirmed(selection)
    }

    /// End the session, discarding everything
    pub fn cancel(self) -> PickerOutcome {
        PickerOutcome::Cancelled
    }

    fn start_lookup(&mut self, coordinate: GeoCoordinate) -> PendingLookup {
        self.latest_lookup += 1;
        PendingLookup { token: self.latest_lookup, coordinate }
    }
}
