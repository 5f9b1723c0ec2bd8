use thiserror::Error;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::core::aggregator::PlaceSet;
use crate::core::distance::haversine_distance;
use crate::core::relevance::RelevanceFilter;
use crate::models::{Candidate, Coordinate, RankedPlace};
use crate::services::provider::{ProviderError, SearchProvider};

/// Errors surfaced by a search call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),

    #[error("No results found")]
    NoResultsFound,

    #[error("A reference coordinate is required to rank text search results")]
    ReferenceCoordinateMissing,

    #[error("Coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Search radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),

    #[error("Search query is empty")]
    EmptyQuery,
}

/// Tuning for the radius-expansion loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub initial_radius_m: f64,
    pub expansion_factor: f64,
    pub max_attempts: u32,
    pub min_results: usize,
    /// Maximum candidates requested from the provider per call
    pub result_limit: usize,
    pub require_reference_for_text: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            initial_radius_m: 2000.0,
            expansion_factor: 1.5,
            max_attempts: 3,
            min_results: 10,
            result_limit: 50,
            require_reference_for_text: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Proximity,
    TextQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Querying { attempt: u32 },
    Enriching,
    Filtering,
    Aggregating,
    Done,
    Failed,
}

/// State owned by a single search call, dropped when the call returns
#[derive(Debug)]
pub(crate) struct SearchSession {
    id: Uuid,
    mode: SearchMode,
    reference: Option<Coordinate>,
    radius_m: f64,
    attempt: u32,
    state: SessionState,
    accumulated: PlaceSet,
}

impl SearchSession {
    fn new(mode: SearchMode, reference: Option<Coordinate>, radius_m: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            reference,
            radius_m,
            attempt: 1,
            state: SessionState::Idle,
            accumulated: PlaceSet::new(),
        }
    }

    fn transition(&mut self, next: SessionState) {
        trace!(session = %self.id, from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }

    /// Whether another, wider attempt is still allowed and could find more
    fn can_expand(&self, max_attempts: u32, radius_cap: Option<f64>) -> bool {
        if self.attempt >= max_attempts {
            return false;
        }
        match radius_cap {
            Some(cap) if self.radius_m >= cap => {
                debug!(
                    session = %self.id,
                    attempt = self.attempt,
                    radius_m = self.radius_m,
                    "radius at provider maximum, not expanding"
                );
                false
            }
            _ => true,
        }
    }

    fn expand(&mut self, factor: f64, radius_cap: Option<f64>) {
        let grown = self.radius_m * factor;
        self.radius_m = radius_cap.map_or(grown, |cap| grown.min(cap));
        self.attempt += 1;
        debug!(
            session = %self.id,
            attempt = self.attempt,
            radius_m = self.radius_m,
            "expanding search radius"
        );
    }

    fn fail(&mut self, err: ProviderError) -> SearchError {
        warn!(session = %self.id, attempt = self.attempt, error = %err, "search provider failed");
        self.transition(SessionState::Failed);
        SearchError::ProviderUnavailable(err)
    }

    /// Enter the terminal state that matches what was accumulated
    fn settle(&mut self) {
        let terminal = if self.accumulated.is_empty() {
            SessionState::Failed
        } else {
            SessionState::Done
        };
        self.transition(terminal);
        info!(
            session = %self.id,
            mode = ?self.mode,
            attempts = self.attempt,
            results = self.accumulated.len(),
            state = ?terminal,
            "search finished"
        );
    }

    fn into_results(self) -> Result<Vec<RankedPlace>, SearchError> {
        if self.accumulated.is_empty() {
            return Err(SearchError::NoResultsFound);
        }
        Ok(self.accumulated.rank(self.reference.as_ref()))
    }
}

/// Adaptive proximity search engine
///
/// # Pipeline Stages
/// 1. Query the provider, widening the radius while too little comes back
/// 2. Enrich candidates with coordinates and thumbnails
/// 3. Drop candidates without a coordinate or failing the relevance filter
/// 4. Annotate distances, merge first-seen-wins and rank nearest first
#[derive(Debug, Clone)]
pub struct SearchEngine<P> {
    provider: P,
    filter: RelevanceFilter,
    settings: EngineSettings,
}

impl<P: SearchProvider> SearchEngine<P> {
    pub fn new(provider: P, filter: RelevanceFilter, settings: EngineSettings) -> Self {
        Self {
            provider,
            filter,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Find places around `reference`, starting at `initial_radius_m` and
    /// growing the radius until enough places turn up or attempts run out.
    pub async fn search_nearby(
        &self,
        reference: Coordinate,
        initial_radius_m: f64,
    ) -> Result<Vec<RankedPlace>, SearchError> {
        if !reference.is_valid() {
            return Err(SearchError::InvalidCoordinate {
                latitude: reference.latitude,
                longitude: reference.longitude,
            });
        }
        if !(initial_radius_m.is_finite() && initial_radius_m > 0.0) {
            return Err(SearchError::InvalidRadius(initial_radius_m));
        }

        let mut session =
            SearchSession::new(SearchMode::Proximity, Some(reference), initial_radius_m);
        self.run_proximity(&mut session).await?;
        session.into_results()
    }

    /// Find places matching a free-text query with a single provider call.
    /// Without a reference, results keep provider order and carry no distance.
    pub async fn search_text(
        &self,
        query: &str,
        reference: Option<Coordinate>,
    ) -> Result<Vec<RankedPlace>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        match reference {
            Some(r) if !r.is_valid() => {
                return Err(SearchError::InvalidCoordinate {
                    latitude: r.latitude,
                    longitude: r.longitude,
                });
            }
            None if self.settings.require_reference_for_text => {
                return Err(SearchError::ReferenceCoordinateMissing);
            }
            _ => {}
        }

        let mut session = SearchSession::new(SearchMode::TextQuery, reference, 0.0);
        self.run_text(&mut session, query).await?;
        session.into_results()
    }

    pub(crate) async fn run_proximity(
        &self,
        session: &mut SearchSession,
    ) -> Result<(), SearchError> {
        let max_attempts = self.settings.max_attempts.max(1);
        // The radius never shrinks between attempts
        let factor = self.settings.expansion_factor.max(1.0);
        let radius_cap = self.provider.max_radius_m();
        let Some(reference) = session.reference else {
            return Err(SearchError::ReferenceCoordinateMissing);
        };

        info!(
            session = %session.id,
            latitude = reference.latitude,
            longitude = reference.longitude,
            radius_m = session.radius_m,
            "starting proximity search"
        );

        loop {
            session.transition(SessionState::Querying {
                attempt: session.attempt,
            });

            let candidates = match self
                .provider
                .geosearch(reference, session.radius_m, self.settings.result_limit)
                .await
            {
                Ok(candidates) => candidates,
                Err(e) => return Err(session.fail(e)),
            };

            debug!(
                session = %session.id,
                attempt = session.attempt,
                radius_m = session.radius_m,
                candidates = candidates.len(),
                "geosearch returned"
            );

            if candidates.is_empty() && session.can_expand(max_attempts, radius_cap) {
                session.expand(factor, radius_cap);
                continue;
            }

            self.absorb(session, candidates).await?;

            if session.accumulated.len() >= self.settings.min_results
                || !session.can_expand(max_attempts, radius_cap)
            {
                break;
            }
            session.expand(factor, radius_cap);
        }

        session.settle();
        Ok(())
    }

    pub(crate) async fn run_text(
        &self,
        session: &mut SearchSession,
        query: &str,
    ) -> Result<(), SearchError> {
        info!(
            session = %session.id,
            query = %query,
            ranked = session.reference.is_some(),
            "starting text search"
        );

        session.transition(SessionState::Querying { attempt: 1 });
        let candidates = match self
            .provider
            .text_search(query, self.settings.result_limit)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => return Err(session.fail(e)),
        };

        debug!(session = %session.id, candidates = candidates.len(), "text search returned");

        self.absorb(session, candidates).await?;
        session.settle();
        Ok(())
    }

    /// Enrich, filter, annotate and merge one provider batch into the session
    async fn absorb(
        &self,
        session: &mut SearchSession,
        candidates: Vec<Candidate>,
    ) -> Result<(), SearchError> {
        session.transition(SessionState::Enriching);

        // Places already accumulated keep their first-seen data, so there is
        // nothing to look up for them.
        let fresh: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| !session.accumulated.contains(&c.identity))
            .collect();

        let details = if fresh.is_empty() {
            Default::default()
        } else {
            let identities: Vec<String> = fresh.iter().map(|c| c.identity.clone()).collect();
            match self.provider.article_details(&identities).await {
                Ok(details) => details,
                Err(e) => return Err(session.fail(e)),
            }
        };

        session.transition(SessionState::Filtering);
        let reference = session.reference;
        let places: Vec<RankedPlace> = fresh
            .into_iter()
            .map(|c| {
                let found = details.get(&c.identity);
                c.enrich(found)
            })
            .filter(|c| self.filter.is_relevant(&c.identity))
            .filter_map(RankedPlace::from_candidate)
            .filter(|p| p.coordinate.is_valid())
            .map(|mut p| {
                p.distance_meters = reference.map(|r| haversine_distance(&r, &p.coordinate));
                p
            })
            .collect();

        session.transition(SessionState::Aggregating);
        let added = session.accumulated.merge(places);

        debug!(
            session = %session.id,
            added,
            total = session.accumulated.len(),
            "merged candidates"
        );

        Ok(())
    }
}
