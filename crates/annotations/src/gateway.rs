use foundation::LngLatBounds;
use tracing::{debug, info, warn};

use crate::manifest::attach_manifests;
use crate::model::{Annotation, AnnotationPage};
use crate::query::{DEFAULT_LIMIT, MIN_FETCH_ZOOM, ViewportQuery};
use crate::source::{AnnotationSource, FetchError};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Fetches are skipped when `zoom <= min_zoom`.
    pub min_zoom: f64,
    pub limit: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_FETCH_ZOOM,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Handle for one in-flight fetch, returned by [`FetchGateway::begin`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    pub query: ViewportQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Result of the most recent fetch, manifests attached.
    Fresh(Vec<Annotation>),
    /// A newer fetch was started after this one; its result was discarded.
    Stale,
}

/// Viewport-bounded access to the annotations API.
///
/// The fetch is split into `begin` and `complete` so a caller can await the
/// request without holding a borrow on whatever owns the gateway. Every
/// `begin` supersedes earlier tickets; `loading` is advisory and never blocks
/// a new fetch.
#[derive(Debug)]
pub struct FetchGateway<S> {
    source: S,
    config: GatewayConfig,
    generation: u64,
    loading: bool,
}

impl<S: AnnotationSource> FetchGateway<S> {
    pub fn new(source: S, config: GatewayConfig) -> Self {
        Self {
            source,
            config,
            generation: 0,
            loading: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> GatewayConfig {
        self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a fetch for `viewport`, or `None` when the zoom guard rejects it.
    pub fn begin(&mut self, viewport: LngLatBounds, zoom: f64) -> Option<FetchTicket> {
        if zoom <= self.config.min_zoom {
            info!(
                zoom,
                min_zoom = self.config.min_zoom,
                "zoom level too low to fetch annotations"
            );
            return None;
        }
        if self.loading {
            debug!(generation = self.generation, "superseding in-flight fetch");
        }
        self.generation += 1;
        self.loading = true;
        Some(FetchTicket {
            generation: self.generation,
            query: ViewportQuery::new(viewport, self.config.limit),
        })
    }

    /// Finish `ticket` with the source's answer.
    ///
    /// Errors of a superseded ticket are swallowed as `Stale`; only the
    /// newest ticket clears the loading flag.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<AnnotationPage, FetchError>,
    ) -> Result<FetchOutcome, FetchError> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return Ok(FetchOutcome::Stale);
        }
        self.loading = false;

        let mut page = result.inspect_err(|err| warn!("error fetching annotations: {err}"))?;
        attach_manifests(&mut page.items);
        info!(count = page.items.len(), "fetched annotations");
        Ok(FetchOutcome::Fresh(page.items))
    }

    /// Begin, request and complete in one step. Below the zoom threshold this
    /// returns an empty list without touching the source.
    pub async fn fetch_by_viewport(
        &mut self,
        viewport: LngLatBounds,
        zoom: f64,
    ) -> Result<Vec<Annotation>, FetchError> {
        let Some(ticket) = self.begin(viewport, zoom) else {
            return Ok(Vec::new());
        };
        let result = self.source.fetch_page(&ticket.query).await;
        match self.complete(&ticket, result)? {
            FetchOutcome::Fresh(items) => Ok(items),
            FetchOutcome::Stale => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryAnnotationSource;

    const PAGE: &[u8] = br#"{
        "items": [{
            "id": "https://annotations.allmaps.org/maps/m1",
            "target": { "source": { "id": "img", "partOf": [
                { "id": "canvas", "type": "Canvas", "partOf": [ { "id": "X", "type": "Manifest" } ] }
            ] } },
            "body": { "type": "FeatureCollection", "features": [] }
        }]
    }"#;

    fn viewport() -> LngLatBounds {
        LngLatBounds::new(4.5, 52.25, 5.0, 52.5)
    }

    #[test]
    fn below_threshold_skips_network() {
        let source = MemoryAnnotationSource::from_json(PAGE).unwrap();
        let mut gw = FetchGateway::new(source.clone(), GatewayConfig::default());

        let low = pollster::block_on(gw.fetch_by_viewport(viewport(), 3.0)).unwrap();
        let at = pollster::block_on(gw.fetch_by_viewport(viewport(), MIN_FETCH_ZOOM)).unwrap();

        assert!(low.is_empty());
        assert!(at.is_empty());
        assert_eq!(source.calls(), 0);
        assert!(!gw.is_loading());
    }

    #[test]
    fn fetch_attaches_manifest_and_clears_loading() {
        let source = MemoryAnnotationSource::from_json(PAGE).unwrap();
        let mut gw = FetchGateway::new(source.clone(), GatewayConfig::default());

        let items = pollster::block_on(gw.fetch_by_viewport(viewport(), 12.0)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].manifest.as_deref(), Some("X"));
        assert_eq!(source.calls(), 1);
        assert_eq!(source.queries()[0].limit, 20);
        assert!(!gw.is_loading());
    }

    #[test]
    fn failure_surfaces_and_clears_loading() {
        let source = MemoryAnnotationSource::failing(FetchError::Network("offline".into()));
        let mut gw = FetchGateway::new(source, GatewayConfig::default());

        let err = pollster::block_on(gw.fetch_by_viewport(viewport(), 12.0)).unwrap_err();
        assert_eq!(err, FetchError::Network("offline".into()));
        assert!(!gw.is_loading());
    }

    #[test]
    fn newer_ticket_makes_older_result_stale() {
        let mut gw = FetchGateway::new(MemoryAnnotationSource::default(), GatewayConfig::default());
        let first = gw.begin(viewport(), 10.0).unwrap();
        let second = gw.begin(viewport(), 10.0).unwrap();
        assert!(gw.is_loading());

        let page = crate::source::decode_page(PAGE).unwrap();
        assert_eq!(gw.complete(&first, Ok(page.clone())), Ok(FetchOutcome::Stale));
        assert!(gw.is_loading(), "stale completion must not clear loading");

        let outcome = gw.complete(&second, Ok(page)).unwrap();
        assert!(matches!(outcome, FetchOutcome::Fresh(ref items) if items.len() == 1));
        assert!(!gw.is_loading());
    }

    #[test]
    fn stale_error_is_ignored() {
        let mut gw = FetchGateway::new(MemoryAnnotationSource::default(), GatewayConfig::default());
        let first = gw.begin(viewport(), 10.0).unwrap();
        let _second = gw.begin(viewport(), 10.0).unwrap();
        let outcome = gw.complete(&first, Err(FetchError::Status(500)));
        assert_eq!(outcome, Ok(FetchOutcome::Stale));
    }
}
