use annotations::{
    Annotation, AnnotationPage, AnnotationSource, FetchError, FetchGateway, FetchOutcome,
    FetchTicket,
};
use foundation::AnnotationId;
use layers::{LayerError, LayerRegistry, MapError, MapFacade, MapSurface, Visibility};
use tracing::{debug, warn};

use crate::card::LayerCard;
use crate::config::ViewerConfig;
use crate::links::JosmLinks;

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleError {
    /// Neither in the current list nor loaded earlier.
    UnknownAnnotation(AnnotationId),
    Layer(LayerError),
}

impl std::fmt::Display for ToggleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleError::UnknownAnnotation(id) => write!(f, "unknown annotation: {id}"),
            ToggleError::Layer(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ToggleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToggleError::Layer(err) => Some(err),
            ToggleError::UnknownAnnotation(_) => None,
        }
    }
}

impl From<LayerError> for ToggleError {
    fn from(err: LayerError) -> Self {
        ToggleError::Layer(err)
    }
}

/// One mounted viewer: the map, its layers, the fetch gateway and the
/// annotation list the user picks from.
///
/// The annotation list is replaced wholesale by every fresh fetch. Layers
/// outlive the list they came from and can still be toggled.
pub struct ViewerSession<S, A> {
    config: ViewerConfig,
    josm: Option<JosmLinks>,
    map: MapFacade<S>,
    registry: LayerRegistry,
    gateway: FetchGateway<A>,
    annotations: Vec<Annotation>,
}

impl<S: MapSurface, A: AnnotationSource> ViewerSession<S, A> {
    pub fn new(config: ViewerConfig, surface: S, source: A) -> Self {
        let josm = JosmLinks::new(&config.josm_url)
            .inspect_err(|err| warn!(url = %config.josm_url, "JOSM links disabled: {err}"))
            .ok();
        Self {
            josm,
            map: MapFacade::new(surface),
            registry: LayerRegistry::new(config.tile_template.clone(), config.fit_padding),
            gateway: FetchGateway::new(source, config.gateway()),
            annotations: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn map(&self) -> &MapFacade<S> {
        &self.map
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn source(&self) -> &A {
        self.gateway.source()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_loading(&self) -> bool {
        self.gateway.is_loading()
    }

    /// The library finished loading: accept map operations and put the base
    /// map underneath everything else.
    pub fn on_map_load(&mut self) -> Result<(), MapError> {
        self.map.mark_ready();
        self.map.ensure_base_layer(&self.config.base_map)?;
        Ok(())
    }

    /// Ticket for a fetch of the current view, `None` if the map is not ready
    /// or zoomed out too far.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let (bounds, zoom) = match self.map.viewport() {
            Ok(view) => view,
            Err(err) => {
                debug!("fetch dropped: {err}");
                return None;
            }
        };
        self.gateway.begin(bounds, zoom)
    }

    /// Apply the answer to `ticket`. Returns whether the annotation list was
    /// replaced; superseded answers are ignored.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<AnnotationPage, FetchError>,
    ) -> Result<bool, FetchError> {
        match self.gateway.complete(ticket, result)? {
            FetchOutcome::Fresh(items) => {
                self.annotations = items;
                Ok(true)
            }
            FetchOutcome::Stale => Ok(false),
        }
    }

    /// Fetch annotations for the current view and replace the list.
    pub async fn fetch(&mut self) -> Result<bool, FetchError> {
        let Some(ticket) = self.begin_fetch() else {
            return Ok(false);
        };
        let result = self.gateway.source().fetch_page(&ticket.query).await;
        self.complete_fetch(&ticket, result)
    }

    /// Load the layers of `id` on first use, then flip their visibility.
    pub fn toggle(&mut self, id: &AnnotationId) -> Result<Visibility, ToggleError> {
        let annotation = self
            .annotations
            .iter()
            .find(|a| a.annotation_id().ok().as_ref() == Some(id));
        if annotation.is_none() && self.registry.visibility(id).is_none() {
            return Err(ToggleError::UnknownAnnotation(id.clone()));
        }
        let features = annotation.and_then(Annotation::feature_collection);
        Ok(self.registry.toggle(&mut self.map, id, features)?)
    }

    /// Cards for the current annotation list, in list order.
    pub fn cards(&self) -> Vec<LayerCard> {
        self.annotations
            .iter()
            .filter_map(|annotation| match annotation.annotation_id() {
                Ok(id) => Some(LayerCard::new(
                    &id,
                    annotation,
                    &self.config.tile_template,
                    self.josm.as_ref(),
                    self.registry.state(&id),
                )),
                Err(err) => {
                    warn!(id = %annotation.id, "skipping annotation: {err}");
                    None
                }
            })
            .collect()
    }
}
