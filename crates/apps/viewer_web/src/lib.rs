use std::cell::RefCell;
use std::rc::{Rc, Weak};

use annotations::AnnotationSource;
use console_error_panic_hook::set_once;
use foundation::AnnotationId;
use viewer::{ViewerConfig, ViewerSession};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

mod maplibre;
mod source;

use maplibre::MapLibreSurface;
use source::BrowserAnnotationSource;

type Session = ViewerSession<MapLibreSurface, BrowserAnnotationSource>;

fn report(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// A map mounted into one container element, with its annotation list.
#[wasm_bindgen]
pub struct Viewer {
    session: Rc<RefCell<Session>>,
    _on_load: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Viewer {
    /// `config` is an optional JSON object; missing fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(container: &str, config: Option<String>) -> Result<Viewer, JsValue> {
        let config = match config {
            Some(json) => ViewerConfig::from_json_str(&json),
            None => Ok(ViewerConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let surface = MapLibreSurface::create(container, config.initial_center, config.initial_zoom)?;
        let source = BrowserAnnotationSource::new(config.annotations_url.clone());
        let session = Rc::new(RefCell::new(ViewerSession::new(config, surface, source)));

        let weak: Weak<RefCell<Session>> = Rc::downgrade(&session);
        let on_load = Closure::<dyn FnMut()>::new(move || {
            let Some(session) = weak.upgrade() else {
                return;
            };
            if let Err(err) = session.borrow_mut().on_map_load() {
                report(&format!("base map: {err}"));
            }
        });
        session.borrow().map().surface().on_load(&on_load);

        Ok(Viewer {
            session,
            _on_load: on_load,
        })
    }

    /// Fetch annotations for the current view. Resolves to `true` when the
    /// list was replaced.
    pub fn fetch(&self) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let (ticket, source) = {
                let mut s = session.borrow_mut();
                match s.begin_fetch() {
                    Some(ticket) => (ticket, s.source().clone()),
                    None => return Ok(JsValue::FALSE),
                }
            };
            let result = source.fetch_page(&ticket.query).await;
            let applied = session
                .borrow_mut()
                .complete_fetch(&ticket, result)
                .map_err(|err| {
                    report(&format!("Error fetching annotations: {err}"));
                    JsValue::from_str(&err.to_string())
                })?;
            Ok(JsValue::from_bool(applied))
        })
    }

    /// Show, hide or first load the layers of `id`. Returns `"visible"` or
    /// `"none"`.
    pub fn toggle(&self, id: &str) -> Result<String, JsValue> {
        let id = AnnotationId::parse(id).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let visibility = self.session.borrow_mut().toggle(&id).map_err(|err| {
            report(&err.to_string());
            JsValue::from_str(&err.to_string())
        })?;
        Ok(visibility.as_layout_value().to_string())
    }

    /// The layer list as a JSON array of cards.
    pub fn cards(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.borrow().cards())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn loading(&self) -> bool {
        self.session.borrow().is_loading()
    }

    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.session.borrow().map().is_ready()
    }
}
