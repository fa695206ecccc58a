//! Deep links into a locally running JOSM remote control.
//!
//! The viewer only produces these URLs; it never calls them.

use foundation::LngLatBounds;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JosmLinks {
    base: Url,
}

impl JosmLinks {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Import `tile_url` (with its `{z}/{x}/{y}` placeholders) as a TMS layer.
    pub fn imagery(&self, title: &str, tile_url: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base.join("imagery")?;
        url.query_pairs_mut()
            .append_pair("title", title)
            .append_pair("type", "tms")
            .append_pair("url", tile_url);
        Ok(url)
    }

    pub fn load_and_zoom(&self, bounds: &LngLatBounds) -> Result<Url, url::ParseError> {
        let mut url = self.base.join("load_and_zoom")?;
        url.query_pairs_mut()
            .append_pair("left", &bounds.min_lng.to_string())
            .append_pair("bottom", &bounds.min_lat.to_string())
            .append_pair("right", &bounds.max_lng.to_string())
            .append_pair("top", &bounds.max_lat.to_string());
        Ok(url)
    }
}
