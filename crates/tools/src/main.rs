use std::fs;
use std::path::PathBuf;

use annotations::{AnnotationSource, HttpAnnotationSource, MemoryAnnotationSource};
use clap::{Parser, Subcommand};
use foundation::{AnnotationId, LngLatBounds};
use layers::HeadlessMap;
use tools::{parse_bbox, render_cards};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewer::{JosmLinks, ViewerConfig, ViewerSession};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse georeferenced map annotations by viewport")]
struct Args {
    /// Annotations API endpoint (default: ALLMAPS_ANNOTATIONS_URL or the public service)
    #[arg(long)]
    endpoint: Option<String>,

    /// JOSM remote control base URL (default: JOSM_URL or http://localhost:8111)
    #[arg(long)]
    josm_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch annotations intersecting a viewport and list them
    Fetch {
        /// Viewport: minLng,minLat,maxLng,maxLat
        #[arg(long)]
        bbox: String,

        /// Map zoom of the viewport; fetches at or below the minimum are skipped
        #[arg(long, default_value_t = 10.0)]
        zoom: f64,

        /// Max number of annotations
        #[arg(long)]
        limit: Option<u32>,

        /// Read the API response from a file instead of the network
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Load (or flip) the layers of these annotation ids after fetching
        #[arg(long)]
        toggle: Vec<String>,

        /// Print cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print tile and JOSM links for one annotation
    Links {
        /// Annotation id or annotation URL
        id: String,

        /// Layer bounds for the JOSM zoom link: minLng,minLat,maxLng,maxLat
        #[arg(long)]
        bbox: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = ViewerConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config.annotations_url = endpoint;
    }
    if let Some(josm_url) = args.josm_url {
        config.josm_url = josm_url;
    }

    match args.command {
        Command::Fetch {
            bbox,
            zoom,
            limit,
            from_file,
            toggle,
            json,
        } => {
            if let Some(limit) = limit {
                config.fetch_limit = limit;
            }
            let view = parse_bbox(&bbox)?;
            let ids = toggle
                .iter()
                .map(|s| AnnotationId::parse(s))
                .collect::<Result<Vec<_>, _>>()?;

            match from_file {
                Some(path) => {
                    let source = MemoryAnnotationSource::from_json(&fs::read(&path)?)?;
                    info!(path = %path.display(), "reading annotations from file");
                    fetch(config, source, view, zoom, &ids, json).await
                }
                None => {
                    let source = HttpAnnotationSource::new(config.annotations_url.clone());
                    info!(endpoint = source.endpoint(), "querying annotations API");
                    fetch(config, source, view, zoom, &ids, json).await
                }
            }
        }
        Command::Links { id, bbox } => {
            let id = AnnotationId::parse(&id)?;
            let tms_url = config.tile_template.for_annotation(&id);
            let josm = JosmLinks::new(&config.josm_url)?;
            println!("tiles:     {tms_url}");
            println!("josm tms:  {}", josm.imagery(id.as_str(), &tms_url)?);
            if let Some(bbox) = bbox {
                let bounds = parse_bbox(&bbox)?;
                println!("josm zoom: {}", josm.load_and_zoom(&bounds)?);
            }
            Ok(())
        }
    }
}

async fn fetch<A: AnnotationSource>(
    config: ViewerConfig,
    source: A,
    view: LngLatBounds,
    zoom: f64,
    toggle: &[AnnotationId],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ViewerSession::new(config, HeadlessMap::new(view, zoom), source);
    session.on_map_load()?;

    if !session.fetch().await? {
        warn!(zoom, "nothing fetched; zoom in further");
    }
    for id in toggle {
        match session.toggle(id) {
            Ok(visibility) => info!(%id, visibility = visibility.as_layout_value(), "toggled"),
            Err(err) => warn!(%id, "toggle failed: {err}"),
        }
    }

    let cards = session.cards();
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print!("{}", render_cards(&cards));
    }
    Ok(())
}
