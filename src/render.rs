//! Static gallery page generation.
//!
//! One self-contained `index.html`: styles and the viewer script are
//! inlined at compile time, so the site directory needs nothing beyond the
//! page itself and the generated image tree. The manifest path is injected
//! as a `data-manifest` attribute and fetched by the page at load.

use crate::config::GalleryConfig;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

static STYLE: &str = include_str!("../static/style.css");
static VIEWER: &str = include_str!("../static/lightbox.js");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The full gallery page.
pub fn index_page(manifest_path: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Photography" }
                style { (PreEscaped(STYLE)) }
            }
            body data-manifest=(manifest_path) {
                header .site-header {
                    h1 { "Photography" }
                }
                main #gallery-container .gallery {}
                p #gallery-error .gallery-error hidden {}
                div #lightbox .lightbox {
                    button .close-btn type="button" aria-label="Close" { "\u{00d7}" }
                    button #prev-btn .nav-btn type="button" aria-label="Previous image" { "\u{2039}" }
                    div .lightbox-content-wrapper {
                        img #lightbox-img alt="";
                        div .lightbox-info {
                            p #lightbox-caption {}
                            div #lightbox-metadata {}
                        }
                    }
                    button #next-btn .nav-btn type="button" aria-label="Next image" { "\u{203a}" }
                }
                script { (PreEscaped(VIEWER)) }
            }
        }
    }
}

/// Write `index.html` into the configured site directory.
pub fn write_site(config: &GalleryConfig) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(&config.site_dir)?;
    let page = index_page(&config.manifest_path.to_string_lossy());
    let path = config.site_dir.join("index.html");
    fs::write(&path, page.into_string())?;
    Ok(path)
}
