//! services/api/src/adapters/cover.rs
//!
//! Renders lesson covers as SVG data URLs.
//! It implements the `CoverService` port from the `core` crate.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use teachwave_core::{
    domain::CoverRequest,
    ports::{CoverService, PortResult},
};

/// The characters a URI component leaves unescaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const DATA_URL_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";
const DEFAULT_PALETTE: (&str, &str) = ("#6c00ff", "#00d4ff");

fn palette_for(subject: &str) -> (&'static str, &'static str) {
    match subject {
        "Math" => ("#4b00ff", "#00d4ff"),
        "Science" => ("#00b894", "#2d98da"),
        "English" => ("#6c5ce7", "#a29bfe"),
        "History" => ("#fdcb6e", "#e17055"),
        "Art" => ("#ff7675", "#fd79a8"),
        _ => DEFAULT_PALETTE,
    }
}

fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builds the cover SVG. `style` is accepted for forward compatibility; one layout exists.
pub fn render_cover_svg(request: &CoverRequest, year: i32) -> String {
    let (from, to) = palette_for(&request.subject);
    let topic = escape_markup(&request.topic);
    let subject = escape_markup(&request.subject);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="600">
  <defs>
    <linearGradient id="g" x1="0" x2="1">
      <stop offset="0" stop-color="{from}" />
      <stop offset="1" stop-color="{to}" />
    </linearGradient>
    <filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">
      <feDropShadow dx="0" dy="16" stdDeviation="30" flood-color="#000" flood-opacity="0.15"/>
    </filter>
  </defs>
  <rect width="100%" height="100%" fill="url(#g)"/>
  <g filter="url(#shadow)">
    <rect x="60" y="60" width="1080" height="480" rx="30" fill="white" opacity="0.06"/>
  </g>
  <g>
    <text x="120" y="200" font-size="60" font-family="Inter, Arial" fill="white" font-weight="700">{topic}</text>
    <text x="120" y="280" font-size="28" font-family="Inter, Arial" fill="white" opacity="0.9">{subject} • {year}</text>
  </g>
  <g transform="translate(820,340)">
    <circle cx="0" cy="0" r="68" fill="white" opacity="0.14"></circle>
    <text x="-40" y="12" font-size="24" font-family="Inter, Arial" fill="white">TeachWave</text>
  </g>
</svg>"##
    )
}

/// Wraps an SVG document into a self-contained data URL.
pub fn svg_data_url(svg: &str) -> String {
    format!("{}{}", DATA_URL_PREFIX, utf8_percent_encode(svg, URI_COMPONENT))
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Default)]
pub struct SvgCoverAdapter;

impl SvgCoverAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CoverService for SvgCoverAdapter {
    async fn generate_cover(&self, request: &CoverRequest) -> PortResult<String> {
        let svg = render_cover_svg(request, Utc::now().year());
        Ok(svg_data_url(&svg))
    }
}
