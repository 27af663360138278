use crate::config::SourceConfig;
use crate::error::AssetUnavailable;
use log::debug;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;

static COLOR_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:fill|stroke)="(#[0-9A-Fa-f]{6})""#).expect("color attribute pattern")
});

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#FFFFFF";
const GRAY: &str = "#777777";
const LIGHT_GRAY: &str = "#D3D3D3";
const NEUTRAL: [&str; 3] = [GRAY, BLACK, WHITE];

/// Three `#RRGGBB` colors, most prominent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub colors: [String; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Palette {
    pub fn neutral() -> Self {
        Self {
            colors: NEUTRAL.map(str::to_owned),
        }
    }

    pub fn from_svg(svg: &str) -> Self {
        Self {
            colors: extract_colors(svg),
        }
    }

    pub fn primary(&self) -> &str {
        &self.colors[0]
    }

    /// Same colors with pure white swapped for light gray, so no series
    /// disappears against a light background.
    pub fn chart_colors(&self) -> [String; 3] {
        self.colors.clone().map(|c| {
            if c.eq_ignore_ascii_case(WHITE) {
                LIGHT_GRAY.to_owned()
            } else {
                c
            }
        })
    }
}

/// The three most frequent fill/stroke colors, padded to three.
///
/// Fewer than two found: append black, then white. Exactly two: append white
/// unless present, else black, else the neutral triple. Ties keep document order.
pub fn extract_colors(svg: &str) -> [String; 3] {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for caps in COLOR_ATTR.captures_iter(svg) {
        let color = caps[1].to_ascii_uppercase();
        match counts.iter_mut().find(|(c, _)| *c == color) {
            Some((_, n)) => *n += 1,
            None => counts.push((color, 1)),
        }
    }
    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut colors: Vec<String> = counts.into_iter().take(3).map(|(c, _)| c).collect();
    if colors.len() < 2 {
        colors.push(BLACK.to_owned());
        colors.push(WHITE.to_owned());
    }
    if colors.len() < 3 {
        if !colors.iter().any(|c| c == WHITE) {
            colors.push(WHITE.to_owned());
        } else if !colors.iter().any(|c| c == BLACK) {
            colors.push(BLACK.to_owned());
        } else {
            return NEUTRAL.map(str::to_owned);
        }
    }
    [colors[0].clone(), colors[1].clone(), colors[2].clone()]
}

/// `#RRGGBB` → `(r, g, b)`.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Clone)]
pub struct BrandingClient {
    client: Client,
    base: String,
    timeout: Duration,
}

impl BrandingClient {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.as_str())
                .build()
                .unwrap_or_default(),
            base: config.logo_url.trim_end_matches('/').to_owned(),
            timeout: config.timeout,
        }
    }

    pub async fn fetch_palette(&self, team_id: u32) -> Result<Palette, AssetUnavailable> {
        let url = format!("{}/team-logos/team-cap-on-light/{team_id}.svg", self.base);
        debug!("GET {url}");
        let request_err = |source| AssetUnavailable::Request {
            url: url.clone(),
            source,
        };
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(request_err)?;
        if !response.status().is_success() {
            return Err(AssetUnavailable::Status {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }
        let svg = response.text().await.map_err(request_err)?;
        Ok(Palette::from_svg(&svg))
    }
}
