use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use procura_core::geo::CountryPolygon;

#[derive(Debug, Error)]
pub enum GeographyError {
    #[error("could not build geography client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("geography request to `{url}` failed: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("geography source `{url}` returned status {status}")]
    Status { url: String, status: u16 },
    #[error("geography payload is not usable: {0}")]
    Payload(String),
    #[error("geography source is disabled")]
    Disabled,
}

/// Supplier of country polygons for the choropleth view.
#[async_trait]
pub trait GeographySource: Send + Sync {
    async fn fetch_polygons(&self) -> Result<Vec<CountryPolygon>, GeographyError>;
}

pub struct HttpGeographySource {
    client: reqwest::Client,
    url: String,
}

impl HttpGeographySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GeographyError> {
        let client =
            reqwest::Client::builder().timeout(timeout).build().map_err(GeographyError::Client)?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl GeographySource for HttpGeographySource {
    async fn fetch_polygons(&self) -> Result<Vec<CountryPolygon>, GeographyError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| GeographyError::Request { url: self.url.clone(), source })?;

        if !response.status().is_success() {
            return Err(GeographyError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|source| GeographyError::Request { url: self.url.clone(), source })?;
        let polygons = parse_polygons(payload)?;

        debug!(
            event_name = "geo.fetch.loaded",
            url = %self.url,
            polygons = polygons.len(),
            "country polygons loaded"
        );
        Ok(polygons)
    }
}

/// Tries `primary`, then `fallback` once. No further retries.
pub struct FallbackGeography<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackGeography<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl FallbackGeography<HttpGeographySource, HttpGeographySource> {
    pub fn http(
        primary_url: &str,
        fallback_url: &str,
        timeout: Duration,
    ) -> Result<Self, GeographyError> {
        Ok(Self::new(
            HttpGeographySource::new(primary_url, timeout)?,
            HttpGeographySource::new(fallback_url, timeout)?,
        ))
    }
}

#[async_trait]
impl<P, F> GeographySource for FallbackGeography<P, F>
where
    P: GeographySource,
    F: GeographySource,
{
    async fn fetch_polygons(&self) -> Result<Vec<CountryPolygon>, GeographyError> {
        match self.primary.fetch_polygons().await {
            Ok(polygons) => Ok(polygons),
            Err(primary_error) => {
                warn!(
                    event_name = "geo.fetch.fallback",
                    error = %primary_error,
                    "primary geography source failed; trying fallback mirror"
                );
                self.fallback.fetch_polygons().await
            }
        }
    }
}

/// Offline stand-in. Every fetch fails, so views carry no polygons.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledGeography;

#[async_trait]
impl GeographySource for DisabledGeography {
    async fn fetch_polygons(&self) -> Result<Vec<CountryPolygon>, GeographyError> {
        Err(GeographyError::Disabled)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeographyPayload {
    Topology {
        objects: HashMap<String, TopologyCollection>,
        #[serde(default)]
        arcs: Vec<Vec<Vec<f64>>>,
        #[serde(default)]
        transform: Option<TopologyTransform>,
    },
    FeatureCollection {
        features: Vec<CountryPolygon>,
    },
}

#[derive(Deserialize)]
struct TopologyCollection {
    #[serde(default)]
    geometries: Vec<TopologyGeometry>,
}

#[derive(Deserialize)]
struct TopologyGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    arcs: Value,
    #[serde(default)]
    coordinates: Value,
}

#[derive(Clone, Copy, Deserialize)]
struct TopologyTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

impl TopologyTransform {
    fn apply(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [x * self.scale[0] + self.translate[0], y * self.scale[1] + self.translate[1]]
    }
}

/// Shared arcs of a topology, decoded to absolute positions.
struct ArcTable {
    arcs: Vec<Vec<[f64; 2]>>,
    transform: Option<TopologyTransform>,
}

impl ArcTable {
    fn new(raw: Vec<Vec<Vec<f64>>>, transform: Option<TopologyTransform>) -> Self {
        let arcs = raw
            .into_iter()
            .map(|arc| {
                let positions = arc.into_iter().map(|point| position(&point));
                match transform {
                    // quantized arcs are delta-encoded
                    Some(transform) => {
                        let mut cursor = [0.0, 0.0];
                        positions
                            .map(|[dx, dy]| {
                                cursor = [cursor[0] + dx, cursor[1] + dy];
                                transform.apply(cursor)
                            })
                            .collect::<Vec<_>>()
                    }
                    None => positions.collect::<Vec<_>>(),
                }
            })
            .collect();
        Self { arcs, transform }
    }

    fn arc(&self, index: i64) -> Result<Vec<[f64; 2]>, GeographyError> {
        let (position, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let mut points = usize::try_from(position)
            .ok()
            .and_then(|position| self.arcs.get(position))
            .cloned()
            .ok_or_else(|| GeographyError::Payload(format!("arc index {index} is out of range")))?;
        if reversed {
            points.reverse();
        }
        Ok(points)
    }

    /// Joins arcs end to start; consecutive arcs share their junction point.
    fn line(&self, indices: &[i64]) -> Result<Vec<[f64; 2]>, GeographyError> {
        let mut points: Vec<[f64; 2]> = Vec::new();
        for index in indices {
            points.pop();
            points.extend(self.arc(*index)?);
        }
        Ok(points)
    }

    fn ring(&self, indices: &[i64]) -> Result<Vec<[f64; 2]>, GeographyError> {
        let mut points = self.line(indices)?;
        if let Some(first) = points.first().copied() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn rings(&self, rings: &[Vec<i64>]) -> Result<Vec<Vec<[f64; 2]>>, GeographyError> {
        rings.iter().map(|ring| self.ring(ring)).collect()
    }

    fn point(&self, coordinates: &[f64]) -> [f64; 2] {
        let point = position(coordinates);
        self.transform.map_or(point, |transform| transform.apply(point))
    }

    /// GeoJSON geometry for a topology geometry. Unsupported or empty
    /// geometries become `null`.
    fn geometry(&self, geometry: &TopologyGeometry) -> Result<Value, GeographyError> {
        let kind = geometry.kind.as_deref().unwrap_or_default();
        let coordinates = match kind {
            "Polygon" => {
                let rings = indices::<Vec<Vec<i64>>>(&geometry.arcs)?;
                to_json(self.rings(&rings)?)?
            }
            "MultiPolygon" => {
                let polygons = indices::<Vec<Vec<Vec<i64>>>>(&geometry.arcs)?;
                let polygons = polygons
                    .iter()
                    .map(|polygon| self.rings(polygon))
                    .collect::<Result<Vec<_>, _>>()?;
                to_json(polygons)?
            }
            "LineString" => to_json(self.line(&indices::<Vec<i64>>(&geometry.arcs)?)?)?,
            "MultiLineString" => {
                let lines = indices::<Vec<Vec<i64>>>(&geometry.arcs)?;
                to_json(lines.iter().map(|line| self.line(line)).collect::<Result<Vec<_>, _>>()?)?
            }
            "Point" => to_json(self.point(&indices::<Vec<f64>>(&geometry.coordinates)?))?,
            "MultiPoint" => {
                let points = indices::<Vec<Vec<f64>>>(&geometry.coordinates)?;
                to_json(points.iter().map(|point| self.point(point)).collect::<Vec<_>>())?
            }
            _ => return Ok(Value::Null),
        };
        Ok(json!({ "type": kind, "coordinates": coordinates }))
    }
}

fn position(coordinates: &[f64]) -> [f64; 2] {
    [
        coordinates.first().copied().unwrap_or_default(),
        coordinates.get(1).copied().unwrap_or_default(),
    ]
}

fn to_json<T: Serialize>(value: T) -> Result<Value, GeographyError> {
    serde_json::to_value(value).map_err(|error| GeographyError::Payload(error.to_string()))
}

fn indices<T: DeserializeOwned>(value: &Value) -> Result<T, GeographyError> {
    T::deserialize(value).map_err(|error| GeographyError::Payload(error.to_string()))
}

/// Reads polygons from a TopoJSON topology (`objects.countries`) or a GeoJSON
/// FeatureCollection. Topology geometries are decoded against the shared arcs
/// into standalone GeoJSON geometries.
pub fn parse_polygons(payload: Value) -> Result<Vec<CountryPolygon>, GeographyError> {
    let payload = serde_json::from_value::<GeographyPayload>(payload)
        .map_err(|error| GeographyError::Payload(error.to_string()))?;

    match payload {
        GeographyPayload::FeatureCollection { features } => Ok(features),
        GeographyPayload::Topology { mut objects, arcs, transform } => {
            let countries = objects.remove("countries").ok_or_else(|| {
                GeographyError::Payload("topology has no `countries` object".to_string())
            })?;
            let table = ArcTable::new(arcs, transform);
            countries
                .geometries
                .into_iter()
                .map(|geometry| {
                    Ok::<_, GeographyError>(CountryPolygon {
                        geometry: table.geometry(&geometry)?,
                        id: geometry.id,
                        properties: geometry.properties,
                    })
                })
                .collect()
        }
    }
}
