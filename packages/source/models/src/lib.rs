#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared transit layer domain types and the geometric feature model.
//!
//! Every GIS endpoint produces a [`RawFeatureCollection`] after parsing,
//! and the normalizer in `transit_map_source` converts that into a
//! [`NormalizedFeatureCollection`] of uniform [`FeatureGeometry`] values.

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Attribute record for one feature: field name to scalar JSON value.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// One multi-part line geometry as delivered by the API:
/// part index × vertex index × coordinate dimension.
///
/// Only part 0 is used during normalization; vertices may carry more than
/// two dimensions (measure/elevation values), which are ignored.
pub type RawPath = Vec<Vec<Vec<f64>>>;

/// The transit mode a layer belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransitMode {
    /// Heavy and light rail rapid transit
    RapidTransit,
    /// Commuter rail
    CommuterRail,
    /// Bus network
    Bus,
    /// Ferry routes
    Ferry,
    /// Everything else (trolleys, shuttles, seasonal services)
    Other,
}

/// Whether a layer carries stop features or route features.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    /// Station / stop locations (point geometry)
    Stops,
    /// Route alignments (path geometry)
    Routes,
}

/// The geometry encoding an endpoint delivers.
///
/// Declared explicitly in each endpoint's config rather than inferred,
/// so point data can never be fed through the path branch or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeometryKind {
    /// Bare x/y coordinate pair per feature
    Point,
    /// Nested multi-part path array per feature
    Path,
}

/// Geometry records from a raw API response, one entry per feature,
/// position-correlated with the attribute records.
///
/// Each variant carries only the fields relevant to its encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometrySet {
    /// Parallel x and y coordinate sequences. A `None` marks a feature
    /// whose geometry object was missing the field entirely.
    Points {
        /// X coordinates (longitude in the fixed spatial reference).
        x: Vec<Option<f64>>,
        /// Y coordinates (latitude in the fixed spatial reference).
        y: Vec<Option<f64>>,
    },
    /// One [`RawPath`] per feature.
    Paths(Vec<RawPath>),
}

impl RawGeometrySet {
    /// Number of geometry records in the set.
    ///
    /// For point sets this is the length of the x sequence; the normalizer
    /// separately enforces that x and y have equal length.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Points { x, .. } => x.len(),
            Self::Paths(paths) => paths.len(),
        }
    }

    /// Returns `true` if the set contains no geometry records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The encoding this set carries.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Points { .. } => GeometryKind::Point,
            Self::Paths(_) => GeometryKind::Path,
        }
    }
}

/// An unprocessed API response: parallel attribute and geometry records.
///
/// Positional alignment is the invariant — attribute record `i` belongs to
/// geometry record `i`. The normalizer rejects collections where the two
/// sides disagree on length.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeatureCollection {
    /// One attribute record per feature, in response order.
    pub attributes: Vec<Attributes>,
    /// One geometry record per feature, in response order.
    pub geometry: RawGeometrySet,
}

/// A well-formed geometry value for one normalized feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// A single coordinate pair.
    Point(Point<f64>),
    /// An ordered sequence of two or more vertices.
    Line(LineString<f64>),
}

/// One attribute record joined to exactly one geometry value.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeature {
    /// Attribute fields, preserved verbatim from the raw record.
    pub attributes: Attributes,
    /// The feature's geometry.
    pub geometry: FeatureGeometry,
}

/// Ordered sequence of normalized features, preserving the raw
/// attribute/geometry pairing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFeatureCollection {
    /// The features, in raw response order.
    pub features: Vec<NormalizedFeature>,
}

impl NormalizedFeatureCollection {
    /// Number of features in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the collection contains no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
