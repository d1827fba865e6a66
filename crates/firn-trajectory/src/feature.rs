//! Vector features: seed geometries with attribute maps.

use std::fmt;

use firn_core::Point;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::TrajectoryError;

/// One attribute value carried by a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Integer attribute (ids, counts).
    Int(i64),
    /// Floating-point attribute.
    Float(f64),
    /// Text attribute (names, labels).
    Text(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Insertion-ordered attribute map, so attribute columns come out of a
/// sweep in a stable order.
pub type AttrMap = IndexMap<String, AttrValue>;

/// A point or polyline feature in the working coordinate system.
///
/// Every vertex seeds one trajectory; a point feature has a single
/// vertex. Geometries arrive already reprojected; coordinate
/// transforms belong to the I/O collaborator that read the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    vertices: SmallVec<[Point; 4]>,
    attributes: AttrMap,
}

impl Feature {
    /// Build a feature from its vertices and attributes.
    pub fn new(vertices: impl IntoIterator<Item = Point>, attributes: AttrMap) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
            attributes,
        }
    }

    /// The seed vertices, in source order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The feature's attributes.
    pub fn attributes(&self) -> &AttrMap {
        &self.attributes
    }

    /// Split the feature into its vertices and attributes.
    pub fn into_parts(self) -> (SmallVec<[Point; 4]>, AttrMap) {
        (self.vertices, self.attributes)
    }
}

/// A source of seed features for a perturbation sweep.
///
/// `load` is called once per perturbation evaluation, by the worker
/// running it: underlying dataset handles are generally not safe to
/// share across threads, so implementations open their own handle per
/// call instead of caching one.
pub trait FeatureSource: Send + Sync {
    /// Deliver all features, reprojected to the working coordinate
    /// system.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::Source`] when the underlying dataset
    /// cannot be read.
    fn load(&self) -> Result<Vec<Feature>, TrajectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    #[test]
    fn attribute_order_is_preserved() {
        let attrs: AttrMap = indexmap! {
            "name".to_string() => AttrValue::Text("Sermeq Kujalleq".to_string()),
            "basin".to_string() => AttrValue::Int(12),
            "obs_speed".to_string() => AttrValue::Float(12_000.5),
        };
        let feature = Feature::new([Point::new(0.0, 0.0)], attrs);
        let keys: Vec<&str> = feature.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "basin", "obs_speed"]);
    }

    #[test]
    fn into_parts_round_trips() {
        let feature = Feature::new(
            [Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            AttrMap::new(),
        );
        let (vertices, attributes) = feature.into_parts();
        assert_eq!(vertices.len(), 2);
        assert!(attributes.is_empty());
    }
}
