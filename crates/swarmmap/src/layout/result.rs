//! The assembled output of a layout run.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use swarmmap_core::identifier::Id;

use crate::layout::{edges::Edge, entity::PlacedEntity};

/// Placed entities and edges of one cluster diagram.
///
/// Serializes to a JSON document with `entities`, `edges`, `totalWidth` and
/// `totalHeight`; entities keep their placement order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult<'a> {
    #[serde(serialize_with = "serialize_entities")]
    entities: IndexMap<Id, PlacedEntity<'a>>,
    edges: Vec<Edge>,
    total_width: f32,
    total_height: f32,
}

impl<'a> LayoutResult<'a> {
    pub(crate) fn new(
        entities: impl IntoIterator<Item = PlacedEntity<'a>>,
        edges: Vec<Edge>,
        total_width: f32,
        total_height: f32,
    ) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|entity| (entity.id(), entity))
                .collect(),
            edges,
            total_width,
            total_height,
        }
    }

    /// Looks a placed entity up by its identifier.
    pub fn entity(&self, id: impl Into<Id>) -> Option<&PlacedEntity<'a>> {
        self.entities.get(&id.into())
    }

    /// Placed entities in placement order.
    pub fn entities(&self) -> impl ExactSizeIterator<Item = &PlacedEntity<'a>> {
        self.entities.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    pub fn total_height(&self) -> f32 {
        self.total_height
    }

    /// Returns `true` if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn serialize_entities<S: Serializer>(
    entities: &IndexMap<Id, PlacedEntity<'_>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(entities.values())
}
