//! Placed entities: a cluster record together with its absolute geometry.

use serde::{Serialize, Serializer, ser::SerializeStruct};

use swarmmap_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    topology::{ContainerRecord, HostRecord, NetworkRecord},
};

use crate::layout::planner::Layer;

/// Class of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Host,
    Container,
    Network,
}

/// The record a placed entity was derived from.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Host(&'a HostRecord),
    Container {
        record: &'a ContainerRecord,
        /// Host the container was grouped under.
        host: Id,
    },
    Network {
        record: &'a NetworkRecord,
        layer: Layer,
    },
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Host(_) => EntityKind::Host,
            Self::Container { .. } => EntityKind::Container,
            Self::Network { .. } => EntityKind::Network,
        }
    }

    /// The layer the entity sits in.
    pub fn layer(&self) -> Layer {
        match self {
            Self::Host(_) => Layer::Hosts,
            Self::Container { .. } => Layer::Containers,
            Self::Network { layer, .. } => *layer,
        }
    }
}

/// An entity with absolute position and size.
#[derive(Debug, Clone)]
pub struct PlacedEntity<'a> {
    id: Id,
    bounds: Bounds,
    record: EntityRef<'a>,
}

impl<'a> PlacedEntity<'a> {
    pub fn new(id: Id, top_left: Point, size: Size, record: EntityRef<'a>) -> Self {
        Self {
            id,
            bounds: Bounds::new_from_top_left(top_left, size),
            record,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.record.kind()
    }

    pub fn layer(&self) -> Layer {
        self.record.layer()
    }

    pub fn record(&self) -> EntityRef<'a> {
        self.record
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn x(&self) -> f32 {
        self.bounds.min_x()
    }

    pub fn y(&self) -> f32 {
        self.bounds.min_y()
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// Horizontal center of the entity.
    pub fn center_x(&self) -> f32 {
        self.bounds.center().x()
    }
}

impl Serialize for PlacedEntity<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PlacedEntity", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("layer", &self.layer())?;
        state.serialize_field("x", &self.x())?;
        state.serialize_field("y", &self.y())?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        if let EntityRef::Container { host, .. } = self.record {
            state.serialize_field("host", &host)?;
        } else {
            state.skip_field("host")?;
        }
        match self.record {
            EntityRef::Host(record) => state.serialize_field("ref", record)?,
            EntityRef::Container { record, .. } => state.serialize_field("ref", record)?,
            EntityRef::Network { record, .. } => state.serialize_field("ref", record)?,
        }
        state.end()
    }
}
