use enum_map::{Enum, EnumMap};

/// Identity of a grid cell.
///
/// `OutOfBounds` is a sentinel: it is never stored in a map, only returned
/// by reads outside of it. Serialized as its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "i32", try_from = "i32")
)]
pub enum TileId {
    OutOfBounds,
    #[default]
    Empty,
    Wall,
    Marker,
    Orb,
}

impl TileId {
    pub fn id(self) -> i32 {
        match self {
            TileId::OutOfBounds => -1,
            TileId::Empty => 0,
            TileId::Wall => 1,
            TileId::Marker => 2,
            TileId::Orb => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            -1 => Some(TileId::OutOfBounds),
            0 => Some(TileId::Empty),
            1 => Some(TileId::Wall),
            2 => Some(TileId::Marker),
            3 => Some(TileId::Orb),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            TileId::OutOfBounds => '?',
            TileId::Empty => '.',
            TileId::Wall => '#',
            TileId::Marker => 'x',
            TileId::Orb => 'o',
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, TileId::Wall)
    }
}

impl From<TileId> for i32 {
    fn from(id: TileId) -> Self {
        id.id()
    }
}

impl TryFrom<i32> for TileId {
    type Error = String;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        TileId::from_id(id).ok_or(format!("invalid tile id: {}", id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    None,
    Full,
}

/// Walls and everything past the map edge block movement.
pub fn default_collision(id: TileId) -> CollisionType {
    match id {
        TileId::Wall | TileId::OutOfBounds => CollisionType::Full,
        TileId::Empty | TileId::Marker | TileId::Orb => CollisionType::None,
    }
}

/// Opaque handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Texture layers drawn for one tile identity, bottom layer first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualTile {
    pub layers: Vec<TextureId>,
}

impl VisualTile {
    pub fn new(layers: Vec<TextureId>) -> Self {
        Self { layers }
    }
}

pub type Theme = EnumMap<TileId, VisualTile>;
