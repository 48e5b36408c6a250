use serde::{Deserialize, Serialize};

/// A map/slice of the world. Caches are only discovered by observers that share
/// their region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u16);

/// Tile coordinate in the world grid. `y` is the terrain height the tile was
/// snapped to when it was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in world units, heights included.
    pub fn distance_to(self, other: TilePos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Clamp both horizontal axes into [-radius + 1, radius - 1].
    pub fn clamped(self, radius: i32) -> Self {
        let limit = radius.max(1) - 1;
        Self {
            x: self.x.clamp(-limit, limit),
            y: self.y,
            z: self.z.clamp(-limit, limit),
        }
    }
}

/// Axis-aligned rectangular zone on the ground plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub x1: i32,
    pub z1: i32,
    pub x2: i32,
    pub z2: i32,
}

impl Zone {
    pub fn new(name: impl Into<String>, x1: i32, z1: i32, x2: i32, z2: i32) -> Self {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (z1, z2) = if z1 <= z2 { (z1, z2) } else { (z2, z1) };
        Zone {
            name: name.into(),
            x1,
            z1,
            x2,
            z2,
        }
    }

    pub fn contains(&self, position: TilePos) -> bool {
        position.x >= self.x1
            && position.x <= self.x2
            && position.z >= self.z1
            && position.z <= self.z2
    }
}
