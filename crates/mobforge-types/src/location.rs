//! Locations and cuboid regions.
//!
//! Locations are stored in configuration as `x,y,z,world` or
//! `x,y,z,yaw,pitch,world`. Regions are the inclusive block cuboid
//! spanned by two corner locations in the same world.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LocationError;

/// A point in a named world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Block coordinates containing this point.
    pub fn block(&self) -> (i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        )
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let (coords, angles, world) = match parts.len() {
            4 => (&parts[0..3], None, parts[3]),
            6 => (&parts[0..3], Some(&parts[3..5]), parts[5]),
            n => return Err(LocationError::WrongArity(n)),
        };
        if world.is_empty() {
            return Err(LocationError::MissingWorld);
        }

        let num = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| LocationError::InvalidNumber(v.to_string()))
        };
        let (yaw, pitch) = match angles {
            Some(a) => (num(a[0])? as f32, num(a[1])? as f32),
            None => (0.0, 0.0),
        };

        Ok(Self {
            world: world.to_string(),
            x: num(coords[0])?,
            y: num(coords[1])?,
            z: num(coords[2])?,
            yaw,
            pitch,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.x, self.y, self.z, self.yaw, self.pitch, self.world
        )
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// An inclusive block cuboid in a single world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    world: String,
    min: (i64, i64, i64),
    max: (i64, i64, i64),
}

impl Region {
    /// Builds the cuboid spanned by two corners.
    ///
    /// Returns `None` if the corners are in different worlds.
    pub fn from_corners(p1: &Location, p2: &Location) -> Option<Self> {
        if p1.world != p2.world {
            return None;
        }
        let (a, b) = (p1.block(), p2.block());
        Some(Self {
            world: p1.world.clone(),
            min: (a.0.min(b.0), a.1.min(b.1), a.2.min(b.2)),
            max: (a.0.max(b.0), a.1.max(b.1), a.2.max(b.2)),
        })
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    /// Returns `true` if `loc` is in this region's world and inside its
    /// bounds (inclusive on both corners).
    pub fn contains(&self, loc: &Location) -> bool {
        if loc.world != self.world {
            return false;
        }
        let (x, y, z) = loc.block();
        (self.min.0..=self.max.0).contains(&x)
            && (self.min.1..=self.max.1).contains(&y)
            && (self.min.2..=self.max.2).contains(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_parts() {
        let loc: Location = "1.5,64,-3,world".parse().unwrap();
        assert_eq!(loc.world, "world");
        assert_eq!(loc.x, 1.5);
        assert_eq!(loc.z, -3.0);
        assert_eq!(loc.yaw, 0.0);
    }

    #[test]
    fn test_parse_six_parts_reads_angles() {
        let loc: Location = "0,70,0,90,-10,nether".parse().unwrap();
        assert_eq!(loc.world, "nether");
        assert_eq!(loc.yaw, 90.0);
        assert_eq!(loc.pitch, -10.0);
    }

    #[test]
    fn test_parse_wrong_arity_fails() {
        let err = "1,2,world".parse::<Location>().unwrap_err();
        assert_eq!(err, LocationError::WrongArity(3));
    }

    #[test]
    fn test_parse_bad_number_fails() {
        let err = "a,2,3,world".parse::<Location>().unwrap_err();
        assert!(matches!(err, LocationError::InvalidNumber(_)));
    }

    #[test]
    fn test_parse_empty_world_fails() {
        let err = "1,2,3, ".parse::<Location>().unwrap_err();
        assert_eq!(err, LocationError::MissingWorld);
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        let loc = Location::new("world", 10.0, 65.0, -4.0);
        let back: Location = loc.to_string().parse().unwrap();
        assert_eq!(back, loc);
    }

    #[test]
    fn test_region_contains_is_inclusive() {
        let region = Region::from_corners(
            &Location::new("world", 10.0, 60.0, 10.0),
            &Location::new("world", 0.0, 70.0, 0.0),
        )
        .unwrap();

        assert!(region.contains(&Location::new("world", 0.0, 60.0, 0.0)));
        assert!(region.contains(&Location::new("world", 10.9, 70.5, 10.2)));
        assert!(!region.contains(&Location::new("world", 11.0, 65.0, 5.0)));
        assert!(!region.contains(&Location::new("nether", 5.0, 65.0, 5.0)));
    }

    #[test]
    fn test_region_corners_in_different_worlds_is_none() {
        let region = Region::from_corners(
            &Location::new("world", 0.0, 0.0, 0.0),
            &Location::new("nether", 1.0, 1.0, 1.0),
        );
        assert!(region.is_none());
    }
}
