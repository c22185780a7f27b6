use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the character spends their days. Dangerous places invite trouble.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Location {
    #[default]
    SmallTown,
    LargeCity,
    SmallPond,
    Forest,
    Mountains,
    Desert,
    Jungle,
    Ocean,
}

impl Location {
    pub fn all() -> [Location; 8] {
        [
            Location::SmallTown,
            Location::LargeCity,
            Location::SmallPond,
            Location::Forest,
            Location::Mountains,
            Location::Desert,
            Location::Jungle,
            Location::Ocean,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Location::SmallTown => "small town",
            Location::LargeCity => "large city",
            Location::SmallPond => "small pond",
            Location::Forest => "forest",
            Location::Mountains => "mountains",
            Location::Desert => "desert",
            Location::Jungle => "jungle",
            Location::Ocean => "ocean",
        }
    }

    pub fn is_dangerous(&self) -> bool {
        !matches!(self, Location::SmallTown | Location::LargeCity)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location '{0}'")]
pub struct UnknownLocation(pub String);

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', '-'], " ");
        Location::all()
            .into_iter()
            .find(|l| l.name() == wanted)
            .ok_or_else(|| UnknownLocation(s.to_string()))
    }
}
