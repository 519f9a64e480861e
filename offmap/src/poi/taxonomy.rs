//! Closed attraction taxonomy.
//!
//! Every feature ends up as exactly one [`PoiType`], and every type belongs to
//! exactly one [`Category`]. Anything the rules do not recognise is
//! `PoiType::Other` / `Category::Other`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fine-grained feature type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    Museum,
    Attraction,
    Viewpoint,
    Historic,
    Park,
    Garden,
    Theatre,
    Cinema,
    ArtsCentre,
    PlaceOfWorship,
    Marketplace,
    Mall,
    Station,
    FerryTerminal,
    Restaurant,
    Cafe,
    Other,
}

impl PoiType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Museum => "museum",
            Self::Attraction => "attraction",
            Self::Viewpoint => "viewpoint",
            Self::Historic => "historic",
            Self::Park => "park",
            Self::Garden => "garden",
            Self::Theatre => "theatre",
            Self::Cinema => "cinema",
            Self::ArtsCentre => "arts_centre",
            Self::PlaceOfWorship => "place_of_worship",
            Self::Marketplace => "marketplace",
            Self::Mall => "mall",
            Self::Station => "station",
            Self::FerryTerminal => "ferry_terminal",
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Other => "other",
        }
    }

    /// The category this type belongs to.
    pub fn category(self) -> Category {
        match self {
            Self::Museum | Self::ArtsCentre => Category::Culture,
            Self::Attraction | Self::Viewpoint => Category::Sights,
            Self::Historic => Category::History,
            Self::Park | Self::Garden => Category::Nature,
            Self::Theatre | Self::Cinema => Category::Entertainment,
            Self::PlaceOfWorship => Category::Religion,
            Self::Marketplace | Self::Mall => Category::Shopping,
            Self::Station | Self::FerryTerminal => Category::Transport,
            Self::Restaurant | Self::Cafe => Category::FoodAndDrink,
            Self::Other => Category::Other,
        }
    }
}

impl fmt::Display for PoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse attraction category; one partition file per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Culture,
    Sights,
    History,
    Nature,
    Entertainment,
    Religion,
    Shopping,
    Transport,
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Culture,
        Category::Sights,
        Category::History,
        Category::Nature,
        Category::Entertainment,
        Category::Religion,
        Category::Shopping,
        Category::Transport,
        Category::FoodAndDrink,
        Category::Other,
    ];

    /// Display name, as stored in the catalog.
    pub fn name(self) -> &'static str {
        match self {
            Self::Culture => "Culture",
            Self::Sights => "Sights",
            Self::History => "History",
            Self::Nature => "Nature",
            Self::Entertainment => "Entertainment",
            Self::Religion => "Religion",
            Self::Shopping => "Shopping",
            Self::Transport => "Transport",
            Self::FoodAndDrink => "Food & Drink",
            Self::Other => "Other",
        }
    }

    /// File-name slug: lowercase name with spaces replaced by underscores.
    ///
    /// Other characters are kept, so Food & Drink is stored as
    /// `food_&_drink.json`; quote the name in a shell.
    pub fn slug(self) -> String {
        self.name().to_lowercase().replace(' ', "_")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the display name or the slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name().to_lowercase() == needle || c.slug() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
