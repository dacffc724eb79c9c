//! Product categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a category slug is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid category: {0}")]
pub struct CategoryParseError(pub String);

/// One of the six fixed product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Protein,
    Vitamins,
    PreWorkout,
    PostWorkout,
    WeightManagement,
    HealthWellness,
}

impl Category {
    /// Every category, in catalogue order.
    pub const ALL: [Self; 6] = [
        Self::Protein,
        Self::Vitamins,
        Self::PreWorkout,
        Self::PostWorkout,
        Self::WeightManagement,
        Self::HealthWellness,
    ];

    /// URL slug (`pre-workout`).
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Vitamins => "vitamins",
            Self::PreWorkout => "pre-workout",
            Self::PostWorkout => "post-workout",
            Self::WeightManagement => "weight-management",
            Self::HealthWellness => "health-wellness",
        }
    }

    /// Display label: capitalised slug with the first hyphen as a space
    /// (`Pre workout`, `Health wellness`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Protein => "Protein",
            Self::Vitamins => "Vitamins",
            Self::PreWorkout => "Pre workout",
            Self::PostWorkout => "Post workout",
            Self::WeightManagement => "Weight management",
            Self::HealthWellness => "Health wellness",
        }
    }

    /// Shared marketing copy for every product in the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Protein => {
                "High-quality protein powder to support muscle growth and recovery. Perfect for post-workout shakes or meal replacement."
            }
            Self::Vitamins => {
                "Essential vitamins and minerals to support overall health and wellness. Formulated for optimal absorption."
            }
            Self::PreWorkout => {
                "Enhance your workout performance with this powerful pre-workout formula. Increases energy, focus, and endurance."
            }
            Self::PostWorkout => {
                "Accelerate recovery and reduce muscle soreness with this post-workout supplement. Supports muscle repair and growth."
            }
            Self::WeightManagement => {
                "Support your weight management goals with this scientifically-formulated supplement. Helps boost metabolism and control appetite."
            }
            Self::HealthWellness => {
                "Promote overall health and wellness with this premium supplement. Supports various aspects of your health journey."
            }
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}
