//! Shape-count complexity assessment

use chocomold_core::ShapeSet;
use chocomold_settings::PatternSettings;
use serde::{Deserialize, Serialize};

/// How risky a shape set is for the solid booleans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Complexity {
    Simple { count: usize },
    /// Above the soft limit; the caller should confirm before building
    NeedsConfirmation { count: usize },
    /// Above the hard ceiling; the builder will return the bare base
    Exceeded { count: usize },
}

impl Complexity {
    pub fn count(&self) -> usize {
        match self {
            Self::Simple { count } | Self::NeedsConfirmation { count } | Self::Exceeded { count } => {
                *count
            }
        }
    }

    pub fn needs_confirmation(&self) -> bool {
        !matches!(self, Self::Simple { .. })
    }
}

/// Classify a shape set by its engrave + mask polygon count
pub fn assess_complexity(shapes: &ShapeSet, settings: &PatternSettings) -> Complexity {
    let count = shapes.total_count();
    if count > settings.hard_shape_limit {
        Complexity::Exceeded { count }
    } else if count > settings.soft_shape_limit {
        Complexity::NeedsConfirmation { count }
    } else {
        Complexity::Simple { count }
    }
}
