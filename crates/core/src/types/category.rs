//! Categorical fields for equipment and beans.
//!
//! Each enum serializes to the same human-readable label it displays as, so
//! form values, templates and logs all agree on one spelling.

use serde::{Deserialize, Serialize};

/// Error returned when a category label is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseCategoryError {
    /// Which category was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(ParseCategoryError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

labeled_enum! {
    /// How an espresso machine is operated.
    MachineType, "machine type" {
        /// Lever or otherwise hand-driven.
        Manual => "Manual",
        /// Pump-driven, shot started and stopped by hand.
        SemiAutomatic => "Semi-automatic",
        /// Volumetric or timed shots.
        Automatic => "Automatic",
        /// Built-in grinder, bean-to-cup.
        SuperAutomatic => "Super-automatic",
    }
}

labeled_enum! {
    /// Green coffee processing method.
    ProcessType, "process type" {
        Washed => "Washed",
        Natural => "Natural",
        Honey => "Honey",
        Anaerobic => "Anaerobic",
        SemiWashed => "Semi-washed",
        WetHulled => "Wet-hulled",
    }
}

labeled_enum! {
    /// Roast development, lightest first.
    RoastLevel, "roast level" {
        Light => "Light",
        MediumLight => "Medium-Light",
        Medium => "Medium",
        MediumDark => "Medium-Dark",
        Dark => "Dark",
    }
}
