//! Shared domain types for the prescription-to-reminder flow.
//!
//! The enums mirror the recognition service's structured-output schema,
//! so their wire strings are fixed: the service emits exactly these
//! values and the reminder service stores them verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Frequency {
    Everyday => "everyday",
    Alternate => "alternate",
});

str_enum!(DaySlot {
    Morning => "morning",
    Noon => "noon",
    Evening => "evening",
    Night => "night",
});

str_enum!(FoodRelationship {
    BeforeFood => "before_food",
    AfterFood => "after_food",
});

// ═══════════════════════════════════════════
// Medication — immutable upstream record
// ═══════════════════════════════════════════

/// One medication as extracted from the prescription image.
///
/// Produced by the recognition service and never edited afterwards; the
/// user only attaches schedule choices to it. The upstream service
/// assigns no identifier, so a medication is identified by its position
/// in the extracted list for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub medicine_name: String,
    pub time_of_day: DaySlot,
    pub number_of_days: u32,
    pub food_relationship: FoodRelationship,
    #[serde(deserialize_with = "deserialize_flexible_dosage")]
    pub dosage: String,
}

/// Custom deserializer for dosage values. The recognition schema
/// declares dosage as an integer while the submission contract treats
/// it as opaque text; accept both shapes and normalize to a string.
fn deserialize_flexible_dosage<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct FlexibleDosage;

    impl<'de> de::Visitor<'de> for FlexibleDosage {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a dosage as a string or an integer")
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(FlexibleDosage)
}
