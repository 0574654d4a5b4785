//! Enumerations shared across the marketplace. Each one travels over the wire and
//! is stored in Postgres `TEXT` columns using the same upper-case spelling.

use crate::domain::errors::DomainError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(DomainError::validation(format!(
                        "unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    pub enum Currency {
        Etb => "ETB",
        Usd => "USD",
    }
}

wire_enum! {
    /// Main line of work. Used for both profiles and listings.
    pub enum Category {
        WebDevelopment => "WEB_DEVELOPMENT",
        MobileDevelopment => "MOBILE_DEVELOPMENT",
        Design => "DESIGN",
        Writing => "WRITING",
        Translation => "TRANSLATION",
        Marketing => "MARKETING",
        DataScience => "DATA_SCIENCE",
        VideoEditing => "VIDEO_EDITING",
        Photography => "PHOTOGRAPHY",
        Other => "OTHER",
    }
}

wire_enum! {
    pub enum RateType {
        Fixed => "FIXED",
        Hourly => "HOURLY",
    }
}

wire_enum! {
    pub enum ExperienceLevel {
        Entry => "ENTRY",
        Intermediate => "INTERMEDIATE",
        Expert => "EXPERT",
    }
}

wire_enum! {
    pub enum FreelancerLevel {
        New => "NEW",
        LevelOne => "LEVEL_ONE",
        LevelTwo => "LEVEL_TWO",
        TopRated => "TOP_RATED",
    }
}

wire_enum! {
    /// Estimated delivery bucket advertised on a profile.
    pub enum DeliveryTime {
        Within24Hours => "WITHIN_24_HOURS",
        Within3Days => "WITHIN_3_DAYS",
        Within1Week => "WITHIN_1_WEEK",
        Within2Weeks => "WITHIN_2_WEEKS",
        MoreThan2Weeks => "MORE_THAN_2_WEEKS",
    }
}

wire_enum! {
    pub enum SkillLevel {
        Beginner => "BEGINNER",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
        Expert => "EXPERT",
    }
}

wire_enum! {
    pub enum Role {
        User => "USER",
        Admin => "ADMIN",
    }
}

wire_enum! {
    pub enum VerificationStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_spelling_matches_serde() {
        for c in Category::ALL {
            let json = serde_json::to_string(c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
            assert_eq!(Category::from_str(c.as_str()).unwrap(), *c);
        }
        let d: DeliveryTime = serde_json::from_str("\"WITHIN_3_DAYS\"").unwrap();
        assert_eq!(d, DeliveryTime::Within3Days);
    }

    #[test]
    fn unknown_value_is_a_validation_error() {
        let err = Currency::from_str("EUR").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("Currency"));
    }
}
