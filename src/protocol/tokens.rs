//! Wire tokens for enumerated SDK options.
//!
//! Every option maps to a fixed string through a static table. Tokens are
//! written verbatim into instruction records and parsed back with
//! [`FromStr`](std::str::FromStr).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Defines a closed enum whose variants each carry one wire token.
macro_rules! wire_tokens {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every option, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// The SDK token for this option.
            pub const fn token(self) -> &'static str {
                match self {
                    $( $name::$variant => $token, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.token() == s)
                    .ok_or_else(|| format!("Unknown {} token '{}'", stringify!($name), s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.token())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_tokens! {
    /// Character encoding for text-mode printing.
    Encoding {
        UsAscii => "US-ASCII",
        Windows1252 => "Windows-1252",
        ShiftJis => "Shift-JIS",
        Windows1251 => "Windows-1251",
        Gb2312 => "GB2312",
        Big5 => "Big5",
        Utf8 => "UTF-8",
    }
}

wire_tokens! {
    /// Paper cut performed by the auto-cutter.
    CutPaperAction {
        /// Full cut at the current position.
        FullCut => "FullCut",
        /// Feed to the cutter, then full cut.
        FullCutWithFeed => "FullCutWithFeed",
        /// Partial cut, leaves a small hinge.
        PartialCut => "PartialCut",
        /// Feed to the cutter, then partial cut.
        PartialCutWithFeed => "PartialCutWithFeed",
    }
}

wire_tokens! {
    /// Horizontal alignment.
    ///
    /// Also used by the off-screen renderer for painting text and graphics.
    #[derive(Default)]
    Alignment {
        #[default]
        Left => "Left",
        Center => "Center",
        Right => "Right",
    }
}

wire_tokens! {
    /// Rotation applied by the SDK's bitmap converter.
    Rotation {
        Normal => "Normal",
        /// 90° clockwise.
        Right90 => "Right90",
        /// 90° counter-clockwise.
        Left90 => "Left90",
        Rotate180 => "Rotate180",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_per_enum() {
        fn unique(tokens: Vec<&'static str>) -> bool {
            let mut sorted = tokens.clone();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len() == tokens.len()
        }
        assert!(unique(Encoding::ALL.iter().map(|e| e.token()).collect()));
        assert!(unique(CutPaperAction::ALL.iter().map(|c| c.token()).collect()));
        assert!(unique(Alignment::ALL.iter().map(|a| a.token()).collect()));
        assert!(unique(Rotation::ALL.iter().map(|r| r.token()).collect()));
    }

    #[test]
    fn test_parse_accepts_every_token() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.token().parse::<Encoding>(), Ok(*encoding));
        }
        for rotation in Rotation::ALL {
            assert_eq!(rotation.to_string().parse::<Rotation>(), Ok(*rotation));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("utf-8".parse::<Encoding>().is_err());
        assert!("Rotate90".parse::<Rotation>().is_err());
        assert_eq!(
            "Centre".parse::<Alignment>(),
            Err("Unknown Alignment token 'Centre'".to_string())
        );
    }

    #[test]
    fn test_serializes_as_token() {
        assert_eq!(
            serde_json::to_value(Encoding::ShiftJis).unwrap(),
            serde_json::json!("Shift-JIS")
        );
        assert_eq!(
            serde_json::to_value(CutPaperAction::PartialCutWithFeed).unwrap(),
            serde_json::json!("PartialCutWithFeed")
        );
    }

    #[test]
    fn test_deserializes_from_token() {
        let rotation: Rotation = serde_json::from_str("\"Left90\"").unwrap();
        assert_eq!(rotation, Rotation::Left90);
        assert!(serde_json::from_str::<Rotation>("\"Sideways\"").is_err());
    }

    #[test]
    fn test_alignment_defaults_left() {
        assert_eq!(Alignment::default(), Alignment::Left);
    }
}
