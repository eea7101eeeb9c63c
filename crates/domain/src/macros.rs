//! `Display`/`FromStr` boilerplate for label-like enums
//!
//! # Example
//!
//! ```rust
//! use convointel_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Voice,
//!     Text,
//! }
//!
//! impl_label_conversions!(Channel {
//!     Voice => "voice",
//!     Text => "text",
//! });
//!
//! assert_eq!(Channel::Voice.to_string(), "voice");
//! assert_eq!("TEXT".parse::<Channel>(), Ok(Channel::Text));
//! ```

/// Implements `as_str`, `Display` and case-insensitive `FromStr`
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Stable lowercase label
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($label) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Direction {
        Inbound,
        Outbound,
    }

    impl_label_conversions!(Direction {
        Inbound => "inbound",
        Outbound => "outbound",
    });

    #[test]
    fn test_display_and_as_str() {
        assert_eq!(Direction::Inbound.to_string(), "inbound");
        assert_eq!(Direction::Outbound.as_str(), "outbound");
    }

    #[test]
    fn test_fromstr_ignores_case() {
        assert_eq!(Direction::from_str("InBound"), Ok(Direction::Inbound));
        assert_eq!(Direction::from_str("OUTBOUND"), Ok(Direction::Outbound));
    }

    #[test]
    fn test_fromstr_invalid() {
        let err = Direction::from_str("sideways").unwrap_err();
        assert_eq!(err, "Invalid Direction: sideways");
        assert!(Direction::from_str("").is_err());
    }
}
