//! Newtypes and parsers for registry identifiers.
//!
//! Tokens are opaque and stable; aggregation keys on them, never on mutable
//! display fields, so results are independent of input iteration order.

use crate::errors::CoreError;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn is_token(s: &str) -> bool {
    let len = s.len();
    if !(1..=64).contains(&len) {
        return false;
    }
    s.bytes().all(|b| {
        matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
            b'_' | b'-' | b':' | b'.'
        )
    })
}

macro_rules! def_token {
    ($name:ident) => {
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
                let s = s.into();
                if is_token(&s) {
                    Ok(Self(s))
                } else {
                    Err(CoreError::InvalidToken)
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(t: $name) -> String {
                t.0
            }
        }
    };
}

def_token!(MohallaId);
def_token!(HouseholdId);
def_token!(VoterId);
def_token!(InfluencerId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_safe_tokens() {
        assert!(MohallaId::new("m-north.01").is_ok());
        assert!(VoterId::new("demo-v:0001").is_ok());
    }

    #[test]
    fn rejects_empty_and_unsafe() {
        assert_eq!(HouseholdId::new(""), Err(CoreError::InvalidToken));
        assert_eq!(HouseholdId::new("a b"), Err(CoreError::InvalidToken));
        assert_eq!(InfluencerId::new("x".repeat(65)), Err(CoreError::InvalidToken));
    }

    #[test]
    fn ids_order_lexicographically() {
        let a = MohallaId::new("m-a").unwrap();
        let b = MohallaId::new("m-b").unwrap();
        assert!(a < b);
    }
}
