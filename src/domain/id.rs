use std::{fmt, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use super::Error;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(NonEmptyString);

        impl $name {
            /// Creates an identifier, rejecting the empty string.
            ///
            /// # Errors
            ///
            /// Returns [`Error::EmptyId`] if `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, Error> {
                NonEmptyString::new(value.into())
                    .map(Self)
                    .map_err(|_| Error::EmptyId)
            }

            /// Returns the string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.as_str().to_string()
            }
        }
    };
}

identifier! {
    /// Identifier of a donor in the donor pool.
    DonorId
}

identifier! {
    /// Identifier of a blood request.
    RequestId
}
