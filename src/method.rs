//! HTTP method as a typed enum.
//!
//! Only the RFC 9110 methods are routable. Any other token is answered with
//! `405 Method Not Allowed` by the router before it reaches a handler.

use std::fmt;
use std::str::FromStr;

macro_rules! methods {
    ($($variant:ident => $wire:literal,)+) => {
        /// A routable HTTP method.
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub enum Method {
            $($variant,)+
        }

        impl Method {
            /// Every routable method, in wire-name order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)+];

            /// Returns the uppercase wire representation (e.g. `"GET"`).
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        /// Parses an uppercase method string. Case-sensitive per RFC 9110 §9.1.
        impl FromStr for Method {
            type Err = UnknownMethod;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownMethod),
                }
            }
        }
    };
}

methods! {
    Connect => "CONNECT",
    Delete  => "DELETE",
    Get     => "GET",
    Head    => "HEAD",
    Options => "OPTIONS",
    Patch   => "PATCH",
    Post    => "POST",
    Put     => "PUT",
    Trace   => "TRACE",
}

/// Returned when a method token is not one of [`Method::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMethod;

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_case_sensitively() {
        assert_eq!("POST".parse::<Method>(), Ok(Method::Post));
        assert_eq!("post".parse::<Method>(), Err(UnknownMethod));
        assert_eq!("PURGE".parse::<Method>(), Err(UnknownMethod));
    }
}
