//! Decode and verification front-end for PAST security tokens.
//!
//! A PAST token is `header.purpose.payload[.footer]`: dot-separated,
//! unpadded base64url segments. The [`Parser`] validates the structure,
//! enforces which versions, purposes, and key capabilities are permitted,
//! dispatches to the protocol implementation named by the header, and
//! rebuilds the claims object from the verified payload. Nothing is
//! returned until every check has passed.
//!
//! ```
//! use past::{Key, Parser};
//!
//! let key = Key::symmetric_auth(&[0x70; 32][..]);
//! let token = past_v2::authenticate(br#"{"sub":"alice"}"#, &key, b"kid:1")?;
//!
//! let mut parser = Parser::new();
//! parser.set_purpose("auth", false)?;
//! parser.set_key(key, true)?;
//!
//! let parsed = parser.parse(&token)?;
//! assert_eq!(parsed.version(), "v2");
//! assert_eq!(parsed.footer(), b"kid:1");
//! assert_eq!(
//!     parsed.claims().get("sub").and_then(|v| v.as_str()),
//!     Some("alice"),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Token construction is out of scope here; the `past-v1` and `past-v2`
//! crates carry the encode half of each protocol behind their `sealing`
//! feature.

mod parser;
mod token;

pub use parser::{Parser, ParserBuilder};
pub use token::ParsedToken;

pub use past_core::claims::Claims;
pub use past_core::key::{Capability, Key};
pub use past_core::purpose::Purpose;
pub use past_core::version::Protocol;
pub use past_core::{PastError, ProtocolError};
pub use past_v1::V1;
pub use past_v2::V2;

/// The protocols a [`Parser`] speaks unless configured otherwise.
pub static DEFAULT_PROTOCOLS: [&dyn Protocol; 2] = [&V1, &V2];
