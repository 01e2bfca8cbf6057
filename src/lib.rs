//! # Flaker
//!
//! A Snowflake ID generator for multi-process, multi-worker deployments.
//!
//! Each ID is a 64-bit integer laid out as
//! `[41-bit timestamp][5-bit worker][5-bit process][12-bit sequence]`, with the
//! sign bit always clear. IDs from one generator are:
//! - Strictly increasing, even across clock regressions
//! - Unique across generators with distinct (process, worker) pairs
//! - Decodable back to their creation time
//!
//! ```
//! use flaker::{Epoch, SnowflakeGenerator};
//!
//! let generator = SnowflakeGenerator::new(Epoch::EKO, 3, 7).unwrap();
//! let a = generator.generate().unwrap();
//! let b = generator.generate().unwrap();
//! assert!(b > a);
//! assert!(generator.decode(b) >= Epoch::EKO.as_millis());
//! ```

#![forbid(unsafe_code)]

#[cfg(feature = "async-tokio")]
mod async_tokio;
mod clock;
mod config;
mod decoder;
mod epoch;
mod error;
mod generator;
pub mod layout;
mod snowflake;

#[cfg(test)]
pub mod tests;

#[cfg(feature = "async-tokio")]
pub use async_tokio::AsyncSnowflakeGenerator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use decoder::{decode, decode_signed, Decoder};
pub use epoch::Epoch;
pub use error::{Error, Field, Result};
pub use generator::{Iter, SnowflakeGenerator};
pub use layout::{FieldOrder, Layout};
pub use snowflake::Snowflake;
