//! CHP Controller Collaborators
//!
//! The pieces the replay core talks to at its outer boundary:
//!
//! - [`Logger`], a line-format logger with an injected [`Clock`] capability
//!   so its output is byte-reproducible in tests. Every call emits exactly
//!   one `<timestamp> [<LEVEL>]: <text>` line.
//! - [`DriverGenerator`], the boundary to the code-generation stage that
//!   turns a compiled entry point plus bytecode into native driver sources.
//!   The core only consumes this interface; implementations live with the
//!   code generator itself.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chp_controller::{Clock, FixedClock, Logger};
//!
//! let clock = Arc::new(FixedClock::minimum());
//! let logger = Logger::with_sink(clock, Box::new(Vec::new()));
//! logger.log_info("replay started");
//! ```

pub mod clock;
pub mod driver;
pub mod error;
pub mod logger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use driver::{ArgumentKind, DriverGenerator, EntryPointArgument, EntryPointDescriptor};
pub use error::{ControllerError, ControllerResult};
pub use logger::Logger;
