//! nwbkit construction policy configuration using Figment
//!
//! Container constructors consult a [`ConstructionConfig`] for the policy
//! decisions that are not part of any schema: what to do when a series is
//! given both per-sample timestamps and a start time with a rate, and whether
//! link path strings are checked against the linked container's name.
//!
//! # Sources
//!
//! Later sources override earlier ones:
//!
//! 1. Built-in defaults ([`ConstructionConfig::default`])
//! 2. `nwbkit.toml`, `nwbkit.yaml`, `nwbkit.yml`, `nwbkit.json` in the
//!    working directory, in that order
//! 3. `NWBKIT_`-prefixed environment variables, e.g.
//!    `NWBKIT_TIMING_CONFLICT=reject`
//!
//! ```no_run
//! use nwbkit_config::{ConstructionConfig, TimingConflict};
//!
//! let config = ConstructionConfig::load()?;
//! if config.timing_conflict == TimingConflict::Reject {
//!     println!("ambiguous timing is an error");
//! }
//! # Ok::<(), nwbkit_config::ConfigError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod types;

pub use discovery::{ConfigFile, ConfigFormat, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::ConfigProvider;
pub use types::{ConstructionConfig, TimingConflict};
