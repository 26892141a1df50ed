//! Time series containers for neurophysiology image data
//!
//! This crate registers the standard container types on an
//! [`nwbkit_fields::Registry`] and builds validated [`Container`] records from
//! construction arguments:
//!
//! - `TimeSeries`, the base of every series
//! - `ImageSeries`, with frames either in `data` or in external files
//! - `IndexSeries`, frame indices into a linked `ImageSeries`
//! - `ImageMaskSeries`, an alpha mask over a linked `ImageSeries`
//! - `OpticalSeries`, an `ImageSeries` with viewing geometry
//! - `RoiResponseSeries`, one data row per region of interest
//!
//! Construction validates arguments against the composed schema, then checks
//! the rules a schema cannot express: how samples map to time, one ROI name
//! per data row, and link paths naming their targets.
//!
//! ```
//! use nwbkit_entity::{
//!     standard_registry, Constructor, ImageSeries, ImageSeriesArgs, ImageSeriesView,
//!     ImageSource, TimeSeriesArgs,
//! };
//!
//! let registry = standard_registry()?;
//! let constructor = Constructor::with_defaults(&registry);
//!
//! let frames: ImageSeries = constructor.build(ImageSeriesArgs::new(
//!     TimeSeriesArgs::without_data("stimulus", "monitor", "px").with_rate(0.0, 60.0),
//!     ImageSource::external(["movie.avi"], [0], "external"),
//! ))?;
//! assert_eq!(frames.format(), Some("external"));
//! assert!(frames.bits_per_pixel().is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builders;
pub mod constructor;
pub mod container;
pub mod error;
mod rules;
pub mod series;
pub mod timing;
pub mod types;

pub use builders::{
    ImageMaskSeriesArgs, ImageSeriesArgs, ImageSeriesLink, ImageSource, IndexSeriesArgs,
    OpticalSeriesArgs, RoiResponseSeriesArgs, TimeSeriesArgs,
};
pub use constructor::{config, construct, initialize, registry, Constructor};
pub use container::{Container, Record};
pub use error::{EntityError, Result};
pub use series::{
    ImageMaskSeries, ImageSeries, ImageSeriesView, ImageSourceRef, IndexSeries, OpticalSeries,
    RoiResponseSeries, Series, TimeSeries, TimeSeriesView,
};
pub use timing::Timing;
pub use types::{register_standard_types, standard_registry, standard_types};
