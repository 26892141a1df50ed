//! Typed construction arguments.
//!
//! Each builder converts into the name-to-value [`Args`] map the validator
//! works on. Required fields are constructor parameters; optional ones are
//! `with_*` methods.

use nwbkit_fields::{Args, Instance, InstanceRef, Value};

use crate::series::ImageSeriesView;

/// Arguments shared by every time series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesArgs {
    pub name: String,
    pub source: String,
    pub data: Value,
    pub unit: String,
    pub resolution: Option<f64>,
    pub conversion: Option<f64>,
    pub timestamps: Option<Value>,
    pub starting_time: Option<f64>,
    pub rate: Option<f64>,
    pub comments: Option<String>,
    pub description: Option<String>,
    pub control: Option<Value>,
    pub control_description: Option<Value>,
    pub parent: Option<InstanceRef>,
}

impl TimeSeriesArgs {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        data: impl Into<Value>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            data: data.into(),
            unit: unit.into(),
            resolution: None,
            conversion: None,
            timestamps: None,
            starting_time: None,
            rate: None,
            comments: None,
            description: None,
            control: None,
            control_description: None,
            parent: None,
        }
    }

    /// Arguments for an image series whose frames live in external files.
    pub fn without_data(
        name: impl Into<String>,
        source: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self::new(name, source, Value::None, unit)
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_conversion(mut self, conversion: f64) -> Self {
        self.conversion = Some(conversion);
        self
    }

    pub fn with_timestamps(mut self, timestamps: impl Into<Value>) -> Self {
        self.timestamps = Some(timestamps.into());
        self
    }

    /// Evenly spaced samples starting at `starting_time`, `rate` per second.
    pub fn with_rate(mut self, starting_time: f64, rate: f64) -> Self {
        self.starting_time = Some(starting_time);
        self.rate = Some(rate);
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_control(
        mut self,
        control: impl Into<Value>,
        control_description: impl Into<Value>,
    ) -> Self {
        self.control = Some(control.into());
        self.control_description = Some(control_description.into());
        self
    }

    pub fn with_parent<P: Instance>(mut self, parent: &std::sync::Arc<P>) -> Self {
        self.parent = Some(InstanceRef::to(parent));
        self
    }
}

impl From<TimeSeriesArgs> for Args {
    fn from(a: TimeSeriesArgs) -> Self {
        Args::new()
            .with("name", a.name)
            .with("source", a.source)
            .with("data", a.data)
            .with("unit", a.unit)
            .with("resolution", a.resolution)
            .with("conversion", a.conversion)
            .with("timestamps", a.timestamps)
            .with("starting_time", a.starting_time)
            .with("rate", a.rate)
            .with("comments", a.comments)
            .with("description", a.description)
            .with("control", a.control)
            .with("control_description", a.control_description)
            .with("parent", a.parent)
    }
}

/// Where an image series' frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Frames stored in `data`
    Data(Value),
    /// Frames stored in external image files
    External {
        external_file: Vec<String>,
        starting_frame: Vec<i64>,
        format: String,
    },
}

impl ImageSource {
    pub fn external<S: Into<String>>(
        external_file: impl IntoIterator<Item = S>,
        starting_frame: impl IntoIterator<Item = i64>,
        format: impl Into<String>,
    ) -> Self {
        ImageSource::External {
            external_file: external_file.into_iter().map(Into::into).collect(),
            starting_frame: starting_frame.into_iter().collect(),
            format: format.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSeriesArgs {
    pub series: TimeSeriesArgs,
    pub image: ImageSource,
    pub bits_per_pixel: Option<f64>,
    pub dimension: Option<Vec<i64>>,
}

impl ImageSeriesArgs {
    /// `image` replaces any data set on `series`.
    pub fn new(series: TimeSeriesArgs, image: ImageSource) -> Self {
        Self {
            series,
            image,
            bits_per_pixel: None,
            dimension: None,
        }
    }

    pub fn with_bits_per_pixel(mut self, bits: f64) -> Self {
        self.bits_per_pixel = Some(bits);
        self
    }

    pub fn with_dimension(mut self, dimension: impl Into<Vec<i64>>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }
}

impl From<ImageSeriesArgs> for Args {
    fn from(a: ImageSeriesArgs) -> Self {
        let mut args = Args::from(a.series);
        match a.image {
            ImageSource::Data(data) => args.set("data", data),
            ImageSource::External {
                external_file,
                starting_frame,
                format,
            } => {
                args.set("data", Value::None);
                args.set("external_file", external_file);
                args.set("starting_frame", starting_frame);
                args.set("format", format);
            }
        }
        args.with("bits_per_pixel", a.bits_per_pixel)
            .with("dimension", a.dimension)
    }
}

/// A weak link to an image series plus the path it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSeriesLink {
    pub target: InstanceRef,
    pub path: String,
}

impl ImageSeriesLink {
    /// Link to `target`, which may be any series in the image series family.
    pub fn new(target: &impl ImageSeriesView, path: impl Into<String>) -> Self {
        Self {
            target: InstanceRef::to(target.shared()),
            path: path.into(),
        }
    }

    /// Link stored at `<group>/<target name>`.
    pub fn under(group: &str, target: &impl ImageSeriesView) -> Self {
        let path = format!("{}/{}", group.trim_end_matches('/'), target.name());
        Self::new(target, path)
    }

    fn apply(self, args: &mut Args, field: &str) {
        args.set(field, self.target);
        args.set(format!("{field}_path"), self.path);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSeriesArgs {
    pub series: TimeSeriesArgs,
    pub index_timeseries: ImageSeriesLink,
}

impl IndexSeriesArgs {
    /// `series.data` holds frame indices into the linked series.
    pub fn new(series: TimeSeriesArgs, index_timeseries: ImageSeriesLink) -> Self {
        Self {
            series,
            index_timeseries,
        }
    }
}

impl From<IndexSeriesArgs> for Args {
    fn from(a: IndexSeriesArgs) -> Self {
        let mut args = Args::from(a.series);
        a.index_timeseries.apply(&mut args, "index_timeseries");
        args
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageMaskSeriesArgs {
    pub image: ImageSeriesArgs,
    pub masked_imageseries: ImageSeriesLink,
}

impl ImageMaskSeriesArgs {
    pub fn new(image: ImageSeriesArgs, masked_imageseries: ImageSeriesLink) -> Self {
        Self {
            image,
            masked_imageseries,
        }
    }
}

impl From<ImageMaskSeriesArgs> for Args {
    fn from(a: ImageMaskSeriesArgs) -> Self {
        let mut args = Args::from(a.image);
        a.masked_imageseries.apply(&mut args, "masked_imageseries");
        args
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpticalSeriesArgs {
    pub image: ImageSeriesArgs,
    pub distance: f64,
    pub field_of_view: Value,
    pub orientation: String,
}

impl OpticalSeriesArgs {
    pub fn new(
        image: ImageSeriesArgs,
        distance: f64,
        field_of_view: impl Into<Value>,
        orientation: impl Into<String>,
    ) -> Self {
        Self {
            image,
            distance,
            field_of_view: field_of_view.into(),
            orientation: orientation.into(),
        }
    }
}

impl From<OpticalSeriesArgs> for Args {
    fn from(a: OpticalSeriesArgs) -> Self {
        Args::from(a.image)
            .with("distance", a.distance)
            .with("field_of_view", a.field_of_view)
            .with("orientation", a.orientation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoiResponseSeriesArgs {
    pub series: TimeSeriesArgs,
    pub roi_names: Vec<String>,
    pub segmentation_interface: ImageSeriesLink,
}

impl RoiResponseSeriesArgs {
    /// `series.data` holds one row per ROI in `roi_names`.
    pub fn new<S: Into<String>>(
        series: TimeSeriesArgs,
        roi_names: impl IntoIterator<Item = S>,
        segmentation_interface: ImageSeriesLink,
    ) -> Self {
        Self {
            series,
            roi_names: roi_names.into_iter().map(Into::into).collect(),
            segmentation_interface,
        }
    }
}

impl From<RoiResponseSeriesArgs> for Args {
    fn from(a: RoiResponseSeriesArgs) -> Self {
        let mut args = Args::from(a.series).with("roi_names", a.roi_names);
        a.segmentation_interface
            .apply(&mut args, "segmentation_interface");
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_optionals_are_not_supplied() {
        let args = Args::from(TimeSeriesArgs::new("ts", "rig", vec![1.0], "V"));
        assert!(args.is_supplied("data"));
        assert!(!args.is_supplied("rate"));
        assert!(!args.is_supplied("parent"));
    }

    #[test]
    fn test_external_source_clears_data() {
        let args = Args::from(ImageSeriesArgs::new(
            TimeSeriesArgs::new("frames", "camera", vec![1.0], "px"),
            ImageSource::external(["a.tif"], [0], "tiff"),
        ));
        assert!(!args.is_supplied("data"));
        assert!(args.is_supplied("external_file"));
        assert_eq!(args.get("starting_frame"), Some(&Value::from(vec![0i64])));
    }
}
