//! Typed views over constructed containers.
//!
//! Each view wraps the shared [`Container`] record and reads its fields by
//! name. [`TimeSeriesView`] covers every series; [`ImageSeriesView`] adds the
//! image fields shared by the image series family.

use std::sync::Arc;

use nwbkit_fields::{InstanceRef, Value};

use crate::builders::{
    ImageMaskSeriesArgs, ImageSeriesArgs, IndexSeriesArgs, OpticalSeriesArgs,
    RoiResponseSeriesArgs, TimeSeriesArgs,
};
use crate::container::Container;
use crate::error::{EntityError, Result};
use crate::timing::Timing;
use crate::types::{
    IMAGE_MASK_SERIES, IMAGE_SERIES, INDEX_SERIES, OPTICAL_SERIES, ROI_RESPONSE_SERIES,
    TIME_SERIES,
};

/// A container type with a typed view and argument builder.
pub trait Series: Sized {
    const TYPE_NAME: &'static str;

    type Args: Into<nwbkit_fields::Args>;

    /// Wrap without checking the container's type.
    fn wrap(container: Arc<Container>) -> Self;

    fn into_container(self) -> Arc<Container>;

    /// Wrap `container` if its type is [`Series::TYPE_NAME`] or a subtype.
    fn from_container(container: Arc<Container>) -> Result<Self> {
        if container.is_a(Self::TYPE_NAME) {
            Ok(Self::wrap(container))
        } else {
            Err(EntityError::WrongType {
                expected: Self::TYPE_NAME.to_string(),
                actual: container.type_name().to_string(),
            })
        }
    }
}

fn float_or_unspecified(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_none())
}

/// Fields every time series has.
pub trait TimeSeriesView {
    /// The shared container record behind this view.
    fn shared(&self) -> &Arc<Container>;

    fn container(&self) -> &Container {
        self.shared()
    }

    fn name(&self) -> &str {
        self.container().fields().get_str("name").unwrap_or_default()
    }

    fn source(&self) -> &str {
        self.container().fields().get_str("source").unwrap_or_default()
    }

    /// The data value, or `None` for image series stored in external files.
    fn data(&self) -> Option<&Value> {
        present(self.container().get("data"))
    }

    fn unit(&self) -> &str {
        self.container().fields().get_str("unit").unwrap_or_default()
    }

    /// `None` while unspecified.
    fn resolution(&self) -> Option<f64> {
        float_or_unspecified(self.container().get("resolution"))
    }

    /// `None` while unspecified.
    fn conversion(&self) -> Option<f64> {
        float_or_unspecified(self.container().get("conversion"))
    }

    fn timestamps(&self) -> Option<&Value> {
        present(self.container().get("timestamps"))
    }

    fn timing(&self) -> &Timing {
        self.container().timing()
    }

    fn comments(&self) -> Option<&str> {
        self.container().fields().get_str("comments")
    }

    fn description(&self) -> Option<&str> {
        self.container().fields().get_str("description")
    }

    fn control(&self) -> Option<&Value> {
        present(self.container().get("control"))
    }

    fn control_description(&self) -> Option<&Value> {
        present(self.container().get("control_description"))
    }

    fn parent(&self) -> Option<&InstanceRef> {
        self.container().parent()
    }
}

/// Where an image series' frames come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageSourceRef<'a> {
    Data(&'a Value),
    External {
        external_file: &'a Value,
        starting_frame: &'a Value,
        format: &'a str,
    },
}

/// Fields shared by `ImageSeries` and its subtypes.
pub trait ImageSeriesView: TimeSeriesView {
    fn image_source(&self) -> Option<ImageSourceRef<'_>> {
        if let Some(data) = self.data() {
            return Some(ImageSourceRef::Data(data));
        }
        let fields = self.container().fields();
        Some(ImageSourceRef::External {
            external_file: present(fields.get("external_file"))?,
            starting_frame: present(fields.get("starting_frame"))?,
            format: fields.get_str("format")?,
        })
    }

    fn external_file(&self) -> Option<Vec<&str>> {
        self.container().get("external_file")?.as_text_list()
    }

    fn starting_frame(&self) -> Option<&Value> {
        present(self.container().get("starting_frame"))
    }

    fn format(&self) -> Option<&str> {
        self.container().fields().get_str("format")
    }

    /// `None` while unspecified.
    fn bits_per_pixel(&self) -> Option<f64> {
        float_or_unspecified(self.container().get("bits_per_pixel"))
    }

    /// Pixels per axis; `[Unspecified]` until given.
    fn dimension(&self) -> Option<&Value> {
        self.container().get("dimension")
    }
}

macro_rules! series_view {
    ($(#[$meta:meta])* $view:ident, $type_name:expr, $args:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $view(Arc<Container>);

        impl Series for $view {
            const TYPE_NAME: &'static str = $type_name;
            type Args = $args;

            fn wrap(container: Arc<Container>) -> Self {
                Self(container)
            }

            fn into_container(self) -> Arc<Container> {
                self.0
            }
        }

        impl TimeSeriesView for $view {
            fn shared(&self) -> &Arc<Container> {
                &self.0
            }
        }
    };
}

series_view!(
    /// Any time series.
    TimeSeries,
    TIME_SERIES,
    TimeSeriesArgs
);
series_view!(
    /// Time series of 2-D images.
    ImageSeries,
    IMAGE_SERIES,
    ImageSeriesArgs
);
series_view!(IndexSeries, INDEX_SERIES, IndexSeriesArgs);
series_view!(ImageMaskSeries, IMAGE_MASK_SERIES, ImageMaskSeriesArgs);
series_view!(OpticalSeries, OPTICAL_SERIES, OpticalSeriesArgs);
series_view!(RoiResponseSeries, ROI_RESPONSE_SERIES, RoiResponseSeriesArgs);

impl ImageSeriesView for ImageSeries {}
impl ImageSeriesView for ImageMaskSeries {}
impl ImageSeriesView for OpticalSeries {}

/// The linked image series, if it is still alive.
fn linked_image_series(container: &Container, field: &str) -> Option<ImageSeries> {
    container
        .fields()
        .get_ref(field)?
        .upgrade_as::<Container>()
        .map(ImageSeries)
}

impl IndexSeries {
    /// Frame indices into [`IndexSeries::index_timeseries`].
    pub fn indices(&self) -> Option<&Value> {
        self.data()
    }

    pub fn index_timeseries(&self) -> Option<ImageSeries> {
        linked_image_series(&self.0, "index_timeseries")
    }

    pub fn index_timeseries_path(&self) -> &str {
        self.0.fields().get_str("index_timeseries_path").unwrap_or_default()
    }
}

impl ImageMaskSeries {
    pub fn masked_imageseries(&self) -> Option<ImageSeries> {
        linked_image_series(&self.0, "masked_imageseries")
    }

    pub fn masked_imageseries_path(&self) -> &str {
        self.0.fields().get_str("masked_imageseries_path").unwrap_or_default()
    }
}

impl OpticalSeries {
    pub fn distance(&self) -> Option<f64> {
        self.0.fields().get_f64("distance")
    }

    pub fn field_of_view(&self) -> Option<&Value> {
        self.0.get("field_of_view")
    }

    pub fn orientation(&self) -> &str {
        self.0.fields().get_str("orientation").unwrap_or_default()
    }
}

impl RoiResponseSeries {
    pub fn roi_names(&self) -> Vec<&str> {
        self.0
            .get("roi_names")
            .and_then(Value::as_text_list)
            .unwrap_or_default()
    }

    pub fn segmentation_interface(&self) -> Option<ImageSeries> {
        linked_image_series(&self.0, "segmentation_interface")
    }

    pub fn segmentation_interface_path(&self) -> &str {
        self.0
            .fields()
            .get_str("segmentation_interface_path")
            .unwrap_or_default()
    }
}
