//! Standard container type declarations.
//!
//! `NWBContainer` is the root. `TimeSeries` extends it, and the image series
//! family builds on `TimeSeries`:
//!
//! ```text
//! NWBContainer
//! └── TimeSeries
//!     ├── ImageSeries
//!     │   ├── ImageMaskSeries
//!     │   └── OpticalSeries
//!     ├── IndexSeries
//!     └── RoiResponseSeries
//! ```

use nwbkit_fields::{
    Alternative, DefaultValue, DefinitionError, FieldSpec, Registry, RegistryBuilder, TypeDecl,
    TypeSpec, Value,
};

pub const NWB_CONTAINER: &str = "NWBContainer";
pub const TIME_SERIES: &str = "TimeSeries";
pub const IMAGE_SERIES: &str = "ImageSeries";
pub const INDEX_SERIES: &str = "IndexSeries";
pub const IMAGE_MASK_SERIES: &str = "ImageMaskSeries";
pub const OPTICAL_SERIES: &str = "OpticalSeries";
pub const ROI_RESPONSE_SERIES: &str = "RoiResponseSeries";

/// Name of the exclusive image source constraint on `ImageSeries`.
pub const IMAGE_SOURCE: &str = "image_source";

fn data_types() -> [TypeSpec; 3] {
    [
        TypeSpec::Sequence,
        TypeSpec::Array,
        TypeSpec::container(TIME_SERIES),
    ]
}

fn unset(name: &str, types: impl IntoIterator<Item = TypeSpec>, doc: &str) -> FieldSpec {
    FieldSpec::optional(name, types, doc, DefaultValue::Unset)
}

pub fn nwb_container() -> TypeDecl {
    TypeDecl::new(NWB_CONTAINER)
        .help("Base type for every stored container")
        .field(unset(
            "parent",
            [TypeSpec::container(NWB_CONTAINER)],
            "The parent NWBContainer for this NWBContainer",
        ))
}

pub fn time_series() -> TypeDecl {
    TypeDecl::new(TIME_SERIES)
        .extends(NWB_CONTAINER)
        .help("General purpose time series")
        .fields([
            FieldSpec::required("name", [TypeSpec::Text], "The name of this TimeSeries dataset"),
            FieldSpec::required(
                "source",
                [TypeSpec::Text],
                "Name of TimeSeries or Modules that serve as the source for the data contained \
                 here. It can also be the name of a device, for stimulus or acquisition data",
            ),
            FieldSpec::required(
                "data",
                data_types(),
                "The data this TimeSeries dataset stores. Can also store binary data e.g. image frames",
            ),
            FieldSpec::required(
                "unit",
                [TypeSpec::Text],
                "The base unit of measurement (should be SI unit)",
            ),
            FieldSpec::optional(
                "resolution",
                [TypeSpec::Float],
                "The smallest meaningful difference (in specified unit) between values in data",
                DefaultValue::Unspecified,
            ),
            FieldSpec::optional(
                "conversion",
                [TypeSpec::Float],
                "Scalar to multiply each element by to convert to volts",
                DefaultValue::Unspecified,
            ),
            unset("timestamps", data_types(), "Timestamps for samples stored in data"),
            unset("starting_time", [TypeSpec::Float], "The timestamp of the first sample"),
            unset("rate", [TypeSpec::Float], "Sampling rate in Hz"),
            unset(
                "comments",
                [TypeSpec::Text],
                "Human-readable comments about this TimeSeries dataset",
            ),
            unset("description", [TypeSpec::Text], "Description of this TimeSeries dataset"),
            unset(
                "control",
                [TypeSpec::Sequence],
                "Numerical labels that apply to each element in data",
            ),
            unset(
                "control_description",
                [TypeSpec::Sequence],
                "Description of each control value",
            ),
        ])
}

/// `ImageSeries` takes its frames either from `data` or from external files,
/// never both.
pub fn image_series() -> TypeDecl {
    TypeDecl::new(IMAGE_SERIES)
        .extends(TIME_SERIES)
        .help("Storage object for time-series 2-D image data")
        .fields([
            FieldSpec::required(
                "external_file",
                [TypeSpec::Sequence],
                "Path or URL to one or more external file(s). Either external_file or data \
                 must be specified, but not both.",
            ),
            FieldSpec::required(
                "starting_frame",
                [TypeSpec::Sequence],
                "Each entry is the frame number in the corresponding external_file variable",
            ),
            FieldSpec::required(
                "format",
                [TypeSpec::Text],
                "Format of image. Three types: 1) Image format; tiff, png, jpg, etc. 2) external 3) raw.",
            ),
            FieldSpec::optional(
                "bits_per_pixel",
                [TypeSpec::Float],
                "Number of bit per image pixel",
                DefaultValue::Unspecified,
            ),
            FieldSpec::optional(
                "dimension",
                [TypeSpec::Sequence],
                "Number of pixels on x, y, (and z) axes.",
                DefaultValue::Value(Value::List(vec![Value::Unspecified])),
            ),
        ])
        .alternative(
            Alternative::new(IMAGE_SOURCE)
                .group(["data"])
                .group(["external_file", "starting_frame", "format"]),
        )
}

pub fn index_series() -> TypeDecl {
    TypeDecl::new(INDEX_SERIES)
        .extends(TIME_SERIES)
        .help(
            "A sequence that is generated from an existing image stack. Frames can be presented \
             in an arbitrary order. The data[] field stores frame number in reference stack.",
        )
        .link(
            "index_timeseries",
            IMAGE_SERIES,
            "Link to the ImageSeries containing images that are indexed.",
            "Path to linked ImageSeries.",
        )
}

pub fn image_mask_series() -> TypeDecl {
    TypeDecl::new(IMAGE_MASK_SERIES)
        .extends(IMAGE_SERIES)
        .help("An alpha mask that is applied to a presented visual stimulus.")
        .link(
            "masked_imageseries",
            IMAGE_SERIES,
            "Link to ImageSeries that mask is applied to.",
            "Path to linked ImageSeries.",
        )
}

pub fn optical_series() -> TypeDecl {
    TypeDecl::new(OPTICAL_SERIES)
        .extends(IMAGE_SERIES)
        .help("Time-series image stack for optical recording or stimulus.")
        .fields([
            FieldSpec::required(
                "distance",
                [TypeSpec::Float],
                "Distance from camera/monitor to target/eye.",
            ),
            FieldSpec::required(
                "field_of_view",
                data_types(),
                "Width, height and depth of image, or imaged area (meters).",
            ),
            FieldSpec::required(
                "orientation",
                [TypeSpec::Text],
                "Description of image relative to some reference frame (e.g., which way is up). \
                 Must also specify frame of reference.",
            ),
        ])
}

pub fn roi_response_series() -> TypeDecl {
    TypeDecl::new(ROI_RESPONSE_SERIES)
        .extends(TIME_SERIES)
        .help(
            "ROI responses over an imaging plane. Each row in data[] should correspond to the \
             signal from one ROI.",
        )
        .field(FieldSpec::required(
            "roi_names",
            [TypeSpec::Sequence],
            "List of ROIs represented, one name for each row of data[].",
        ))
        .link(
            "segmentation_interface",
            IMAGE_SERIES,
            "Link to the ImageSeries the ROIs were segmented from.",
            "Path to linked ImageSeries.",
        )
}

/// Every standard declaration, parents before children.
pub fn standard_types() -> Vec<TypeDecl> {
    vec![
        nwb_container(),
        time_series(),
        image_series(),
        index_series(),
        image_mask_series(),
        optical_series(),
        roi_response_series(),
    ]
}

pub fn register_standard_types(builder: &mut RegistryBuilder) -> Result<(), DefinitionError> {
    for decl in standard_types() {
        builder.register(decl)?;
    }
    Ok(())
}

/// A sealed registry holding only the standard types.
pub fn standard_registry() -> Result<Registry, DefinitionError> {
    let mut builder = RegistryBuilder::new();
    register_standard_types(&mut builder)?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NWB_CONTAINER, "NWBContainer")]
    #[case(TIME_SERIES, "NWBContainer,TimeSeries")]
    #[case(IMAGE_SERIES, "NWBContainer,TimeSeries,ImageSeries")]
    #[case(INDEX_SERIES, "NWBContainer,TimeSeries,IndexSeries")]
    #[case(IMAGE_MASK_SERIES, "NWBContainer,TimeSeries,ImageSeries,ImageMaskSeries")]
    #[case(OPTICAL_SERIES, "NWBContainer,TimeSeries,ImageSeries,OpticalSeries")]
    #[case(ROI_RESPONSE_SERIES, "NWBContainer,TimeSeries,RoiResponseSeries")]
    fn test_ancestry_tags(#[case] type_name: &str, #[case] tag: &str) {
        let registry = standard_registry().unwrap();
        assert_eq!(registry.schema(type_name).unwrap().ancestry_tag(), tag);
    }

    #[test]
    fn test_every_standard_schema_is_well_ordered() {
        let registry = standard_registry().unwrap();
        for name in registry.types() {
            assert!(registry.schema(name).unwrap().is_well_ordered(), "{name}");
        }
    }

    #[test]
    fn test_time_series_field_order() {
        let registry = standard_registry().unwrap();
        let names: Vec<&str> = registry
            .schema(TIME_SERIES)
            .unwrap()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "name",
                "source",
                "data",
                "unit",
                "parent",
                "resolution",
                "conversion",
                "timestamps",
                "starting_time",
                "rate",
                "comments",
                "description",
                "control",
                "control_description",
            ]
        );
    }

    #[test]
    fn test_image_series_family_inherits_source_alternative() {
        let registry = standard_registry().unwrap();
        for name in [IMAGE_SERIES, IMAGE_MASK_SERIES, OPTICAL_SERIES] {
            let schema = registry.schema(name).unwrap();
            assert_eq!(schema.alternatives().len(), 1, "{name}");
            assert!(schema.is_governed("data"));
        }
        assert!(registry.schema(TIME_SERIES).unwrap().alternatives().is_empty());
    }

    #[test]
    fn test_links_declare_path_fields() {
        let registry = standard_registry().unwrap();
        let schema = registry.schema(ROI_RESPONSE_SERIES).unwrap();
        assert_eq!(schema.links().len(), 1);
        assert_eq!(schema.links()[0].path_field, "segmentation_interface_path");
        assert!(schema.field("segmentation_interface_path").unwrap().is_required());
        assert_eq!(
            schema.declared_fields(),
            ["roi_names", "segmentation_interface", "segmentation_interface_path"]
        );
    }
}
