//! The process-wide registry
//!
//! Everything here shares one process-wide registry, so the whole lifecycle
//! runs in a single test.

use nwbkit_entity::types::{IMAGE_SERIES, TIME_SERIES};
use nwbkit_entity::{construct, initialize, registry, EntityError, TimeSeriesArgs};
use nwbkit_fields::{Args, FieldSpec, TypeDecl, TypeSpec, Value};

#[test_log::test]
fn initialize_once_then_construct() {
    let installed = initialize(|builder| {
        builder.register(
            TypeDecl::new("TwoPhotonSeries")
                .extends(IMAGE_SERIES)
                .help("Image stack recorded from a two-photon microscope")
                .field(FieldSpec::required(
                    "pmt_gain",
                    [TypeSpec::Float],
                    "Photomultiplier gain",
                )),
        )?;
        Ok(())
    })
    .unwrap();
    assert!(installed.is_a("TwoPhotonSeries", TIME_SERIES));

    let again = initialize(|_| Ok(())).unwrap_err();
    assert!(matches!(again, EntityError::AlreadyInitialized));
    assert!(std::ptr::eq(registry().unwrap(), installed));

    let series = construct(
        "TwoPhotonSeries",
        Args::new()
            .with("name", "imaging")
            .with("source", "2p rig")
            .with("data", vec![1.0, 2.0])
            .with("unit", "lumens")
            .with("pmt_gain", 2),
    )
    .unwrap();
    assert_eq!(
        series.ancestry_tag(),
        "NWBContainer,TimeSeries,ImageSeries,TwoPhotonSeries"
    );
    assert_eq!(series.get("pmt_gain"), Some(&Value::Int(2)));
    assert_eq!(
        series.help(),
        Some("Image stack recorded from a two-photon microscope")
    );

    let plain = construct(TIME_SERIES, TimeSeriesArgs::new("plain", "rig", vec![0.0], "V")).unwrap();
    assert_eq!(plain.type_name(), TIME_SERIES);
}
