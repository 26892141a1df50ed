//! Cross-field rules checked after schema validation.

use nwbkit_fields::{FieldMap, Schema, Value, ValidationError};

use crate::container::Container;
use crate::error::{EntityError, Result};
use crate::types::ROI_RESPONSE_SERIES;

/// Check every rule that applies to `schema`'s type chain.
pub(crate) fn check(schema: &Schema, fields: &FieldMap, verify_link_paths: bool) -> Result<()> {
    if verify_link_paths {
        check_link_paths(schema, fields)?;
    }
    if schema.ancestry().iter().any(|t| t == ROI_RESPONSE_SERIES) {
        check_roi_names(fields)?;
    }
    Ok(())
}

/// The last segment of each link path must name the linked container.
fn check_link_paths(schema: &Schema, fields: &FieldMap) -> Result<()> {
    for link in schema.links() {
        let (Some(target), Some(path)) = (fields.get_ref(&link.field), fields.get_str(&link.path_field))
        else {
            continue;
        };
        let Some(target_name) = target.name() else {
            continue;
        };
        if last_segment(path) != target_name {
            return Err(EntityError::LinkMismatch {
                field: link.field.clone(),
                path: path.to_string(),
                target: target_name.to_string(),
            });
        }
    }
    Ok(())
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// One ROI name per row of data.
fn check_roi_names(fields: &FieldMap) -> Result<()> {
    let Some(roi_names) = fields.get("roi_names") else {
        return Ok(());
    };
    let Some(names) = roi_names.as_text_list() else {
        return Err(ValidationError::TypeMismatch {
            name: "roi_names".into(),
            expected: vec!["sequence of str".into()],
            actual: roi_names.kind(),
        }
        .into());
    };
    match fields.get("data").and_then(data_rows) {
        Some(rows) if rows != names.len() => Err(EntityError::RoiCountMismatch {
            names: names.len(),
            rows,
        }),
        _ => Ok(()),
    }
}

/// Row count of a data value, following references to other series while
/// their targets are alive.
fn data_rows(data: &Value) -> Option<usize> {
    match data {
        Value::Ref(reference) => {
            let series = reference.upgrade_as::<Container>()?;
            series.get("data").and_then(data_rows)
        }
        other => other.rows(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/acquisition/stack", "stack")]
    #[case("/acquisition/stack/", "stack")]
    #[case("stack", "stack")]
    #[case("", "")]
    fn test_last_segment(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(last_segment(path), expected);
    }

    #[test]
    fn test_data_rows_of_plain_values() {
        assert_eq!(data_rows(&Value::from(vec![1.0, 2.0])), Some(2));
        assert_eq!(data_rows(&Value::from("text")), None);
    }
}
