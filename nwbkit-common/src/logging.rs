//! Logging helpers
//!
//! nwbkit crates only emit `tracing` events; installing a subscriber is left
//! to the application embedding them.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// Use this in tracing statements to render a schema description or a
/// container record as YAML with a newline before the content:
///
/// ```ignore
/// use nwbkit_common::Pretty;
/// use tracing::debug;
///
/// debug!("registered schema: {}", Pretty(&schema.describe()));
/// ```
///
/// Debug output is used as a fallback if YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct Sample {
        name: String,
        fields: Vec<String>,
    }

    #[test]
    fn test_pretty_renders_yaml_with_leading_newline() {
        let sample = Sample {
            name: "ImageSeries".into(),
            fields: vec!["format".into()],
        };
        let rendered = format!("{}", Pretty(&sample));
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("name: ImageSeries"));
        assert!(rendered.contains("- format"));
    }

    #[test]
    fn test_pretty_debug_matches_display() {
        let value = serde_json::json!({"unit": "lumens"});
        assert_eq!(format!("{:?}", Pretty(&value)), format!("{}", Pretty(&value)));
    }
}
