//! Machine-readable record of what was labelled.

use serde::{Deserialize, Serialize};

/// One labelled object, in projector (WCS) pixel coordinates before output
/// scaling. Multiply by the canvas scale to get output pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Star {
        pixelx: f64,
        pixely: f64,
        name: String,
        names: Vec<String>,
    },
    Ngc {
        names: Vec<String>,
        pixelx: f64,
        pixely: f64,
        radius: f64,
    },
    Hd {
        pixelx: f64,
        pixely: f64,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub status: String,
    pub annotations: Vec<Annotation>,
}

impl AnnotationReport {
    pub fn solved(annotations: Vec<Annotation>) -> Self {
        Self {
            status: "solved".to_string(),
            annotations,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = AnnotationReport::solved(vec![
            Annotation::Star {
                pixelx: 10.5,
                pixely: 20.0,
                name: "Aldebaran".into(),
                names: vec!["Aldebaran".into(), "α Tau".into()],
            },
            Annotation::Hd {
                pixelx: 1.0,
                pixely: 2.0,
                name: "HD 29139".into(),
            },
        ]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["status"], "solved");
        assert_eq!(value["annotations"][0]["type"], "star");
        assert_eq!(value["annotations"][0]["names"][1], "α Tau");
        assert_eq!(value["annotations"][1]["type"], "hd");
        assert_eq!(value["annotations"][1]["name"], "HD 29139");
    }
}
