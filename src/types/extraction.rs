use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Untrusted output of the marksheet extraction service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    #[serde(default)]
    pub detected_department: String,
    #[serde(default, deserialize_with = "lenient_period")]
    pub detected_semester: Option<u32>,
    #[serde(default)]
    pub results: Vec<RawRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub grade: String,
}

// Vision models return the semester as 3, 3.0, "3" or "III"; only the numeric forms count.
fn lenient_period<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && *float >= 0.0)
                    .map(|float| float as u64)
            })
            .and_then(|period| u32::try_from(period).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_wire_shape() {
        let raw: RawExtraction = serde_json::from_str(
            r#"{"detectedDepartment":"CSE","detectedSemester":3,"results":[{"code":"CS301","grade":"A+"}]}"#,
        )
        .expect("raw extraction should parse");
        assert_eq!(raw.detected_department, "CSE");
        assert_eq!(raw.detected_semester, Some(3));
        assert_eq!(
            raw.results,
            vec![RawRow {
                code: "CS301".to_string(),
                grade: "A+".to_string(),
            }]
        );
    }

    #[test]
    fn semester_accepts_numeric_text_and_floats() {
        let text: RawExtraction =
            serde_json::from_str(r#"{"detectedSemester":" 4 ","results":[]}"#).expect("parse");
        assert_eq!(text.detected_semester, Some(4));
        let float: RawExtraction =
            serde_json::from_str(r#"{"detectedSemester":5.0,"results":[]}"#).expect("parse");
        assert_eq!(float.detected_semester, Some(5));
    }

    #[test]
    fn unreadable_semester_becomes_none() {
        for body in [
            r#"{"detectedSemester":"III"}"#,
            r#"{"detectedSemester":2.5}"#,
            r#"{"detectedSemester":null}"#,
            r#"{}"#,
        ] {
            let raw: RawExtraction = serde_json::from_str(body).expect("parse");
            assert_eq!(raw.detected_semester, None, "{body}");
        }
    }
}
