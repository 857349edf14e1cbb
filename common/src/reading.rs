use serde::{Deserialize, Serialize};

/// A single pair of gas sensor values, as uploaded to the endpoint.
///
/// Units depend on the sensors and are not validated.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reading {
    #[serde(rename = "Methane")]
    pub methane: i32,

    #[serde(rename = "CO2")]
    pub co2: i32,
}

impl Reading {
    pub fn new(methane: i32, co2: i32) -> Self {
        Self { methane, co2 }
    }

    /// Serializes the reading into the request body, e.g. `{"Methane":12,"CO2":430}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[test]
fn test_reading_body() {
    let body = Reading::new(12, 430).to_json().unwrap();
    assert_eq!(body, r#"{"Methane":12,"CO2":430}"#);
}

#[test]
fn test_reading_body_parses_back() {
    for (methane, co2) in [
        (0, 0),
        (-1, 1),
        (i32::MAX, i32::MIN),
        (i32::MIN, i32::MAX),
        (-430, 12),
    ] {
        let body = Reading::new(methane, co2).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["Methane"].as_i64(), Some(methane as i64));
        assert_eq!(object["CO2"].as_i64(), Some(co2 as i64));

        let reading: Reading = serde_json::from_str(&body).unwrap();
        assert_eq!(reading, Reading::new(methane, co2));
    }
}
