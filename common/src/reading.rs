use thiserror::Error;

/// One parsed sensor message. Fields that were not part of the payload stay
/// `None`; readings are never merged across messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub light: Option<f32>,
    pub soil_moisture: Option<f32>,
    pub co2: Option<f32>,
    pub smoke: Option<f32>,
}

/// A present field could not be turned into a number. The whole message is
/// discarded when this happens; missing fields are not an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("field `{label}` has a non-numeric value `{value}`")]
    BadNumber { label: &'static str, value: String },
    #[error("field `{label}` segment has no `:` separator")]
    MissingSeparator { label: &'static str },
}

/// Parses the comma-separated wire format used by the senders, e.g.
/// `Temperature: 25.5, Humidity: 60%, CO₂: 415`.
///
/// Segment order does not matter and unknown segments are ignored. Labels
/// are matched case-sensitively as substrings of a segment; the first
/// matching segment wins. This matching is a compatibility shim for the
/// existing senders and is knowingly fragile against future labels that
/// share a prefix.
pub fn parse_payload(payload: &str) -> Result<SensorReading, PayloadError> {
    let segments: Vec<&str> = payload.split(',').collect();

    Ok(SensorReading {
        temperature: field_value(&segments, "Temperature", false)?,
        humidity: field_value(&segments, "Humidity", true)?,
        light: field_value(&segments, "Light", false)?,
        soil_moisture: field_value(&segments, "Soil Moisture", true)?,
        co2: field_value(&segments, "CO₂", false)?,
        smoke: field_value(&segments, "Smoke Level", true)?,
    })
}

/// Extracts the value following the first `:` of the first segment that
/// contains `label`. `strip_percent` removes one trailing `%` before the
/// number parse (humidity, soil moisture and smoke carry a unit suffix).
///
/// An empty value after trimming counts as absent, not malformed.
fn field_value(
    segments: &[&str],
    label: &'static str,
    strip_percent: bool,
) -> Result<Option<f32>, PayloadError> {
    let Some(segment) = segments.iter().find(|segment| segment.contains(label)) else {
        return Ok(None);
    };

    let Some((_, raw)) = segment.split_once(':') else {
        return Err(PayloadError::MissingSeparator { label });
    };

    let mut value = raw.trim();
    if strip_percent {
        value = value.strip_suffix('%').unwrap_or(value).trim_end();
    }

    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<f32>() {
        Ok(number) => Ok(Some(number)),
        Err(_) => Err(PayloadError::BadNumber {
            label,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_payload() {
        let reading = parse_payload(
            "Temperature: 25.5, Humidity: 60%, Light: 312, Soil Moisture: 41%, CO₂: 415, Smoke Level: 2%",
        )
        .unwrap();

        assert_eq!(reading.temperature, Some(25.5));
        assert_eq!(reading.humidity, Some(60.0));
        assert_eq!(reading.light, Some(312.0));
        assert_eq!(reading.soil_moisture, Some(41.0));
        assert_eq!(reading.co2, Some(415.0));
        assert_eq!(reading.smoke, Some(2.0));
    }

    #[test]
    fn missing_labels_are_absent_not_errors() {
        let reading = parse_payload("Temperature: 32.5, Humidity: 55%, Smoke Level: 3%").unwrap();

        assert_eq!(reading.temperature, Some(32.5));
        assert_eq!(reading.humidity, Some(55.0));
        assert_eq!(reading.smoke, Some(3.0));
        assert_eq!(reading.light, None);
        assert_eq!(reading.soil_moisture, None);
        assert_eq!(reading.co2, None);
    }

    #[test]
    fn non_numeric_value_fails_the_whole_message() {
        let result = parse_payload("Temperature: abc, Humidity: 40%");

        assert_eq!(
            result,
            Err(PayloadError::BadNumber {
                label: "Temperature",
                value: "abc".to_string(),
            })
        );
    }

    #[test]
    fn matched_segment_without_separator_is_malformed() {
        let result = parse_payload("Temperature 25.5, Humidity: 40%");

        assert_eq!(
            result,
            Err(PayloadError::MissingSeparator {
                label: "Temperature"
            })
        );
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let reading = parse_payload("Temperature: , Humidity: 40%").unwrap();

        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, Some(40.0));
    }

    #[test]
    fn percent_suffix_is_stripped_with_surrounding_whitespace() {
        let reading = parse_payload("Humidity: 55 % , Soil Moisture:40%").unwrap();

        assert_eq!(reading.humidity, Some(55.0));
        assert_eq!(reading.soil_moisture, Some(40.0));
    }

    #[test]
    fn unknown_segments_are_ignored() {
        let reading = parse_payload("Battery: 87%, Temperature: 21.0").unwrap();

        assert_eq!(reading.temperature, Some(21.0));
        assert_eq!(reading.humidity, None);
    }

    #[test]
    fn segment_order_is_irrelevant() {
        let reading = parse_payload("Smoke Level: 1%, Temperature: 19.5").unwrap();

        assert_eq!(reading.temperature, Some(19.5));
        assert_eq!(reading.smoke, Some(1.0));
    }
}
