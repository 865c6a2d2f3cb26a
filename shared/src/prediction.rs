use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PredictionResult {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// Body returned by the upstream inference service and relayed unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PredictionResponse {
    #[serde(default)]
    pub results: Vec<PredictionResult>,
}

impl PredictionResponse {
    /// First prediction of the first result, the only one the client shows.
    pub fn top_prediction(&self) -> Option<&Prediction> {
        self.results.first()?.predictions.first()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Converts a 0..1 probability into a percentage rounded to one decimal.
pub fn probability_to_percent(probability: f64) -> f64 {
    (probability * 1000.0).round() / 10.0
}

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}%", score),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_prediction_of_upstream_body() {
        let body = r#"{"results":[{"predictions":[
            {"label":"행복한, 좋은 표정","probability":0.837},
            {"label":"덤덤한, 무표정","probability":0.1}
        ]},{"predictions":[]}]}"#;
        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        let top = response.top_prediction().unwrap();
        assert_eq!(top.label, "행복한, 좋은 표정");
        assert_eq!(top.probability, 0.837);
    }

    #[test]
    fn test_missing_paths_parse_as_empty() {
        let response: PredictionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.top_prediction().is_none());

        let response: PredictionResponse =
            serde_json::from_str(r#"{"results":[{}]}"#).unwrap();
        assert!(response.top_prediction().is_none());
    }

    #[test]
    fn test_percent_rounding_and_format() {
        assert_eq!(probability_to_percent(0.837), 83.7);
        assert_eq!(probability_to_percent(0.12345), 12.3);
        assert_eq!(probability_to_percent(1.0), 100.0);
        assert_eq!(format_score(Some(83.7)), "83.7%");
        assert_eq!(format_score(Some(0.0)), "0.0%");
        assert_eq!(format_score(None), "-");
    }
}
