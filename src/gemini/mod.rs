pub mod models;

use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::PredictError;
use crate::models::prediction::{PredictionInput, PredictionResult, RiskLevel};
use crate::predictor::Predictor;
use models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Schema};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the Gemini `generateContent` endpoint, constrained to the
/// HOMA-IR response schema. Constructed once with the injected API key
/// and passed to the controller; there is no ambient global client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }

    fn build_prompt(input: &PredictionInput) -> String {
        format!(
            "Act as an expert clinical neural network trained to estimate \
             insulin resistance (HOMA-IR).\n\n\
             Your inputs are:\n\
             - Sex: {}\n\
             - Fasting glucose: {} mg/dL\n\
             - Body-mass index (BMI): {} kg/m²\n\n\
             Medical context: HOMA-IR normally requires a fasting insulin \
             value, but this model has been trained to estimate it from \
             metabolic correlations with BMI and glucose.\n\n\
             Task:\n\
             1. Predict the estimated HOMA-IR value for these parameters.\n\
             2. Classify the risk level (Normal < 2.5, Mild Resistance \
             2.5-4.0, Severe Resistance > 4.0, or adjusted bands per your \
             expert judgement).\n\
             3. Provide a brief physiological explanation.\n\
             4. Give exactly 3 short clinical recommendations.\n\n\
             Return the answer strictly as JSON.",
            input.sex, input.glucose, input.bmi
        )
    }

    /// Schema sent with every request. All five fields are mandatory and
    /// `riskLevel` is restricted to the enumerated band names.
    fn response_schema() -> Schema {
        let mut properties = BTreeMap::new();
        properties.insert(
            "homaIndex",
            Schema {
                r#type: "NUMBER",
                description: Some("Predicted HOMA-IR value, two decimals"),
                ..Default::default()
            },
        );
        properties.insert(
            "riskLevel",
            Schema {
                r#type: "STRING",
                enum_values: Some(RiskLevel::WIRE_VALUES.to_vec()),
                ..Default::default()
            },
        );
        properties.insert(
            "riskColor",
            Schema {
                r#type: "STRING",
                description: Some(
                    "Hex color hint for the UI: green for normal, amber for mild, red for severe",
                ),
                ..Default::default()
            },
        );
        properties.insert(
            "explanation",
            Schema {
                r#type: "STRING",
                ..Default::default()
            },
        );
        properties.insert(
            "recommendations",
            Schema {
                r#type: "ARRAY",
                items: Some(Box::new(Schema {
                    r#type: "STRING",
                    ..Default::default()
                })),
                ..Default::default()
            },
        );
        Schema {
            r#type: "OBJECT",
            properties: Some(properties),
            required: Some(vec![
                "homaIndex",
                "riskLevel",
                "riskColor",
                "explanation",
                "recommendations",
            ]),
            ..Default::default()
        }
    }

    /// Strict parse of the model's text reply. Any shape mismatch is a
    /// schema error; no partial result survives.
    pub(crate) fn parse_result(text: &str) -> Result<PredictionResult, PredictError> {
        serde_json::from_str(text)
            .map_err(|e| PredictError::Schema(format!("invalid prediction payload: {}", e)))
    }

    async fn generate(&self, prompt: String) -> Result<String, PredictError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Self::response_schema(),
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PredictError::Transport(format!("failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, body = %error_text, "Gemini request failed");
            return Err(PredictError::Transport(format!(
                "API request failed with status {}",
                status
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PredictError::Schema(format!("failed to parse response envelope: {}", e)))?;

        body.first_text()
            .map(str::to_owned)
            .ok_or_else(|| PredictError::Schema("no text candidate in response".to_string()))
    }
}

#[async_trait]
impl Predictor for GeminiClient {
    async fn predict(
        &self,
        input: &PredictionInput,
    ) -> Result<PredictionResult, PredictError> {
        let prompt = Self::build_prompt(input);
        debug!(model = %self.model, "requesting HOMA-IR estimate");
        let text = self.generate(prompt).await?;
        Self::parse_result(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prediction::Sex;

    const WELL_FORMED: &str = r##"{
        "homaIndex": 1.8,
        "riskLevel": "Normal",
        "riskColor": "#10b981",
        "explanation": "Glucose and BMI are within healthy ranges.",
        "recommendations": ["a", "b", "c"]
    }"##;

    #[test]
    fn test_parse_well_formed_result() {
        let result = GeminiClient::parse_result(WELL_FORMED).unwrap();
        assert_eq!(result.homa_index, 1.8);
        assert_eq!(result.risk_level, RiskLevel::Normal);
        assert_eq!(result.risk_color, "#10b981");
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            GeminiClient::parse_result("not json"),
            Err(PredictError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        // each of the five fields dropped in turn
        let full: serde_json::Value = serde_json::from_str(WELL_FORMED).unwrap();
        for field in [
            "homaIndex",
            "riskLevel",
            "riskColor",
            "explanation",
            "recommendations",
        ] {
            let mut partial = full.clone();
            partial.as_object_mut().unwrap().remove(field);
            let text = partial.to_string();
            assert!(
                matches!(
                    GeminiClient::parse_result(&text),
                    Err(PredictError::Schema(_))
                ),
                "parse accepted payload missing {}",
                field
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_index() {
        let text = WELL_FORMED.replace("1.8", "\"high\"");
        assert!(GeminiClient::parse_result(&text).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_risk_level() {
        let text = WELL_FORMED.replace("Normal", "Borderline");
        assert!(GeminiClient::parse_result(&text).is_err());
    }

    #[test]
    fn test_prompt_embeds_all_biomarkers() {
        let prompt = GeminiClient::build_prompt(&PredictionInput {
            sex: Sex::Female,
            glucose: 95.0,
            bmi: 24.5,
        });
        assert!(prompt.contains("Female"));
        assert!(prompt.contains("95 mg/dL"));
        assert!(prompt.contains("24.5 kg/m²"));
        assert!(prompt.contains("Normal < 2.5"));
    }

    #[test]
    fn test_schema_declares_all_fields_required() {
        let schema = serde_json::to_value(GeminiClient::response_schema()).unwrap();
        assert_eq!(schema["type"], "OBJECT");
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            ["homaIndex", "riskLevel", "riskColor", "explanation", "recommendations"]
        );
        let bands = schema["properties"]["riskLevel"]["enum"].as_array().unwrap();
        assert_eq!(bands.len(), 3);
    }

    #[test]
    fn test_first_text_handles_empty_candidates() {
        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(body.first_text().is_none());

        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(body.first_text().is_none());
    }
}
