use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not find JSON in the analysis result")]
    MissingBlock,

    #[error("Invalid JSON in the analysis result")]
    InvalidJson(#[source] serde_json::Error),
}

/// Pull the JSON object out of the first ```` ```json ... ``` ```` block in
/// the model's answer and parse it.
///
/// Only a lowercase `json` tag is recognised, and the first fence wins.
///
/// # Errors
///
/// `MissingBlock` when no fenced block exists, `InvalidJson` when its body
/// does not parse.
pub fn extract_json(text: &str) -> Result<JsonValue, ExtractError> {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)```json(.*?)```").unwrap());

    let inner = FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(ExtractError::MissingBlock)?;

    serde_json::from_str(inner.as_str()).map_err(ExtractError::InvalidJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_block_with_prose_around_it() {
        let text = "Sure! Here is what I found:\n```json\n{\"brand\": \"Bosch\", \"year\": \"2015\", \"freestanding\": true, \"hasFridge\": false, \"totalVolume\": \"60\"}\n```\nLet me know if you need more.";
        let v = extract_json(text).unwrap();
        assert_eq!(
            v,
            json!({
                "brand": "Bosch",
                "year": "2015",
                "freestanding": true,
                "hasFridge": false,
                "totalVolume": "60"
            })
        );
    }

    #[test]
    fn first_of_several_blocks_wins() {
        let text = "```json\n{\"brand\": \"A\"}\n```\nor maybe\n```json\n{\"brand\": \"B\"}\n```";
        assert_eq!(extract_json(text).unwrap()["brand"], "A");
    }

    #[test]
    fn bare_json_is_not_accepted() {
        let err = extract_json("{\"brand\": \"Miele\"}").unwrap_err();
        assert!(matches!(err, ExtractError::MissingBlock));
    }

    #[test]
    fn untagged_or_uppercase_fence_is_not_accepted() {
        assert!(matches!(
            extract_json("```\n{\"brand\": \"Miele\"}\n```"),
            Err(ExtractError::MissingBlock)
        ));
        assert!(matches!(
            extract_json("```JSON\n{\"brand\": \"Miele\"}\n```"),
            Err(ExtractError::MissingBlock)
        ));
    }

    #[test]
    fn unterminated_fence_is_missing() {
        assert!(matches!(
            extract_json("```json\n{\"brand\": \"Miele\"}"),
            Err(ExtractError::MissingBlock)
        ));
    }

    #[test]
    fn broken_json_inside_fence() {
        let err = extract_json("```json\n{\"brand\": \"Miele\",}\n```").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
        assert_eq!(err.to_string(), "Invalid JSON in the analysis result");
    }

    #[test]
    fn empty_fence_is_invalid_json() {
        assert!(matches!(
            extract_json("```json```"),
            Err(ExtractError::InvalidJson(_))
        ));
    }
}
