use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(u64),
}

/// Accepts `"123456"` as well as `123456`.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Integer(n) => Ok(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "deserialize_string_or_number")]
        code: String,
    }

    #[test]
    fn test_accepts_strings_and_numbers() {
        let payload: Payload = serde_json::from_str(r#"{"code":"012345"}"#).unwrap();
        assert_eq!(payload.code, "012345");
        let payload: Payload = serde_json::from_str(r#"{"code":654321}"#).unwrap();
        assert_eq!(payload.code, "654321");
        assert!(serde_json::from_str::<Payload>(r#"{"code":true}"#).is_err());
    }
}
