//api_version_v2

use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{TranslateError, status_error};

const FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";
const PRO_API_URL: &str = "https://api.deepl.com/v2/translate";

#[derive(Debug, Deserialize)]
struct TranslatedResponse {
    translations: Vec<TranslationResponse>,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct TranslationRequestBody<'a> {
    text: [&'a str; 1],
    source_lang: &'a str,
    target_lang: &'a str,
    tag_handling: &'static str,
    preserve_formatting: bool,
}

/// Free plan keys carry a `:fx` suffix
fn endpoint_for_key(api_key: &str) -> &'static str {
    if api_key.ends_with(":fx") {
        FREE_API_URL
    } else {
        PRO_API_URL
    }
}

///Translate a single text using the v2 api
pub fn translate_v2(
    agent: &Agent,
    api_url: Option<&str>,
    api_key: &str,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslateError> {
    let url = api_url.unwrap_or_else(|| endpoint_for_key(api_key));

    let json_body = TranslationRequestBody {
        text: [text],
        source_lang,
        target_lang,
        tag_handling: "xml",
        preserve_formatting: true,
    };

    let mut response = agent
        .post(url)
        .header("Authorization", format!("DeepL-Auth-Key {api_key}"))
        .send_json(&json_body)?;

    if !response.status().is_success() {
        return Err(status_error(&mut response));
    }

    let data = response.body_mut().read_json::<TranslatedResponse>()?;
    let translation = data
        .translations
        .into_iter()
        .next()
        .ok_or(TranslateError::EmptyResponse)?;

    Ok(decode_html_entities(&translation.text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{request_json, serve_once};
    use serde_json::json;
    use std::time::Duration;

    fn agent() -> Agent {
        Agent::new_with_config(
            Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(5)))
                .http_status_as_error(false)
                .build(),
        )
    }

    #[test]
    fn picks_endpoint_from_key() {
        assert_eq!(endpoint_for_key("abc-123:fx"), FREE_API_URL);
        assert_eq!(endpoint_for_key("abc-123"), PRO_API_URL);
    }

    #[test]
    fn test_translate_v2() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"translations":[{"detected_source_language":"EN","text":"Tom &amp; Jerry félin"}]}"#,
        );

        let translated = translate_v2(
            &agent(),
            Some(url.as_str()),
            "k:fx",
            "Tom & Jerry cat",
            "EN",
            "FR",
        );
        assert_eq!(translated.unwrap(), "Tom & Jerry félin");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /translate"));
        assert!(request.contains("DeepL-Auth-Key k:fx"));
        assert_eq!(
            request_json(&request),
            json!({
                "text": ["Tom & Jerry cat"],
                "source_lang": "EN",
                "target_lang": "FR",
                "tag_handling": "xml",
                "preserve_formatting": true
            })
        );
    }

    #[test]
    fn quota_error_is_reported() {
        let (url, server) = serve_once("456 Quota Exceeded", r#"{"message":"Quota exceeded"}"#);

        let err = translate_v2(&agent(), Some(url.as_str()), "k", "hello", "EN", "FR").unwrap_err();
        assert!(matches!(err, TranslateError::Status { status: 456, .. }));
        server.join().unwrap();
    }

    #[test]
    fn empty_translations_list() {
        let (url, server) = serve_once("200 OK", r#"{"translations":[]}"#);

        let err = translate_v2(&agent(), Some(url.as_str()), "k", "hello", "EN", "FR").unwrap_err();
        assert!(matches!(err, TranslateError::EmptyResponse));
        server.join().unwrap();
    }

    #[test]
    fn malformed_body() {
        let (url, server) = serve_once("200 OK", r#"{"oops": true}"#);

        let err = translate_v2(&agent(), Some(url.as_str()), "k", "hello", "EN", "FR").unwrap_err();
        assert!(matches!(err, TranslateError::Transport(_)));
        server.join().unwrap();
    }
}
