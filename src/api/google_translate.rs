//api_version_v2

use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{TranslateError, status_error};

const API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Deserialize)]
struct TranslatedResponse {
    data: Data,
}

#[derive(Debug, Deserialize)]
struct Data {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct TranslationRequestBody<'a> {
    q: [&'a str; 1],
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

///Translate a single text using the Cloud Translation v2 api
pub fn translate_v2(
    agent: &Agent,
    api_url: Option<&str>,
    api_key: &str,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslateError> {
    let json_body = TranslationRequestBody {
        q: [text],
        source: source_lang,
        target: target_lang,
        format: "text",
    };

    let mut response = agent
        .post(api_url.unwrap_or(API_URL))
        .query("key", api_key)
        .send_json(&json_body)?;

    if !response.status().is_success() {
        return Err(status_error(&mut response));
    }

    let data = response.body_mut().read_json::<TranslatedResponse>()?;
    let translation = data
        .data
        .translations
        .into_iter()
        .next()
        .ok_or(TranslateError::EmptyResponse)?;

    Ok(decode_html_entities(&translation.translated_text).to_string())
}
