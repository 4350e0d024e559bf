//api_version_v1

use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{TranslateError, status_error};

const API_URL: &str = "https://libretranslate.com/translate";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationResponse {
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct TranslationRequestBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    api_key: &'a str,
}

///Translate a single text using the v1 api
pub fn translate_v1(
    agent: &Agent,
    api_url: Option<&str>,
    api_key: &str,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslateError> {
    let json_body = TranslationRequestBody {
        q: text,
        source: source_lang,
        target: target_lang,
        format: "text",
        api_key,
    };

    let mut response = agent
        .post(api_url.unwrap_or(API_URL))
        .send_json(&json_body)?;

    if !response.status().is_success() {
        return Err(status_error(&mut response));
    }

    let data = response.body_mut().read_json::<TranslationResponse>()?;

    Ok(decode_html_entities(&data.translated_text).to_string())
}
