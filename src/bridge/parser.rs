use crate::models::{is_plausible_base64, to_data_url, GenerateContentResponse, GenerationResult};

/// Turns a model response into a [`GenerationResult`].
///
/// Only the first candidate is read. Its parts are scanned in order: the first
/// inline image with a plausible payload wins, every non-empty text part is
/// collected and joined with newlines.
pub fn parse_generation_response(response: &GenerateContentResponse) -> GenerationResult {
    let candidate_count = response.candidates.len();

    let parts = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or_default();

    let mut image_url: Option<String> = None;
    let mut texts: Vec<&str> = Vec::new();

    for part in parts {
        if let Some(inline) = &part.inline_data {
            if image_url.is_some() {
                continue;
            }
            if is_plausible_base64(&inline.data) {
                image_url = Some(to_data_url(&inline.mime_type, &inline.data));
            } else {
                log::debug!(
                    "Skipping inline part with implausible payload ({} chars)",
                    inline.data.len()
                );
            }
        } else if let Some(text) = part.text.as_deref().filter(|t| !t.is_empty()) {
            texts.push(text);
        }
    }

    let text = if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    };

    match image_url {
        Some(image_url) => GenerationResult::Generated { image_url, text },
        None => {
            log::warn!(
                "Model returned no usable image ({} candidates)",
                candidate_count
            );
            GenerationResult::no_image(text, candidate_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Content, Part, NO_IMAGE_FALLBACK};

    fn image_data(fill: char) -> String {
        std::iter::repeat(fill).take(160).collect()
    }

    fn candidate(parts: Vec<Part>) -> Candidate {
        Candidate {
            content: Some(Content {
                role: Some("model".into()),
                parts,
            }),
            finish_reason: Some("STOP".into()),
        }
    }

    fn response(candidates: Vec<Candidate>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates,
            model_version: None,
        }
    }

    #[test]
    fn test_text_and_image() {
        let data = image_data('A');
        let result = parse_generation_response(&response(vec![candidate(vec![
            Part::text("Here you go"),
            Part::inline("image/png", data.clone()),
        ])]));

        assert_eq!(
            result,
            GenerationResult::Generated {
                image_url: format!("data:image/png;base64,{}", data),
                text: Some("Here you go".into()),
            }
        );
    }

    #[test]
    fn test_only_first_candidate_is_inspected() {
        let result = parse_generation_response(&response(vec![
            candidate(vec![Part::text("first")]),
            candidate(vec![Part::inline("image/png", image_data('B'))]),
        ]));

        assert_eq!(
            result,
            GenerationResult::NoImage {
                message: "first".into(),
                candidate_count: 2,
            }
        );
    }

    #[test]
    fn test_first_plausible_image_wins() {
        let result = parse_generation_response(&response(vec![candidate(vec![
            Part::inline("image/png", "tiny"),
            Part::inline("image/jpeg", image_data('C')),
            Part::inline("image/webp", image_data('D')),
        ])]));

        assert_eq!(
            result.image_url(),
            Some(format!("data:image/jpeg;base64,{}", image_data('C')).as_str())
        );
    }

    #[test]
    fn test_text_parts_are_joined_after_image_found() {
        let result = parse_generation_response(&response(vec![candidate(vec![
            Part::text("line one"),
            Part::inline("image/png", image_data('E')),
            Part::text(""),
            Part::text("line two"),
        ])]));

        assert_eq!(result.text(), Some("line one\nline two"));
        assert!(result.is_success());
    }

    #[test]
    fn test_no_image_carries_text() {
        let result = parse_generation_response(&response(vec![candidate(vec![
            Part::text("I can't edit photos of people."),
        ])]));

        assert_eq!(
            result,
            GenerationResult::NoImage {
                message: "I can't edit photos of people.".into(),
                candidate_count: 1,
            }
        );
    }

    #[test]
    fn test_no_candidates_uses_fallback() {
        let result = parse_generation_response(&response(vec![]));
        assert_eq!(
            result,
            GenerationResult::NoImage {
                message: NO_IMAGE_FALLBACK.into(),
                candidate_count: 0,
            }
        );
    }

    #[test]
    fn test_candidate_without_content() {
        let result = parse_generation_response(&response(vec![Candidate::default()]));
        assert_eq!(result.text(), Some(NO_IMAGE_FALLBACK));
    }

    #[test]
    fn test_parses_wire_json() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "caption"},
                        {"inlineData": {"mimeType": "image/png", "data": image_data('F')}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.5-flash-image-preview"
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let result = parse_generation_response(&parsed);
        assert!(result.is_success());
        assert_eq!(result.text(), Some("caption"));
    }
}
