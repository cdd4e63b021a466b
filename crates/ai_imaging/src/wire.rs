//! Wire format of the generations endpoint

use domain::CardImage;
use serde::{Deserialize, Serialize};

use crate::error::ImageGenerationError;

/// Request body
#[derive(Debug, Serialize)]
pub(crate) struct GenerationsRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub n: u8,
    pub size: &'a str,
    pub response_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
}

/// Every response shape the endpoint is known to produce
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GenerationsResponse {
    /// `{"data": [{url, revised_prompt?}, ...]}` or a single object under `data`
    Data { data: OneOrMany<DataImage> },
    /// Legacy chat-style `{"choices": [...]}`
    Choices { choices: Vec<Choice> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataImage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ErrorEnvelope {
    /// Provider message from a raw body, falling back to the body itself
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<Self>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string())
    }
}

impl GenerationsResponse {
    /// Parse a raw body
    pub fn parse(body: &str) -> Result<Self, ImageGenerationError> {
        serde_json::from_str(body).map_err(|e| {
            ImageGenerationError::InvalidResponse(format!("unrecognized response shape: {e}"))
        })
    }

    /// Normalize into ordered card images
    ///
    /// # Errors
    /// `InvalidResponse` if there are no images or an image has no location.
    pub fn into_images(self) -> Result<Vec<CardImage>, ImageGenerationError> {
        let images = match self {
            Self::Data { data } => data
                .into_vec()
                .into_iter()
                .enumerate()
                .map(|(i, image)| {
                    let url = image.url.filter(|url| !url.trim().is_empty());
                    let b64 = image.b64_json.filter(|b64| !b64.trim().is_empty());
                    let url = match (url, b64) {
                        (Some(url), _) => url,
                        (None, Some(b64)) => format!("data:image/png;base64,{b64}"),
                        (None, None) => return Err(missing_location(i)),
                    };
                    Ok(with_prompt(CardImage::new(url), image.revised_prompt))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Self::Choices { choices } => choices
                .into_iter()
                .enumerate()
                .map(|(i, choice)| {
                    let url = choice
                        .message
                        .and_then(|m| m.content)
                        .or(choice.text)
                        .or(choice.url)
                        .filter(|url| !url.trim().is_empty())
                        .ok_or_else(|| missing_location(i))?;
                    Ok(with_prompt(CardImage::new(url), choice.revised_prompt))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        if images.is_empty() {
            return Err(ImageGenerationError::InvalidResponse(
                "response contained no images".to_string(),
            ));
        }
        Ok(images)
    }
}

fn with_prompt(image: CardImage, revised_prompt: Option<String>) -> CardImage {
    match revised_prompt {
        Some(prompt) => image.with_revised_prompt(prompt),
        None => image,
    }
}

fn missing_location(index: usize) -> ImageGenerationError {
    ImageGenerationError::InvalidResponse(format!("image {index} has no url"))
}
