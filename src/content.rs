//! Embedded site content catalog.
//!
//! All copy shown by the interactive pieces (slides, product cards, news, events, insurance
//! lines, chatbot script) lives in `site.json` and is parsed once at startup.

use log::info;
use serde::Deserialize;
use std::fmt;

const SITE_JSON: &str = include_str!("site.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Slide {
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    /// Form modal opened by the call to action.
    pub cta_form: String,
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub title: String,
    pub summary: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsItem {
    pub tag: String,
    pub title: String,
    pub summary: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventItem {
    pub tag: String,
    pub name: String,
    pub date: String,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsuranceLine {
    pub tag: String,
    pub label: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatOption {
    pub tag: String,
    pub label: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatbotScript {
    pub greeting: String,
    pub prompt: String,
    pub options: Vec<ChatOption>,
    /// Answer for tags that have no scripted response.
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteContent {
    pub slides: Vec<Slide>,
    pub products: Vec<Product>,
    pub card_detail: String,
    pub news: Vec<NewsItem>,
    pub events: Vec<EventItem>,
    pub insurance: Vec<InsuranceLine>,
    pub chatbot: ChatbotScript,
}

#[derive(Debug)]
pub enum ContentError {
    Parse(serde_json::Error),
    Empty(&'static str),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Parse(e) => write!(f, "Failed to parse site content: {}", e),
            ContentError::Empty(section) => write!(f, "Site content section '{}' is empty", section),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Parse(e) => Some(e),
            ContentError::Empty(_) => None,
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::Parse(e)
    }
}

impl SiteContent {
    /// Parse the catalog compiled into the binary.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(SITE_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: SiteContent = serde_json::from_str(json)?;
        if content.slides.is_empty() {
            return Err(ContentError::Empty("slides"));
        }
        if content.chatbot.options.is_empty() {
            return Err(ContentError::Empty("chatbot.options"));
        }
        info!(
            "Loaded site content: {} slides, {} products, {} news, {} events",
            content.slides.len(),
            content.products.len(),
            content.news.len(),
            content.events.len()
        );
        Ok(content)
    }

    /// Scripted chatbot answer for `tag`, or the generic fallback.
    pub fn chatbot_response(&self, tag: &str) -> &str {
        self.chatbot
            .options
            .iter()
            .find(|o| o.tag == tag)
            .map(|o| o.response.as_str())
            .unwrap_or(&self.chatbot.fallback)
    }

    /// Display name of an event; unknown tags are shown as-is.
    pub fn event_name<'a>(&'a self, tag: &'a str) -> &'a str {
        self.events
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| e.name.as_str())
            .unwrap_or(tag)
    }

    pub fn news_item(&self, tag: &str) -> Option<&NewsItem> {
        self.news.iter().find(|n| n.tag == tag)
    }

    pub fn insurance_line(&self, tag: &str) -> Option<&InsuranceLine> {
        self.insurance.iter().find(|i| i.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn site() -> SiteContent {
        SiteContent::embedded().expect("embedded catalog parses")
    }

    #[test]
    fn chatbot_responses_are_keyed_by_tag() {
        let site = site();
        assert_eq!(
            site.chatbot_response("seguros"),
            "Ofrecemos seguros de vida, hogar, vehículos y planes exequiales."
        );
        assert_eq!(
            site.chatbot_response("credito"),
            "Nuestros créditos tienen tasas desde 1.26% N.M.V. ¿Te gustaría simular tu crédito?"
        );
    }

    #[test]
    fn unknown_chatbot_tag_falls_back() {
        assert_eq!(
            site().chatbot_response("hipotecas"),
            "Gracias por tu consulta. Un asesor te contactará pronto."
        );
    }

    #[test]
    fn event_names_fall_back_to_tag() {
        let site = site();
        assert_eq!(site.event_name("salud"), "Jornada de Salud y Bienestar");
        assert_eq!(site.event_name("carnaval"), "carnaval");
    }

    #[test]
    fn news_lookup_is_optional() {
        let site = site();
        assert_eq!(
            site.news_item("guitarra").map(|n| n.title.as_str()),
            Some("Curso de Guitarra Gratuito")
        );
        assert!(site.news_item("desconocido").is_none());
    }

    #[test]
    fn slide_targets_are_known_forms() {
        for slide in site().slides {
            assert!(
                crate::forms::FormKind::from_modal_id(&slide.cta_form).is_some(),
                "{} points at {}",
                slide.title,
                slide.cta_form
            );
        }
    }

    #[test]
    fn empty_slides_are_rejected() {
        let json = SITE_JSON.replacen("\"slides\": [", "\"slides\": [], \"unused\": [", 1);
        assert!(matches!(
            SiteContent::from_json(&json),
            Err(ContentError::Empty("slides"))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SiteContent::from_json("{"),
            Err(ContentError::Parse(_))
        ));
    }
}
