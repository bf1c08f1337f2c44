//! Scripted chatbot widget state.

use crate::content::SiteContent;
use crate::modal::ModalSlot;
use crate::panel::PanelToggle;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Chatbot {
    minimizer: PanelToggle,
    modal: ModalSlot<()>,
}

impl Default for Chatbot {
    fn default() -> Self {
        Self {
            minimizer: PanelToggle::chatbot_minimizer(),
            modal: ModalSlot::new(),
        }
    }
}

impl Chatbot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_minimized(&self) -> bool {
        self.minimizer.is_open()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn toggle_minimized(&mut self) {
        self.minimizer.toggle();
    }

    /// Class flag for the widget container.
    pub fn widget_flag(&self) -> Option<&'static str> {
        self.minimizer.panel_flag()
    }

    pub fn minimize_label(&self) -> &'static str {
        if self.is_minimized() {
            "+"
        } else {
            "−"
        }
    }

    /// Click on the widget body. Opens the options modal unless minimized or already open.
    pub fn click(&mut self) -> bool {
        if self.is_minimized() {
            debug!("Chatbot minimized, ignoring click");
            return false;
        }
        self.modal.open(())
    }

    /// Pick a quick option: closes the modal and returns the scripted answer.
    pub fn choose<'a>(&mut self, content: &'a SiteContent, tag: &str) -> Option<&'a str> {
        self.modal.close()?;
        Some(content.chatbot_response(tag))
    }

    pub fn close(&mut self) {
        self.modal.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteContent {
        SiteContent::embedded().unwrap()
    }

    #[test]
    fn seguros_option_answers_and_closes() {
        let site = site();
        let mut bot = Chatbot::new();
        assert!(bot.click());
        assert_eq!(
            bot.choose(&site, "seguros"),
            Some("Ofrecemos seguros de vida, hogar, vehículos y planes exequiales.")
        );
        assert!(!bot.is_modal_open());
    }

    #[test]
    fn repeated_clicks_do_not_stack_modals() {
        let mut bot = Chatbot::new();
        assert!(bot.click());
        assert!(!bot.click());
        bot.close();
        assert!(bot.click());
    }

    #[test]
    fn minimized_chatbot_ignores_clicks() {
        let mut bot = Chatbot::new();
        bot.toggle_minimized();
        assert_eq!(bot.minimize_label(), "+");
        assert_eq!(bot.widget_flag(), Some("minimized"));
        assert!(!bot.click());
        bot.toggle_minimized();
        assert_eq!(bot.minimize_label(), "−");
        assert!(bot.click());
    }

    #[test]
    fn choosing_without_open_modal_is_ignored() {
        let site = site();
        let mut bot = Chatbot::new();
        assert_eq!(bot.choose(&site, "credito"), None);
    }
}
