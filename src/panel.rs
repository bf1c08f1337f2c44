//! Boolean open/closed panels (mobile menu, chatbot minimize) with their class flags.

/// A panel whose trigger and body carry class flags mirroring a single boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelToggle {
    open: bool,
    trigger_class: &'static str,
    panel_class: &'static str,
}

impl PanelToggle {
    pub const fn new(trigger_class: &'static str, panel_class: &'static str) -> Self {
        Self {
            open: false,
            trigger_class,
            panel_class,
        }
    }

    /// Mobile navigation: `.menu-btn.active` / `.nav.mobile-open`.
    pub const fn mobile_menu() -> Self {
        Self::new("active", "mobile-open")
    }

    /// Chatbot minimize button: `.chatbot-minimize.active` / `.chatbot.minimized`.
    pub const fn chatbot_minimizer() -> Self {
        Self::new("active", "minimized")
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Document click handling for panels that close on outside clicks.
    /// Returns `true` when the click closed the panel.
    pub fn close_on_outside_click(&mut self, inside_trigger: bool, inside_panel: bool) -> bool {
        if inside_trigger || inside_panel || !self.open {
            return false;
        }
        self.open = false;
        true
    }

    /// Class flag for the trigger element, present only while open.
    pub fn trigger_flag(&self) -> Option<&'static str> {
        self.open.then_some(self.trigger_class)
    }

    /// Class flag for the panel element, present only while open.
    pub fn panel_flag(&self) -> Option<&'static str> {
        self.open.then_some(self.panel_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_everything() {
        let original = PanelToggle::mobile_menu();
        let mut panel = original;
        panel.toggle();
        assert!(panel.is_open());
        assert_eq!(panel.trigger_flag(), Some("active"));
        assert_eq!(panel.panel_flag(), Some("mobile-open"));
        panel.toggle();
        assert_eq!(panel, original);
        assert_eq!(panel.trigger_flag(), None);
        assert_eq!(panel.panel_flag(), None);
    }

    #[test]
    fn outside_click_closes_open_menu() {
        let mut panel = PanelToggle::mobile_menu();
        panel.toggle();
        assert!(!panel.close_on_outside_click(true, false));
        assert!(!panel.close_on_outside_click(false, true));
        assert!(panel.is_open());
        assert!(panel.close_on_outside_click(false, false));
        assert!(!panel.is_open());
        assert!(!panel.close_on_outside_click(false, false));
    }
}
