//! Page-level overlay state owned by the application root.
//!
//! Which form modal is showing, which product/news/confirmation/search overlays are up,
//! and the requests forwarded to form components (external submits, insurance presets).

use crate::bridge::SiteCommand;
use crate::content::{NewsItem, SiteContent};
use crate::forms::FormKind;
use crate::modal::ModalSlot;
use crate::notice::Confirmation;
use log::debug;
use std::collections::BTreeMap;
use std::rc::Rc;
use yew::Reducible;

/// Insurance type pushed into the insurance form when it is opened for a specific line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsurancePreset {
    /// Increases on every request so repeated presets of the same type still apply.
    pub serial: u64,
    pub insurance_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SiteAction {
    Command(SiteCommand),
    /// Escape key: close whichever form is showing.
    CloseActiveForm,
    OpenProduct(String),
    CloseProduct,
    CloseNews,
    CloseConfirmation,
    OpenSearch,
    CloseSearch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteState {
    content: Rc<SiteContent>,
    active_form: ModalSlot<FormKind>,
    insurance_preset: Option<InsurancePreset>,
    submit_requests: BTreeMap<FormKind, u64>,
    product: ModalSlot<String>,
    news: ModalSlot<String>,
    confirmation: ModalSlot<Confirmation>,
    search: ModalSlot<()>,
    serial: u64,
}

impl SiteState {
    pub fn new(content: Rc<SiteContent>) -> Self {
        Self {
            content,
            active_form: ModalSlot::new(),
            insurance_preset: None,
            submit_requests: BTreeMap::new(),
            product: ModalSlot::new(),
            news: ModalSlot::new(),
            confirmation: ModalSlot::new(),
            search: ModalSlot::new(),
            serial: 0,
        }
    }

    pub fn content(&self) -> &Rc<SiteContent> {
        &self.content
    }

    pub fn apply(&mut self, action: SiteAction) {
        match action {
            SiteAction::Command(command) => self.apply_command(command),
            SiteAction::CloseActiveForm => {
                self.active_form.close();
            }
            SiteAction::OpenProduct(title) => {
                self.product.open(title);
            }
            SiteAction::CloseProduct => {
                self.product.close();
            }
            SiteAction::CloseNews => {
                self.news.close();
            }
            SiteAction::CloseConfirmation => {
                self.confirmation.close();
            }
            SiteAction::OpenSearch => {
                self.search.open(());
            }
            SiteAction::CloseSearch => {
                self.search.close();
            }
        }
    }

    fn apply_command(&mut self, command: SiteCommand) {
        match command {
            SiteCommand::OpenForm(kind) => {
                if let Some(previous) = self.active_form.replace(kind) {
                    debug!("Form {} replaced by {}", previous, kind);
                }
            }
            SiteCommand::CloseForm(kind) => {
                self.active_form.close_if(&kind);
            }
            SiteCommand::SubmitForm(kind) => {
                let serial = self.next_serial();
                self.submit_requests.insert(kind, serial);
            }
            SiteCommand::OpenInsuranceForm(insurance_type) => {
                if self.content.insurance_line(&insurance_type).is_none() {
                    debug!("No insurance line tagged '{}'", insurance_type);
                }
                self.active_form.replace(FormKind::Insurance);
                let serial = self.next_serial();
                self.insurance_preset = Some(InsurancePreset {
                    serial,
                    insurance_type,
                });
            }
            SiteCommand::RegisterEvent(tag) => {
                let name = self.content.event_name(&tag).to_string();
                self.confirmation.open(Confirmation::register_event(&name));
            }
            SiteCommand::ShowNews(tag) => {
                if self.content.news_item(&tag).is_some() {
                    self.news.open(tag);
                } else {
                    debug!("No news item tagged '{}'", tag);
                }
            }
        }
    }

    fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    pub fn active_form(&self) -> Option<FormKind> {
        self.active_form.current().copied()
    }

    pub fn is_form_open(&self, kind: FormKind) -> bool {
        self.active_form() == Some(kind)
    }

    /// Page scrolling is locked while any form modal is showing.
    pub fn body_scroll_locked(&self) -> bool {
        self.active_form.is_open()
    }

    pub fn insurance_preset(&self) -> Option<&InsurancePreset> {
        self.insurance_preset.as_ref()
    }

    /// Serial of the latest external submit request for `kind`, 0 if none.
    pub fn submit_request(&self, kind: FormKind) -> u64 {
        self.submit_requests.get(&kind).copied().unwrap_or(0)
    }

    pub fn product(&self) -> Option<&str> {
        self.product.current().map(String::as_str)
    }

    pub fn news_item(&self) -> Option<&NewsItem> {
        self.news
            .current()
            .and_then(|tag| self.content.news_item(tag))
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.current()
    }

    pub fn is_search_open(&self) -> bool {
        self.search.is_open()
    }
}

impl Reducible for SiteState {
    type Action = SiteAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        if next == *self {
            return self;
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::VehicleSection;
    use pretty_assertions::assert_eq;

    fn state() -> SiteState {
        SiteState::new(Rc::new(SiteContent::embedded().unwrap()))
    }

    fn command(state: &mut SiteState, command: SiteCommand) {
        state.apply(SiteAction::Command(command));
    }

    #[test]
    fn open_and_close_form_lock_scrolling() {
        let mut state = state();
        command(&mut state, SiteCommand::OpenForm(FormKind::Credit));
        assert!(state.is_form_open(FormKind::Credit));
        assert!(state.body_scroll_locked());

        command(&mut state, SiteCommand::CloseForm(FormKind::Savings));
        assert!(state.is_form_open(FormKind::Credit));

        command(&mut state, SiteCommand::CloseForm(FormKind::Credit));
        assert_eq!(state.active_form(), None);
        assert!(!state.body_scroll_locked());
    }

    #[test]
    fn opening_second_form_replaces_first() {
        let mut state = state();
        command(&mut state, SiteCommand::OpenForm(FormKind::Credit));
        command(&mut state, SiteCommand::OpenForm(FormKind::Store));
        assert_eq!(state.active_form(), Some(FormKind::Store));
        state.apply(SiteAction::CloseActiveForm);
        assert_eq!(state.active_form(), None);
    }

    #[test]
    fn insurance_form_preset_for_auto() {
        let mut state = state();
        command(&mut state, SiteCommand::OpenInsuranceForm("auto".into()));
        assert!(state.is_form_open(FormKind::Insurance));
        let preset = state.insurance_preset().unwrap().clone();
        assert_eq!(preset.insurance_type, "auto");
        assert_eq!(
            VehicleSection::for_insurance_type(&preset.insurance_type),
            VehicleSection {
                visible: true,
                year_required: true
            }
        );

        command(&mut state, SiteCommand::OpenInsuranceForm("vida".into()));
        let next = state.insurance_preset().unwrap();
        assert!(next.serial > preset.serial);
        assert_eq!(
            VehicleSection::for_insurance_type(&next.insurance_type),
            VehicleSection::default()
        );
    }

    #[test]
    fn submit_requests_are_serialized_per_form() {
        let mut state = state();
        assert_eq!(state.submit_request(FormKind::Contact), 0);
        command(&mut state, SiteCommand::SubmitForm(FormKind::Contact));
        let first = state.submit_request(FormKind::Contact);
        command(&mut state, SiteCommand::SubmitForm(FormKind::Contact));
        assert!(state.submit_request(FormKind::Contact) > first);
        assert_eq!(state.submit_request(FormKind::Cdat), 0);
    }

    #[test]
    fn register_event_asks_for_confirmation_once() {
        let mut state = state();
        command(&mut state, SiteCommand::RegisterEvent("vivienda".into()));
        command(&mut state, SiteCommand::RegisterEvent("salud".into()));
        assert_eq!(
            state.confirmation().map(|c| c.question.as_str()),
            Some("¿Deseas registrarte para el evento \"Feria de Vivienda\"?")
        );
        state.apply(SiteAction::CloseConfirmation);
        assert_eq!(state.confirmation(), None);
    }

    #[test]
    fn unknown_news_is_ignored() {
        let mut state = state();
        command(&mut state, SiteCommand::ShowNews("loteria".into()));
        assert_eq!(state.news_item(), None);
        command(&mut state, SiteCommand::ShowNews("baile".into()));
        assert_eq!(
            state.news_item().map(|n| n.title.as_str()),
            Some("Cursos de Baile para Pensionados")
        );
    }

    #[test]
    fn product_modal_does_not_stack() {
        let mut state = state();
        state.apply(SiteAction::OpenProduct("Créditos".into()));
        state.apply(SiteAction::OpenProduct("Ahorro".into()));
        assert_eq!(state.product(), Some("Créditos"));
        state.apply(SiteAction::CloseProduct);
        assert_eq!(state.product(), None);
    }

    #[test]
    fn unchanged_state_keeps_identity() {
        let state = Rc::new(state());
        let same = state.clone().reduce(SiteAction::CloseSearch);
        assert!(Rc::ptr_eq(&state, &same));
    }
}
