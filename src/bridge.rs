//! Global entry points for inline `onclick`/`onsubmit` attributes.
//!
//! Markup outside the Yew tree (CMS snippets, legacy pages) calls `window.openForm(...)` and
//! friends. [`register`] installs those functions on `window` and routes them, like the
//! module's `wasm_bindgen` exports, as a [`SiteCommand`] to the mounted application.

use crate::forms::FormKind;
use log::{debug, warn};
use std::cell::RefCell;
use std::fmt;
use wasm_bindgen::prelude::*;
use yew::Callback;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteCommand {
    OpenForm(FormKind),
    CloseForm(FormKind),
    SubmitForm(FormKind),
    /// Open the insurance form preset to an insurance type tag.
    OpenInsuranceForm(String),
    RegisterEvent(String),
    ShowNews(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    NotMounted,
    UnknownForm(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NotMounted => write!(f, "Site application is not mounted"),
            BridgeError::UnknownForm(id) => write!(f, "Unknown form id '{}'", id),
        }
    }
}

impl std::error::Error for BridgeError {}

thread_local! {
    static DISPATCHER: RefCell<Option<Callback<SiteCommand>>> = const { RefCell::new(None) };
}

/// One of the functions installed on `window` for inline trigger attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalFunction {
    OpenForm,
    CloseForm,
    Submit(FormKind),
    OpenInsuranceForm,
    RegisterEvent,
    ShowNewsModal,
}

impl GlobalFunction {
    pub const ALL: [GlobalFunction; 11] = [
        GlobalFunction::OpenForm,
        GlobalFunction::CloseForm,
        GlobalFunction::Submit(FormKind::Credit),
        GlobalFunction::Submit(FormKind::Savings),
        GlobalFunction::Submit(FormKind::Contact),
        GlobalFunction::Submit(FormKind::Insurance),
        GlobalFunction::Submit(FormKind::Cdat),
        GlobalFunction::Submit(FormKind::Store),
        GlobalFunction::OpenInsuranceForm,
        GlobalFunction::RegisterEvent,
        GlobalFunction::ShowNewsModal,
    ];

    /// Property name on `window`.
    pub fn name(self) -> &'static str {
        match self {
            GlobalFunction::OpenForm => "openForm",
            GlobalFunction::CloseForm => "closeForm",
            GlobalFunction::Submit(FormKind::Credit) => "submitCreditForm",
            GlobalFunction::Submit(FormKind::Savings) => "submitSavingsForm",
            GlobalFunction::Submit(FormKind::Contact) => "submitContactForm",
            GlobalFunction::Submit(FormKind::Insurance) => "submitInsuranceForm",
            GlobalFunction::Submit(FormKind::Cdat) => "submitCdatForm",
            GlobalFunction::Submit(FormKind::Store) => "submitStoreForm",
            GlobalFunction::OpenInsuranceForm => "openInsuranceForm",
            GlobalFunction::RegisterEvent => "registerEvent",
            GlobalFunction::ShowNewsModal => "showNewsModal",
        }
    }

    /// Command for a call with the string argument `arg`. Submit handlers ignore it.
    pub fn command(self, arg: &str) -> Result<SiteCommand, BridgeError> {
        Ok(match self {
            GlobalFunction::OpenForm => SiteCommand::OpenForm(form_from_id(arg)?),
            GlobalFunction::CloseForm => SiteCommand::CloseForm(form_from_id(arg)?),
            GlobalFunction::Submit(kind) => SiteCommand::SubmitForm(kind),
            GlobalFunction::OpenInsuranceForm => SiteCommand::OpenInsuranceForm(arg.to_string()),
            GlobalFunction::RegisterEvent => SiteCommand::RegisterEvent(arg.to_string()),
            GlobalFunction::ShowNewsModal => SiteCommand::ShowNews(arg.to_string()),
        })
    }

    fn invoke(self, arg: &str) {
        report(self.command(arg).and_then(dispatch));
    }
}

/// `window` properties pointing at the entry points, removed again on drop.
#[cfg(target_arch = "wasm32")]
mod window_globals {
    use super::GlobalFunction;
    use js_sys::Reflect;
    use log::warn;
    use wasm_bindgen::prelude::*;

    pub(super) struct Installed {
        functions: Vec<(GlobalFunction, Closure<dyn Fn(JsValue)>)>,
    }

    fn call(function: GlobalFunction, arg: &JsValue) {
        if let GlobalFunction::Submit(_) = function {
            if let Some(event) = arg.dyn_ref::<web_sys::Event>() {
                event.prevent_default();
            }
        }
        function.invoke(&arg.as_string().unwrap_or_default());
    }

    pub(super) fn install() -> Installed {
        let global = js_sys::global();
        let functions = GlobalFunction::ALL
            .iter()
            .filter_map(|&function| {
                let closure =
                    Closure::<dyn Fn(JsValue)>::new(move |arg: JsValue| call(function, &arg));
                let key = JsValue::from_str(function.name());
                match Reflect::set(&global, &key, closure.as_ref()) {
                    Ok(_) => Some((function, closure)),
                    Err(e) => {
                        warn!("Could not install window.{}: {:?}", function.name(), e);
                        None
                    }
                }
            })
            .collect();
        Installed { functions }
    }

    impl Drop for Installed {
        fn drop(&mut self) {
            let global = js_sys::global();
            for (function, _) in &self.functions {
                let _ = Reflect::delete_property(&global, &JsValue::from_str(function.name()));
            }
        }
    }
}

/// Keeps the dispatcher registered and, in the browser, the `window` entry points installed.
/// Dropping it undoes both.
#[must_use = "the dispatcher is unregistered when the registration is dropped"]
pub struct Registration {
    #[cfg(target_arch = "wasm32")]
    _globals: window_globals::Installed,
    _private: (),
}

impl Drop for Registration {
    fn drop(&mut self) {
        DISPATCHER.with(|d| d.borrow_mut().take());
    }
}

/// Route global commands to `callback` until the returned registration is dropped.
/// A later registration replaces an earlier one.
pub fn register(callback: Callback<SiteCommand>) -> Registration {
    DISPATCHER.with(|d| {
        if d.borrow_mut().replace(callback).is_some() {
            warn!("Replacing an existing command dispatcher");
        }
    });
    Registration {
        #[cfg(target_arch = "wasm32")]
        _globals: window_globals::install(),
        _private: (),
    }
}

pub fn dispatch(command: SiteCommand) -> Result<(), BridgeError> {
    // Clone out of the cell so the callback may re-enter the bridge.
    let callback = DISPATCHER
        .with(|d| d.borrow().clone())
        .ok_or(BridgeError::NotMounted)?;
    debug!("Dispatching {:?}", command);
    callback.emit(command);
    Ok(())
}

fn form_from_id(form_id: &str) -> Result<FormKind, BridgeError> {
    FormKind::from_modal_id(form_id).ok_or_else(|| BridgeError::UnknownForm(form_id.to_string()))
}

fn report(result: Result<(), BridgeError>) {
    if let Err(e) = result {
        warn!("{}", e);
    }
}

#[wasm_bindgen(js_name = openForm)]
pub fn open_form(form_id: &str) {
    GlobalFunction::OpenForm.invoke(form_id);
}

#[wasm_bindgen(js_name = closeForm)]
pub fn close_form(form_id: &str) {
    GlobalFunction::CloseForm.invoke(form_id);
}

fn submit_form(kind: FormKind, event: &web_sys::Event) {
    event.prevent_default();
    GlobalFunction::Submit(kind).invoke("");
}

#[wasm_bindgen(js_name = submitCreditForm)]
pub fn submit_credit_form(event: web_sys::Event) {
    submit_form(FormKind::Credit, &event);
}

#[wasm_bindgen(js_name = submitSavingsForm)]
pub fn submit_savings_form(event: web_sys::Event) {
    submit_form(FormKind::Savings, &event);
}

#[wasm_bindgen(js_name = submitContactForm)]
pub fn submit_contact_form(event: web_sys::Event) {
    submit_form(FormKind::Contact, &event);
}

#[wasm_bindgen(js_name = submitInsuranceForm)]
pub fn submit_insurance_form(event: web_sys::Event) {
    submit_form(FormKind::Insurance, &event);
}

#[wasm_bindgen(js_name = submitCdatForm)]
pub fn submit_cdat_form(event: web_sys::Event) {
    submit_form(FormKind::Cdat, &event);
}

#[wasm_bindgen(js_name = submitStoreForm)]
pub fn submit_store_form(event: web_sys::Event) {
    submit_form(FormKind::Store, &event);
}

#[wasm_bindgen(js_name = openInsuranceForm)]
pub fn open_insurance_form(insurance_type: &str) {
    GlobalFunction::OpenInsuranceForm.invoke(insurance_type);
}

#[wasm_bindgen(js_name = registerEvent)]
pub fn register_event(event_type: &str) {
    GlobalFunction::RegisterEvent.invoke(event_type);
}

#[wasm_bindgen(js_name = showNewsModal)]
pub fn show_news_modal(news_type: &str) {
    GlobalFunction::ShowNewsModal.invoke(news_type);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn recorder() -> (Callback<SiteCommand>, Rc<RefCell<Vec<SiteCommand>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (
            Callback::from(move |c| sink.borrow_mut().push(c)),
            seen,
        )
    }

    #[test]
    fn exports_forward_commands() {
        let (callback, seen) = recorder();
        let _registration = register(callback);

        open_form("credit-form");
        close_form("store-form");
        open_insurance_form("auto");
        register_event("salud");
        show_news_modal("padre");

        assert_eq!(
            *seen.borrow(),
            vec![
                SiteCommand::OpenForm(FormKind::Credit),
                SiteCommand::CloseForm(FormKind::Store),
                SiteCommand::OpenInsuranceForm("auto".into()),
                SiteCommand::RegisterEvent("salud".into()),
                SiteCommand::ShowNews("padre".into()),
            ]
        );
    }

    #[test]
    fn unknown_form_id_is_not_forwarded() {
        let (callback, seen) = recorder();
        let _registration = register(callback);
        open_form("loan-form");
        assert!(seen.borrow().is_empty());
        assert_eq!(
            form_from_id("loan-form"),
            Err(BridgeError::UnknownForm("loan-form".into()))
        );
    }

    #[test]
    fn dropping_registration_unmounts() {
        let (callback, _seen) = recorder();
        drop(register(callback));
        assert_eq!(
            dispatch(SiteCommand::OpenForm(FormKind::Contact)),
            Err(BridgeError::NotMounted)
        );
    }

    #[test]
    fn window_function_names() {
        let names: Vec<&str> = GlobalFunction::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "openForm",
                "closeForm",
                "submitCreditForm",
                "submitSavingsForm",
                "submitContactForm",
                "submitInsuranceForm",
                "submitCdatForm",
                "submitStoreForm",
                "openInsuranceForm",
                "registerEvent",
                "showNewsModal",
            ]
        );
    }

    #[test]
    fn window_functions_map_to_commands() {
        assert_eq!(
            GlobalFunction::OpenForm.command("cdat-form"),
            Ok(SiteCommand::OpenForm(FormKind::Cdat))
        );
        assert_eq!(
            GlobalFunction::CloseForm.command("nope"),
            Err(BridgeError::UnknownForm("nope".into()))
        );
        for kind in FormKind::ALL {
            assert_eq!(
                GlobalFunction::Submit(kind).command(""),
                Ok(SiteCommand::SubmitForm(kind))
            );
        }
        assert_eq!(
            GlobalFunction::ShowNewsModal.command("horarios"),
            Ok(SiteCommand::ShowNews("horarios".into()))
        );
    }
}
