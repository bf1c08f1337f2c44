use gloo_utils::{body, document, window};
use log::{debug, error, info, trace, warn};
use std::cell::Cell;
use wasm_bindgen::prelude::*;
use web_sys::{
    ErrorEvent, Event, Node, PromiseRejectionEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};
use yew::NodeRef;

use crate::config::{SCROLL_SAMPLE_MS, SLOW_LOAD_MS};

/// Smoothly scroll the element matched by an in-page anchor (`#section`) into view.
pub fn smooth_scroll_to(href: &str) {
    if !href.starts_with('#') || href.len() < 2 {
        return;
    }
    let target = match document().query_selector(href) {
        Ok(Some(el)) => el,
        Ok(None) => {
            debug!("No element for anchor {}", href);
            return;
        }
        Err(_) => {
            warn!("Invalid anchor selector {}", href);
            return;
        }
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Lock or restore page scrolling behind modal forms.
pub fn set_body_scroll_locked(locked: bool) {
    let overflow = if locked { "hidden" } else { "auto" };
    if let Err(e) = body().style().set_property("overflow", overflow) {
        warn!("Could not set body overflow: {}", describe_js_value(&e));
    }
}

pub fn scroll_y() -> f64 {
    window().scroll_y().unwrap_or(0.0)
}

/// Whether the event target lies inside the element behind `node_ref`.
pub fn event_within(node_ref: &NodeRef, event: &Event) -> bool {
    let Some(container) = node_ref.get() else {
        return false;
    };
    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
    container.contains(target.as_ref())
}

/// Best-effort readable text for an arbitrary JS value (errors, rejection reasons).
pub fn describe_js_value(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

fn add_window_listener(event_type: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) =
        window().add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
    {
        error!("Could not listen for {}: {}", event_type, describe_js_value(&e));
        return;
    }
    // Page-lifetime listener.
    closure.forget();
}

/// Log uncaught script errors and unhandled promise rejections.
pub fn install_error_handlers() {
    add_window_listener("error", |event: Event| {
        let detail = match event.dyn_ref::<ErrorEvent>() {
            Some(e) => {
                let inner = e.error();
                if inner.is_undefined() || inner.is_null() {
                    e.message()
                } else {
                    describe_js_value(&inner)
                }
            }
            None => String::from("unknown error"),
        };
        error!("Error detectado: {}", detail);
    });

    add_window_listener("unhandledrejection", |event: Event| {
        let reason = event
            .dyn_ref::<PromiseRejectionEvent>()
            .map(|e| describe_js_value(&e.reason()))
            .unwrap_or_default();
        error!("Promise rejection no manejada: {}", reason);
        event.prevent_default();
    });
}

/// Report the page load time and sample scroll cadence.
pub fn install_performance_monitor() {
    add_window_listener("load", |_| {
        let Some(load_ms) = window().performance().map(|p| p.now()) else {
            return;
        };
        info!("Página cargada en {}ms", load_ms.round());
        if load_ms > SLOW_LOAD_MS {
            warn!("Tiempo de carga lento detectado");
        }
    });

    let last_scroll = Cell::new(0.0_f64);
    add_window_listener("scroll", move |_| {
        let Some(now) = window().performance().map(|p| p.now()) else {
            return;
        };
        if now - last_scroll.get() > SCROLL_SAMPLE_MS {
            trace!("Scroll performance optimal");
        }
        last_scroll.set(now);
    });
}

/// Whether the window `load` event has already fired.
pub fn document_loaded() -> bool {
    document().ready_state() == "complete"
}
