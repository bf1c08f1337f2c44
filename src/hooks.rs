use fincomercio_web::forms::{FormData, FormKind};
use fincomercio_web::submission::{Effect, Step, SubmitError, Submission, Tick};
use fincomercio_web::RevealLatch;
use gloo_timers::callback::{Interval, Timeout};
use gloo_utils::{document, window};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry};
use yew::prelude::*;

use crate::config::{REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
use crate::utils::{describe_js_value, scroll_y};

/// Where a listener is attached.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListenOn {
    Window,
    Document,
}

/// Attach `callback` to a window/document event for the lifetime of the component.
///
/// The listener is installed once; it always calls the callback from the latest render.
#[hook]
pub fn use_event_listener(on: ListenOn, event_type: &'static str, callback: Callback<Event>) {
    let latest = use_mut_ref(|| callback.clone());
    *latest.borrow_mut() = callback;

    use_effect_with((on, event_type), move |&(on, event_type)| {
        let target: EventTarget = match on {
            ListenOn::Window => window().into(),
            ListenOn::Document => document().into(),
        };
        let closure = Closure::<dyn Fn(Event)>::new(move |e: Event| {
            let callback = latest.borrow().clone();
            callback.emit(e);
        });
        let attached = target
            .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            .map_err(|e| warn!("Could not listen for {}: {}", event_type, describe_js_value(&e)))
            .is_ok();

        move || {
            if attached {
                let _ = target.remove_event_listener_with_callback(
                    event_type,
                    closure.as_ref().unchecked_ref(),
                );
            }
            drop(closure);
        }
    });
}

/// Emit `callback` every `period_ms` until unmount.
#[hook]
pub fn use_interval(period_ms: u32, callback: Callback<()>) {
    use_effect_with(period_ms, move |&period_ms| {
        let interval = Interval::new(period_ms, move || callback.emit(()));
        move || drop(interval)
    });
}

/// Current vertical scroll offset of the window, refreshed on every scroll event.
#[hook]
pub fn use_scroll_y() -> f64 {
    let offset = use_state(scroll_y);
    {
        let offset = offset.clone();
        use_event_listener(
            ListenOn::Window,
            "scroll",
            Callback::from(move |_| offset.set(scroll_y())),
        );
    }
    *offset
}

/// Reveal-on-scroll latch for the element behind `node_ref`.
///
/// Becomes `true` the first time the element crosses the visibility threshold and never
/// goes back. The observer disconnects as soon as the latch fires.
#[hook]
pub fn use_reveal(node_ref: NodeRef) -> bool {
    let revealed = use_state(|| false);
    {
        let revealed = revealed.clone();
        use_effect_with(node_ref, move |node_ref| {
            let mut latch = RevealLatch::default();
            let on_entries = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, observer: IntersectionObserver| {
                    let intersecting = entries.iter().any(|entry| {
                        entry
                            .dyn_into::<IntersectionObserverEntry>()
                            .map(|e| e.is_intersecting())
                            .unwrap_or(false)
                    });
                    if latch.observe(intersecting) {
                        revealed.set(true);
                        observer.disconnect();
                    }
                },
            );

            let options = web_sys::IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
            options.set_root_margin(REVEAL_ROOT_MARGIN);

            let observer = match (
                node_ref.cast::<Element>(),
                IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &options),
            ) {
                (Some(element), Ok(observer)) => {
                    observer.observe(&element);
                    Some(observer)
                }
                (None, _) => {
                    debug!("Reveal target not mounted");
                    None
                }
                (_, Err(e)) => {
                    warn!("IntersectionObserver unavailable: {}", describe_js_value(&e));
                    None
                }
            };

            move || {
                if let Some(observer) = observer {
                    observer.disconnect();
                }
                drop(on_entries);
            }
        });
    }
    *revealed
}

/// Pending timers of one form, one slot per step, each tagged with its tick.
///
/// The completion timer is still executing when it schedules the dismissal, so the two
/// must not share a slot.
struct TimerSlots<H = Timeout> {
    complete: Option<(Tick, H)>,
    dismiss: Option<(Tick, H)>,
}

impl<H> Default for TimerSlots<H> {
    fn default() -> Self {
        Self {
            complete: None,
            dismiss: None,
        }
    }
}

impl<H> TimerSlots<H> {
    fn slot(&mut self, step: Step) -> &mut Option<(Tick, H)> {
        match step {
            Step::Complete => &mut self.complete,
            Step::Dismiss => &mut self.dismiss,
        }
    }

    fn store(&mut self, tick: Tick, timeout: H) {
        *self.slot(tick.step) = Some((tick, timeout));
    }

    /// Release the timer that delivered `tick`. It holds a runtime clone, so keeping it
    /// would tie the runtime to itself until the next store.
    fn release(&mut self, tick: Tick) -> Option<H> {
        let slot = self.slot(tick.step);
        if slot.as_ref().is_some_and(|(pending, _)| *pending == tick) {
            slot.take().map(|(_, timeout)| timeout)
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.complete = None;
        self.dismiss = None;
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.complete.is_none() && self.dismiss.is_none()
    }
}

/// Runs a [`Submission`] against real timers.
#[derive(Clone)]
struct SubmissionRuntime {
    machine: Rc<RefCell<Submission>>,
    timers: Rc<RefCell<TimerSlots>>,
    on_effect: Rc<RefCell<Callback<Effect>>>,
    refresh: Callback<()>,
}

impl SubmissionRuntime {
    fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule { tick, after_ms } => {
                    let runtime = self.clone();
                    let timeout = Timeout::new(after_ms, move || runtime.tick(tick));
                    self.timers.borrow_mut().store(tick, timeout);
                }
                Effect::CancelTimers => self.timers.borrow_mut().clear(),
                other => {
                    let callback = self.on_effect.borrow().clone();
                    callback.emit(other);
                }
            }
        }
        self.refresh.emit(());
    }

    fn tick(&self, tick: Tick) {
        let fired = self.timers.borrow_mut().release(tick);
        // Dropping a fired gloo timeout only clears an expired id.
        drop(fired);
        let effects = self.machine.borrow_mut().tick(tick);
        self.run(effects);
    }

    fn submit(&self, data: &FormData) -> Result<(), SubmitError> {
        let effects = self.machine.borrow_mut().submit(data)?;
        self.run(effects);
        Ok(())
    }

    fn cancel(&self) {
        let effects = self.machine.borrow_mut().cancel();
        if !effects.is_empty() {
            self.run(effects);
        }
    }

    fn teardown(&self) {
        self.machine.borrow_mut().cancel();
        self.timers.borrow_mut().clear();
    }
}

/// Handle returned by [`use_submission`].
#[derive(Clone)]
pub struct SubmissionHandle {
    runtime: Rc<SubmissionRuntime>,
}

impl SubmissionHandle {
    /// Snapshot of the machine for rendering.
    pub fn state(&self) -> Submission {
        self.runtime.machine.borrow().clone()
    }

    pub fn submit(&self, data: &FormData) -> Result<(), SubmitError> {
        self.runtime.submit(data)
    }

    pub fn cancel(&self) {
        self.runtime.cancel();
    }
}

/// Simulated submission for one form. `on_effect` receives the effects that concern the
/// view (field reset, closing the modal, announcements); timers are handled here and
/// cancelled on unmount.
#[hook]
pub fn use_submission(kind: FormKind, on_effect: Callback<Effect>) -> SubmissionHandle {
    let latest_effect = use_mut_ref(|| on_effect.clone());
    *latest_effect.borrow_mut() = on_effect;

    let force_update = use_force_update();
    let runtime = use_memo(kind, move |&kind| SubmissionRuntime {
        machine: Rc::new(RefCell::new(Submission::new(kind))),
        timers: Rc::new(RefCell::new(TimerSlots::default())),
        on_effect: latest_effect,
        refresh: Callback::from(move |_| force_update.force_update()),
    });

    {
        let runtime = runtime.clone();
        use_effect_with(kind, move |_| move || runtime.teardown());
    }

    SubmissionHandle { runtime }
}
