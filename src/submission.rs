//! Simulated form submission.
//!
//! There is no backend: a valid submission waits [`SUBMIT_LATENCY_MS`], shows a success
//! message, holds it for [`SUCCESS_HOLD_MS`], then clears it and closes the form.
//!
//! ```text
//! Idle --submit--> Submitting --Complete tick--> Succeeded --Dismiss tick--> Idle
//! ```
//!
//! The machine never touches a timer itself. Transitions return [`Effect`]s; the caller
//! schedules the requested ticks and feeds them back through [`Submission::tick`]. Ticks
//! carry the generation that scheduled them, so a tick from a cancelled or superseded run
//! is ignored.
//!
//! [`SUBMIT_LATENCY_MS`]: crate::defaults::SUBMIT_LATENCY_MS
//! [`SUCCESS_HOLD_MS`]: crate::defaults::SUCCESS_HOLD_MS

use crate::defaults::{SUBMIT_LATENCY_MS, SUCCESS_HOLD_MS};
use crate::forms::{validate, FormData, FormKind, ValidationError};
use log::{debug, info};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Simulated request finished.
    Complete,
    /// Success message hold expired.
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub step: Step,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `tick` back to the machine after `after_ms`.
    Schedule { tick: Tick, after_ms: u32 },
    /// Drop every pending timer of this form.
    CancelTimers,
    /// Clear all field values.
    ResetFields,
    CloseModal(FormKind),
    /// Show a transient notice.
    Announce(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A simulated request is already running.
    InFlight,
    Invalid(ValidationError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InFlight => write!(f, "Submission already in progress"),
            SubmitError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::InFlight => None,
            SubmitError::Invalid(e) => Some(e),
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(e: ValidationError) -> Self {
        SubmitError::Invalid(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    kind: FormKind,
    phase: Phase,
    generation: u64,
}

impl Submission {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Validate `data` and start a simulated request.
    ///
    /// Validation failures leave the machine untouched. Submitting while a success message
    /// is still held supersedes the pending dismissal.
    pub fn submit(&mut self, data: &FormData) -> Result<Vec<Effect>, SubmitError> {
        if self.phase == Phase::Submitting {
            return Err(SubmitError::InFlight);
        }
        let (_, result) = validate(self.kind.fields(), data);
        result?;

        let mut effects = Vec::new();
        if self.phase == Phase::Succeeded {
            debug!("{}: resubmitted during success hold", self.kind);
            effects.push(Effect::CancelTimers);
        }
        self.generation += 1;
        self.phase = Phase::Submitting;
        info!("{}: submitting (run {})", self.kind, self.generation);
        effects.push(Effect::Schedule {
            tick: self.tick_for(Step::Complete),
            after_ms: SUBMIT_LATENCY_MS,
        });
        Ok(effects)
    }

    /// Advance on a scheduled tick. Stale or out-of-order ticks are ignored.
    pub fn tick(&mut self, tick: Tick) -> Vec<Effect> {
        if tick.generation != self.generation {
            debug!(
                "{}: ignoring stale {:?} tick from run {}",
                self.kind, tick.step, tick.generation
            );
            return Vec::new();
        }
        match (self.phase, tick.step) {
            (Phase::Submitting, Step::Complete) => {
                self.phase = Phase::Succeeded;
                info!("{}: simulated request succeeded", self.kind);
                vec![
                    Effect::ResetFields,
                    Effect::Schedule {
                        tick: self.tick_for(Step::Dismiss),
                        after_ms: SUCCESS_HOLD_MS,
                    },
                ]
            }
            (Phase::Succeeded, Step::Dismiss) => {
                self.phase = Phase::Idle;
                let mut effects = vec![Effect::CloseModal(self.kind)];
                if let Some(notice) = self.kind.closing_notice() {
                    effects.push(Effect::Announce(notice));
                }
                effects
            }
            (phase, step) => {
                debug!("{}: {:?} tick does not apply in {:?}", self.kind, step, phase);
                Vec::new()
            }
        }
    }

    /// Abort any running sequence, e.g. when the housing modal is closed or torn down.
    pub fn cancel(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }
        debug!("{}: cancelled in {:?}", self.kind, self.phase);
        self.generation += 1;
        self.phase = Phase::Idle;
        vec![Effect::CancelTimers]
    }

    pub fn button_label(&self) -> &'static str {
        match self.phase {
            Phase::Submitting => self.kind.pending_label(),
            Phase::Idle | Phase::Succeeded => self.kind.submit_label(),
        }
    }

    pub fn button_disabled(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Success message shown at the top of the form.
    pub fn message(&self) -> Option<&'static str> {
        (self.phase == Phase::Succeeded).then(|| self.kind.success_message())
    }

    fn tick_for(&self, step: Step) -> Tick {
        Tick {
            generation: self.generation,
            step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::filled_data;
    use pretty_assertions::assert_eq;

    /// Virtual timer queue standing in for the browser's timeouts.
    struct Clock {
        now: u32,
        pending: Vec<(u32, Tick)>,
        log: Vec<(u32, Effect)>,
    }

    impl Clock {
        fn new() -> Self {
            Self {
                now: 0,
                pending: Vec::new(),
                log: Vec::new(),
            }
        }

        fn run(&mut self, effects: Vec<Effect>) {
            for effect in effects {
                match effect {
                    Effect::Schedule { tick, after_ms } => {
                        self.pending.push((self.now + after_ms, tick))
                    }
                    Effect::CancelTimers => self.pending.clear(),
                    other => self.log.push((self.now, other)),
                }
            }
        }

        fn advance(&mut self, machine: &mut Submission, ms: u32) {
            let until = self.now + ms;
            loop {
                self.pending.sort_by_key(|(due, _)| *due);
                match self.pending.first() {
                    Some(&(due, tick)) if due <= until => {
                        self.pending.remove(0);
                        self.now = due;
                        let effects = machine.tick(tick);
                        self.run(effects);
                    }
                    _ => break,
                }
            }
            self.now = until;
        }
    }

    #[test]
    fn credit_form_full_sequence() {
        let mut machine = Submission::new(FormKind::Credit);
        let mut clock = Clock::new();

        let effects = machine.submit(&filled_data(FormKind::Credit)).unwrap();
        clock.run(effects);
        assert_eq!(machine.phase(), Phase::Submitting);
        assert!(machine.button_disabled());
        assert_eq!(machine.button_label(), "Enviando...");

        clock.advance(&mut machine, 1_999);
        assert_eq!(machine.message(), None);

        clock.advance(&mut machine, 1);
        assert_eq!(
            machine.message(),
            Some("¡Solicitud enviada exitosamente! Nos contactaremos contigo pronto.")
        );
        assert!(!machine.button_disabled());
        assert_eq!(machine.button_label(), "Enviar solicitud");
        assert_eq!(clock.log, vec![(2_000, Effect::ResetFields)]);

        clock.advance(&mut machine, 3_000);
        assert_eq!(machine.message(), None);
        assert_eq!(machine.phase(), Phase::Idle);
        assert_eq!(
            clock.log,
            vec![
                (2_000, Effect::ResetFields),
                (5_000, Effect::CloseModal(FormKind::Credit)),
            ]
        );
    }

    #[test]
    fn empty_required_field_blocks_every_form() {
        for kind in FormKind::ALL {
            let mut machine = Submission::new(kind);
            let mut data = filled_data(kind);
            let first_required = kind.fields().iter().find(|f| f.required).unwrap();
            data.insert(first_required.name.to_string(), String::new());

            let err = machine.submit(&data).unwrap_err();
            assert_eq!(
                err,
                SubmitError::Invalid(ValidationError::MissingFields(vec![first_required.name]))
            );
            assert_eq!(machine.phase(), Phase::Idle, "{kind}");
            assert_eq!(machine.button_label(), kind.submit_label());
        }
    }

    #[test]
    fn double_submit_is_refused_while_in_flight() {
        let mut machine = Submission::new(FormKind::Contact);
        let data = filled_data(FormKind::Contact);
        machine.submit(&data).unwrap();
        assert_eq!(machine.submit(&data), Err(SubmitError::InFlight));
    }

    #[test]
    fn store_form_announces_redirect_on_close() {
        let mut machine = Submission::new(FormKind::Store);
        let mut clock = Clock::new();
        clock.run(machine.submit(&filled_data(FormKind::Store)).unwrap());
        assert_eq!(machine.button_label(), "Verificando...");
        clock.advance(&mut machine, 5_000);
        assert_eq!(
            clock.log,
            vec![
                (2_000, Effect::ResetFields),
                (5_000, Effect::CloseModal(FormKind::Store)),
                (5_000, Effect::Announce("Redirigiendo a la tienda virtual...")),
            ]
        );
    }

    #[test]
    fn resubmitting_during_hold_supersedes_dismissal() {
        let mut machine = Submission::new(FormKind::Savings);
        let mut clock = Clock::new();
        let data = filled_data(FormKind::Savings);

        clock.run(machine.submit(&data).unwrap());
        clock.advance(&mut machine, 2_500);
        assert_eq!(machine.phase(), Phase::Succeeded);

        let effects = machine.submit(&data).unwrap();
        assert_eq!(effects.first(), Some(&Effect::CancelTimers));
        clock.run(effects);

        // The first run would have closed the form at 5000.
        clock.advance(&mut machine, 2_600);
        assert_eq!(machine.phase(), Phase::Succeeded);
        assert!(!clock
            .log
            .iter()
            .any(|(_, e)| matches!(e, Effect::CloseModal(_))));

        clock.advance(&mut machine, 3_000);
        assert_eq!(machine.phase(), Phase::Idle);
    }

    #[test]
    fn cancel_discards_pending_ticks() {
        let mut machine = Submission::new(FormKind::Cdat);
        let tick = match machine.submit(&filled_data(FormKind::Cdat)).unwrap()[..] {
            [Effect::Schedule { tick, .. }] => tick,
            ref other => panic!("unexpected effects {other:?}"),
        };
        assert_eq!(machine.cancel(), vec![Effect::CancelTimers]);
        assert_eq!(machine.tick(tick), Vec::new());
        assert_eq!(machine.phase(), Phase::Idle);
        assert_eq!(machine.cancel(), Vec::new());
    }

    #[test]
    fn out_of_order_step_is_ignored() {
        let mut machine = Submission::new(FormKind::Insurance);
        machine.submit(&filled_data(FormKind::Insurance)).unwrap();
        let early_dismiss = Tick {
            generation: 1,
            step: Step::Dismiss,
        };
        assert_eq!(machine.tick(early_dismiss), Vec::new());
        assert_eq!(machine.phase(), Phase::Submitting);
    }
}
