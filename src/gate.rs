//! Display policy for the email-capture prompt.
//!
//! A gate is evaluated once per page load. When eligible, a timer and an
//! exit-intent listener race to display the prompt. Both feed the same channel
//! and the first one to reach [`EligibilityGate::display`] wins. The gate never
//! returns to `Eligible` within a load.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use log::{debug, info};

use crate::clock::Clock;
use crate::storage::PromptFlags;

pub const PROMPT_DELAY_MS: u32 = 30_000;
pub const DISMISS_COOLDOWN_MS: i64 = 24 * 60 * 60 * 1000;
/// Time the success message stays up before the prompt closes itself.
pub const AUTO_CLOSE_MS: u32 = 1_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    ShownThisSession,
    AlreadySubmitted,
    CoolingDown { remaining_ms: i64 },
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligible::ShownThisSession => write!(f, "already shown this session"),
            Ineligible::AlreadySubmitted => write!(f, "visitor already subscribed"),
            Ineligible::CoolingDown { remaining_ms } => {
                write!(f, "dismissed recently, {}s of cooldown left", remaining_ms / 1000)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Armed,
    Eligible,
    Shown { open: bool },
    Ineligible(Ineligible),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Timer,
    ExitIntent,
}

/// Pointer left through the top edge of the document, toward the tab strip.
pub fn is_exit_intent(client_y: i32) -> bool {
    client_y <= 0
}

pub struct EligibilityGate {
    flags: PromptFlags,
    clock: Rc<dyn Clock>,
    state: GateState,
}

impl EligibilityGate {
    pub fn new(flags: PromptFlags, clock: Rc<dyn Clock>) -> Self {
        Self {
            flags,
            clock,
            state: GateState::Armed,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Rules are checked in order; the first blocking one is reported.
    pub fn check(&self) -> Result<(), Ineligible> {
        if self.flags.shown_this_session() {
            return Err(Ineligible::ShownThisSession);
        }
        if self.flags.submitted() {
            return Err(Ineligible::AlreadySubmitted);
        }
        // `closedAt` comes from storage any script can write; never overflow on it.
        let elapsed = self.clock.now_ms().saturating_sub(self.flags.closed_at());
        if elapsed < DISMISS_COOLDOWN_MS {
            return Err(Ineligible::CoolingDown {
                remaining_ms: DISMISS_COOLDOWN_MS.saturating_sub(elapsed),
            });
        }
        Ok(())
    }

    /// Leaves `Armed` exactly once; later calls return the settled state.
    pub fn evaluate(&mut self) -> GateState {
        if self.state == GateState::Armed {
            self.state = match self.check() {
                Ok(()) => GateState::Eligible,
                Err(reason) => GateState::Ineligible(reason),
            };
            match self.state {
                GateState::Ineligible(reason) => info!("Email prompt suppressed: {}", reason),
                _ => info!("Email prompt armed"),
            }
        }
        self.state
    }

    /// Check-and-set display guard. Only the first call after a successful
    /// evaluation opens the prompt.
    pub fn display(&mut self, trigger: Trigger) -> bool {
        if self.state != GateState::Eligible {
            debug!("Ignoring {:?} trigger in state {:?}", trigger, self.state);
            return false;
        }
        self.state = GateState::Shown { open: true };
        self.flags.mark_shown();
        info!("Email prompt displayed by {:?} trigger", trigger);
        true
    }

    /// Records `closedAt` for every close of an open prompt.
    pub fn dismiss(&mut self) -> bool {
        if self.state != (GateState::Shown { open: true }) {
            return false;
        }
        self.state = GateState::Shown { open: false };
        self.flags.record_closed(self.clock.now_ms());
        info!("Email prompt dismissed");
        true
    }

    pub fn mark_submitted(&self) {
        self.flags.mark_submitted();
    }
}

#[derive(Clone)]
pub struct TriggerSender(UnboundedSender<Trigger>);

impl TriggerSender {
    pub fn fire(&self, trigger: Trigger) {
        // A closed channel means the prompt was already displayed.
        if self.0.unbounded_send(trigger).is_err() {
            debug!("{:?} trigger fired after the prompt was settled", trigger);
        }
    }
}

pub struct TriggerReceiver(UnboundedReceiver<Trigger>);

pub fn trigger_channel() -> (TriggerSender, TriggerReceiver) {
    let (tx, rx) = mpsc::unbounded();
    (TriggerSender(tx), TriggerReceiver(rx))
}

/// Consumes triggers until one of them displays the prompt. Dropping the
/// receiver on return turns every later trigger into a no-op.
pub async fn first_display(gate: &RefCell<EligibilityGate>, rx: TriggerReceiver) -> Option<Trigger> {
    let mut rx = rx.0;
    while let Some(trigger) = rx.next().await {
        if gate.borrow_mut().display(trigger) {
            return Some(trigger);
        }
    }
    None
}

/// Persists the subscription, leaves the success message up for `sleep`, then
/// closes the prompt through the regular dismissal path. Returns whether the
/// prompt was still open to be closed.
pub async fn complete_submission(gate: &RefCell<EligibilityGate>, sleep: impl Future<Output = ()>) -> bool {
    gate.borrow().mark_submitted();
    sleep.await;
    gate.borrow_mut().dismiss()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::{memory_flags, KeyValueStore, MemoryStore, CLOSED_AT_KEY, SUBMITTED_KEY};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;

    const NOW: i64 = 1_760_000_000_000;

    fn gate_with(flags: PromptFlags) -> EligibilityGate {
        EligibilityGate::new(flags, Rc::new(FixedClock::at(NOW)))
    }

    #[test]
    fn fresh_visitor_is_eligible() {
        let (flags, _, _) = memory_flags();
        let mut gate = gate_with(flags);
        assert_eq!(gate.evaluate(), GateState::Eligible);
    }

    #[test]
    fn submitted_blocks_regardless_of_other_flags() {
        let (flags, durable, _) = memory_flags();
        durable.set(SUBMITTED_KEY, "1").unwrap();
        durable.set(CLOSED_AT_KEY, &(NOW - 90_000_000).to_string()).unwrap();
        let mut gate = gate_with(flags);
        assert_eq!(gate.evaluate(), GateState::Ineligible(Ineligible::AlreadySubmitted));
    }

    #[test]
    fn session_flag_is_checked_first() {
        let (flags, durable, _) = memory_flags();
        durable.set(SUBMITTED_KEY, "1").unwrap();
        flags.mark_shown();
        let mut gate = gate_with(flags);
        assert_eq!(gate.evaluate(), GateState::Ineligible(Ineligible::ShownThisSession));
    }

    #[test]
    fn recent_dismissal_blocks_for_a_day() {
        let (flags, _, _) = memory_flags();
        flags.record_closed(NOW - 1000);
        let mut gate = gate_with(flags);
        assert_eq!(
            gate.evaluate(),
            GateState::Ineligible(Ineligible::CoolingDown {
                remaining_ms: DISMISS_COOLDOWN_MS - 1000
            })
        );
    }

    #[test]
    fn old_dismissal_no_longer_blocks() {
        let (flags, _, _) = memory_flags();
        flags.record_closed(NOW - 90_000_000);
        let mut gate = gate_with(flags);
        assert_eq!(gate.evaluate(), GateState::Eligible);
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        let (flags, _, _) = memory_flags();
        flags.record_closed(NOW - DISMISS_COOLDOWN_MS);
        let mut gate = gate_with(flags);
        assert_eq!(gate.evaluate(), GateState::Eligible);
    }

    #[test]
    fn cooldown_expires_as_the_clock_moves_on() {
        let (flags, durable, _) = memory_flags();
        let clock = Rc::new(FixedClock::at(NOW));
        let mut gate = EligibilityGate::new(flags, clock.clone());
        gate.evaluate();
        gate.display(Trigger::Timer);
        assert!(gate.dismiss());

        let new_session = || PromptFlags::new(durable.clone(), Rc::new(MemoryStore::default()));

        clock.advance(DISMISS_COOLDOWN_MS - 1);
        let mut almost = EligibilityGate::new(new_session(), clock.clone());
        assert_eq!(
            almost.evaluate(),
            GateState::Ineligible(Ineligible::CoolingDown { remaining_ms: 1 })
        );

        clock.advance(1);
        let mut next_day = EligibilityGate::new(new_session(), clock);
        assert_eq!(next_day.evaluate(), GateState::Eligible);
    }

    #[test]
    fn extreme_close_time_does_not_overflow() {
        let (flags, durable, _) = memory_flags();
        durable.set(CLOSED_AT_KEY, &i64::MIN.to_string()).unwrap();
        let mut gate = gate_with(flags);
        assert_eq!(gate.evaluate(), GateState::Eligible);

        let (flags, durable, _) = memory_flags();
        durable.set(CLOSED_AT_KEY, &i64::MAX.to_string()).unwrap();
        let mut gate = EligibilityGate::new(flags, Rc::new(FixedClock::at(i64::MIN)));
        assert_eq!(
            gate.evaluate(),
            GateState::Ineligible(Ineligible::CoolingDown { remaining_ms: i64::MAX })
        );
    }

    #[test]
    fn evaluate_settles_once() {
        let (flags, _, _) = memory_flags();
        let mut gate = gate_with(flags.clone());
        assert_eq!(gate.evaluate(), GateState::Eligible);
        flags.mark_submitted();
        assert_eq!(gate.evaluate(), GateState::Eligible);
    }

    #[test]
    fn display_requires_eligible_gate() {
        let (flags, _, _) = memory_flags();
        flags.mark_submitted();
        let mut gate = gate_with(flags.clone());
        gate.evaluate();
        assert!(!gate.display(Trigger::Timer));
        assert!(!flags.shown_this_session());

        let (flags, _, _) = memory_flags();
        let mut unevaluated = gate_with(flags);
        assert!(!unevaluated.display(Trigger::Timer));
    }

    #[test]
    fn second_trigger_does_not_display_again() {
        let (flags, _, _) = memory_flags();
        let mut gate = gate_with(flags.clone());
        gate.evaluate();

        assert!(gate.display(Trigger::ExitIntent));
        assert!(flags.shown_this_session());
        assert!(!gate.display(Trigger::Timer));
        assert_eq!(gate.state(), GateState::Shown { open: true });
    }

    #[test]
    fn first_trigger_through_the_channel_wins() {
        let (flags, _, _) = memory_flags();
        let gate = RefCell::new(gate_with(flags.clone()));
        gate.borrow_mut().evaluate();

        let (tx, rx) = trigger_channel();
        tx.fire(Trigger::ExitIntent);
        tx.fire(Trigger::Timer);

        assert_eq!(block_on(first_display(&gate, rx)), Some(Trigger::ExitIntent));
        // Receiver is gone; the late timer is dropped silently.
        tx.fire(Trigger::Timer);
        assert_eq!(gate.borrow().state(), GateState::Shown { open: true });
    }

    #[test]
    fn channel_closing_without_display_yields_none() {
        let (flags, _, _) = memory_flags();
        flags.mark_shown();
        let gate = RefCell::new(gate_with(flags));
        gate.borrow_mut().evaluate();

        let (tx, rx) = trigger_channel();
        tx.fire(Trigger::Timer);
        drop(tx);
        assert_eq!(block_on(first_display(&gate, rx)), None);
    }

    #[test]
    fn dismissal_records_close_time_once_per_close() {
        let (flags, _, _) = memory_flags();
        let mut gate = gate_with(flags.clone());
        gate.evaluate();
        assert!(!gate.dismiss());
        assert_eq!(flags.closed_at(), 0);

        gate.display(Trigger::Timer);
        assert!(gate.dismiss());
        assert_eq!(flags.closed_at(), NOW);
        assert!(!gate.dismiss());
        assert_eq!(gate.state(), GateState::Shown { open: false });
    }

    #[test]
    fn shown_prompt_blocks_the_next_load_in_same_session() {
        let (flags, _, _) = memory_flags();
        let mut first = gate_with(flags.clone());
        first.evaluate();
        first.display(Trigger::Timer);

        let mut reload = gate_with(flags);
        assert_eq!(reload.evaluate(), GateState::Ineligible(Ineligible::ShownThisSession));
    }

    #[test]
    fn subscribing_through_the_prompt_blocks_future_loads() {
        use crate::forms::FormKind;
        use crate::submission::tests::{FakeTransport, RecordingView, Script};
        use crate::submission::SubmissionFlow;

        let (flags, _, _) = memory_flags();
        let gate = RefCell::new(gate_with(flags.clone()));
        gate.borrow_mut().evaluate();
        assert!(gate.borrow_mut().display(Trigger::Timer));

        let flow = SubmissionFlow::new(FormKind::Modal, FakeTransport::new(Script::Reply(200, "")));
        let fields = FormKind::Modal.empty_fields().with("email", "ada@example.com");
        let mut view = RecordingView::new(fields.clone());
        let result = block_on(flow.submit(&fields, Ok("tok".into()), &mut view));
        assert!(result.is_ok());
        assert_eq!(view.last().success_message(), Some("Thanks! Check your inbox."));

        assert!(block_on(complete_submission(&gate, async {})));
        assert!(flags.submitted());
        assert_eq!(flags.closed_at(), NOW);

        // New session, cooldown long expired: still ineligible.
        let (_, durable, _) = memory_flags();
        durable.set(SUBMITTED_KEY, "1").unwrap();
        let fresh_session = PromptFlags::new(durable, Rc::new(MemoryStore::default()));
        let later = Rc::new(FixedClock::at(NOW + 10 * DISMISS_COOLDOWN_MS));
        let mut next_load = EligibilityGate::new(fresh_session, later);
        assert_eq!(next_load.evaluate(), GateState::Ineligible(Ineligible::AlreadySubmitted));
    }

    #[test]
    fn successful_submit_closes_only_after_the_delay() {
        let (flags, _, _) = memory_flags();
        let gate = RefCell::new(gate_with(flags.clone()));
        gate.borrow_mut().evaluate();
        gate.borrow_mut().display(Trigger::ExitIntent);

        let (end_delay, delay) = oneshot::channel::<()>();
        let mut completion = Box::pin(complete_submission(&gate, async {
            let _ = delay.await;
        }));
        assert_eq!(completion.as_mut().now_or_never(), None);

        assert!(flags.submitted());
        assert_eq!(gate.borrow().state(), GateState::Shown { open: true });
        assert_eq!(flags.closed_at(), 0);

        end_delay.send(()).unwrap();
        assert!(block_on(completion));
        assert_eq!(gate.borrow().state(), GateState::Shown { open: false });
        assert_eq!(flags.closed_at(), NOW);
    }

    #[test]
    fn manual_close_during_the_delay_is_not_recorded_twice() {
        let (flags, _, _) = memory_flags();
        let gate = RefCell::new(gate_with(flags.clone()));
        gate.borrow_mut().evaluate();
        gate.borrow_mut().display(Trigger::Timer);

        let closed_by_hand = async {
            assert!(gate.borrow_mut().dismiss());
        };
        assert!(!block_on(complete_submission(&gate, closed_by_hand)));
        assert!(flags.submitted());
        assert_eq!(flags.closed_at(), NOW);
    }

    #[test]
    fn exit_intent_only_at_top_edge() {
        assert!(is_exit_intent(0));
        assert!(is_exit_intent(-12));
        assert!(!is_exit_intent(1));
    }
}
