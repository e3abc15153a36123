//! Event-wait sequencer for scripted autonomous behaviour.
//!
//! ```text
//!   script                         sequencer                       producers
//!   ──────                         ─────────                       ─────────
//!   add_wait_event(DRIVE, ..) ──▶ ┌───────────────────────┐
//!   add_wait_event(SHOOT, ..) ──▶ │ slot 0  slot 1  ...   │ ◀── dispatch_event(DRIVE, ..)
//!   arm_wait(next, flags)     ──▶ │ next_state, flags     │ ◀── dispatch_event(SHOOT, ..)
//!                                 └──────────┬────────────┘
//!   is_ready()? current_state() ◀────────────┘ advance
//! ```
//!
//! States are opaque integers chosen by the script.  Only [`DISABLED`]
//! (zero) has a meaning: the machine is stopped.  A script registers up to
//! `N` wait slots, arms the wait with the state to advance to, and polls
//! [`StateMachine::is_ready`] on later ticks.  Nothing blocks.
//!
//! Each dispatch signals at most one slot: the first unsignaled one that
//! matches, in registration order.  Without `wait_all` that single match
//! advances the machine; with it, every slot must have been signaled.

use heapless::Vec;
use log::{debug, info, trace};

use crate::error::SequencerError;

/// Opaque script state.
pub type State = u32;

/// The stopped state.
pub const DISABLED: State = 0;
/// The state [`StateMachine::start`] enters.
pub const STARTED: State = 1;
/// Default number of wait slots.
pub const MAX_WAIT_EVENTS: usize = 4;

// ---------------------------------------------------------------------------
// Wait slots
// ---------------------------------------------------------------------------

/// One registered condition.
///
/// `id` and `data` of `None` match any value.  Once signaled, they hold the
/// values that satisfied the wait, along with the two parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitEvent {
    pub kind: i32,
    pub id: Option<i32>,
    pub data: Option<i32>,
    pub param1: i32,
    pub param2: i32,
    pub signaled: bool,
}

impl WaitEvent {
    fn matches(&self, kind: i32, id: i32, data: i32) -> bool {
        !self.signaled
            && self.kind == kind
            && self.id.is_none_or(|want| want == id)
            && self.data.is_none_or(|want| want == data)
    }
}

/// Options for [`StateMachine::arm_wait`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitFlags {
    /// Require every slot to be signaled, not just one.  Stays set until
    /// the machine is re-initialised.
    pub wait_all: bool,
    /// Drop all slots when the wait completes.  Applies to this wait only.
    pub clear_events: bool,
}

impl WaitFlags {
    pub const ANY: Self = Self {
        wait_all: false,
        clear_events: false,
    };
    pub const ANY_CLEAR: Self = Self {
        wait_all: false,
        clear_events: true,
    };
    pub const ALL_CLEAR: Self = Self {
        wait_all: true,
        clear_events: true,
    };
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StateMachine<const N: usize = MAX_WAIT_EVENTS> {
    current: State,
    next: State,
    ready: bool,
    wait_all: bool,
    clear_on_advance: bool,
    waits: Vec<WaitEvent, N>,
}

impl<const N: usize> Default for StateMachine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StateMachine<N> {
    /// A disabled machine with no wait slots.
    pub const fn new() -> Self {
        Self {
            current: DISABLED,
            next: DISABLED,
            ready: false,
            wait_all: false,
            clear_on_advance: false,
            waits: Vec::new(),
        }
    }

    /// Back to disabled; all slots and flags cleared.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Enter [`STARTED`] and become ready.  Ignored unless disabled.
    pub fn start(&mut self) {
        if self.current == DISABLED {
            self.current = STARTED;
            self.next = STARTED;
            self.ready = true;
            info!("Sequencer started");
        }
    }

    /// Same as [`init`](Self::init), from any state.
    pub fn stop(&mut self) {
        if self.current != DISABLED {
            info!("Sequencer stopped in state {}", self.current);
        }
        self.init();
    }

    /// Register a wait slot.  `None` for `id` or `data` matches anything.
    ///
    /// Fails without side effects when all `N` slots are taken.
    #[must_use = "a full wait list leaves the slot unregistered"]
    pub fn add_wait_event(
        &mut self,
        kind: i32,
        id: Option<i32>,
        data: Option<i32>,
    ) -> Result<(), SequencerError> {
        self.waits
            .push(WaitEvent {
                kind,
                id,
                data,
                param1: 0,
                param2: 0,
                signaled: false,
            })
            .map_err(|_| SequencerError::WaitListFull)?;
        trace!("Sequencer wait: kind={} id={:?} data={:?}", kind, id, data);
        Ok(())
    }

    /// Block until the registered slots are satisfied, then advance to
    /// `next`.  Does nothing if no slot is registered.
    pub fn arm_wait(&mut self, next: State, flags: WaitFlags) {
        if self.waits.is_empty() {
            return;
        }
        self.next = next;
        self.wait_all |= flags.wait_all;
        self.clear_on_advance = flags.clear_events;
        self.ready = false;
        debug!(
            "Sequencer {} waiting on {} slot(s) -> {} (all={} clear={})",
            self.current,
            self.waits.len(),
            next,
            self.wait_all,
            self.clear_on_advance
        );
    }

    /// Deliver an event.  Returns `true` if the machine advanced.
    pub fn dispatch_event(&mut self, kind: i32, id: i32, data: i32, param1: i32, param2: i32) -> bool {
        let Some(slot) = self.waits.iter_mut().find(|w| w.matches(kind, id, data)) else {
            return false;
        };

        slot.signaled = true;
        slot.id = Some(id);
        slot.data = Some(data);
        slot.param1 = param1;
        slot.param2 = param2;
        trace!("Sequencer signaled: kind={} id={} data={}", kind, id, data);

        if self.wait_all && !self.waits.iter().all(|w| w.signaled) {
            return false;
        }

        if self.clear_on_advance {
            self.clear_on_advance = false;
            self.waits.clear();
        }
        info!("Sequencer transition: {} -> {}", self.current, self.next);
        self.current = self.next;
        self.ready = true;
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.current != DISABLED
    }

    /// True when no armed wait is outstanding.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn current_state(&self) -> State {
        self.current
    }

    pub fn is_wait_all(&self) -> bool {
        self.wait_all
    }

    /// Registered slots, in registration order.
    pub fn wait_events(&self) -> &[WaitEvent] {
        &self.waits
    }
}
