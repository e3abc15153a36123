//! Fuzz target: autonomous sequencer
//!
//! Decodes the input as a stream of 4-byte operations against a
//! `StateMachine` and verifies:
//! - No panics under arbitrary operation sequences
//! - The wait list never exceeds `MAX_WAIT_EVENTS` slots
//! - Every transition leaves the machine ready
//!
//! cargo fuzz run fuzz_sequencer

#![no_main]

use hotshot::fsm::{MAX_WAIT_EVENTS, StateMachine, WaitFlags};
use libfuzzer_sys::fuzz_target;

fn wildcard(b: u8) -> Option<i32> {
    (b & 0x80 == 0).then_some(i32::from(b & 0x07))
}

fuzz_target!(|data: &[u8]| {
    let mut sm: StateMachine = StateMachine::new();

    for op in data.chunks_exact(4) {
        let (a, b, c) = (op[1], op[2], op[3]);
        match op[0] % 6 {
            0 => sm.init(),
            1 => sm.start(),
            2 => sm.stop(),
            3 => {
                let _ = sm.add_wait_event(i32::from(a & 0x03), wildcard(b), wildcard(c));
            }
            4 => {
                let flags = WaitFlags {
                    wait_all: a & 1 != 0,
                    clear_events: a & 2 != 0,
                };
                sm.arm_wait(u32::from(b), flags);
            }
            _ => {
                let advanced = sm.dispatch_event(
                    i32::from(a & 0x03),
                    i32::from(b & 0x07),
                    i32::from(c & 0x07),
                    0,
                    0,
                );
                if advanced {
                    assert!(sm.is_ready());
                }
            }
        }
        assert!(sm.wait_events().len() <= MAX_WAIT_EVENTS);
    }
});
