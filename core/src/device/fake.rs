//! In-memory hub for tests: applies patches to a local strength value,
//! records every patch, and supports scripted read failures plus
//! "interference" (a concurrent writer's delta slipped in between this
//! client's requests).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::wire::{ChannelOp, StrengthConfig, StrengthPatch};
use super::{DeviceError, StrengthPort};

#[derive(Default)]
struct FakeState {
    strength: i32,
    random_strength: i32,
    patches: Vec<StrengthPatch>,
    fail_next_reads: u32,
    fail_read_after: Option<u32>,
    interference: VecDeque<i32>,
}

pub(crate) struct FakeHub {
    state: Mutex<FakeState>,
}

impl FakeHub {
    pub fn new(strength: i32) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                strength,
                ..Default::default()
            }),
        })
    }

    pub fn strength(&self) -> i32 {
        self.state.lock().unwrap().strength
    }

    pub fn random_strength(&self) -> i32 {
        self.state.lock().unwrap().random_strength
    }

    pub fn patches(&self) -> Vec<StrengthPatch> {
        self.state.lock().unwrap().patches.clone()
    }

    /// Make the next `n` reads fail with a logical rejection.
    pub fn fail_next_reads(&self, n: u32) {
        self.state.lock().unwrap().fail_next_reads = n;
    }

    /// Let the next `n` reads succeed, then fail the one after. Targets
    /// the follow-up read of a read-apply-read sequence.
    pub fn fail_read_after(&self, n: u32) {
        self.state.lock().unwrap().fail_read_after = Some(n);
    }

    /// Queue a concurrent-writer delta applied right after the next patch,
    /// i.e. between this client's apply and its follow-up read.
    pub fn interfere_after_next_apply(&self, delta: i32) {
        self.state.lock().unwrap().interference.push_back(delta);
    }

    fn read_failure() -> DeviceError {
        DeviceError::Rejected {
            code: "E500".into(),
            message: "scripted read failure".into(),
        }
    }

    fn apply_op(value: &mut i32, op: Option<ChannelOp>) {
        match op {
            Some(ChannelOp::Add(v)) => *value += v,
            Some(ChannelOp::Sub(v)) => *value -= v,
            Some(ChannelOp::Set(v)) => *value = v,
            None => {}
        }
    }
}

impl StrengthPort for FakeHub {
    async fn read_config(&self) -> Result<StrengthConfig, DeviceError> {
        let mut st = self.state.lock().unwrap();
        if st.fail_next_reads > 0 {
            st.fail_next_reads -= 1;
            return Err(Self::read_failure());
        }
        match st.fail_read_after {
            Some(0) => {
                st.fail_read_after = None;
                return Err(Self::read_failure());
            }
            Some(n) => st.fail_read_after = Some(n - 1),
            None => {}
        }
        Ok(StrengthConfig {
            strength: st.strength,
            random_strength: st.random_strength,
            ..Default::default()
        })
    }

    async fn apply(&self, patch: StrengthPatch) -> Result<(), DeviceError> {
        let mut st = self.state.lock().unwrap();
        Self::apply_op(&mut st.strength, patch.strength);
        Self::apply_op(&mut st.random_strength, patch.random_strength);
        st.patches.push(patch);
        if let Some(external) = st.interference.pop_front() {
            st.strength += external;
        }
        Ok(())
    }
}
