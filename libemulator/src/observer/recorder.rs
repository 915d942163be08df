use crate::{ExecuteErr, Fault};

use super::{Effect, Observer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Effect { pc: usize, effect: Effect },
    Fault { pc: usize, fault: Fault },
    Fatal { pc: usize, err: ExecuteErr },
}

/// Keeps every event in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn faults(&self) -> impl Iterator<Item = &Fault> {
        self.events.iter().filter_map(|event| match event {
            Event::Fault { fault, .. } => Some(fault),
            _ => None,
        })
    }

    pub fn effects_at(&self, pc: usize) -> impl Iterator<Item = &Effect> {
        self.events.iter().filter_map(move |event| match event {
            Event::Effect { pc: event_pc, effect } if *event_pc == pc => Some(effect),
            _ => None,
        })
    }
}

impl Observer for Recorder {
    fn on_effect(&mut self, pc: usize, effect: &Effect) {
        self.events.push(Event::Effect { pc, effect: *effect });
    }

    fn on_fault(&mut self, pc: usize, fault: &Fault) {
        self.events.push(Event::Fault { pc, fault: *fault });
    }

    fn on_fatal(&mut self, pc: usize, err: &ExecuteErr) {
        self.events.push(Event::Fatal { pc, err: *err });
    }
}
