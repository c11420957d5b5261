use crate::step::Step;
use crate::step::StepKind;
use crate::step::TimedWait;

/// The ordered arena of steps behind a chain. Extension factories receive a
/// mutable handle to it instead of the raw storage.
pub struct StepList<C> {
    pub(crate) items: Vec<Step<C>>,
}

impl<C> StepList<C> {
    pub(crate) fn new() -> StepList<C> {
        StepList { items: vec![] }
    }

    pub fn push(&mut self, step: Step<C>) {
        self.items.push(step);
    }

    pub fn insert(&mut self, index: usize, step: Step<C>) {
        self.items.insert(index, step);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn last_wait_mut(&mut self) -> Option<&mut TimedWait<C>> {
        match self.items.last_mut() {
            Some(Step {
                kind: StepKind::Wait(wait),
            }) => Some(wait),
            _ => None,
        }
    }
}
