use crate::context::ChainContext;
use crate::step::StepKind;
use crate::step::StepOutcome;
use crate::step_list::StepList;
use log::trace;

/// The ordered steps plus the cursor; owns the per-tick advance algorithm.
pub(crate) struct StepQueue<C> {
    pub(crate) steps: StepList<C>,
    cursor: usize,
}

impl<C> StepQueue<C> {
    pub(crate) fn new() -> StepQueue<C> {
        StepQueue {
            steps: StepList::new(),
            cursor: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
        for step in &mut self.steps.items {
            step.rewind();
        }
    }
}

impl<C: ChainContext> StepQueue<C> {
    /// One external tick. Cascades through completed steps until a step
    /// consumes the tick, a step is still pending, or the queue drains.
    pub(crate) fn advance(&mut self, ctx: &mut C) {
        loop {
            if self.cursor >= self.steps.items.len() {
                return;
            }
            if self.steps.items[self.cursor].is_loop() {
                let marker_at = self.cursor;
                self.take_loop_turn(marker_at);
                return;
            }
            match self.steps.items[self.cursor].evaluate(ctx) {
                StepOutcome::Pending => return,
                StepOutcome::Complete => {
                    trace!("step {} complete, cascading", self.cursor);
                    self.cursor += 1;
                }
                StepOutcome::CompleteAndYield => {
                    self.cursor += 1;
                    return;
                }
                StepOutcome::Remove => {
                    self.steps.items.remove(self.cursor);
                    return;
                }
            }
        }
    }

    /// A loop marker always consumes its tick: either rewind the cursor and
    /// refresh the budget of every marker rewound over, or pass the cursor
    /// beyond the exhausted marker.
    fn take_loop_turn(&mut self, marker_at: usize) {
        let mut target = marker_at + 1;
        let mut rewound = false;
        if let StepKind::Loop(marker) = &mut self.steps.items[marker_at].kind {
            if marker.remaining != Some(0) {
                marker.remaining = marker.remaining.map(|left| left - 1);
                if marker.remaining.map_or(true, |left| left > 0) {
                    target = marker.segment_start;
                    rewound = true;
                }
            }
        }
        if rewound {
            for step in &mut self.steps.items[target..marker_at] {
                step.rewind();
            }
            trace!("loop marker {} rewound cursor to {}", marker_at, target);
        }
        self.cursor = target;
    }
}
