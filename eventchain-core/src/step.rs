use crate::context::AnimationSource;
use crate::context::ChainContext;
use std::rc::Rc;

pub(crate) type Callback<C> = Box<dyn FnMut(&mut C)>;
pub(crate) type Predicate<C> = Box<dyn FnMut(&mut C) -> bool>;

/// What a step reports back to the advance algorithm after one evaluation.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StepOutcome {
    /// Not satisfied yet; the tick ends and the step is retried next tick.
    Pending,
    /// Satisfied; processing cascades into the next step within the same tick.
    Complete,
    /// Satisfied, but the tick is consumed; the next step runs next tick.
    CompleteAndYield,
    /// Remove this step from the list; the tick is consumed.
    Remove,
}

/// A step kind provided by an extension rather than a builder method.
pub trait CustomStep<C> {
    fn tick(&mut self, ctx: &mut C) -> StepOutcome;

    /// Restore per-activation state. Called on loop rewind and chain reset.
    fn rewind(&mut self) {}
}

/// One unit of a chain's queue.
pub struct Step<C> {
    pub(crate) kind: StepKind<C>,
}

pub(crate) enum StepKind<C> {
    Action {
        run: Callback<C>,
    },
    Gate {
        predicate: Predicate<C>,
    },
    Guarded {
        run: Callback<C>,
        until: Predicate<C>,
    },
    Wait(TimedWait<C>),
    Loop(LoopMarker),
    Anim(AnimationWait),
    Custom(Box<dyn CustomStep<C>>),
}

pub(crate) struct TimedWait<C> {
    pub(crate) duration: f64,
    pub(crate) elapsed: f64,
    pub(crate) during: Option<Callback<C>>,
    pub(crate) every: Option<EveryCompanion<C>>,
    pub(crate) or_until: Option<Predicate<C>>,
}

pub(crate) struct EveryCompanion<C> {
    pub(crate) interval: f64,
    pub(crate) callback: Callback<C>,
    pub(crate) fired: u32,
}

pub(crate) struct LoopMarker {
    /// None means unbounded.
    pub(crate) initial: Option<u32>,
    pub(crate) remaining: Option<u32>,
    pub(crate) segment_start: usize,
}

pub(crate) struct AnimationWait {
    /// None means "sample the context's current animation each active tick".
    pub(crate) source: Option<Rc<dyn AnimationSource>>,
    pub(crate) target: u32,
    pub(crate) state: Option<AnimProgress>,
}

pub(crate) struct AnimProgress {
    pub(crate) baseline: u32,
    pub(crate) last_seen: u32,
}

impl<C> Step<C> {
    pub fn action(run: impl FnMut(&mut C) + 'static) -> Step<C> {
        Step {
            kind: StepKind::Action { run: Box::new(run) },
        }
    }

    pub fn gate(predicate: impl FnMut(&mut C) -> bool + 'static) -> Step<C> {
        Step {
            kind: StepKind::Gate {
                predicate: Box::new(predicate),
            },
        }
    }

    pub fn guarded(
        run: impl FnMut(&mut C) + 'static,
        until: impl FnMut(&mut C) -> bool + 'static,
    ) -> Step<C> {
        Step {
            kind: StepKind::Guarded {
                run: Box::new(run),
                until: Box::new(until),
            },
        }
    }

    pub fn timed_wait(duration: f64) -> Step<C> {
        Step {
            kind: StepKind::Wait(TimedWait {
                duration,
                elapsed: 0.0,
                during: None,
                every: None,
                or_until: None,
            }),
        }
    }

    /// A marker that rewinds the cursor to `segment_start` while its budget
    /// lasts, restoring the budget of every marker it rewinds over.
    /// `times` of None loops forever.
    pub fn loop_marker(segment_start: usize, times: Option<u32>) -> Step<C> {
        Step {
            kind: StepKind::Loop(LoopMarker {
                initial: times,
                remaining: times,
                segment_start,
            }),
        }
    }

    pub fn animation_wait(source: Option<Rc<dyn AnimationSource>>, loops: u32) -> Step<C> {
        Step {
            kind: StepKind::Anim(AnimationWait {
                source,
                target: loops,
                state: None,
            }),
        }
    }

    pub fn custom(step: impl CustomStep<C> + 'static) -> Step<C> {
        Step {
            kind: StepKind::Custom(Box::new(step)),
        }
    }

    pub(crate) fn is_loop(&self) -> bool {
        matches!(self.kind, StepKind::Loop(_))
    }

    pub(crate) fn rewind(&mut self) {
        match &mut self.kind {
            StepKind::Action { .. } | StepKind::Gate { .. } | StepKind::Guarded { .. } => {}
            StepKind::Wait(wait) => {
                wait.elapsed = 0.0;
                if let Some(every) = &mut wait.every {
                    every.fired = 0;
                }
            }
            StepKind::Loop(marker) => marker.remaining = marker.initial,
            StepKind::Anim(anim) => anim.state = None,
            StepKind::Custom(custom) => custom.rewind(),
        }
    }
}

impl<C: ChainContext> Step<C> {
    /// Evaluate every kind except LoopMarker, which the queue handles itself.
    pub(crate) fn evaluate(&mut self, ctx: &mut C) -> StepOutcome {
        match &mut self.kind {
            StepKind::Action { run } => {
                run(ctx);
                StepOutcome::CompleteAndYield
            }
            StepKind::Gate { predicate } => {
                if predicate(ctx) {
                    StepOutcome::Complete
                } else {
                    StepOutcome::Pending
                }
            }
            StepKind::Guarded { run, until } => {
                run(ctx);
                if until(ctx) {
                    StepOutcome::Complete
                } else {
                    StepOutcome::Pending
                }
            }
            StepKind::Wait(wait) => wait.evaluate(ctx),
            StepKind::Anim(anim) => anim.evaluate(ctx),
            // markers are taken by the queue before evaluation gets here
            StepKind::Loop(_) => StepOutcome::Pending,
            StepKind::Custom(custom) => custom.tick(ctx),
        }
    }
}

impl<C: ChainContext> TimedWait<C> {
    fn evaluate(&mut self, ctx: &mut C) -> StepOutcome {
        self.elapsed += ctx.delta();
        if let Some(or_until) = &mut self.or_until {
            if or_until(ctx) {
                // early completion skips the remaining companion work and
                // does not cascade
                return StepOutcome::CompleteAndYield;
            }
        }
        if let Some(every) = &mut self.every {
            let crossings = (self.elapsed / every.interval).floor() as u32;
            if self.elapsed < self.duration && crossings > every.fired {
                (every.callback)(ctx);
                every.fired += 1;
            }
        }
        if let Some(during) = &mut self.during {
            during(ctx);
        }
        if self.elapsed >= self.duration {
            StepOutcome::Complete
        } else {
            StepOutcome::Pending
        }
    }
}

impl AnimationWait {
    fn evaluate<C: ChainContext>(&mut self, ctx: &mut C) -> StepOutcome {
        let count = match &self.source {
            Some(source) => source.loop_count(),
            None => match ctx.current_anim() {
                Some(anim) => anim.loop_count(),
                None => panic!("wait_for_current_animation: context exposes no current animation"),
            },
        };
        let progress = self.state.get_or_insert(AnimProgress {
            baseline: count,
            last_seen: count,
        });
        // a counter increase becomes observable one tick after it was read
        let done = progress.last_seen >= progress.baseline.saturating_add(self.target);
        progress.last_seen = count;
        if done {
            StepOutcome::Complete
        } else {
            StepOutcome::Pending
        }
    }
}
