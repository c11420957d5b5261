use crate::chain_result::ChainResult;
use crate::chain_result::CompanionError;
use crate::chain_result::ExtensionError;
use crate::context::AnimationSource;
use crate::context::ChainContext;
use crate::extension;
use crate::extension::ExtensionFactory;
use crate::queue::StepQueue;
use crate::step::EveryCompanion;
use crate::step::Step;
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

/// An ordered list of deferred actions, driven one discrete tick at a time.
///
/// Builder methods append steps; `tick()` advances through them, cascading
/// over steps that complete without consuming the tick. All user callbacks
/// receive the bound context as their first parameter.
pub struct EventChain<C: 'static> {
    context: C,
    queue: StepQueue<C>,
    extensions: HashMap<&'static str, ExtensionFactory<C>>,
}

impl<C: 'static> EventChain<C> {
    pub fn new(context: C) -> EventChain<C> {
        EventChain {
            context,
            queue: StepQueue::new(),
            extensions: extension::snapshot_for::<C>(),
        }
    }

    pub fn then(&mut self, run: impl FnMut(&mut C) + 'static) -> &mut Self {
        self.queue.steps.push(Step::action(run));
        self
    }

    pub fn wait_until(&mut self, predicate: impl FnMut(&mut C) -> bool + 'static) -> &mut Self {
        self.queue.steps.push(Step::gate(predicate));
        self
    }

    /// Runs `run` every tick, including the tick on which `until` first
    /// returns true.
    pub fn then_until(
        &mut self,
        run: impl FnMut(&mut C) + 'static,
        until: impl FnMut(&mut C) -> bool + 'static,
    ) -> &mut Self {
        self.queue.steps.push(Step::guarded(run, until));
        self
    }

    pub fn wait(&mut self, seconds: f64) -> &mut Self {
        self.queue.steps.push(Step::timed_wait(seconds));
        self
    }

    /// Attaches to the last `wait`: runs every active tick of it, including
    /// the completing one.
    pub fn during(&mut self, callback: impl FnMut(&mut C) + 'static) -> ChainResult<&mut Self> {
        let wait = self
            .queue
            .steps
            .last_wait_mut()
            .ok_or(CompanionError::NotAWait)?;
        if wait.during.is_some() {
            return Err(CompanionError::AlreadyAttached.into());
        }
        wait.during = Some(Box::new(callback));
        Ok(self)
    }

    /// Attaches to the last `wait`: fires once per whole `interval` crossed,
    /// never on the tick that satisfies the wait itself.
    pub fn every(
        &mut self,
        interval: f64,
        callback: impl FnMut(&mut C) + 'static,
    ) -> ChainResult<&mut Self> {
        let wait = self
            .queue
            .steps
            .last_wait_mut()
            .ok_or(CompanionError::NotAWait)?;
        if wait.every.is_some() {
            return Err(CompanionError::AlreadyAttached.into());
        }
        wait.every = Some(EveryCompanion {
            interval,
            callback: Box::new(callback),
            fired: 0,
        });
        Ok(self)
    }

    /// Attaches to the last `wait`: a true result ends the wait immediately,
    /// skipping its other companions for that tick.
    pub fn or_until(
        &mut self,
        predicate: impl FnMut(&mut C) -> bool + 'static,
    ) -> ChainResult<&mut Self> {
        let wait = self
            .queue
            .steps
            .last_wait_mut()
            .ok_or(CompanionError::NotAWait)?;
        if wait.or_until.is_some() {
            return Err(CompanionError::AlreadyAttached.into());
        }
        wait.or_until = Some(Box::new(predicate));
        Ok(self)
    }

    /// Reruns the chain from its start so the preceding steps execute `times`
    /// times in total, then lets the cursor move on for good.
    pub fn repeat(&mut self, times: u32) -> &mut Self {
        self.queue.steps.push(Step::loop_marker(0, Some(times)));
        self
    }

    pub fn repeat_forever(&mut self) -> &mut Self {
        self.queue.steps.push(Step::loop_marker(0, None));
        self
    }

    /// Waits until `source` has looped `loops` more times than it had at the
    /// step's activation. The increase is observed one tick late.
    pub fn wait_for_animation(
        &mut self,
        source: Rc<dyn AnimationSource>,
        loops: u32,
    ) -> &mut Self {
        self.queue.steps.push(Step::animation_wait(Some(source), loops));
        self
    }

    /// Like `wait_for_animation`, sampling the context's current animation
    /// instead of an explicit source.
    pub fn wait_for_current_animation(&mut self, loops: u32) -> &mut Self {
        self.queue.steps.push(Step::animation_wait(None, loops));
        self
    }

    /// Invokes an operator registered through `register_extension` for this
    /// chain's context type. Only operators registered before this chain was
    /// constructed are visible.
    pub fn apply_extension(&mut self, name: &str, arg: &dyn Any) -> ChainResult<&mut Self> {
        let factory = self
            .extensions
            .get(name)
            .copied()
            .ok_or(ExtensionError::NotRegistered)?;
        factory(&mut self.context, &mut self.queue.steps, arg);
        Ok(self)
    }

    /// Rewinds the cursor and every step's per-activation state, keeping the
    /// queue structure, so the chain can be replayed.
    pub fn reset(&mut self) {
        self.queue.reset();
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }
}

impl<C: ChainContext + 'static> EventChain<C> {
    /// One discrete tick. Advances the cursor until a step reports "not yet
    /// satisfied" or consumes the tick.
    pub fn tick(&mut self) {
        self.queue.advance(&mut self.context);
    }
}
