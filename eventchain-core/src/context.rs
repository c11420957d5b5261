use std::cell::Cell;

/// Ambient inputs a chain reads from its bound context on every tick.
pub trait ChainContext {
    /// Elapsed seconds since the previous tick. Never negative.
    fn delta(&self) -> f64;

    /// The animation that `wait_for_current_animation` steps observe.
    fn current_anim(&self) -> Option<&dyn AnimationSource> {
        None
    }
}

/// An external animation exposing a monotonically non-decreasing loop counter.
/// The chain only ever reads it.
pub trait AnimationSource {
    fn loop_count(&self) -> u32;
}

impl AnimationSource for Cell<u32> {
    fn loop_count(&self) -> u32 {
        self.get()
    }
}
