use ctor::ctor;
use eventchain_core::register_extension;
use eventchain_core::ChainContext;
use eventchain_core::ChainError;
use eventchain_core::CustomStep;
use eventchain_core::EventChain;
use eventchain_core::ExtensionError;
use eventchain_core::Step;
use eventchain_core::StepList;
use eventchain_core::StepOutcome;
use std::any::Any;

#[derive(Default)]
struct Host {
    delta: f64,
    used_arg: Option<String>,
    added_step: bool,
    counter: i32,
}

impl ChainContext for Host {
    fn delta(&self) -> f64 {
        self.delta
    }
}

struct OtherHost;

impl ChainContext for OtherHost {
    fn delta(&self) -> f64 {
        0.0
    }
}

struct MarkStep;

impl CustomStep<Host> for MarkStep {
    fn tick(&mut self, ctx: &mut Host) -> StepOutcome {
        ctx.added_step = true;
        StepOutcome::Remove
    }
}

fn mark_factory(ctx: &mut Host, steps: &mut StepList<Host>, arg: &dyn Any) {
    ctx.used_arg = arg.downcast_ref::<&str>().map(|it| it.to_string());
    steps.push(Step::custom(MarkStep));
}

fn count_twice_factory(_ctx: &mut Host, steps: &mut StepList<Host>, _arg: &dyn Any) {
    steps.push(Step::action(|h: &mut Host| h.counter += 1));
    steps.push(Step::action(|h: &mut Host| h.counter += 1));
}

#[ctor]
fn register_operators() {
    register_extension::<Host>("mark", mark_factory);
    register_extension::<Host>("count_twice", count_twice_factory);
}

#[test]
fn registered_operator_extends_new_chains() {
    let mut chain = EventChain::new(Host::default());
    chain.apply_extension("mark", &"argument").unwrap();
    assert_eq!(chain.context().used_arg.as_deref(), Some("argument"));
    assert!(!chain.context().added_step);

    chain.tick();
    assert!(chain.context().added_step);
}

#[test]
fn self_removed_step_does_not_run_again() {
    let mut chain = EventChain::new(Host::default());
    chain.apply_extension("mark", &"x").unwrap();
    chain.tick();
    chain.context_mut().added_step = false;

    chain.tick();
    chain.tick();
    assert!(!chain.context().added_step);
}

#[test]
fn factory_built_steps_follow_the_advance_contract() {
    let mut chain = EventChain::new(Host::default());
    chain.apply_extension("count_twice", &()).unwrap();

    chain.tick();
    assert_eq!(chain.context().counter, 1);
    chain.tick();
    assert_eq!(chain.context().counter, 2);
    chain.tick();
    assert_eq!(chain.context().counter, 2);
}

#[test]
fn unknown_operator_is_an_error() {
    let mut chain = EventChain::new(Host::default());
    assert_eq!(
        chain.apply_extension("missing", &()).map(|_| ()),
        Err(ChainError::Extension(ExtensionError::NotRegistered))
    );
}

#[test]
fn registration_applies_only_to_chains_constructed_afterwards() {
    let mut early = EventChain::new(Host::default());
    register_extension::<Host>("late_mark", mark_factory);
    let mut late = EventChain::new(Host::default());

    assert_eq!(
        early.apply_extension("late_mark", &"x").map(|_| ()),
        Err(ChainError::Extension(ExtensionError::NotRegistered))
    );
    assert!(late.apply_extension("late_mark", &"x").is_ok());
}

#[test]
fn operators_are_scoped_to_the_context_type() {
    let mut chain = EventChain::new(OtherHost);
    assert_eq!(
        chain.apply_extension("mark", &"x").map(|_| ()),
        Err(ChainError::Extension(ExtensionError::NotRegistered))
    );
}
