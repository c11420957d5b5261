pub(crate) mod chain;
pub(crate) mod chain_result;
pub(crate) mod context;
pub(crate) mod extension;
pub(crate) mod queue;
pub(crate) mod step;
pub(crate) mod step_list;

pub use ctor;

pub use chain::*;
pub use chain_result::*;
pub use context::*;
pub use extension::register_extension;
pub use extension::ExtensionFactory;
pub use step::CustomStep;
pub use step::Step;
pub use step::StepOutcome;
pub use step_list::*;
