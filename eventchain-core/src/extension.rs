use crate::step_list::StepList;
use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Mutex;

/// Appends steps (of any shape) to a chain under construction. The opaque
/// argument is whatever the caller of `apply_extension` passed along.
pub type ExtensionFactory<C> = fn(&mut C, &mut StepList<C>, &dyn Any);

static EXTENSIONS: Mutex<Vec<ExtensionRecord>> = Mutex::new(Vec::new());

struct ExtensionRecord {
    name: &'static str,
    context_type: TypeId,
    factory: Box<dyn Any + Send + Sync>,
}

/// Registers a chain operator process-wide. Every chain with context type `C`
/// constructed afterwards picks it up; existing chains are unaffected.
/// Expected to run during program initialization (e.g. from `#[ctor]`).
pub fn register_extension<C: 'static>(name: &'static str, factory: ExtensionFactory<C>) {
    EXTENSIONS.lock().unwrap().push(ExtensionRecord {
        name,
        context_type: TypeId::of::<C>(),
        factory: Box::new(factory),
    });
}

/// The operator set a newly constructed chain binds. Later registrations of
/// the same name shadow earlier ones.
pub(crate) fn snapshot_for<C: 'static>() -> HashMap<&'static str, ExtensionFactory<C>> {
    EXTENSIONS
        .lock()
        .unwrap()
        .iter()
        .filter(|record| record.context_type == TypeId::of::<C>())
        .filter_map(|record| {
            record
                .factory
                .downcast_ref::<ExtensionFactory<C>>()
                .map(|factory| (record.name, *factory))
        })
        .collect()
}
