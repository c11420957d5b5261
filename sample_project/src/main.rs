use eventchain_core::ctor::ctor;
use eventchain_core::register_extension;
use eventchain_core::ChainContext;
use eventchain_core::EventChain;
use eventchain_core::Step;
use eventchain_core::StepList;
use log::info;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::Appender;
use log4rs::config::Config;
use log4rs::config::Root;
use log4rs::encode::pattern::PatternEncoder;
use std::any::Any;

struct Guard {
    frame_seconds: f64,
    position: f64,
    shouts: u32,
}

impl ChainContext for Guard {
    fn delta(&self) -> f64 {
        self.frame_seconds
    }
}

fn shout_factory(_guard: &mut Guard, steps: &mut StepList<Guard>, arg: &dyn Any) {
    let line = arg
        .downcast_ref::<&str>()
        .copied()
        .unwrap_or("...")
        .to_string();
    steps.push(Step::action(move |guard: &mut Guard| {
        guard.shouts += 1;
        info!("guard shouts: {}", line);
    }));
}

#[ctor]
fn register_shout() {
    register_extension::<Guard>("shout", shout_factory);
}

fn init_logging() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {l} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .unwrap();
    log4rs::init_config(config).unwrap();
}

fn main() {
    init_logging();

    let guard = Guard {
        frame_seconds: 0.25,
        position: 0.0,
        shouts: 0,
    };
    let mut patrol = EventChain::new(guard);
    patrol
        .then(|g| info!("patrol starts at {:.1}", g.position))
        .wait(1.0)
        .during(|g| g.position += 1.0)
        .unwrap()
        .then(|g| info!("reached the far post at {:.1}", g.position))
        .apply_extension("shout", &"who goes there?")
        .unwrap()
        .wait(1.0)
        .during(|g| g.position -= 1.0)
        .unwrap()
        .then(|g| info!("back at {:.1}", g.position))
        .repeat(3);

    // the host loop: one tick per simulated frame
    for _ in 0..60 {
        patrol.tick();
    }
    info!("patrol over, {} shouts", patrol.context().shouts);
}
