use clap::{Args, ValueEnum};
use setbreaker_core::storage::validate_rest_period;
use setbreaker_core::{
    AckChoice, FeedSession, ManualScheduler, Preferences, PreferencesStore, RecordingFeedback,
    RecordingViewport, TickScheduler, ViewportEvent,
};

#[derive(Clone, Copy, ValueEnum)]
pub enum Choice {
    /// Start Next Set
    Next,
    /// Extend Rest
    Extend,
}

impl From<Choice> for AckChoice {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Next => AckChoice::StartNextSet,
            Choice::Extend => AckChoice::ExtendRest,
        }
    }
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Rest period in seconds
    #[arg(long)]
    rest_period: Option<u32>,
    /// Ticks to deliver (defaults to the rest period)
    #[arg(long)]
    ticks: Option<u32>,
    /// One drag gesture, as comma separated offset deltas, delivered before ticking
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    scroll: Vec<f64>,
    /// Answer the expiry alert if it is reached
    #[arg(long, value_enum)]
    choice: Option<Choice>,
    /// Force start-on-scroll on
    #[arg(long)]
    start_on_scroll: bool,
    /// Do not start the countdown on launch
    #[arg(long)]
    no_auto_start: bool,
    /// Ignore the preferences file
    #[arg(long)]
    defaults: bool,
}

/// Replays a session on a manual clock and prints every event, then the final
/// snapshot, as JSON lines.
pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut prefs = if args.defaults {
        Preferences::default()
    } else {
        PreferencesStore::open_default()?.preferences().clone()
    };
    if let Some(secs) = args.rest_period {
        prefs.rest_period = validate_rest_period(secs)?;
    }
    if args.start_on_scroll {
        prefs.start_on_scroll = true;
    }
    if args.no_auto_start {
        prefs.auto_start_timer = false;
    }

    let mut session = FeedSession::new(
        &prefs,
        RecordingViewport::new(),
        ManualScheduler::new(),
        RecordingFeedback::new(),
    );
    session.appear();

    if !args.scroll.is_empty() {
        let mut offset = 0.0;
        session.handle_viewport(ViewportEvent::DragBegan { offset });
        for delta in &args.scroll {
            offset += delta;
            session.handle_viewport(ViewportEvent::Scrolled { offset });
        }
        session.handle_viewport(ViewportEvent::DragEnded);
    }

    for _ in 0..args.ticks.unwrap_or(prefs.rest_period) {
        if !session.timer().scheduler().is_armed() {
            break;
        }
        session.tick();
    }

    if let Some(choice) = args.choice {
        session.acknowledge_expiry(choice.into());
    }

    for event in session.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    println!("{}", serde_json::to_string(&session.timer().snapshot())?);
    Ok(())
}
