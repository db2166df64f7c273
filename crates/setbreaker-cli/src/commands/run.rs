use clap::Args;
use setbreaker_core::storage::validate_rest_period;
use setbreaker_core::{
    AckChoice, Event, FeedSession, Preferences, PreferencesObserver, PreferencesStore,
    TimerSnapshot, ValidationError, ViewportEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::terminal::{status_line, IntervalScheduler, TerminalFeedback, TerminalViewport};

type Session = FeedSession<TerminalViewport, IntervalScheduler, TerminalFeedback>;

#[derive(Args)]
pub struct RunArgs {
    /// Rest period for this session in seconds (does not change preferences)
    #[arg(long)]
    rest_period: Option<u32>,
    /// Do not start the countdown on launch
    #[arg(long)]
    no_auto_start: bool,
    /// Ring the terminal bell when the rest period ends
    #[arg(long)]
    bell: bool,
}

/// A line typed at the session prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Start/pause toggle
    Toggle,
    Pause,
    Reset,
    NextSet,
    Extend,
    /// One drag gesture made of relative offset changes
    Scroll(Vec<f64>),
    Set { key: String, value: String },
    Status,
    Help,
    Quit,
}

const HELP: &str = "commands: start | pause | reset | next | extend | scroll <d1> <d2> ... \
                    | set <key> <value> | status | help | quit";

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(SessionCommand::Status);
    };
    let cmd = match head.to_ascii_lowercase().as_str() {
        "start" | "s" => SessionCommand::Toggle,
        "pause" | "p" => SessionCommand::Pause,
        "reset" | "r" => SessionCommand::Reset,
        "next" | "n" => SessionCommand::NextSet,
        "extend" | "e" => SessionCommand::Extend,
        "scroll" => {
            let deltas = words
                .by_ref()
                .map(|w| w.parse::<f64>().map_err(|_| format!("not a number: {w}")))
                .collect::<Result<Vec<_>, _>>()?;
            if deltas.is_empty() {
                return Err("scroll needs at least one delta".into());
            }
            SessionCommand::Scroll(deltas)
        }
        "set" => {
            let (Some(key), Some(value)) = (words.next(), words.next()) else {
                return Err("usage: set <key> <value>".into());
            };
            SessionCommand::Set {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "status" => SessionCommand::Status,
        "help" | "?" => SessionCommand::Help,
        "quit" | "q" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    if words.next().is_some() {
        return Err(format!("unexpected arguments after '{head}'"));
    }
    Ok(cmd)
}

/// Command-line values that outrank the stored preferences for one session.
///
/// They are laid over every preference change the session sees, until a `set`
/// names the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOverrides {
    rest_period: Option<u32>,
    auto_start_timer: Option<bool>,
}

impl SessionOverrides {
    pub fn from_args(args: &RunArgs) -> Result<Self, ValidationError> {
        Ok(Self {
            rest_period: args.rest_period.map(validate_rest_period).transpose()?,
            auto_start_timer: args.no_auto_start.then_some(false),
        })
    }

    pub fn apply(&self, prefs: &Preferences) -> Preferences {
        let mut prefs = prefs.clone();
        if let Some(secs) = self.rest_period {
            prefs.rest_period = secs;
        }
        if let Some(auto) = self.auto_start_timer {
            prefs.auto_start_timer = auto;
        }
        prefs
    }

    /// Overrides left after the user sets `key` explicitly.
    pub fn without(&self, key: &str) -> Self {
        let mut rest = self.clone();
        match key {
            "rest_period" => rest.rest_period = None,
            "auto_start_timer" => rest.auto_start_timer = None,
            _ => {}
        }
        rest
    }
}

/// Forwards store changes with the session overrides laid on top.
struct Overlaid<'a, O: PreferencesObserver> {
    inner: &'a mut O,
    overrides: &'a SessionOverrides,
}

impl<O: PreferencesObserver> PreferencesObserver for Overlaid<'_, O> {
    fn preferences_changed(&mut self, prefs: &Preferences) {
        self.inner.preferences_changed(&self.overrides.apply(prefs));
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = PreferencesStore::open_default()?;
    let overrides = SessionOverrides::from_args(&args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(&mut store, overrides, args.bell))
}

async fn session_loop(
    store: &mut PreferencesStore,
    mut overrides: SessionOverrides,
    bell: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session: Session = FeedSession::new(
        &overrides.apply(store.preferences()),
        TerminalViewport::default(),
        IntervalScheduler::default(),
        TerminalFeedback::with_bell(bell),
    );
    let mut offset = 0.0;

    println!("{HELP}");
    render(&session.appear());
    report(&mut session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = session.timer_mut().scheduler_mut().wait() => {
                render(&session.tick());
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(SessionCommand::Quit) => break,
                    Ok(cmd) => apply(&mut session, store, &mut overrides, &mut offset, cmd),
                    Err(e) => println!("{e}"),
                }
            }
        }
        report(&mut session);
    }

    debug!("session ended");
    Ok(())
}

fn apply(
    session: &mut Session,
    store: &mut PreferencesStore,
    overrides: &mut SessionOverrides,
    offset: &mut f64,
    cmd: SessionCommand,
) {
    match cmd {
        SessionCommand::Toggle => render(&session.start()),
        SessionCommand::Pause => render(&session.pause()),
        SessionCommand::Reset => render(&session.reset()),
        SessionCommand::NextSet => render(&session.acknowledge_expiry(AckChoice::StartNextSet)),
        SessionCommand::Extend => render(&session.acknowledge_expiry(AckChoice::ExtendRest)),
        SessionCommand::Scroll(deltas) => {
            session.handle_viewport(ViewportEvent::DragBegan { offset: *offset });
            for delta in deltas {
                *offset += delta;
                let scrolled = ViewportEvent::Scrolled { offset: *offset };
                if let Some(snap) = session.handle_viewport(scrolled) {
                    render(&snap);
                }
            }
            session.handle_viewport(ViewportEvent::DragEnded);
        }
        SessionCommand::Set { key, value } => {
            let remaining = overrides.without(&key);
            let mut observer = Overlaid {
                inner: &mut *session,
                overrides: &remaining,
            };
            match store.update(&key, &value, &mut observer) {
                Ok(_) => {
                    *overrides = remaining;
                    render(&session.timer().snapshot());
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "preference not updated");
                    println!("error: {e}");
                }
            }
        }
        SessionCommand::Status => {
            if let Some(url) = session.viewport().current_url() {
                println!("feed: {url}");
            }
            render(&session.timer().snapshot());
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
}

fn render(snap: &TimerSnapshot) {
    println!("{}", status_line(snap));
}

/// Surface events a user must see; everything else goes to the log.
fn report(session: &mut Session) {
    for event in session.drain_events() {
        match &event {
            Event::RestCompleted { alert, .. } => {
                println!("{}: {}", alert.title, alert.message);
                let choices: Vec<_> = alert
                    .choices
                    .iter()
                    .map(|c| match c {
                        AckChoice::StartNextSet => format!("'next' = {}", c.label()),
                        AckChoice::ExtendRest => format!("'extend' = {}", c.label()),
                    })
                    .collect();
                println!("  {}", choices.join(", "));
            }
            _ => debug!(?event, "event"),
        }
    }
}
