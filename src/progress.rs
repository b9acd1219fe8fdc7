use crossterm::style::Stylize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Urls,
    Apps,
    ShellCmds,
}

/// One progress event per attempted entry, emitted before the platform
/// action runs, plus a failure event when an attempt is recorded as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PhaseStarted(Phase),
    OpeningUrl {
        url: String,
        browser: Option<String>,
    },
    OpeningApp {
        target: String,
        app: Option<String>,
    },
    RunningCmd {
        argv: Vec<String>,
    },
    EntryFailed {
        target: String,
        detail: String,
    },
}

pub trait ProgressSink {
    fn event(&self, event: Event);
}

pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressSink for ConsoleSink {
    fn event(&self, event: Event) {
        match event {
            Event::PhaseStarted(Phase::Urls) => println!("{}", "Opening urls.".bold()),
            Event::PhaseStarted(Phase::Apps) => println!("{}", "Opening apps.".bold()),
            Event::PhaseStarted(Phase::ShellCmds) => println!("{}", "Running cmds.".bold()),
            Event::OpeningUrl { url, browser } => match browser {
                Some(browser) if self.verbose => {
                    println!("{} {url} {}", "Opening url:".cyan(), format!("[{browser}]").dark_grey())
                }
                _ => println!("{} {url}", "Opening url:".cyan()),
            },
            Event::OpeningApp { target, app } => match app {
                Some(app) if self.verbose => {
                    println!("{} {target} {}", "Opening app:".cyan(), format!("[{app}]").dark_grey())
                }
                _ => println!("{} {target}", "Opening app:".cyan()),
            },
            Event::RunningCmd { argv } => {
                println!("{} {}", "Running cmd:".cyan(), argv.join(" "))
            }
            Event::EntryFailed { target, detail } => {
                eprintln!("{} {target}: {detail}", "failed:".red())
            }
        }
    }
}
