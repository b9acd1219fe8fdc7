use thiserror::Error;

use crate::config::{AppEntry, Config, ShellCmdEntry, UrlEntry};
use crate::platform::{Opener, PlatformError, Runner};
use crate::progress::{Event, Phase, ProgressSink};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(
        "shell command #{index} has {found} token(s); expected an executable and at least one argument"
    )]
    MalformedCommand { index: usize, found: usize },
}

/// Per-entry failures collected over one run. Failures of independent
/// resources never abort the run, so the caller reads them from here.
#[derive(Debug, Default)]
pub struct LaunchReport {
    pub attempted: usize,
    pub failures: Vec<LaunchFailure>,
}

#[derive(Debug)]
pub struct LaunchFailure {
    pub target: String,
    pub detail: String,
}

impl LaunchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, target: &str, outcome: Result<(), PlatformError>, sink: &dyn ProgressSink) {
        self.attempted += 1;
        if let Err(err) = outcome {
            let failure = LaunchFailure {
                target: target.to_string(),
                detail: err.to_string(),
            };
            sink.event(Event::EntryFailed {
                target: failure.target.clone(),
                detail: failure.detail.clone(),
            });
            self.failures.push(failure);
        }
    }
}

/// Walks a validated [`Config`] and dispatches every declared resource to
/// the matching platform service: urls first, then apps, then shell
/// commands, each list in declaration order.
pub struct Launcher<'a> {
    opener: &'a dyn Opener,
    runner: &'a dyn Runner,
    sink: &'a dyn ProgressSink,
}

impl<'a> Launcher<'a> {
    pub fn new(opener: &'a dyn Opener, runner: &'a dyn Runner, sink: &'a dyn ProgressSink) -> Self {
        Self {
            opener,
            runner,
            sink,
        }
    }

    pub fn launch(&self, config: &Config) -> Result<LaunchReport, LaunchError> {
        let mut report = LaunchReport::default();
        self.open_urls(&config.urls, &mut report);
        self.open_apps(&config.apps, &mut report);
        self.run_shell_cmds(&config.shell_cmds, &mut report)?;
        Ok(report)
    }

    fn open_urls(&self, entries: &[UrlEntry], report: &mut LaunchReport) {
        self.sink.event(Event::PhaseStarted(Phase::Urls));
        for entry in entries {
            self.sink.event(Event::OpeningUrl {
                url: entry.url.clone(),
                browser: entry.browser().map(str::to_owned),
            });
            let outcome = match entry.browser() {
                Some(browser) => self.opener.open_with(&entry.url, browser),
                None => self.opener.open_default(&entry.url),
            };
            report.record(&entry.url, outcome, self.sink);
        }
    }

    fn open_apps(&self, entries: &[AppEntry], report: &mut LaunchReport) {
        self.sink.event(Event::PhaseStarted(Phase::Apps));
        for entry in entries {
            self.sink.event(Event::OpeningApp {
                target: entry.args.clone(),
                app: entry.handler().map(str::to_owned),
            });
            let outcome = match entry.handler() {
                Some(app) => self.opener.open_with(&entry.args, app),
                None => self.opener.open_default(&entry.args),
            };
            report.record(&entry.args, outcome, self.sink);
        }
    }

    fn run_shell_cmds(
        &self,
        entries: &[ShellCmdEntry],
        report: &mut LaunchReport,
    ) -> Result<(), LaunchError> {
        self.sink.event(Event::PhaseStarted(Phase::ShellCmds));
        for (index, entry) in entries.iter().enumerate() {
            // A malformed entry poisons the rest of the run; nothing that
            // already launched is rolled back.
            let (program, args) = match entry.cmd.split_first() {
                Some((program, args)) if !args.is_empty() => (program, args),
                _ => {
                    return Err(LaunchError::MalformedCommand {
                        index,
                        found: entry.cmd.len(),
                    });
                }
            };
            self.sink.event(Event::RunningCmd {
                argv: entry.cmd.clone(),
            });
            // Blocks until the child exits; a failed start and a non-zero
            // exit are both recorded without stopping later commands.
            let outcome = match self.runner.run(program, args) {
                Ok(0) => Ok(()),
                Ok(code) => Err(PlatformError::NonZeroExit {
                    program: program.clone(),
                    code,
                }),
                Err(err) => Err(err),
            };
            report.record(program, outcome, self.sink);
        }
        Ok(())
    }
}
