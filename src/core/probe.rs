//! External command predicate
//!
//! A [`CommandProbe`] runs a command once per bisection argument and reports
//! whether it exited successfully. Arguments are substituted into the command
//! template: `{}` expands to every component joined by a space, `{N}` to the
//! N-th component. A template without placeholders gets the components
//! appended as trailing arguments.

use crate::core::args::Args;
use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What a probe run produced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// Exit status 0
    #[default]
    Success,
    /// Non-zero exit, killed by a signal, or timed out
    Failure,
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success => write!(f, "success"),
            ProbeOutcome::Failure => write!(f, "failure"),
        }
    }
}

impl FromStr for ProbeOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" | "ok" | "true" => Ok(ProbeOutcome::Success),
            "failure" | "fail" | "false" => Ok(ProbeOutcome::Failure),
            other => Err(format!(
                "expected 'success' or 'failure', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Default)]
struct RunningState {
    child: Option<Child>,
    triggered: bool,
}

/// Stops the command a [`CommandProbe`] is running, from any thread.
///
/// Once triggered, the running command and every process it started are
/// killed, and later runs fail with [`CommandError::Cancelled`] instead of
/// starting anything.
#[derive(Debug, Clone, Default)]
pub struct KillSwitch {
    state: Arc<Mutex<RunningState>>,
}

impl KillSwitch {
    fn lock(&self) -> MutexGuard<'_, RunningState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn trigger(&self) {
        let mut state = self.lock();
        state.triggered = true;
        if let Some(mut child) = state.child.take() {
            log::debug!("Killing running command (pid {})", child.id());
            terminate(&mut child);
            let _ = child.wait();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.lock().triggered
    }
}

/// Kill `child` together with its process group.
#[cfg(unix)]
fn terminate(child: &mut Child) {
    // Commands are spawned as group leaders, so the pid is also the group id
    unsafe {
        libc::killpg(child.id() as libc::pid_t, libc::SIGKILL);
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    let _ = child.kill();
}

#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    template: Vec<String>,
    timeout: Option<Duration>,
    show_output: bool,
    kill_switch: KillSwitch,
}

impl CommandProbe {
    /// Build a probe from `program arg...`.
    pub fn new<S: Into<String>>(command: impl IntoIterator<Item = S>) -> Result<Self, CommandError> {
        let mut parts = command.into_iter().map(Into::into);
        let program = parts
            .next()
            .filter(|p: &String| !p.is_empty())
            .ok_or(CommandError::EmptyCommand)?;

        Ok(Self {
            program,
            template: parts.collect(),
            timeout: None,
            show_output: false,
            kill_switch: KillSwitch::default(),
        })
    }

    /// Kill the command and count the probe as a failure after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Let the command write to the terminal instead of discarding its output.
    pub fn show_output(mut self, show: bool) -> Self {
        self.show_output = show;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Shared with every clone of this probe.
    pub fn kill_switch(&self) -> KillSwitch {
        self.kill_switch.clone()
    }

    /// Command line arguments (program excluded) for one bisection argument.
    pub fn render(&self, args: &Args<String>) -> Result<Vec<String>, CommandError> {
        let components = args.components();
        let mut rendered = Vec::with_capacity(self.template.len() + components.len());
        let mut substituted = false;

        for part in &self.template {
            let (text, found) = substitute(part, components)?;
            substituted |= found;
            rendered.push(text);
        }

        if !substituted {
            rendered.extend(components.iter().cloned());
        }
        Ok(rendered)
    }

    pub fn run(&self, args: &Args<String>) -> Result<ProbeOutcome, CommandError> {
        let rendered = self.render(args)?;
        log::debug!("Running probe: {} {}", self.program, rendered.join(" "));

        let mut command = Command::new(&self.program);
        command.args(&rendered).stdin(Stdio::null());
        if !self.show_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        {
            let mut state = self.kill_switch.lock();
            if state.triggered {
                return Err(self.cancelled());
            }
            let child = command.spawn().map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;
            state.child = Some(child);
        }

        Ok(match self.wait_for_exit()? {
            Some(status) if status.success() => ProbeOutcome::Success,
            Some(status) => {
                log::debug!("Probe for '{}' exited with {}", args, status);
                ProbeOutcome::Failure
            }
            None => {
                log::warn!(
                    "Probe for '{}' timed out after {:?}, counted as failure",
                    args,
                    self.timeout.unwrap_or_default()
                );
                ProbeOutcome::Failure
            }
        })
    }

    /// Poll the running child. `None` when the timeout passed; the child's
    /// process group is killed and the child reaped then.
    fn wait_for_exit(&self) -> Result<Option<ExitStatus>, CommandError> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        loop {
            {
                let mut state = self.kill_switch.lock();
                let Some(child) = state.child.as_mut() else {
                    return Err(self.cancelled());
                };

                let polled = child.try_wait();
                let finished = match polled {
                    Ok(Some(status)) => Some(Ok(Some(status))),
                    Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => {
                        terminate(child);
                        Some(child.wait().map(|_| None))
                    }
                    Ok(None) => None,
                    Err(source) => {
                        terminate(child);
                        Some(Err(source))
                    }
                };

                if let Some(result) = finished {
                    state.child = None;
                    return result.map_err(|source| self.wait_error(source));
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn cancelled(&self) -> CommandError {
        CommandError::Cancelled {
            program: self.program.clone(),
        }
    }

    fn wait_error(&self, source: std::io::Error) -> CommandError {
        CommandError::Wait {
            program: self.program.clone(),
            source,
        }
    }
}

/// Expand `{}` and `{N}` in one template part. Other brace groups (shell
/// `${VAR}`, awk programs) are kept verbatim.
fn substitute(part: &str, components: &[String]) -> Result<(String, bool), CommandError> {
    let mut output = String::with_capacity(part.len());
    let mut found = false;
    let mut rest = part;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            output.push_str(&rest[open..]);
            return Ok((output, found));
        };

        let inner = &after[..close];
        if inner.is_empty() {
            output.push_str(&components.join(" "));
            found = true;
        } else if inner.bytes().all(|b| b.is_ascii_digit()) {
            let component = inner
                .parse::<usize>()
                .ok()
                .and_then(|index| components.get(index))
                .ok_or_else(|| CommandError::MissingComponent {
                    placeholder: format!("{{{}}}", inner),
                    available: components.len(),
                })?;
            output.push_str(component);
            found = true;
        } else {
            output.push('{');
            output.push_str(inner);
            output.push('}');
        }
        rest = &after[close + 1..];
    }

    output.push_str(rest);
    Ok((output, found))
}
