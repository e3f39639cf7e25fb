//! Running external post-processing tools over simulation snapshots.
//!
//! Interface curves are extracted from snapshots by separately compiled
//! binaries that understand the solver's dump format.
//! This module doesn't know anything about those binaries;
//! it only fills in command templates and runs them,
//! failing on the first non-zero exit status.
//!
//! The [`ToolRunner`] trait is the seam between the batch logic and
//! the operating system, so [`extract_interfaces`] can be driven
//! by something other than real processes.

use std::path::PathBuf;
use std::process::Command;

/// Error in running an external tool.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// The process couldn't be started at all.
    #[error("Failed to start {program:?}")]
    Spawn {
        /// The program we tried to run.
        program: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The process ran but reported failure.
    #[error("{program:?} exited unsuccessfully (exit code {code:?})")]
    NonZeroExit {
        /// The program that failed.
        program: String,
        /// Its exit code, or `None` if it was killed by a signal.
        code: Option<i32>,
    },
    /// The timestep range can't be iterated.
    #[error("Invalid timestep size {0}, must be positive")]
    InvalidTimestep(f64),
    /// The time range has a non-finite bound.
    #[error("Invalid time range from {start} to {end}, both ends must be finite")]
    InvalidRange {
        /// Requested start time.
        start: f64,
        /// Requested end time.
        end: f64,
    },
}

/// A program and its arguments, ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Path or name of the program.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A command line with `{name}` placeholders.
///
/// ```
/// # use revolver_core::CommandTemplate;
/// let template = CommandTemplate::new("./extract", ["{input}", "{output}", "--bond", "0.1"]);
/// let inv = template.render(&[("input", "snap-0.1"), ("output", "iface-0.1.dat")]);
/// assert_eq!(inv.args, ["snap-0.1", "iface-0.1.dat", "--bond", "0.1"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandTemplate {
    /// Path or name of the program, may contain placeholders.
    pub program: String,
    /// Arguments, may contain placeholders.
    pub args: Vec<String>,
}

impl CommandTemplate {
    /// Create a template from a program and its arguments.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Substitute `{name}` placeholders with the given values.
    ///
    /// Placeholders without a value are left as they are.
    /// Substituted values are inserted verbatim,
    /// even if they contain placeholders themselves.
    pub fn render(&self, vars: &[(&str, &str)]) -> Invocation {
        Invocation {
            program: substitute(&self.program, vars),
            args: self.args.iter().map(|arg| substitute(arg, vars)).collect(),
        }
    }
}

fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Something that can run an [`Invocation`] to completion.
pub trait ToolRunner {
    /// Run the invocation synchronously,
    /// returning an error if it couldn't be started or didn't succeed.
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError>;
}

/// Runs invocations as child processes of the current process.
///
/// Standard output and error are inherited,
/// so whatever the tool prints shows up in the terminal.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner {
    /// Directory to run the tools in.
    /// Defaults to the current working directory.
    pub working_dir: Option<PathBuf>,
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        log::debug!("Running {invocation}");
        let status = cmd.status().map_err(|source| ToolError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(ToolError::NonZeroExit {
                program: invocation.program.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// Evenly spaced simulation times in a half-open range `[start, end)`.
///
/// Times are computed as `start + k * dt` rather than by repeated addition
/// so that rounding errors don't accumulate over long ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timesteps {
    /// First time in the range.
    pub start: f64,
    /// End of the range, excluded.
    pub end: f64,
    /// Spacing between consecutive times.
    pub dt: f64,
}

impl Timesteps {
    /// Iterate over the times in the range.
    pub fn iter(&self) -> Result<impl Iterator<Item = f64>, ToolError> {
        let Self { start, end, dt } = *self;
        if dt.is_nan() || dt <= 0.0 || dt.is_infinite() {
            return Err(ToolError::InvalidTimestep(dt));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(ToolError::InvalidRange { start, end });
        }
        // number of steps is rounded up like a half-open arange,
        // with a small slack so an `end` landing exactly on a step stays excluded
        let count = ((end - start) / dt - 1e-9).ceil().max(0.0) as usize;
        Ok((0..count).map(move |k| start + k as f64 * dt))
    }
}

/// Parameters for [`extract_interfaces`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractParams {
    /// Command to run for every timestep.
    ///
    /// Available placeholders are `{t}`, `{input}` and `{output}`.
    pub command: CommandTemplate,
    /// Path of the snapshot to read, with a `{t}` placeholder.
    pub input_pattern: String,
    /// Path of the interface file to write, with a `{t}` placeholder.
    pub output_pattern: String,
    /// Which times to process.
    pub timesteps: Timesteps,
}

/// Format a simulation time the way snapshot files are named.
#[inline]
pub fn format_time(t: f64) -> String {
    format!("{t:.4}")
}

/// Run an extraction tool for every timestep in a range.
///
/// Returns the output paths in the order they were written.
/// Stops at the first failure.
pub fn extract_interfaces(
    runner: &impl ToolRunner,
    params: &ExtractParams,
) -> Result<Vec<PathBuf>, ToolError> {
    let mut outputs = Vec::new();
    for t in params.timesteps.iter()? {
        let time = format_time(t);
        let input = substitute(&params.input_pattern, &[("t", &time)]);
        let output = substitute(&params.output_pattern, &[("t", &time)]);
        let invocation = params.command.render(&[
            ("t", &time),
            ("input", &input),
            ("output", &output),
        ]);

        runner.run(&invocation)?;
        log::info!("Extracted {output} from {input} (t = {time})");
        outputs.push(PathBuf::from(output));
    }
    Ok(outputs)
}
