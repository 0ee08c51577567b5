//! Child-process backed compiler for `slangc` and `glslangValidator`.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use spire_common::DEFAULT_ENTRY_POINT;
use spire_source::SourceLanguage;
use tracing::debug;

use crate::discovery::{DependencyDiscovery, IncludeNoticeParser, LineDirectiveParser};
use crate::error::CompileError;
use crate::invocation::{CompileRequest, Compiler, ToolOutput};
use crate::toolchain::ToolchainConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs the configured toolchain executables.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    toolchain: ToolchainConfig,
    notices: IncludeNoticeParser,
    lines: LineDirectiveParser,
}

impl ProcessCompiler {
    /// Creates a compiler for `toolchain`.
    pub fn new(toolchain: ToolchainConfig) -> Self {
        let notices = IncludeNoticeParser::new(toolchain.include_notice.clone());
        Self {
            toolchain,
            notices,
            lines: LineDirectiveParser,
        }
    }

    /// The toolchain this compiler runs.
    pub fn toolchain(&self) -> &ToolchainConfig {
        &self.toolchain
    }

    /// Builds the command line for a Slang compile or include report.
    pub fn slang_args(&self, request: &CompileRequest<'_>, report_includes: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            request.source.into(),
            "-profile".into(),
            self.toolchain.profile.as_str().into(),
            "-target".into(),
            "spirv".into(),
            "-entry".into(),
            request.entry_point().into(),
        ];
        if let Some(stage) = request.stage() {
            args.push("-stage".into());
            args.push(stage.slang_name().into());
        }
        if self.toolchain.debug_info {
            args.push("-g".into());
        }
        if report_includes {
            args.push("-output-includes".into());
        }
        args.push("-o".into());
        args.push(request.output.into());
        for dir in request.include_paths {
            args.push("-I".into());
            args.push(dir.into());
        }
        for (name, value) in request.defines().iter() {
            args.push("-D".into());
            args.push(format!("{name}={value}").into());
        }
        args
    }

    /// Builds the command line for a GLSL compile, or a preprocess-only run
    /// when reporting includes.
    pub fn glslang_args(
        &self,
        request: &CompileRequest<'_>,
        report_includes: bool,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--target-env".into(),
            self.toolchain.target_env.as_str().into(),
            "-V".into(),
        ];
        if report_includes {
            args.push("-E".into());
        } else if self.toolchain.debug_info {
            args.push("-g".into());
        }
        if let Some(stage) = request.stage() {
            args.push("-S".into());
            args.push(stage.extension().into());
        }
        if request.entry_point() != DEFAULT_ENTRY_POINT {
            args.push("-e".into());
            args.push(request.entry_point().into());
            args.push("--source-entrypoint".into());
            args.push(request.entry_point().into());
        }
        for dir in request.include_paths {
            let mut flag = OsString::from("-I");
            flag.push(dir);
            args.push(flag);
        }
        for (name, value) in request.defines().iter() {
            args.push(format!("-D{name}={value}").into());
        }
        args.push(request.source.into());
        if !report_includes {
            args.push("-o".into());
            args.push(request.output.into());
        }
        args
    }

    fn command(&self, request: &CompileRequest<'_>, report_includes: bool) -> Command {
        let (program, args) = match request.language {
            SourceLanguage::Slang => (&self.toolchain.slangc, self.slang_args(request, report_includes)),
            SourceLanguage::Glsl => (
                &self.toolchain.glslang,
                self.glslang_args(request, report_includes),
            ),
        };
        let mut command = Command::new(program);
        command.args(args);
        command
    }

    /// Runs `command` to completion, killing it if the timeout elapses.
    fn run(&self, mut command: Command) -> Result<ToolOutput, CompileError> {
        let program = PathBuf::from(command.get_program());
        debug!(command = ?command, "running compiler");

        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.toolchain.timeout {
            Some(limit) => wait_with_timeout(&mut child, limit),
            None => child.wait().map(Some),
        }
        .map_err(|source| CompileError::Io {
            path: program.clone(),
            source,
        })?;

        let stdout = stdout.join().unwrap_or_default();
        let diagnostics = stderr.join().unwrap_or_default();
        match status {
            Some(status) => Ok(ToolOutput {
                success: status.success(),
                stdout,
                diagnostics,
            }),
            None => Err(CompileError::TimedOut {
                program,
                seconds: self.toolchain.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            }),
        }
    }
}

impl Compiler for ProcessCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<ToolOutput, CompileError> {
        self.run(self.command(request, false))
    }

    fn report_includes(&self, request: &CompileRequest<'_>) -> Result<ToolOutput, CompileError> {
        match request.language {
            // slangc insists on producing output; send it to a scratch file.
            SourceLanguage::Slang => {
                let scratch = scratch_output(request.output)?;
                let scratch_request = CompileRequest {
                    output: &scratch,
                    ..*request
                };
                self.run(self.command(&scratch_request, true))
            }
            SourceLanguage::Glsl => self.run(self.command(request, true)),
        }
    }

    fn discovery(&self, language: SourceLanguage) -> &dyn DependencyDiscovery {
        match language {
            SourceLanguage::Slang => &self.notices,
            SourceLanguage::Glsl => &self.lines,
        }
    }
}

/// A temporary path next to `output`, removed when dropped.
fn scratch_output(output: &Path) -> Result<tempfile::TempPath, CompileError> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".spire-report-")
        .tempfile_in(dir)
        .map(tempfile::NamedTempFile::into_temp_path)
        .map_err(|source| CompileError::Io {
            path: dir.to_path_buf(),
            source,
        })
}

/// Reads a child pipe to the end on a helper thread so the child never
/// blocks on a full pipe.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Waits for `child`, returning `None` after killing it at the deadline.
fn wait_with_timeout(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
