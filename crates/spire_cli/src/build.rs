//! `spire build`: incremental compilation of the shader tree.

use spire_build::{BuildOptions, BuildReport, Orchestrator};
use spire_compiler::{Dispatcher, ProcessCompiler};

use crate::project::select_project;
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `spire build` command.
///
/// Returns exit code 0 if every job built or was up to date, 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = select_project(global, args.input.as_deref(), args.output.as_deref())?;

    let options = BuildOptions {
        jobs: args.jobs.unwrap_or(project.jobs),
        fail_fast: args.fail_fast,
        missing_manifest: project.missing_manifest,
    };
    let dispatcher = Dispatcher::new(
        ProcessCompiler::new(project.toolchain.clone()),
        project.include_paths(),
    );
    let orchestrator = Orchestrator::new(dispatcher, options);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Building {} -> {}",
            project.input.display(),
            project.output.display()
        );
    }
    let report = orchestrator.run(&project.input, &project.output)?;

    match args.format {
        ReportFormat::Text => print_text(&report, global),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.is_success() { 0 } else { 1 })
}

fn print_text(report: &BuildReport, global: &GlobalArgs) {
    for failure in &report.failures {
        eprintln!("error: {}", failure.message);
    }
    if !global.quiet {
        for warning in &report.warnings {
            eprintln!(
                "warning: {}: dependencies not recorded ({})",
                warning.artifact.display(),
                warning.message
            );
        }
        eprintln!("    Finished {report}");
    }
}
