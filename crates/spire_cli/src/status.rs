//! `spire status`: report which artifacts a build would recompile.

use spire_build::{tree_status, StatusEntry};

use crate::project::select_project;
use crate::{GlobalArgs, ReportFormat, StatusArgs};

/// Runs the `spire status` command. Never compiles anything.
pub fn run(args: &StatusArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = select_project(global, args.input.as_deref(), args.output.as_deref())?;
    let entries = tree_status(&project.input, &project.output, project.missing_manifest)?;

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&entries)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(0)
}

fn render_text(entries: &[StatusEntry]) -> String {
    let mut out = String::new();
    let mut stale = 0;
    for entry in entries.iter().filter(|e| e.staleness.is_stale()) {
        stale += 1;
        out.push_str(&format!(
            "  stale  {} ({})\n",
            entry.job.artifact.display(),
            entry.staleness
        ));
    }
    out.push_str(&format!(
        "{stale} of {} artifacts need rebuilding\n",
        entries.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_build::plan_jobs;
    use spire_cache::Staleness;
    use spire_source::SourceUnit;
    use std::path::{Path, PathBuf};

    fn entries() -> Vec<StatusEntry> {
        let units = vec![
            SourceUnit::from_path(Path::new("/in"), Path::new("/in/lit.slang")).unwrap(),
            SourceUnit::from_path(Path::new("/in"), Path::new("/in/blit.frag")).unwrap(),
        ];
        let mut jobs = plan_jobs(&units, Path::new("/out")).into_iter();
        vec![
            StatusEntry {
                job: jobs.next().unwrap(),
                staleness: Staleness::DependencyChanged {
                    path: PathBuf::from("/in/common.slangh"),
                },
            },
            StatusEntry {
                job: jobs.next().unwrap(),
                staleness: Staleness::Fresh,
            },
        ]
    }

    #[test]
    fn text_lists_only_stale_artifacts() {
        let text = render_text(&entries());
        assert_eq!(
            text,
            "  stale  /out/lit.spv (dependency /in/common.slangh changed)\n\
             1 of 2 artifacts need rebuilding\n"
        );
    }

    #[test]
    fn empty_tree() {
        assert_eq!(render_text(&[]), "0 of 0 artifacts need rebuilding\n");
    }
}
