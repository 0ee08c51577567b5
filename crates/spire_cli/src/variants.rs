//! `spire variants`: print the artifacts a material expands into.

use std::path::Path;

use spire_variants::{expand, PlannedArtifact};

use crate::{ReportFormat, VariantsArgs};

/// Runs the `spire variants` command. The material file is never read.
pub fn run(args: &VariantsArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let planned = expand(Path::new(&args.material), Path::new(""));
    match args.format {
        ReportFormat::Text => print!("{}", render_text(&planned)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&planned)?),
    }
    Ok(0)
}

fn render_text(planned: &[PlannedArtifact]) -> String {
    let mut out = String::new();
    for p in planned {
        let stage = p
            .variant
            .stage
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let defines: Vec<String> = p
            .variant
            .defines
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        out.push_str(&format!(
            "{:<32} {:<8} {:<5} {}\n",
            p.artifact.display().to_string(),
            p.variant.entry_point,
            stage,
            defines.join(" ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_artifact() {
        let planned = expand(Path::new("materials/metal.slang"), Path::new(""));
        let text = render_text(&planned);
        assert_eq!(text.lines().count(), 14);
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("metal_shadow.vert.spv"));
        assert!(first.contains("main_vs"));
    }

    #[test]
    fn lines_list_defines() {
        let planned = expand(Path::new("metal.slang"), Path::new(""));
        let text = render_text(&planned);
        let prepass = text
            .lines()
            .find(|l| l.starts_with("metal_prepass.vert.spv"))
            .unwrap();
        assert!(prepass.contains("DEPTH_ONLY=1"));
        assert!(prepass.contains("MAIN_VIEW=1"));
    }
}
