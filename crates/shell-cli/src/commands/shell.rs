//! `shell` subcommand - build shells for the groups of a file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use surface_shell::{ShellParams, ShellStats, shell_groups};

use super::{load, select_groups};
use crate::{Cli, OutputFormat, output};

/// Command-line settings layered over the parameters.
pub struct Overrides<'a> {
    pub thickness: Option<f64>,
    pub config: Option<&'a Path>,
    pub group_name: Option<&'a str>,
    pub group: Option<&'a str>,
}

#[derive(Serialize)]
struct ShellReport {
    input: String,
    output: String,
    success: bool,
    thickness: f64,
    operation: Option<String>,
    input_faces: usize,
    output_faces: usize,
    groups: Vec<GroupReport>,
}

#[derive(Serialize)]
struct GroupReport {
    name: String,
    offset_faces: usize,
    triangulated_faces: usize,
    border_quads: usize,
    split_border_faces: usize,
    warnings: usize,
}

impl GroupReport {
    fn new(name: &str, stats: &ShellStats) -> Self {
        Self {
            name: name.to_string(),
            offset_faces: stats.offset_faces,
            triangulated_faces: stats.triangulated_faces,
            border_quads: stats.border_quads,
            split_border_faces: stats.split_border_faces,
            warnings: stats.warnings,
        }
    }
}

fn resolve_params(overrides: &Overrides<'_>) -> Result<ShellParams> {
    let mut params = match overrides.config {
        Some(path) => ShellParams::from_toml_file(path)
            .with_context(|| format!("Failed to read shell parameters from {:?}", path))?,
        None => ShellParams::default(),
    };
    if let Some(thickness) = overrides.thickness {
        params.thickness = thickness;
    }
    if let Some(name) = overrides.group_name {
        params.group_name = name.to_string();
    }
    Ok(params)
}

pub fn run(input: &Path, output_path: &Path, overrides: Overrides<'_>, cli: &Cli) -> Result<()> {
    let params = resolve_params(&overrides)?;
    let mut document = load(input)?;
    let selection = select_groups(document.entities(), overrides.group)?;
    let input_faces = document.entities().total_face_count();

    output::info(
        &format!(
            "Shelling {} group(s) at {}mm...",
            selection.len(),
            params.thickness
        ),
        cli.format,
        cli.quiet,
    );

    let runs = match shell_groups(&mut document, &selection, &params) {
        Ok(runs) => runs,
        Err(e) if e.is_no_op() => {
            output::warning(
                "Zero thickness: nothing to build, no file written",
                cli.format,
                cli.quiet,
            );
            let report = ShellReport {
                input: input.display().to_string(),
                output: output_path.display().to_string(),
                success: true,
                thickness: params.thickness,
                operation: None,
                input_faces,
                output_faces: input_faces,
                groups: Vec::new(),
            };
            output::print(&report, cli.format, cli.quiet);
            return Ok(());
        }
        Err(e) => return Err(e).context("Shell operation was rolled back"),
    };

    mesh_graph::save_document(&document, output_path)
        .with_context(|| format!("Failed to save shells to {:?}", output_path))?;

    let entities = document.entities();
    let report = ShellReport {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        success: true,
        thickness: params.thickness,
        operation: document.history().last().cloned(),
        input_faces,
        output_faces: entities.total_face_count(),
        groups: runs
            .iter()
            .map(|run| GroupReport::new(entities.group(run.source).display_name(), &run.stats))
            .collect(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&report, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Shells saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!("  {}: {}mm", "Thickness".cyan(), report.thickness);
                println!(
                    "  {}: {} → {} faces",
                    "Faces".cyan(),
                    report.input_faces,
                    report.output_faces
                );
                for (run, group) in runs.iter().zip(&report.groups) {
                    println!("  {}: {}", group.name.bold(), run.stats);
                    if group.warnings > 0 {
                        output::warning(
                            &format!(
                                "{} offset face(s) were not planar and were triangulated",
                                group.warnings
                            ),
                            cli.format,
                            cli.quiet,
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
