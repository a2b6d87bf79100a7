//! shell offset command - report vertex offsets without building a shell.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use surface_shell::{OffsetCase, OffsetMap, PreviewMesh, collect_mesh, offset_polygons};

use super::{load, select_groups};
use crate::{Cli, OutputFormat, output};

const CASES: [(OffsetCase, &str); 5] = [
    (OffsetCase::SingleFace, "single face"),
    (OffsetCase::Coplanar, "coplanar"),
    (OffsetCase::TwoPlanes, "two planes"),
    (OffsetCase::Miter, "miter"),
    (OffsetCase::DegenerateMiter, "degenerate miter"),
];

#[derive(Serialize)]
struct OffsetReport {
    path: String,
    thickness: f64,
    groups: Vec<GroupOffsets>,
}

#[derive(Serialize)]
struct GroupOffsets {
    name: String,
    vertices: usize,
    cases: Vec<CaseCount>,
    /// World-space preview polygons.
    preview_polygons: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    offsets: Vec<VertexOffset>,
}

#[derive(Serialize)]
struct CaseCount {
    case: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct VertexOffset {
    vertex: u32,
    position: [f64; 3],
    offset: [f64; 3],
}

pub fn run(
    input: &Path,
    thickness: f64,
    group: Option<&str>,
    detailed: bool,
    cli: &Cli,
) -> Result<()> {
    let document = load(input)?;
    let root = document.entities();

    let mut report = OffsetReport {
        path: input.display().to_string(),
        thickness,
        groups: Vec::new(),
    };

    for id in select_groups(root, group)? {
        let group = root.group(id);
        let entities = &group.entities;
        let collected = collect_mesh(entities);
        let map = OffsetMap::build(entities, &collected.vertices, thickness)
            .with_context(|| format!("Failed to offset group {:?}", group.display_name()))?;

        let cases = CASES
            .iter()
            .map(|&(case, label)| CaseCount {
                case: label,
                count: map.case_count(case),
            })
            .filter(|c| c.count > 0)
            .collect();

        let preview = offset_polygons(&[PreviewMesh::from_group(group)], thickness)?;

        let offsets = if detailed {
            collected
                .vertices
                .iter()
                .filter_map(|&v| {
                    let p = entities.vertex(v).position();
                    map.get(v).map(|q| VertexOffset {
                        vertex: v.0,
                        position: [p.x, p.y, p.z],
                        offset: [q.x, q.y, q.z],
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        report.groups.push(GroupOffsets {
            name: group.display_name().to_string(),
            vertices: map.len(),
            cases,
            preview_polygons: preview.len(),
            offsets,
        });
    }

    match cli.format {
        OutputFormat::Json => {
            output::print(&report, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Vertex Offsets".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {}mm", "Thickness".cyan(), thickness);
                if thickness == 0.0 {
                    output::warning("Zero thickness: nothing would be built", cli.format, cli.quiet);
                }

                for group in &report.groups {
                    println!();
                    println!("  {}", group.name.bold());
                    println!("    {}: {}", "Vertices".cyan(), group.vertices);
                    for c in &group.cases {
                        println!("    {:>18}: {}", c.case, c.count);
                    }
                    println!("    {}: {}", "Preview polygons".cyan(), group.preview_polygons);
                    for o in &group.offsets {
                        println!(
                            "    v{:<6} {} → {}",
                            o.vertex,
                            output::point(&o.position),
                            output::point(&o.offset)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
