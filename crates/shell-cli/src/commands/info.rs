//! shell info command - list groups and surface statistics.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use mesh_graph::Group;
use serde::Serialize;

use super::load;
use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct FileInfo {
    path: String,
    groups: Vec<GroupInfo>,
    total_faces: usize,
    total_edges: usize,
}

#[derive(Serialize)]
struct GroupInfo {
    name: String,
    vertices: usize,
    edges: usize,
    faces: usize,
    boundary_edges: usize,
    soft_edges: usize,
    nested_groups: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

impl GroupInfo {
    fn from_group(group: &Group) -> Self {
        let entities = &group.entities;
        let bounds = entities.bounds().map(|(min, max)| {
            let dims = max - min;
            BoundsInfo {
                min: [min.x, min.y, min.z],
                max: [max.x, max.y, max.z],
                dimensions: [dims.x, dims.y, dims.z],
            }
        });
        Self {
            name: group.display_name().to_string(),
            vertices: entities.vertex_count(),
            edges: entities.edge_count(),
            faces: entities.face_count(),
            boundary_edges: entities.boundary_edges().count(),
            soft_edges: entities.edges().filter(|(_, e)| e.soft).count(),
            nested_groups: entities.total_group_count(),
            bounds,
        }
    }
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let document = load(input)?;
    let root = document.entities();

    let info = FileInfo {
        path: input.display().to_string(),
        groups: root.groups().map(|(_, g)| GroupInfo::from_group(g)).collect(),
        total_faces: root.total_face_count(),
        total_edges: root.total_edge_count(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Surface Information".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {}", "Groups".cyan(), info.groups.len());
                println!("  {}: {}", "Faces".cyan(), info.total_faces);
                println!("  {}: {}", "Edges".cyan(), info.total_edges);

                for group in &info.groups {
                    println!();
                    println!("  {}", group.name.bold());
                    println!(
                        "    {}: {} / {} / {}",
                        "Faces / edges / vertices".cyan(),
                        group.faces,
                        group.edges,
                        group.vertices
                    );
                    let closed = if group.boundary_edges == 0 {
                        "closed".green()
                    } else {
                        "open".yellow()
                    };
                    println!(
                        "    {}: {} ({})",
                        "Boundary edges".cyan(),
                        group.boundary_edges,
                        closed
                    );
                    if group.soft_edges > 0 {
                        println!("    {}: {}", "Soft edges".cyan(), group.soft_edges);
                    }
                    if group.nested_groups > 0 {
                        println!("    {}: {}", "Nested groups".cyan(), group.nested_groups);
                    }
                    if let Some(ref b) = group.bounds {
                        println!(
                            "    {}: {:.2} x {:.2} x {:.2} mm",
                            "Dimensions".cyan(),
                            b.dimensions[0],
                            b.dimensions[1],
                            b.dimensions[2]
                        );
                        println!(
                            "    {}: {} .. {}",
                            "Bounds".cyan(),
                            output::point(&b.min),
                            output::point(&b.max)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
