//! forge CLI - edit scene project files from the terminal
//!
//! Each invocation loads a project, applies one command through the editor
//! and saves the project back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use forge_core::{
    BooleanType, Editor, EngineConfig, NodeId, NodePatch, PrimitiveKind, Project, SceneGraph,
};
use glam::DVec3;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Compose and combine solids in a scene project", long_about = None)]
struct Cli {
    /// Engine configuration file (RON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty project file
    New {
        project: PathBuf,
        /// Project name (default: derived from filename)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print the scene tree
    Info { project: PathBuf },
    /// Add a primitive solid
    Add {
        project: PathBuf,
        /// box, sphere, cylinder, cone or torus
        kind: PrimitiveKind,
        /// Node name (default: "<Kind> N")
        #[arg(long)]
        name: Option<String>,
        /// Position as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        position: Option<DVec3>,
        /// Rotation in degrees as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        rotation_deg: Option<DVec3>,
        /// Scale as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        scale: Option<DVec3>,
    },
    /// Import an STL file as a mesh node
    Import { project: PathBuf, file: PathBuf },
    /// Combine two nodes into a new solid
    Combine {
        project: PathBuf,
        /// First operand (id or name)
        a: String,
        /// Second operand (id or name)
        b: String,
        #[arg(long, value_enum)]
        op: Operation,
    },
    /// Group sibling nodes
    Group {
        project: PathBuf,
        #[arg(required = true, num_args = 2..)]
        nodes: Vec<String>,
    },
    /// Dissolve a group into its parent
    Ungroup { project: PathBuf, node: String },
    /// Copy a node next to itself
    Duplicate { project: PathBuf, node: String },
    /// Remove a node and its children
    Delete { project: PathBuf, node: String },
    /// Write every solid to a binary STL file
    Export { project: PathBuf, output: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Operation {
    Union,
    Subtract,
    Intersect,
}

impl From<Operation> for BooleanType {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Union => BooleanType::Union,
            Operation::Subtract => BooleanType::Subtract,
            Operation::Intersect => BooleanType::Intersect,
        }
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "forge_core=debug,forge_csg=debug,forge=debug"
    } else {
        "forge_core=info,forge_csg=info,forge=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::New { project, name } => {
            let name = name.unwrap_or_else(|| forge_core::import::name_from_path(&project));
            Project::new(name).save(&project)?;
            println!("Created {}", project.display());
        }
        Commands::Info { project } => {
            let editor = open(&project, config)?;
            print_tree(&editor);
        }
        Commands::Add {
            project,
            kind,
            name,
            position,
            rotation_deg,
            scale,
        } => {
            let mut editor = open(&project, config)?;
            let id = editor.add_primitive_named(kind, name.as_deref())?;
            let patch = NodePatch {
                position,
                rotation: rotation_deg.map(radians),
                scale,
                ..NodePatch::default()
            };
            if !patch.is_empty() {
                editor.update(id, &patch)?;
            }
            save(&editor, &project)?;
            println!("Added {} ({})", node_name(editor.graph(), id), id);
        }
        Commands::Import { project, file } => {
            let mut editor = open(&project, config)?;
            let id = editor
                .import_stl(&file)
                .with_context(|| format!("importing {}", file.display()))?;
            save(&editor, &project)?;
            println!("Imported {} ({})", node_name(editor.graph(), id), id);
        }
        Commands::Combine { project, a, b, op } => {
            let mut editor = open(&project, config)?;
            let a = resolve(editor.graph(), &a)?;
            let b = resolve(editor.graph(), &b)?;
            let id = editor.combine(a, b, op.into())?;
            save(&editor, &project)?;
            println!("Created {} ({})", node_name(editor.graph(), id), id);
        }
        Commands::Group { project, nodes } => {
            let mut editor = open(&project, config)?;
            let ids = nodes
                .iter()
                .map(|n| resolve(editor.graph(), n))
                .collect::<Result<Vec<_>>>()?;
            let id = editor.group(&ids)?;
            save(&editor, &project)?;
            println!("Created {} ({})", node_name(editor.graph(), id), id);
        }
        Commands::Ungroup { project, node } => {
            let mut editor = open(&project, config)?;
            let id = resolve(editor.graph(), &node)?;
            let children = editor.ungroup(id)?;
            save(&editor, &project)?;
            println!("Released {} nodes", children.len());
        }
        Commands::Duplicate { project, node } => {
            let mut editor = open(&project, config)?;
            let id = resolve(editor.graph(), &node)?;
            let copy = editor.duplicate(id)?;
            save(&editor, &project)?;
            println!("Created {} ({})", node_name(editor.graph(), copy), copy);
        }
        Commands::Delete { project, node } => {
            let mut editor = open(&project, config)?;
            let id = resolve(editor.graph(), &node)?;
            let removed = editor.delete(id)?;
            save(&editor, &project)?;
            println!("Deleted {}", removed.name);
        }
        Commands::Export { project, output } => {
            let editor = open(&project, config)?;
            let triangles = editor.export_stl(&output)?;
            println!("Exported {} triangles to {}", triangles, output.display());
        }
    }

    Ok(())
}

fn open(path: &Path, config: EngineConfig) -> Result<Editor> {
    let project =
        Project::load(path).with_context(|| format!("opening project {}", path.display()))?;
    tracing::debug!(
        "Opened '{}' with {} nodes",
        project.name,
        project.graph().len()
    );
    Ok(Editor::from_project(project, config))
}

fn save(editor: &Editor, path: &Path) -> Result<()> {
    editor
        .save_project(path)
        .with_context(|| format!("saving project {}", path.display()))
}

/// Find a node by id, falling back to an exact name match
fn resolve(graph: &SceneGraph, reference: &str) -> Result<NodeId> {
    if let Ok(id) = reference.parse::<NodeId>() {
        if graph.contains(id) {
            return Ok(id);
        }
    }
    match graph.find_by_name(reference) {
        Some(node) => Ok(node.id()),
        None => bail!("No node named or identified by '{}'", reference),
    }
}

fn node_name(graph: &SceneGraph, id: NodeId) -> &str {
    graph.find(id).map_or("?", |n| n.name.as_str())
}

fn parse_vec3(s: &str) -> Result<DVec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{}': {}", p, e)))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got {} values", parts.len())),
    }
}

/// Degrees per axis to radians
fn radians(degrees: DVec3) -> DVec3 {
    degrees * std::f64::consts::PI / 180.0
}

fn print_tree(editor: &Editor) {
    println!("{}", editor.project_name());
    let graph = editor.graph();
    let mut stack: Vec<(usize, &forge_core::SceneNode)> =
        graph.objects().iter().rev().map(|n| (1, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        let p = node.transform.position;
        println!(
            "{:indent$}{} [{}] at ({:.3}, {:.3}, {:.3})  {}",
            "",
            node.name,
            node.kind(),
            p.x,
            p.y,
            p.z,
            node.id(),
            indent = depth * 2
        );
        if let Some(children) = node.children() {
            stack.extend(children.iter().rev().map(|c| (depth + 1, c)));
        }
    }
    println!("{} nodes", graph.len());
}
