use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use crate::anchor_setter::DEFAULT_ANCHOR_NAME;

#[derive(Parser, Debug)]
#[command(name = "anchor-setter")]
#[command(about = "Assign a probe anchor to every mesh renderer of a glTF avatar")]
pub struct Cli {
    /// glTF or GLB file containing the avatar
    pub file: PathBuf,

    /// Name of the avatar root node (defaults to the last root node of the scene)
    #[arg(long)]
    pub root: Option<String>,

    /// Use an existing node as the anchor
    #[arg(long, conflicts_with = "create")]
    pub anchor: Option<String>,

    /// Create a new anchor node instead of using an existing one
    #[arg(long)]
    pub create: bool,

    /// Name of the created anchor node
    #[arg(long, default_value = DEFAULT_ANCHOR_NAME)]
    pub name: String,

    /// Local position of the created anchor node, as X,Y,Z
    #[arg(long, default_value = "0,0,0", value_parser = parse_vec3, allow_hyphen_values = true)]
    pub position: Vec3,

    /// Parent of the created anchor node (defaults to the avatar root)
    #[arg(long)]
    pub parent: Option<String>,

    /// Manually set the anchor of one renderer after the bulk assignment, as
    /// INDEX=NODE. Use INDEX=- to clear it.
    #[arg(long = "override", value_parser = parse_override)]
    pub overrides: Vec<RendererOverride>,

    /// Only validate the settings and list the renderers
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererOverride {
    pub index: usize,
    /// `None` clears the renderer's anchor.
    pub anchor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SetterConfig {
    pub root: Option<String>,
    pub anchor: Option<String>,
    pub create_new_anchor: bool,
    pub new_anchor_name: String,
    pub new_anchor_position: Vec3,
    pub new_anchor_parent: Option<String>,
    pub overrides: Vec<RendererOverride>,
    pub dry_run: bool,
}

impl Default for SetterConfig {
    fn default() -> Self {
        Self {
            root: None,
            anchor: None,
            create_new_anchor: false,
            new_anchor_name: DEFAULT_ANCHOR_NAME.to_string(),
            new_anchor_position: Vec3::ZERO,
            new_anchor_parent: None,
            overrides: Vec::new(),
            dry_run: false,
        }
    }
}

impl From<Cli> for SetterConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            anchor: cli.anchor,
            create_new_anchor: cli.create,
            new_anchor_name: cli.name,
            new_anchor_position: cli.position,
            new_anchor_parent: cli.parent,
            overrides: cli.overrides,
            dry_run: cli.dry_run,
        }
    }
}

fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let components = value
        .split(',')
        .map(|component| component.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid position {value:?}: {err}"))?;

    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!(
            "invalid position {value:?}: expected 3 components, got {}",
            components.len()
        )),
    }
}

fn parse_override(value: &str) -> Result<RendererOverride, String> {
    let (index, anchor) = value
        .split_once('=')
        .ok_or_else(|| format!("invalid override {value:?}: expected INDEX=NODE"))?;

    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid override index {index:?}: {err}"))?;

    let anchor = match anchor.trim() {
        "" => return Err(format!("invalid override {value:?}: missing node name")),
        "-" => None,
        name => Some(name.to_string()),
    };

    Ok(RendererOverride { index, anchor })
}
