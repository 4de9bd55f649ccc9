use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error, info};

mod anchor_setter;
mod config;
mod report;
mod scene_graph;

use crate::anchor_setter::AnchorSetter;
use crate::config::{Cli, SetterConfig};
use crate::scene_graph::{ObjectId, Scene};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let file = cli.file.clone();
    let config = SetterConfig::from(cli);

    let gltf = gltf::Gltf::open(&file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let gltf_scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("No scenes in glTF file")?;

    let mut scene = Scene::new();
    let last_root = scene.spawn_gltf_scene(&gltf_scene);

    run(&mut scene, last_root, &config)
}

fn run(scene: &mut Scene, default_root: Option<ObjectId>, config: &SetterConfig) -> Result<()> {
    let root = match &config.root {
        Some(name) => Some(find_object(scene, name)?),
        None => default_root,
    };

    let mut setter = AnchorSetter::new();
    setter.set_create_new_anchor(config.create_new_anchor);
    setter.set_new_anchor_name(config.new_anchor_name.as_str());
    setter.set_new_anchor_local_position(config.new_anchor_position);
    if let Some(parent) = &config.new_anchor_parent {
        setter.set_new_anchor_parent(Some(find_object(scene, parent)?));
    }
    let anchor = config
        .anchor
        .as_deref()
        .map(|name| find_object(scene, name))
        .transpose()?;
    setter.set_anchor_object(anchor);
    setter.set_root(scene, root);

    debug!(
        "root={:?} create_new_anchor={} anchor={:?} name={:?} position={} parent={:?}",
        setter.root().map(|id| scene.object_name(id)),
        setter.create_new_anchor(),
        setter.anchor_object().map(|id| scene.object_name(id)),
        setter.new_anchor_name(),
        setter.new_anchor_local_position(),
        setter.new_anchor_parent().map(|id| scene.object_name(id)),
    );

    if !setter.validate() {
        bail!("Settings are incomplete: an avatar root and either --anchor or --create with a name and parent are required");
    }

    if config.dry_run {
        print!("{}", report::format_renderer_table(scene, &setter));
        return Ok(());
    }

    let overrides = config
        .overrides
        .iter()
        .map(|renderer_override| -> Result<(usize, Option<ObjectId>)> {
            if renderer_override.index >= setter.renderers().len() {
                bail!("No renderer at index {}", renderer_override.index);
            }
            let anchor = renderer_override
                .anchor
                .as_deref()
                .map(|name| find_object(scene, name))
                .transpose()?;
            Ok((renderer_override.index, anchor))
        })
        .collect::<Result<Vec<_>>>()?;

    if !setter.apply(scene) {
        error!("Failed to set probe anchors, check the settings");
        bail!("Failed to set probe anchors");
    }
    info!("Probe anchors set on {} renderers", setter.renderers().len());

    for (index, anchor) in overrides {
        if !setter.set_anchor_at(scene, index, anchor) {
            bail!("No renderer at index {index}");
        }
    }

    print!("{}", report::format_renderer_table(scene, &setter));

    Ok(())
}

fn find_object(scene: &Scene, name: &str) -> Result<ObjectId> {
    scene
        .get_object_by_name(name)
        .with_context(|| format!("No node named {name:?} in the scene"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererOverride;
    use crate::scene_graph::{Object3D, RendererKind};

    fn avatar_scene() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let root = scene.add_object(Object3D::named("Avatar"));
        for (name, kind) in [("Body", RendererKind::SkinnedMesh), ("Hat", RendererKind::Mesh)] {
            let id = scene.add_object(Object3D::named(name));
            scene.set_object_parent(id, Some(root));
            scene.add_renderer(id, kind);
        }
        let chest = scene.add_object(Object3D::named("Chest"));
        scene.set_object_parent(chest, Some(root));

        (scene, root)
    }

    fn anchor_names(scene: &Scene) -> Vec<&str> {
        scene
            .renderers
            .iter()
            .map(|(_, renderer)| {
                renderer
                    .probe_anchor
                    .map(|id| scene.object_name(id))
                    .unwrap_or("-")
            })
            .collect()
    }

    #[test]
    fn run_assigns_existing_anchor_and_applies_overrides() {
        let (mut scene, root) = avatar_scene();
        let config = SetterConfig {
            anchor: Some("Chest".to_string()),
            overrides: vec![RendererOverride {
                index: 1,
                anchor: None,
            }],
            ..SetterConfig::default()
        };

        run(&mut scene, Some(root), &config).unwrap();

        // Mesh renderers are listed first, so index 1 is the skinned body,
        // which was allocated first.
        assert_eq!(anchor_names(&scene), vec!["-", "Chest"]);
    }

    #[test]
    fn run_creates_anchor_under_root() {
        let (mut scene, root) = avatar_scene();
        let config = SetterConfig {
            create_new_anchor: true,
            ..SetterConfig::default()
        };

        run(&mut scene, Some(root), &config).unwrap();

        assert!(scene.find_child_by_name(root, "AnchorTarget").is_some());
        assert_eq!(anchor_names(&scene), vec!["AnchorTarget", "AnchorTarget"]);
    }

    #[test]
    fn run_rejects_incomplete_settings_without_mutating() {
        let (mut scene, root) = avatar_scene();

        assert!(run(&mut scene, Some(root), &SetterConfig::default()).is_err());
        assert!(run(&mut scene, None, &SetterConfig::default()).is_err());
        assert_eq!(anchor_names(&scene), vec!["-", "-"]);
    }

    #[test]
    fn run_reports_unknown_nodes_and_indices() {
        let (mut scene, root) = avatar_scene();
        let unknown_anchor = SetterConfig {
            anchor: Some("Nowhere".to_string()),
            ..SetterConfig::default()
        };
        assert!(run(&mut scene, Some(root), &unknown_anchor).is_err());

        let bad_index = SetterConfig {
            anchor: Some("Chest".to_string()),
            overrides: vec![RendererOverride {
                index: 5,
                anchor: Some("Chest".to_string()),
            }],
            ..SetterConfig::default()
        };
        assert!(run(&mut scene, Some(root), &bad_index).is_err());
        assert_eq!(anchor_names(&scene), vec!["-", "-"]);
    }

    #[test]
    fn unknown_override_node_fails_before_apply() {
        let (mut scene, root) = avatar_scene();
        let objects_before = scene.objects.len();
        let config = SetterConfig {
            create_new_anchor: true,
            overrides: vec![RendererOverride {
                index: 0,
                anchor: Some("Nowhere".to_string()),
            }],
            ..SetterConfig::default()
        };

        assert!(run(&mut scene, Some(root), &config).is_err());
        assert_eq!(scene.objects.len(), objects_before);
        assert_eq!(anchor_names(&scene), vec!["-", "-"]);
    }

    #[test]
    fn dry_run_leaves_scene_untouched() {
        let (mut scene, root) = avatar_scene();
        let objects_before = scene.objects.len();
        let config = SetterConfig {
            create_new_anchor: true,
            dry_run: true,
            ..SetterConfig::default()
        };

        run(&mut scene, Some(root), &config).unwrap();

        assert_eq!(scene.objects.len(), objects_before);
        assert_eq!(anchor_names(&scene), vec!["-", "-"]);
    }
}
