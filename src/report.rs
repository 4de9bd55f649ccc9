use std::fmt::Write;

use crate::anchor_setter::AnchorSetter;
use crate::scene_graph::Scene;

/// One line per renderer in the setter's current list: index, owning node,
/// renderer kind and anchor node.
pub fn format_renderer_table(scene: &Scene, setter: &AnchorSetter) -> String {
    let rows = setter
        .renderers()
        .iter()
        .enumerate()
        .filter_map(|(index, &renderer_id)| {
            let renderer = scene.get_renderer(renderer_id)?;
            let anchor = setter
                .anchor_at(scene, index)
                .map(|anchor| scene.object_name(anchor))
                .unwrap_or("-");

            Some((
                index,
                scene.object_name(renderer.object_id),
                renderer.kind.to_string(),
                anchor,
            ))
        })
        .collect::<Vec<_>>();

    let name_width = rows
        .iter()
        .map(|(_, name, _, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("mesh".len());

    let mut table = String::new();
    let _ = writeln!(table, "{:>3}  {:<name_width$}  {:<12}  anchor", "#", "mesh", "kind");
    for (index, name, kind, anchor) in rows {
        let _ = writeln!(table, "{index:>3}  {name:<name_width$}  {kind:<12}  {anchor}");
    }

    table
}
