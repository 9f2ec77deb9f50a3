//! Inheritance Resolution
//!
//! Resolves properties left in state `Inherit` after the cascade. Each
//! container up the chain is cascaded once; a pending property is handed to
//! its class's inherit hook against that style, and whatever is still
//! pending moves on to the next container. A container that itself says
//! `inherit` simply passes the question further up. Properties nobody
//! resolves are dropped.

use crate::node::Node;
use crate::style::Style;
use crate::stylesheet::Stylesheet;

pub(crate) fn resolve(sheet: &Stylesheet, node: &dyn Node, style: &mut Style) {
    let mut pending = style.pending_inherit();
    if pending.is_empty() {
        return;
    }

    resolve_from_containers(sheet, node, style, &mut pending, 0);

    for name in pending {
        tracing::debug!(node = node.type_name(), property = %name, "unresolved inherit, dropping");
        style.remove(&name);
    }
}

fn resolve_from_containers(
    sheet: &Stylesheet,
    node: &dyn Node,
    style: &mut Style,
    pending: &mut Vec<String>,
    depth: usize,
) {
    if pending.is_empty() {
        return;
    }
    if depth >= sheet.config().max_node_depth {
        tracing::warn!(node = node.type_name(), "container chain too deep, giving up");
        return;
    }
    let Some(container) = node.container() else {
        return;
    };

    if let Some(container_style) = sheet.cascade(container.as_ref()) {
        pending.retain(|name| {
            let Some(property) = style.get(name).cloned() else {
                return false;
            };
            let resolved = property.class().inherit(name, &container_style, style);
            if resolved {
                tracing::trace!(property = %name, from = container.type_name(), "inherited");
            }
            !resolved
        });
    }

    resolve_from_containers(sheet, container.as_ref(), style, pending, depth + 1);
}
