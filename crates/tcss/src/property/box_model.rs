//! Padding and margin longhands

use std::rc::Rc;

use super::PropertyRegistry;
use super::edges::{EdgeKind, EdgeLonghand, SIDES};

pub(crate) fn register(registry: &mut PropertyRegistry) {
    for side in SIDES {
        registry.register(Rc::new(EdgeLonghand::new(format!("padding-{side}"), EdgeKind::Padding)));
        registry.register(Rc::new(EdgeLonghand::new(format!("margin-{side}"), EdgeKind::Margin)));
    }
}
