//! # Value Diff
//!
//! Pairs the children of a freshly rendered element with the live children
//! at the same index and patches the live side in place. Nodes that only
//! differ in attributes or descendants are kept and patched; anything else
//! is replaced outright. Future children are consumed as the walk goes.

use crate::ApplyReport;
use richtext_dom::HostTree;
use tracing::trace;

/// Make the children of `current` match the children of `future`.
/// `future` is left empty.
pub fn apply_value<H: HostTree>(host: &mut H, future: H::Node, current: H::Node) -> ApplyReport {
    let mut report = ApplyReport::default();
    patch_children(host, future, current, &mut report);
    report
}

fn patch_children<H: HostTree>(host: &mut H, future: H::Node, current: H::Node, report: &mut ApplyReport) {
    let mut index = 0;

    while let Some(future_child) = host.child_at(future, 0) {
        match host.child_at(current, index) {
            None => {
                host.append_child(current, future_child);
                report.appended += 1;
            }
            Some(current_child) if !host.is_equal_node(current_child, future_child) => {
                if needs_replacement(host, future_child, current_child) {
                    trace!(?current_child, "Replacing node");
                    host.replace_child(current, future_child, current_child);
                    report.replaced += 1;
                } else {
                    sync_attributes(host, future_child, current_child, report);
                    patch_children(host, future_child, current_child, report);
                    host.remove_child(future, future_child);
                }
            }
            Some(_) => host.remove_child(future, future_child),
        }

        index += 1;
    }

    while let Some(extra) = host.child_at(current, index) {
        host.remove_child(current, extra);
        report.removed += 1;
    }
}

/// Different kinds or tags, or character data nodes with different data.
fn needs_replacement<H: HostTree>(host: &H, future: H::Node, current: H::Node) -> bool {
    let kind = host.kind(future);
    if kind != host.kind(current) || host.tag_name(future) != host.tag_name(current) {
        return true;
    }
    kind.is_character_data() && host.node_value(future) != host.node_value(current)
}

fn sync_attributes<H: HostTree>(host: &mut H, future: H::Node, current: H::Node, report: &mut ApplyReport) {
    for (name, _) in host.attributes(current).into_iter().rev() {
        if !host.has_attribute(future, &name) {
            host.remove_attribute(current, &name);
            report.attribute_writes += 1;
        }
    }

    for (name, value) in host.attributes(future) {
        if host.get_attribute(current, &name) != Some(value.as_str()) {
            host.set_attribute(current, &name, &value);
            report.attribute_writes += 1;
        }
    }
}
