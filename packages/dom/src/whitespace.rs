use crate::host::{HostTree, NodeKind};
use crate::memory::{MemoryDom, NodeId};
use regex::Regex;
use std::sync::LazyLock;

static LINE_WHITE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\t\r\x0C]+").expect("white space pattern is valid"));

static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space pattern is valid"));

impl MemoryDom {
    /// Merge adjacent text nodes and drop empty ones below `node`.
    pub fn normalize(&mut self, node: NodeId) {
        let mut index = 0;
        while let Some(child) = self.child_at(node, index) {
            match self.kind(child) {
                NodeKind::Text => {
                    while let Some(next) = self.child_at(node, index + 1) {
                        if self.kind(next) != NodeKind::Text {
                            break;
                        }
                        let data = self.node_value(next).unwrap_or_default().to_string();
                        let merged = format!("{}{}", self.node_value(child).unwrap_or_default(), data);
                        self.set_data(child, &merged);
                        self.unlink(next);
                    }
                    if self.node_value(child).is_some_and(str::is_empty) {
                        self.unlink(child);
                        continue;
                    }
                }
                NodeKind::Element => self.normalize(child),
                _ => {}
            }
            index += 1;
        }
    }

    /// Collapse white space the way a browser renders it, in place.
    ///
    /// Runs of newlines, tabs, carriage returns and form feeds become one
    /// space and repeated spaces collapse. A leading space is dropped from the
    /// first child of every element; a trailing space only from the last
    /// child of `node` itself.
    pub fn collapse_white_space(&mut self, node: NodeId) {
        self.normalize(node);
        self.collapse_children(node, true);
    }

    fn collapse_children(&mut self, node: NodeId, is_root: bool) {
        let children = self.child_list(node).to_vec();
        let last = children.len().saturating_sub(1);

        for (index, child) in children.into_iter().enumerate() {
            match self.kind(child) {
                NodeKind::Text => {
                    let collapsed = {
                        let data = self.node_value(child).unwrap_or_default();
                        let single = LINE_WHITE_SPACE.replace_all(data, " ");
                        let collapsed = REPEATED_SPACES.replace_all(&single, " ").into_owned();
                        collapsed
                    };

                    let collapsed = if index == 0 && collapsed.starts_with(' ') {
                        collapsed[1..].to_string()
                    } else if is_root && index == last && collapsed.ends_with(' ') {
                        collapsed[..collapsed.len() - 1].to_string()
                    } else {
                        collapsed
                    };
                    self.set_data(child, &collapsed);
                }
                NodeKind::Element => self.collapse_children(child, false),
                _ => {}
            }
        }
    }
}
