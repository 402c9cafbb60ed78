use crate::ir::ListItem;

use super::emit::IrMarkdownEmitter;
use super::escape::indent_multiline;

impl IrMarkdownEmitter<'_> {
    pub(super) fn render_bullet_list(&self, items: &[ListItem]) -> String {
        let marker = format!("{} ", self.options.bullet);
        let mut out = String::new();
        for item in items {
            self.render_list_item(&mut out, &marker, marker.len(), item);
        }
        out.trim_end_matches('\n').to_string()
    }

    /// Ordered lists are always numbered from 1.
    pub(super) fn render_ordered_list(&self, items: &[ListItem]) -> String {
        let mut out = String::new();
        for (idx, item) in items.iter().enumerate() {
            let marker = format!("{}. ", idx + 1);
            self.render_list_item(&mut out, &marker, marker.len(), item);
        }
        out.trim_end_matches('\n').to_string()
    }

    pub(super) fn render_task_list(&self, items: &[ListItem]) -> String {
        let bullet = format!("{} ", self.options.bullet);
        let mut out = String::new();
        for item in items {
            let check = if item.checked.unwrap_or(false) { "[x] " } else { "[ ] " };
            let marker = format!("{bullet}{check}");
            self.render_list_item(&mut out, &marker, bullet.len(), item);
        }
        out.trim_end_matches('\n').to_string()
    }

    fn render_list_item(&self, out: &mut String, marker: &str, nested_indent: usize, item: &ListItem) {
        let Some((first, rest)) = item.content.split_first() else {
            out.push_str(marker.trim_end());
            out.push('\n');
            return;
        };

        let first = self.render_block(first, 0);
        let mut lines = first.lines();
        out.push_str(marker);
        out.push_str(lines.next().unwrap_or_default());
        out.push('\n');
        let continuation = indent_multiline(&lines.collect::<Vec<_>>().join("\n"), nested_indent);
        if !continuation.is_empty() {
            out.push_str(&continuation);
            out.push('\n');
        }

        for block in rest {
            let rendered = self.render_block(block, nested_indent);
            if rendered.is_empty() {
                continue;
            }
            out.push_str(&rendered);
            out.push('\n');
        }
    }
}
