pub(super) fn escape_markdown_text(text: &str, escape_special_chars: bool) -> String {
    if !escape_special_chars || text.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '*' => out.push_str("\\*"),
            '_' => out.push_str("\\_"),
            '`' => out.push_str("\\`"),
            '[' => out.push_str("\\["),
            ']' => out.push_str("\\]"),
            '>' => out.push_str("\\>"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a leading marker on each line that would otherwise open a heading,
/// a list item or a rule.
pub(super) fn escape_line_starts(text: &str, escape_special_chars: bool) -> String {
    if !escape_special_chars {
        return text.to_string();
    }
    text.split('\n')
        .map(escape_block_marker)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_block_marker(line: &str) -> String {
    let body = line.trim_start_matches(' ');
    let lead = &line[..line.len() - body.len()];
    let mut chars = body.chars();
    match chars.next() {
        Some('#') => format!("{lead}\\{body}"),
        Some('-' | '+') if matches!(chars.next(), None | Some(' ' | '\t' | '-')) => {
            format!("{lead}\\{body}")
        }
        Some('=') if body.trim_end().chars().all(|ch| ch == '=') => format!("{lead}\\{body}"),
        Some(ch) if ch.is_ascii_digit() => {
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            let (number, rest) = body.split_at(digits);
            let mut after = rest.chars();
            let is_marker = digits <= 9
                && matches!(after.next(), Some('.' | ')'))
                && matches!(after.next(), None | Some(' ' | '\t'));
            if is_marker {
                format!("{lead}{number}\\{rest}")
            } else {
                line.to_string()
            }
        }
        _ => line.to_string(),
    }
}

/// Indents every non-empty line.
pub(super) fn indent_multiline(text: &str, indent: usize) -> String {
    if indent == 0 || text.is_empty() {
        return text.to_string();
    }
    let prefix = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn max_consecutive_backticks(text: &str) -> usize {
    let mut max_run = 0usize;
    let mut current = 0usize;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            max_run = max_run.max(current);
        } else {
            current = 0;
        }
    }
    max_run
}

pub(super) fn render_inline_code(code: &str) -> String {
    let ticks = max_consecutive_backticks(code);
    let fence = "`".repeat(ticks + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

pub(super) fn code_fence_block(language: Option<&str>, content: &str) -> String {
    let max_ticks = max_consecutive_backticks(content);
    let fence = "`".repeat((max_ticks + 1).max(3));
    let mut out = String::new();
    out.push_str(&fence);
    if let Some(lang) = language
        && !lang.is_empty()
    {
        out.push_str(lang);
    }
    out.push('\n');
    let content = content.trim_end_matches('\n');
    if !content.is_empty() {
        out.push_str(content);
        out.push('\n');
    }
    out.push_str(&fence);
    out
}

/// Escapes a table cell so it stays on one row.
pub(super) fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
