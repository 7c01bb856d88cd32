//! Greedy word wrapping for sheet text.
//!
//! Whitespace runs collapse to single spaces, lines never exceed the width
//! (counted in chars, indent included), and words longer than a line are
//! split across lines.

/// Wrap `text` into lines no wider than `width`.
///
/// The first line starts with `initial_indent`, the rest with
/// `subsequent_indent`. Text with no words yields no lines.
///
/// # Examples
///
/// ```rust
/// use chargen::wrap::wrap;
///
/// let lines = wrap("the quick brown fox", 10, "", "  ");
/// assert_eq!(lines, ["the quick", "  brown", "  fox"]);
/// ```
pub fn wrap(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::from(initial_indent);
    let mut used = initial_indent.chars().count();
    let mut empty = true;

    let mut words: Vec<String> = text.split_whitespace().rev().map(str::to_string).collect();
    while let Some(word) = words.pop() {
        let len = word.chars().count();
        let needed = if empty { len } else { len + 1 };
        if used + needed <= width {
            if !empty {
                line.push(' ');
            }
            line.push_str(&word);
            used += needed;
            empty = false;
            continue;
        }

        let indent_len = subsequent_indent.chars().count();
        let fits_on_fresh_line = indent_len + len <= width;
        let room = width.saturating_sub(used + usize::from(!empty));
        if !empty && (fits_on_fresh_line || room == 0) {
            words.push(word);
            lines.push(std::mem::take(&mut line));
            line.push_str(subsequent_indent);
            used = indent_len;
            empty = true;
            continue;
        }

        // Too long for the room left: fill this line, at least one char.
        if !empty {
            line.push(' ');
            used += 1;
        }
        let (head, tail) = split_chars(&word, room.max(1));
        used += head.chars().count();
        line.push_str(&head);
        empty = false;
        if !tail.is_empty() {
            words.push(tail);
        }
    }

    if !empty {
        lines.push(line);
    }
    lines
}

fn split_chars(word: &str, at: usize) -> (String, String) {
    let split = word
        .char_indices()
        .nth(at)
        .map(|(idx, _)| idx)
        .unwrap_or(word.len());
    (word[..split].to_string(), word[split..].to_string())
}

/// Wrap aspect or concept text: indent every line, then strip the leading
/// whitespace of the whole block so the first line lines up after a label.
///
/// ```rust
/// use chargen::wrap::wrap_aspect;
///
/// assert_eq!(wrap_aspect("Owes the guild", 80, 28), "Owes the guild");
/// ```
pub fn wrap_aspect(text: &str, width: usize, indent: usize) -> String {
    let pad = " ".repeat(indent);
    wrap(text, width, &pad, &pad)
        .join("\n")
        .trim_start()
        .to_string()
}

/// Wrap a multi-line stunt description.
///
/// Each non-blank input line is wrapped on its own with every output line
/// indented; wrapped paragraphs are separated by a blank line.
///
/// ```rust
/// use chargen::wrap::wrap_stunt;
///
/// assert_eq!(wrap_stunt("First.\n\nSecond.", 80, 4), "    First.\n\n    Second.");
/// ```
pub fn wrap_stunt(text: &str, width: usize, indent: usize) -> String {
    let pad = " ".repeat(indent);
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| wrap(line, width, &pad, &pad).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(wrap("", 80, "", "").is_empty());
        assert!(wrap("   \t ", 80, "  ", "  ").is_empty());
        assert_eq!(wrap_aspect("", 80, 28), "");
        assert_eq!(wrap_stunt("\n\n", 80, 8), "");
    }

    #[test]
    fn test_lines_respect_width() {
        let text = "Sworn to protect the lighthouse keepers of the northern reach \
                    until the last lamp goes dark and the sea takes the coast";
        let lines = wrap(text, 40, "    ", "    ");
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 40, "{line:?} too long");
            assert!(line.starts_with("    "));
        }
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>());
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(wrap("a   b\tc", 80, "", ""), ["a b c"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap("abcdefghij", 4, "", "");
        assert_eq!(lines, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_long_word_fills_current_line() {
        let lines = wrap("ab cdefghij", 6, "", "");
        assert_eq!(lines, ["ab cde", "fghij"]);
    }

    #[test]
    fn test_aspect_wrap_indents_continuations() {
        let text = "word ".repeat(20);
        let wrapped = wrap_aspect(&text, 80, 28);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("word"));
        assert!(lines[1].starts_with(&" ".repeat(28)));
        assert_eq!(lines[1].trim_start().chars().next(), Some('w'));
    }

    #[test]
    fn test_stunt_paragraphs() {
        let wrapped = wrap_stunt("Once per scene.\n   \nSpend a point.", 80, 8);
        assert_eq!(wrapped, "        Once per scene.\n\n        Spend a point.");
    }
}
