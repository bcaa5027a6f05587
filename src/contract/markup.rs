/*!
 * Markdown to renderer markup conversion.
 *
 * The PDF renderer accepts a small inline markup dialect. Only headings and
 * `**bold**` spans are converted; everything else is passed through with the
 * markup's special characters escaped.
 */

use serde::{Deserialize, Serialize};

/// Target dialect for the converted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupStyle {
    /// ReportLab paragraph markup: `<b>` tags, headings as bold lines
    #[default]
    ReportLab,
    /// HTML: `<strong>`, `<h1>` to `<h3>` and `<p>`
    Html,
    /// Markers removed
    Plain,
}

impl std::str::FromStr for MarkupStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "reportlab" => Ok(Self::ReportLab),
            "html" => Ok(Self::Html),
            "plain" | "text" => Ok(Self::Plain),
            _ => Err(anyhow::anyhow!("Invalid markup style: {}", s)),
        }
    }
}

/// Convert markdown text line by line
pub fn to_markup(markdown: &str, style: MarkupStyle) -> String {
    markdown
        .lines()
        .map(|line| convert_line(line, style))
        .collect::<Vec<_>>()
        .join("\n")
}

fn convert_line(line: &str, style: MarkupStyle) -> String {
    if let Some((level, text)) = heading(line) {
        let inner = convert_inline(text, style);
        return match style {
            MarkupStyle::ReportLab => format!("<b>{}</b>", inner),
            MarkupStyle::Html => {
                let level = level.min(3);
                format!("<h{}>{}</h{}>", level, inner, level)
            }
            MarkupStyle::Plain => inner,
        };
    }

    let inner = convert_inline(line, style);
    match style {
        MarkupStyle::Html if !line.trim().is_empty() => format!("<p>{}</p>", inner),
        _ => inner,
    }
}

/// Heading level and text of a `# Heading` line
fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some((level, rest.trim()))
}

fn convert_inline(text: &str, style: MarkupStyle) -> String {
    match style {
        MarkupStyle::ReportLab => convert_bold(&escape(text), "<b>", "</b>"),
        MarkupStyle::Html => convert_bold(&escape(text), "<strong>", "</strong>"),
        MarkupStyle::Plain => convert_bold(text, "", ""),
    }
}

/// Escape the characters the markup parser treats specially
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace each closed `**x**` pair; an empty `****` or unmatched `**` stays literal
fn convert_bold(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(0) => {
                out.push_str(&rest[..start + 4]);
                rest = &after[2..];
            }
            Some(end) => {
                out.push_str(&rest[..start]);
                out.push_str(open);
                out.push_str(&after[..end]);
                out.push_str(close);
                rest = &after[end + 2..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}
