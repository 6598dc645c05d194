#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

/// Render an aligned table for string rows. Numeric cells are right-aligned.
#[must_use]
pub fn render_entity_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let text = truncate(value, *width);
                let padded = pad(&text, *width, looks_numeric(&text));
                if options.color {
                    colorize(&text, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line);
    }
    lines.join("\n")
}

/// Narrow the widest column one step at a time until the table fits or every
/// column is at its minimum.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    loop {
        let total = widths.iter().sum::<usize>() + separators;
        if total <= max_width {
            return;
        }
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(MIN_COLUMN_WIDTH))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            return;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

/// Color the padded cell by its text; padding is kept outside the escape codes.
fn colorize(text: &str, padded: String) -> String {
    let code = match text.to_ascii_lowercase().as_str() {
        "new" | "stable_id" | "common" => "32",
        "name_match" | "rare" | "contested" => "33",
        "ambiguous" | "true" => "31",
        _ => return padded,
    };
    padded.replacen(text, &format!("\u{1b}[{code}m{text}\u{1b}[0m"), 1)
}

#[cfg(test)]
mod tests {
    use super::{TableOptions, render_entity_table};

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["Electroreception".to_string(), "12".to_string()],
            vec!["Photoreception".to_string(), "3".to_string()],
        ]
    }

    #[test]
    fn numeric_cells_are_right_aligned() {
        let table = render_entity_table(
            &["modality", "members"],
            &rows(),
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        let last = table.lines().last().expect("row line");
        assert!(last.ends_with("      3"));
    }

    #[test]
    fn narrow_terminal_truncates_wide_columns() {
        let table = render_entity_table(
            &["modality", "members"],
            &rows(),
            TableOptions {
                max_width: Some(18),
                color: false,
            },
        );
        let first_row = table.lines().nth(2).expect("row line");
        assert!(first_row.contains('…'));
        assert!(first_row.chars().count() <= 18);
    }

    #[test]
    fn resolution_values_are_colored() {
        let table = render_entity_table(
            &["resolution"],
            &[vec!["ambiguous".to_string()]],
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[31mambiguous\u{1b}[0m"));
    }
}
