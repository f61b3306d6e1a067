//! Human renderer for `show`.
//!
//! Pure formatting: a plain-text table with optional ANSI colors and
//! terminal-height truncation. Handlers decide where the lines go.

use owo_colors::OwoColorize;

use crate::core::Contact;

const HEADERS: [&str; 3] = ["name", "email", "phone"];
const COLUMN_GAP: &str = "  ";
/// Header and dashed rule above the first row.
const HEADER_LINES: usize = 2;

/// Lines between the last printed row and the bottom of the terminal.
pub const TERMINAL_MARGIN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Email,
    Phone,
}

impl Column {
    const ALL: [Column; 3] = [Column::Name, Column::Email, Column::Phone];

    fn paint(self, cell: &str) -> String {
        match self {
            Column::Name => cell.bright_magenta().to_string(),
            Column::Email => cell.bright_cyan().to_string(),
            Column::Phone => cell.bright_green().to_string(),
        }
    }
}

/// Display cell for a list field: the first entry, `+ ...` when more exist,
/// `...` when null or empty.
pub fn summarize(values: Option<&[String]>) -> String {
    match values {
        None | Some([]) => "...".to_string(),
        Some([only]) => only.clone(),
        Some([first, ..]) => format!("{first} + ..."),
    }
}

fn cells(contact: &Contact) -> [String; 3] {
    [
        contact.name.clone(),
        summarize(contact.email.as_deref()),
        summarize(contact.phone.as_deref()),
    ]
}

/// Header, dashed rule, one row per contact. Tags and uuid are not shown.
pub fn render_table(contacts: &[&Contact], color: bool) -> Vec<String> {
    let rows: Vec<[String; 3]> = contacts.iter().map(|contact| cells(contact)).collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_row(HEADERS.iter().copied(), &widths, |_, cell| cell));
    lines.push(join_row(
        widths.iter().map(|width| "-".repeat(*width)),
        &widths,
        |_, cell| cell,
    ));
    for row in rows {
        lines.push(join_row(row.iter(), &widths, |column, cell| {
            if color { column.paint(&cell) } else { cell }
        }));
    }
    lines
}

/// Pad every cell to its column width, then style it. Trailing padding is
/// dropped.
fn join_row<S: AsRef<str>>(
    cells: impl Iterator<Item = S>,
    widths: &[usize; 3],
    style: impl Fn(Column, String) -> String,
) -> String {
    let mut out = String::new();
    let last = Column::ALL.len() - 1;
    for (index, (cell, column)) in cells.zip(Column::ALL).enumerate() {
        let cell = cell.as_ref();
        if index > 0 {
            out.push_str(COLUMN_GAP);
        }
        let padding = if index == last {
            0
        } else {
            widths[index].saturating_sub(cell.chars().count())
        };
        out.push_str(&style(column, cell.to_string()));
        out.extend(std::iter::repeat_n(' ', padding));
    }
    out.trim_end().to_string()
}

/// Keep at most `cutoff` lines of a rendered table, never dropping the
/// header. When rows were dropped a footer reports how many contacts are
/// shown out of `total`.
pub fn truncate(mut lines: Vec<String>, total: usize, cutoff: usize) -> Vec<String> {
    if lines.len() <= cutoff {
        return lines;
    }
    let keep = cutoff.max(HEADER_LINES);
    lines.truncate(keep);
    let shown = keep - HEADER_LINES;
    lines.push(format!(
        "showing {shown} of {total} contacts ({} hidden)",
        total.saturating_sub(shown)
    ));
    lines
}

/// Usable rows on the controlling terminal, if stdout is one.
pub fn terminal_cutoff() -> Option<usize> {
    use std::io::IsTerminal;

    if !std::io::stdout().is_terminal() {
        return None;
    }
    let (_, rows) = crossterm::terminal::size().ok()?;
    Some(usize::from(rows).saturating_sub(TERMINAL_MARGIN).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::core::ContactId;

    fn contact(name: &str, email: Option<Vec<&str>>, phone: Option<Vec<&str>>) -> Contact {
        let list = |values: Option<Vec<&str>>| {
            values.map(|values| values.into_iter().map(str::to_string).collect())
        };
        Contact {
            uuid: ContactId::new(format!("u-{name}")),
            name: name.to_string(),
            email: list(email),
            phone: list(phone),
            tags: Some(vec!["hidden".to_string()]),
        }
    }

    #[test]
    fn summarize_list_cells() {
        assert_eq!(summarize(None), "...");
        assert_eq!(summarize(Some(&[])), "...");
        assert_eq!(summarize(Some(&["a".to_string()])), "a");
        assert_eq!(
            summarize(Some(&["a".to_string(), "b".to_string()])),
            "a + ..."
        );
    }

    #[test]
    fn table_aligns_columns_and_hides_tags() {
        let ann = contact("Ann", None, Some(vec!["555-0100", "555-0101"]));
        let bob = contact("Bobby", Some(vec!["bob@example.com"]), None);
        let lines = render_table(&[&ann, &bob], false);
        assert_eq!(
            lines,
            vec![
                "name   email            phone",
                "-----  ---------------  --------------",
                "Ann    ...              555-0100 + ...",
                "Bobby  bob@example.com  ...",
            ]
        );
        assert!(lines.iter().all(|line| !line.contains("hidden")));
    }

    #[test]
    fn empty_selection_renders_only_headers() {
        assert_eq!(
            render_table(&[], false),
            vec!["name  email  phone", "----  -----  -----"]
        );
    }

    #[test]
    fn colored_cells_keep_alignment_of_plain_text() {
        let ann = contact("Ann", Some(vec!["a@x"]), None);
        let plain = render_table(&[&ann], false);
        let colored = render_table(&[&ann], true);
        assert_ne!(plain[2], colored[2]);
        assert!(colored[2].contains("\u{1b}["));
        assert_eq!(&plain[..2], &colored[..2]);
    }

    #[test]
    fn truncate_counts_contacts_not_lines() {
        let people: Vec<Contact> = ["Ann", "Bea", "Cal", "Dee", "Eve"]
            .into_iter()
            .map(|name| contact(name, None, None))
            .collect();
        let refs: Vec<&Contact> = people.iter().collect();
        let out = truncate(render_table(&refs, false), refs.len(), 4);
        assert_eq!(out.len(), 5);
        assert!(out[2].starts_with("Ann"));
        assert!(out[3].starts_with("Bea"));
        assert_eq!(out[4], "showing 2 of 5 contacts (3 hidden)");
    }

    #[test]
    fn truncate_never_drops_the_header() {
        let ann = contact("Ann", None, None);
        let out = truncate(render_table(&[&ann], false), 1, 1);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], "showing 0 of 1 contacts (1 hidden)");
    }

    #[test]
    fn truncate_keeps_short_output() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(truncate(lines.clone(), 0, 2), lines);
    }
}
