//! Terminal rendering of paper lists

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use papers2code_core::{PageLabel, Paper, QueryState, Vote};

const TITLE_WIDTH: usize = 60;
const AUTHORS_WIDTH: usize = 30;

pub fn papers_table(papers: &[Paper]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Authors").fg(Color::Cyan),
            Cell::new("Date").fg(Color::Cyan),
            Cell::new("Votes").fg(Color::Cyan),
            Cell::new("Code").fg(Color::Cyan),
        ]);

    for paper in papers {
        let votes = match paper.current_user_vote {
            Vote::Up => Cell::new(format!("▲ {}", paper.upvote_count)).fg(Color::Green),
            Vote::Neutral => Cell::new(paper.upvote_count.to_string()),
        };
        let code = if paper.has_code || paper.url_github.is_some() {
            "yes"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(&paper.id),
            Cell::new(truncate(&paper.title, TITLE_WIDTH)),
            Cell::new(truncate(&paper.authors.join(", "), AUTHORS_WIDTH)),
            Cell::new(paper.publication_date.as_deref().unwrap_or("")),
            votes,
            Cell::new(code),
        ]);
    }
    table
}

/// "Page 2 of 9 (100 papers)  1 [2] 3 4 … 9"
pub fn footer(state: &QueryState, labels: &[PageLabel]) -> String {
    let mut line = format!(
        "Page {} of {} ({} papers)",
        state.current_page(),
        state.total_pages(),
        state.total_count()
    );
    if state.is_relevance_sort() {
        line.push_str(", sorted by relevance");
    }
    if !labels.is_empty() {
        let pages: Vec<String> = labels
            .iter()
            .map(|label| match label {
                PageLabel::Page(n) if *n == state.current_page() => format!("[{n}]"),
                other => other.to_string(),
            })
            .collect();
        line.push_str("  ");
        line.push_str(&pages.join(" "));
    }
    line
}

/// Shorten to `max` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
