//! Url subcommand - decode a share link offline

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use papers2code_core::{DATE_FORMAT, UrlState};

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Query string or full link, e.g. `?searchQuery=gan&page=2`
    pub query: String,
}

/// Take the query part of a full link, or the input as-is.
fn query_part(input: &str) -> &str {
    let input = input.split('#').next().unwrap_or(input);
    match input.split_once('?') {
        Some((_, q)) => q,
        None => input,
    }
}

pub fn describe(state: &UrlState) -> Table {
    let f = &state.filters;
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
    };
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["search", state.search.as_str()]);
    table.add_row(vec!["page".to_string(), state.page.to_string()]);
    table.add_row(vec!["sort", state.sort.as_str()]);
    table.add_row(vec!["from".to_string(), date(f.start_date)]);
    table.add_row(vec!["to".to_string(), date(f.end_date)]);
    table.add_row(vec!["authors", f.search_authors.as_str()]);
    table.add_row(vec!["tags".to_string(), f.tags.join(", ")]);
    table.add_row(vec!["has code", if f.has_code { "yes" } else { "no" }]);
    table.add_row(vec!["contributor", f.contributor_id.as_str()]);
    table
}

pub fn run(args: UrlArgs) {
    let state = UrlState::decode(query_part(&args.query));
    println!("{}", describe(&state));
    println!("Canonical: ?{}", state.encode());
    if let Err(e) = state.filters.validate() {
        log::warn!("{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_part_of_links() {
        assert_eq!(
            query_part("https://papers2code.org/papers?searchQuery=gan&page=2#top"),
            "searchQuery=gan&page=2"
        );
        assert_eq!(query_part("?page=3"), "page=3");
        assert_eq!(query_part("page=3"), "page=3");
    }

    #[test]
    fn describe_lists_every_field() {
        let state = UrlState::decode("searchQuery=gan&tags=nlp,cv&hasCode=true");
        let rendered = describe(&state).to_string();
        assert!(rendered.contains("gan"));
        assert!(rendered.contains("nlp, cv"));
        assert!(rendered.contains("yes"));
        assert!(rendered.contains("contributor"));
    }
}
