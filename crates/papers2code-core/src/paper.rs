//! Paper list items and vote reconciliation

use serde::{Deserialize, Serialize};

/// The current user's vote on a paper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    #[default]
    #[serde(rename = "none")]
    Neutral,
}

impl Vote {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Self::Up),
            "none" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Neutral => "none",
        }
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the paper list as returned by the Papers API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub upvote_count: u32,
    #[serde(default)]
    pub current_user_vote: Vote,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub url_github: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub has_code: bool,
}

/// Copy the vote fields of `updated` onto the item with the same id.
///
/// Order and every other item are left untouched. Returns `false` when the
/// item is no longer in the list (e.g. a newer page replaced it).
pub fn reconcile_vote(papers: &mut [Paper], updated: &Paper) -> bool {
    match papers.iter_mut().find(|p| p.id == updated.id) {
        Some(paper) => {
            paper.upvote_count = updated.upvote_count;
            paper.current_user_vote = updated.current_user_vote;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, upvotes: u32) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Paper {id}"),
            upvote_count: upvotes,
            current_user_vote: Vote::Neutral,
            authors: vec![],
            publication_date: None,
            url_github: None,
            tags: vec![],
            has_code: false,
        }
    }

    #[test]
    fn vote_wire_names() {
        assert_eq!(serde_json::to_string(&Vote::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Vote::Neutral).unwrap(), "\"none\"");
        assert_eq!(Vote::from_name("none"), Some(Vote::Neutral));
        assert_eq!(Vote::from_name("down"), None);
    }

    #[test]
    fn paper_deserializes_with_defaults() {
        let p: Paper = serde_json::from_str(r#"{"id":"p1","title":"Attention"}"#).unwrap();
        assert_eq!(p.upvote_count, 0);
        assert_eq!(p.current_user_vote, Vote::Neutral);
        assert!(p.authors.is_empty());
    }

    #[test]
    fn paper_deserializes_camel_case() {
        let p: Paper = serde_json::from_str(
            r#"{"id":"p1","title":"T","upvoteCount":7,"currentUserVote":"up",
                "urlGithub":"https://github.com/x/y","hasCode":true}"#,
        )
        .unwrap();
        assert_eq!(p.upvote_count, 7);
        assert_eq!(p.current_user_vote, Vote::Up);
        assert!(p.has_code);
    }

    #[test]
    fn reconcile_touches_only_matching_item() {
        let mut list = vec![paper("a", 1), paper("b", 2), paper("c", 3)];
        let before = list.clone();
        let mut updated = paper("b", 3);
        updated.current_user_vote = Vote::Up;
        // Server may send fresher non-vote fields; they must not leak in
        updated.title = "Renamed".into();

        assert!(reconcile_vote(&mut list, &updated));

        assert_eq!(list[0], before[0]);
        assert_eq!(list[2], before[2]);
        assert_eq!(list[1].upvote_count, 3);
        assert_eq!(list[1].current_user_vote, Vote::Up);
        assert_eq!(list[1].title, "Paper b");
    }

    #[test]
    fn reconcile_missing_item() {
        let mut list = vec![paper("a", 1)];
        assert!(!reconcile_vote(&mut list, &paper("zz", 9)));
        assert_eq!(list, vec![paper("a", 1)]);
    }
}
