//! Extraction of a [`PollSnapshot`] from the rendered poll page.
//!
//! The page has no API, so state is read straight out of the markup:
//! every date carries an edit icon classed `js-date-edit-cal` holding
//! `data-date`/`data-dateid`, and every participant is a `<tr>` classed
//! `js-user-rows` holding `data-userid`, a name cell, and one vote cell
//! per date classed `table-success-cell` (yes), `table-danger-cell` (no),
//! `table-warning-cell` (maybe) or `table-question-cell` (undecided).
//!
//! Scanning is deliberately local and tolerant: find the marker class,
//! expand to the enclosing tag, read attributes regardless of their order
//! or quoting. Missing/garbled elements are skipped rather than failing
//! the whole read, and everything is testable offline against a captured
//! fixture.

use crate::models::date::DateToken;
use crate::models::poll::{DateId, Participant, PollSnapshot, UserId, Vote};

const DATE_MARKER: &str = "js-date-edit-cal";
const USER_ROW_MARKER: &str = "js-user-rows";

pub fn parse_snapshot(html: &str) -> PollSnapshot {
    PollSnapshot::new(parse_dates(html), parse_participants(html))
}

fn parse_dates(html: &str) -> Vec<(DateToken, DateId)> {
    let mut dates: Vec<(DateToken, DateId)> = Vec::new();
    let mut from = 0;
    while let Some(found) = html[from..].find(DATE_MARKER) {
        let pos = from + found;
        from = pos + DATE_MARKER.len();
        let Some((start, end)) = enclosing_tag(html, pos) else {
            continue;
        };
        let tag = &html[start..=end];
        if !has_class(tag, DATE_MARKER) {
            continue;
        }
        let (Some(raw_date), Some(raw_id)) = (attr(tag, "data-date"), attr(tag, "data-dateid"))
        else {
            continue;
        };
        let Ok(date) = raw_date.parse::<DateToken>() else {
            continue;
        };
        if dates.iter().all(|(d, _)| *d != date) {
            dates.push((date, DateId(raw_id.to_string())));
        }
    }
    dates
}

fn parse_participants(html: &str) -> Vec<Participant> {
    let mut participants = Vec::new();
    let mut from = 0;
    while let Some(found) = html[from..].find(USER_ROW_MARKER) {
        let pos = from + found;
        from = pos + USER_ROW_MARKER.len();
        let Some((tag_start, tag_end)) = enclosing_tag(html, pos) else {
            continue;
        };
        let tag = &html[tag_start..=tag_end];
        if !tag.starts_with("<tr") || !has_class(tag, USER_ROW_MARKER) {
            continue;
        }
        let Some(user_id) = attr(tag, "data-userid") else {
            continue;
        };
        let row_end = html[tag_end..]
            .find("</tr>")
            .map(|i| tag_end + i)
            .unwrap_or(html.len());
        let row = &html[tag_end + 1..row_end];
        let (name, votes) = parse_row(row);
        participants.push(Participant {
            id: UserId(user_id.to_string()),
            name: name.unwrap_or_default(),
            votes,
        });
    }
    participants
}

/// First non-vote `<td>` is the display name; classed cells are votes.
fn parse_row(row: &str) -> (Option<String>, Vec<Vote>) {
    let mut name = None;
    let mut votes = Vec::new();
    let mut from = 0;
    while let Some(found) = row[from..].find("<td") {
        let start = from + found;
        let Some(rel) = row[start..].find('>') else {
            break;
        };
        let tag_end = start + rel;
        let tag = &row[start..=tag_end];
        let content_end = row[tag_end..]
            .find("</td>")
            .map(|i| tag_end + i)
            .unwrap_or(row.len());
        match vote_for(tag) {
            Some(vote) => votes.push(vote),
            None => {
                if name.is_none() {
                    let text = strip_tags(&row[tag_end + 1..content_end]);
                    if !text.is_empty() {
                        name = Some(text);
                    }
                }
            }
        }
        from = content_end;
    }
    (name, votes)
}

fn vote_for(tag: &str) -> Option<Vote> {
    if has_class(tag, "table-success-cell") {
        Some(Vote::Yes)
    } else if has_class(tag, "table-danger-cell") {
        Some(Vote::No)
    } else if has_class(tag, "table-warning-cell") {
        Some(Vote::Maybe)
    } else if has_class(tag, "table-question-cell") {
        Some(Vote::Undecided)
    } else {
        None
    }
}

/// Expands a position inside a tag to the `(start, end)` byte range of the
/// enclosing `<...>` text, end pointing at the closing `>`.
fn enclosing_tag(html: &str, pos: usize) -> Option<(usize, usize)> {
    let start = html[..pos].rfind('<')?;
    let end = pos + html[pos..].find('>')?;
    Some((start, end))
}

/// Reads an attribute value out of a raw tag, tolerating attribute order,
/// spacing around `=`, and either quote style.
fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let bytes = tag.as_bytes();
    let mut from = 0;
    while let Some(found) = tag[from..].find(name) {
        let at = from + found;
        from = at + name.len();
        if at > 0 {
            let prev = bytes[at - 1];
            if prev.is_ascii_alphanumeric() || prev == b'-' || prev == b'_' {
                continue;
            }
        }
        let rest = tag[at + name.len()..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let quote = rest.chars().next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let inner = &rest[1..];
        let end = inner.find(quote)?;
        return Some(&inner[..end]);
    }
    None
}

fn has_class(tag: &str, class: &str) -> bool {
    attr(tag, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Drops markup, decodes the handful of entities the page uses, and
/// collapses whitespace.
fn strip_tags(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
