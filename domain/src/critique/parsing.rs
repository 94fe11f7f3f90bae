//! Critique response parsing.
//!
//! These functions extract a structured [`CritiqueResult`] from free-form
//! reviewer output. They are pure domain logic — no I/O, no session
//! management, just text pattern matching.
//!
//! # Functions
//!
//! | Function | Use Case | Behavior on mismatch |
//! |----------|----------|----------------------|
//! | [`parse_critique`] | Full critique extraction | Degrades, never fails |
//! | [`parse_score`] | `NN/100` overall rating | `None` |
//! | [`is_well_formed_critique`] | Format gate for re-ask | `false` |

use crate::critique::entities::{CritiqueResult, Issue, Severity};

/// Parse reviewer output into a [`CritiqueResult`].
///
/// Extraction order:
///
/// 1. **JSON** (preferred): a `{...}` block with `issues`/`summary`/`score`
/// 2. **Markdown**: severity-tagged bullets (`- [high] ...`) plus the
///    `Verdict`/`Score` sections of the prompt contract
/// 3. **Fallback**: one synthetic medium issue carrying the raw text
///
/// Critique is advisory, so this never fails: any text yields a usable
/// result. An issues section with no bullets parses as an empty issue
/// list (document judged acceptable).
pub fn parse_critique(response: &str) -> CritiqueResult {
    if let Some(result) = parse_json_critique(response) {
        return result;
    }

    if let Some(result) = parse_markdown_critique(response) {
        return result;
    }

    CritiqueResult::fallback(response.to_string())
}

/// Extract an `NN/100` overall rating from reviewer text.
///
/// Accepts `87/100`, `Score: 87 / 100`, and similar spellings anywhere in
/// the text. Values above 100 are rejected rather than clamped.
pub fn parse_score(response: &str) -> Option<u8> {
    for (idx, _) in response.match_indices("/100") {
        let head = &response[..idx];
        let digits: String = head
            .chars()
            .rev()
            .skip_while(|c| c.is_whitespace())
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if digits.is_empty() {
            continue;
        }
        if let Ok(score) = digits.parse::<u8>() {
            if score <= 100 {
                return Some(score);
            }
        }
    }
    None
}

/// Check that a critique carries the full section contract the prompt
/// asked for: a verdict, a parseable score, an issues section, and next
/// steps. Deep review uses this to decide whether a single re-ask is
/// worth the extra call; a `false` here is not an error.
pub fn is_well_formed_critique(response: &str) -> bool {
    let lower = response.to_lowercase();
    let has_heading = |name: &str| {
        lower
            .lines()
            .any(|l| l.trim_start().starts_with('#') && l.to_lowercase().contains(name))
    };

    has_heading("verdict")
        && has_heading("issues")
        && has_heading("next steps")
        && parse_score(response).is_some()
}

fn parse_json_critique(response: &str) -> Option<CritiqueResult> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    let value: serde_json::Value = serde_json::from_str(&response[start..start + end + 1]).ok()?;

    let raw_issues = value.get("issues")?.as_array()?;
    let mut issues = Vec::with_capacity(raw_issues.len());
    for item in raw_issues {
        let description = item.get("description")?.as_str()?.to_string();
        let severity = item
            .get("severity")
            .and_then(|s| s.as_str())
            .and_then(|s| s.parse::<Severity>().ok())
            .unwrap_or(Severity::Medium);
        issues.push(Issue::new(severity, description));
    }

    let summary = value
        .get("summary")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();
    let score = value
        .get("score")
        .and_then(|s| s.as_u64())
        .filter(|s| *s <= 100)
        .map(|s| s as u8);

    Some(CritiqueResult::new(issues, summary, score))
}

fn parse_markdown_critique(response: &str) -> Option<CritiqueResult> {
    let mut issues = Vec::new();
    let mut saw_issues_heading = false;
    let mut in_issues_section = false;
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut in_summary_section = false;

    for line in response.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim().to_lowercase();
            in_issues_section = heading.contains("issue")
                || heading.contains("problem")
                || heading.contains("concern");
            saw_issues_heading |= in_issues_section;
            in_summary_section = heading.contains("verdict") || heading.contains("summary");
            continue;
        }

        if in_summary_section && !trimmed.is_empty() {
            summary_lines.push(trimmed);
        }

        if let Some(issue) = parse_issue_bullet(trimmed, in_issues_section) {
            issues.push(issue);
        }
    }

    // No issues section and no tagged bullets anywhere: the response does
    // not follow the contract, let the caller fall back.
    if !saw_issues_heading && issues.is_empty() {
        return None;
    }

    let summary = if summary_lines.is_empty() {
        first_paragraph(response)
    } else {
        summary_lines.join(" ")
    };

    Some(CritiqueResult::new(issues, summary, parse_score(response)))
}

/// Parse one bullet line into an issue.
///
/// Tagged bullets (`- [high] no storage plan`) are accepted anywhere.
/// Untagged bullets count only inside an issues section and default to
/// medium severity unless the line itself names one.
fn parse_issue_bullet(line: &str, in_issues_section: bool) -> Option<Issue> {
    let body = line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))?;

    if let Some(rest) = body.strip_prefix('[') {
        let close = rest.find(']')?;
        let severity = rest[..close].parse::<Severity>().ok()?;
        let description = rest[close + 1..].trim().to_string();
        if description.is_empty() {
            return None;
        }
        return Some(Issue::new(severity, description));
    }

    if !in_issues_section {
        return None;
    }

    // Untagged bullet inside the issues section; look for a leading
    // `severity:` label before defaulting.
    let (severity, description) = match body.split_once(':') {
        Some((label, rest)) => match label.parse::<Severity>() {
            Ok(sev) => (sev, rest.trim().to_string()),
            Err(()) => (Severity::Medium, body.trim().to_string()),
        },
        None => (Severity::Medium, body.trim().to_string()),
    };

    if description.is_empty() || description.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(Issue::new(severity, description))
}

fn first_paragraph(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('-') && !l.starts_with('*'))
        .unwrap_or_default()
        .to_string()
}
