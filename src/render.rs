//! Plain-text presentation for the terminal front end.

use crate::export::local_date;
use crate::pagination::PageControl;
use crate::pipeline::PageResult;
use crate::record::Paper;
use std::fmt::Write as _;

/// Long date used in the detail view, e.g. "March 10, 2024"
const LONG_DATE: &str = "%B %-d, %Y";

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Compact card for the list view.
pub fn card(paper: &Paper, date_format: &str) -> String {
    let mut out = String::new();
    let cover = paper
        .journal_abbreviation()
        .filter(|a| !a.is_empty())
        .unwrap_or(paper.journal_title())
        .to_uppercase();
    let impact = paper
        .impact_factor_opt()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    let published = paper
        .published_at()
        .map(|dt| local_date(&dt, date_format))
        .unwrap_or_default();

    let _ = writeln!(out, "[{}] {}  IF {}", paper.id, cover, impact);
    let _ = writeln!(out, "  Paper Title:  {}", paper.title());
    let _ = writeln!(out, "  Authors:      {}", paper.authors());
    let _ = writeln!(out, "  Publisher:    {}", paper.publisher_name());
    let _ = writeln!(out, "  Journal:      {}", paper.journal_title());
    let _ = writeln!(out, "  Subject Area: {}", paper.subject_area());
    let _ = writeln!(out, "  Service:      {}", paper.service_name());
    let _ = writeln!(out, "  Published:    {}", published);
    out
}

/// Full detail view; optional sections are left out when empty.
pub fn detail(paper: &Paper) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Research Paper Details");
    let _ = writeln!(out, "{}", RULE);

    section(&mut out, "Paper Title", &[paper.title().to_string()]);
    section(&mut out, "Authors", &[paper.authors().to_string()]);

    if let Some(link) = paper.articlelink.as_deref().filter(|l| !l.is_empty()) {
        section(&mut out, "Article Link", &[link.to_string()]);
    }

    let journal = paper.journal.clone().unwrap_or_default();
    let mut info = vec![paper.journal_title().to_string()];
    push_opt(&mut info, "Abbreviation", journal.journalabbreviation.as_deref());
    push_opt(&mut info, "ISSN", journal.issn.as_deref());
    push_opt(&mut info, "Publishing Company", journal.publishingcompany.as_deref());
    push_opt(&mut info, "Reach", journal.journalreach.as_deref());
    push_opt(&mut info, "Medium", journal.mediumofpublication.as_deref());
    section(&mut out, "Journal Information", &info);

    let mut metrics = vec![format!(
        "Impact Factor: {}",
        journal
            .impactfactor
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    )];
    push_opt(&mut metrics, "Alt Impact Factor", paper.journalaltimpactfactor.as_deref());
    push_opt(&mut metrics, "Article Influence", journal.articleinfluence.as_deref());
    push_opt(&mut metrics, "Crimson Score", journal.crimsoniscore.as_deref());
    push_opt(&mut metrics, "H-Index", journal.hirschindex.as_deref());
    section(&mut out, "Journal Metrics", &metrics);

    let mut subjects = vec![format!("Level 1: {}", paper.subject_area())];
    let level = |s: &Option<crate::record::SubjectArea>| s.as_ref().and_then(|a| a.name.clone());
    push_opt(&mut subjects, "Level 2", level(&paper.saleveltwo).as_deref());
    push_opt(&mut subjects, "Level 3", level(&paper.salevelthree).as_deref());
    push_opt(&mut subjects, "Journal Subject", journal.journalsubjectarea.as_deref());
    section(&mut out, "Subject Areas", &subjects);

    let mut publisher = vec![paper.publisher_name().to_string()];
    push_opt(
        &mut publisher,
        "Publisher Name",
        paper
            .publisher
            .as_ref()
            .and_then(|p| p.publishername.as_deref())
            .filter(|name| *name != paper.publisher_name()),
    );
    section(&mut out, "Publisher Information", &publisher);

    let mut service = vec![paper.service_name().to_string()];
    push_opt(
        &mut service,
        "Service Type",
        paper.servicetype.as_ref().and_then(|s| s.servicetype.as_deref()),
    );
    section(&mut out, "Service Information", &service);

    if let Some(client) = &paper.client {
        let name = format!(
            "{} {}",
            client.firstname.as_deref().unwrap_or(""),
            client.lastname.as_deref().unwrap_or("")
        );
        let mut lines = vec![format!("Name: {}", name.trim())];
        push_opt(&mut lines, "Organization", client.organization.as_deref());
        push_opt(&mut lines, "Member ID", client.memid.as_deref());
        section(&mut out, "Client Information", &lines);
    }

    if let Some(details) = paper.journaldetails.as_deref().filter(|d| !d.is_empty()) {
        section(&mut out, "Journal Details", &[details.to_string()]);
    }

    let long = |dt: Option<chrono::DateTime<chrono::Utc>>| {
        dt.map(|d| local_date(&d, LONG_DATE))
            .unwrap_or_else(|| "Unknown".to_string())
    };
    section(
        &mut out,
        "Important Dates",
        &[
            format!("Published: {}", long(paper.published_at())),
            format!("Created: {}", long(paper.created_at())),
        ],
    );

    if let Some(no) = paper.assignmentno.as_deref().filter(|n| !n.is_empty()) {
        section(&mut out, "Assignment Number", &[no.to_string()]);
    }

    out
}

fn section(out: &mut String, label: &str, lines: &[String]) {
    let _ = writeln!(out, "{}", label);
    for line in lines {
        let _ = writeln!(out, "  {}", line);
    }
    out.push('\n');
}

fn push_opt(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        lines.push(format!("{}: {}", label, v));
    }
}

/// One-line pagination bar, e.g. `1 ... 8 9 [10] 11 12 ... 20`.
pub fn pagination_bar(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|c| match c {
            PageControl::Page { number, active: true } => format!("[{}]", number),
            PageControl::Page { number, .. } => number.to_string(),
            PageControl::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Showing a-b of n papers"
pub fn summary(result: &PageResult<'_>) -> String {
    format!(
        "Showing {}-{} of {} papers",
        result.start_index_display, result.end_index_display, result.total_items
    )
}

/// The list view: cards, summary and pagination bar, or the empty state.
pub fn page(result: &PageResult<'_>, controls: &[PageControl], date_format: &str) -> String {
    if result.is_empty() {
        return "No research papers found\n".to_string();
    }
    let mut out = String::new();
    for paper in &result.items {
        out.push_str(&card(paper, date_format));
        out.push('\n');
    }
    let _ = writeln!(out, "{}", summary(result));
    let _ = writeln!(out, "{}", pagination_bar(controls));
    out
}

/// Error state shown in place of the list.
pub fn error_state(message: &str) -> String {
    format!(
        "Failed to load data\n{}\nType :retry to try again.\n",
        message
    )
}
