//! Plain-text rendering of console views.

use chrono::NaiveDate;
use pagination::PageInfo;

use crate::domain::{
    DashboardStats, GalleryItem, GateDecision, Notice, Program, SessionStatus, Vacancy,
};

pub(super) fn program_line(program: &Program) -> String {
    let window = match (program.start_date, program.end_date) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        (Some(start), None) => format!("from {start}"),
        (None, Some(end)) => format!("until {end}"),
        (None, None) => "dates to be announced".to_owned(),
    };
    let eligibility = if program.eligibility.is_empty() {
        "open to all".to_owned()
    } else {
        program.eligibility.join(", ")
    };
    format!("{} | {} | {window} | {eligibility}", program.id, program.name)
}

pub(super) fn notice_line(notice: &Notice, today: NaiveDate) -> String {
    let marker = if notice.is_upcoming_holiday(today) {
        notice
            .holiday_date
            .map_or_else(String::new, |date| format!(" [holiday {date}]"))
    } else {
        String::new()
    };
    format!(
        "{} | {}{marker} | {}",
        notice.created_at.date_naive(),
        notice.title,
        notice.category
    )
}

pub(super) fn vacancy_line(vacancy: &Vacancy, today: NaiveDate) -> String {
    let deadline = vacancy
        .deadline
        .map_or_else(|| "open until filled".to_owned(), |date| format!("apply by {date}"));
    let status = if vacancy.is_open_on(today) { "open" } else { "closed" };
    format!(
        "{} | {} | {} | {} | {} | {deadline} | {status}",
        vacancy.id, vacancy.title, vacancy.department, vacancy.position_type, vacancy.salary
    )
}

pub(super) fn gallery_line(item: &GalleryItem) -> String {
    let tags = if item.tags.is_empty() {
        String::new()
    } else {
        format!(" #{}", item.tags.join(" #"))
    };
    format!("{} | {} | {}{tags}", item.kind, item.title, item.file_url)
}

pub(super) fn stats_lines(stats: &DashboardStats) -> Vec<String> {
    vec![
        format!("total students: {}", stats.total_students),
        format!("active classes: {}", stats.active_classes),
        format!("attendance rate: {}%", stats.attendance_rate),
        format!("monthly revenue: {}", stats.monthly_revenue),
    ]
}

pub(super) fn page_footer(info: &PageInfo) -> String {
    format!(
        "page {}/{} ({} items)",
        info.page,
        info.total_pages.max(1),
        info.total_items
    )
}

pub(super) fn session_line(status: &SessionStatus) -> String {
    match status {
        SessionStatus::Loading => "session: loading".to_owned(),
        SessionStatus::SignedOut => "session: anonymous".to_owned(),
        SessionStatus::SignedIn(snapshot) => {
            let role = snapshot
                .primary_role()
                .map_or("no role", |role| role.as_str());
            format!("session: {} ({role})", snapshot.display_name())
        }
    }
}

pub(super) fn gate_line(path: &str, decision: GateDecision) -> String {
    match decision.redirect_path() {
        Some(target) => format!("{path}: redirect to {target}"),
        None => format!("{path}: {decision}"),
    }
}
