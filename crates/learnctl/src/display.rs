//! Terminal rendering of a report.
//!
//! Sections mirror the dashboard cards: user, XP, projects, skills, audits.

use learnboard_shared::audit::AuditStanding;
use learnboard_shared::format::{format_date, format_growth, format_number, format_xp};
use learnboard_shared::projects::Outcome;
use learnboard_shared::report::Report;
use learnboard_shared::VERSION;

/// Escape codes behind `Palette`
pub mod colors {
    pub const HEADER: &str = "\x1b[38;2;130;170;255m";
    pub const OK: &str = "\x1b[38;2;90;220;140m";
    pub const ERR: &str = "\x1b[38;2;240;90;90m";
    pub const WARN: &str = "\x1b[38;2;240;190;80m";
    pub const DIM: &str = "\x1b[38;2;128;128;128m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Horizontal rule
pub const HR: &str = "────────────────────────────────────────────────────────────";

const KEY_WIDTH: usize = 15;
const BAR_WIDTH: usize = 30;

/// Color codes, or empty strings when colors are off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub header: &'static str,
    pub ok: &'static str,
    pub err: &'static str,
    pub warn: &'static str,
    pub dim: &'static str,
    pub bold: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        if color {
            Self {
                header: colors::HEADER,
                ok: colors::OK,
                err: colors::ERR,
                warn: colors::WARN,
                dim: colors::DIM,
                bold: colors::BOLD,
                reset: colors::RESET,
            }
        } else {
            Self {
                header: "",
                ok: "",
                err: "",
                warn: "",
                dim: "",
                bold: "",
                reset: "",
            }
        }
    }
}

fn kv(key: &str, value: &str) -> String {
    format!("{:width$} {}\n", key, value, width = KEY_WIDTH)
}

/// `[=====     ]` for a 0-100 level
pub fn level_bar(level: u8, p: &Palette) -> String {
    let filled = (level.min(100) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}{}{}]",
        p.ok,
        "=".repeat(filled),
        p.reset,
        " ".repeat(BAR_WIDTH - filled)
    )
}

pub fn render_header(p: &Palette) -> String {
    format!(
        "\n{}learnctl v{}{}\n{}{}{}\n",
        p.header, VERSION, p.reset, p.dim, HR, p.reset
    )
}

pub fn render_user(report: &Report, p: &Palette) -> String {
    let mut out = format!("{}User{}\n", p.bold, p.reset);
    out.push_str(&kv("login", &report.user.login));
    out.push_str(&kv("id", &report.user.id));
    out.push_str(&kv("email", &report.user.email));
    let since = report
        .user
        .created_at
        .as_ref()
        .map(format_date)
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&kv("member_since", &since));
    out
}

pub fn render_xp(report: &Report, p: &Palette) -> String {
    let mut out = format!("{}XP Progress{}\n", p.bold, p.reset);
    out.push_str(&kv("total_xp", &format_number(report.total_xp)));

    let growth_color = if report.xp_growth_percent > 0.0 {
        p.ok
    } else if report.xp_growth_percent < 0.0 {
        p.err
    } else {
        p.dim
    };
    out.push_str(&kv(
        "growth",
        &format!("{}{}{}", growth_color, format_growth(report.xp_growth_percent), p.reset),
    ));

    if report.xp_timeline.is_empty() {
        out.push_str(&format!("  {}no XP yet{}\n", p.dim, p.reset));
    }
    for point in &report.xp_timeline {
        out.push_str(&format!(
            "  {}  {:>12}  {}+{}{}\n",
            point.period,
            format_number(point.cumulative_xp),
            p.dim,
            format_number(point.gained_xp),
            p.reset
        ));
    }
    out
}

pub fn render_projects(report: &Report, p: &Palette) -> String {
    let mut out = format!("{}Projects{}\n", p.bold, p.reset);
    out.push_str(&kv("projects_done", &report.projects_done.to_string()));
    out.push_str(&kv(
        "passed/failed",
        &format!(
            "{}{}{} / {}{}{}",
            p.ok,
            report.pass_fail_counts.passed,
            p.reset,
            p.err,
            report.pass_fail_counts.failed,
            p.reset
        ),
    ));
    out.push_str(&kv("success_rate", &format!("{}%", report.success_rate)));

    if !report.recent_outcomes.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "  {:8} {:28} {:>14} {:>10}\n",
            "Status", "Project", "Date", "XP"
        ));
        out.push_str(&format!("{}{}{}\n", p.dim, "-".repeat(64), p.reset));
    }
    for project in &report.recent_outcomes {
        let status_color = match project.status {
            Outcome::Passed => p.ok,
            Outcome::Failed => p.err,
        };
        out.push_str(&format!(
            "  {}{:8}{} {:28} {:>14} {:>10}\n",
            status_color,
            project.status.to_string().to_uppercase(),
            p.reset,
            project.name,
            format_date(&project.updated_at),
            format_xp(project.xp)
        ));
    }
    out
}

pub fn render_skills(report: &Report, p: &Palette) -> String {
    let mut out = format!("{}Skills{}\n", p.bold, p.reset);
    if report.skills.is_empty() {
        out.push_str(&format!("  {}no skills recorded{}\n", p.dim, p.reset));
    }
    for skill in &report.skills {
        out.push_str(&format!(
            "  {:16} {} {:>3}  {}{}{}\n",
            skill.display_name,
            level_bar(skill.normalized_level, p),
            skill.normalized_level,
            p.dim,
            format_number(skill.accumulated_magnitude),
            p.reset
        ));
    }
    out
}

pub fn render_audit(report: &Report, p: &Palette) -> String {
    let mut out = format!("{}Audits{}\n", p.bold, p.reset);
    let standing_color = match report.audit_standing {
        AuditStanding::Above => p.ok,
        AuditStanding::Balanced => p.warn,
        AuditStanding::Below => p.err,
    };
    out.push_str(&kv(
        "audit_ratio",
        &format!(
            "{:.2} {}{}{}",
            report.audit_ratio,
            standing_color,
            report.audit_standing,
            p.reset
        ),
    ));

    let (given_pct, received_pct) = report.audit_counts.shares();
    let marker = if report.audit_counts.approximate { "~" } else { "" };
    out.push_str(&kv(
        "given",
        &format!("{}{} ({:.1}%)", marker, format_number(report.audit_counts.given), given_pct),
    ));
    out.push_str(&kv(
        "received",
        &format!(
            "{}{} ({:.1}%)",
            marker,
            format_number(report.audit_counts.received),
            received_pct
        ),
    ));
    if report.audit_counts.approximate {
        out.push_str(&format!(
            "  {}~ counts approximated from audit XP{}\n",
            p.dim, p.reset
        ));
    }
    out
}

fn render_footer(report: &Report, p: &Palette) -> String {
    let mut out = String::new();
    if report.diagnostics.skipped_records > 0 {
        out.push_str(&format!(
            "{}{} malformed record(s) skipped{}\n",
            p.warn, report.diagnostics.skipped_records, p.reset
        ));
    }
    out.push_str(&format!("{}{}{}\n", p.dim, HR, p.reset));
    out
}

/// Full dashboard: every section
pub fn render_report(report: &Report, p: &Palette) -> String {
    let sections = [
        render_user(report, p),
        render_xp(report, p),
        render_projects(report, p),
        render_skills(report, p),
        render_audit(report, p),
    ];
    let mut out = render_header(p);
    out.push_str(&sections.join("\n"));
    out.push_str(&render_footer(report, p));
    out
}

/// Header, one section, footer
pub fn render_section(
    report: &Report,
    p: &Palette,
    section: fn(&Report, &Palette) -> String,
) -> String {
    let mut out = render_header(p);
    out.push_str(&section(report, p));
    out.push_str(&render_footer(report, p));
    out
}
