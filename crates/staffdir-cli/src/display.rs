//! Terminal rendering of view outcomes.
//!
//! Every renderer writes to an `impl Write` so output can be captured in
//! tests; `main` passes stdout.

use std::io::{self, Write};

use staffdir_app::{
    AuthState, DetailSource, DetailView, ListView, PhotoResultView, RedirectReason, Route, Screen,
    ViewError,
};
use staffdir_core::{MapProjection, SalaryChart, format_salary};

const BAR_WIDTH: usize = 40;
const POPUP_PREVIEW: usize = 6;

// ── Public API ──

pub fn print_screen(out: &mut impl Write, screen: &Screen, city: Option<&str>) -> io::Result<()> {
    match screen {
        Screen::Login(state) => print_login(out, state),
        Screen::List(view) => print_list(out, view),
        Screen::Details(view) => print_details(out, view),
        Screen::PhotoResult(view) => print_photo_result(out, view, None),
        Screen::Charts(chart) => print_chart(out, chart),
        Screen::Map(projection) => print_map(out, projection, city),
    }
}

pub fn print_redirect(out: &mut impl Write, from: &Route, to: &Route, reason: RedirectReason) -> io::Result<()> {
    let why = match reason {
        RedirectReason::AuthRequired => "sign in required",
        RedirectReason::MissingNavigationPayload => "nothing to show here",
        RedirectReason::SignedIn => "signed in",
        RedirectReason::SignedOut => "signed out",
    };
    writeln!(out, "{from} -> {to} ({why})")
}

pub fn print_failure(out: &mut impl Write, err: &ViewError) -> io::Result<()> {
    match err {
        ViewError::Network(e) => {
            writeln!(out, "=== Connection Issue ===")?;
            writeln!(out, "Unable to load employee data: {e}")?;
            writeln!(out, "This might be due to:")?;
            writeln!(out, "  - network connectivity issues")?;
            writeln!(out, "  - API server maintenance")?;
            writeln!(out)?;
            writeln!(out, "Try again, or re-run with --retries N.")
        }
        ViewError::NotFound { id } => {
            writeln!(out, "Employee {id} not found.")?;
            writeln!(out, "Ids are positions in the latest fetch; run `staffdir list` to see current ids.")
        }
        ViewError::InvalidCredentials => writeln!(out, "Username and password are required."),
    }
}

// ── Screens ──

fn print_login(out: &mut impl Write, state: &AuthState) -> io::Result<()> {
    match state {
        AuthState::Anonymous => {
            writeln!(out, "Not signed in. Use `staffdir login --username NAME --password PASS`.")
        }
        AuthState::Authenticated { username } if username.is_empty() => {
            writeln!(out, "Signed in. Use `staffdir logout` to sign out.")
        }
        AuthState::Authenticated { username } => {
            writeln!(out, "Signed in as {username}. Use `staffdir logout` to sign out.")
        }
    }
}

fn print_list(out: &mut impl Write, view: &ListView) -> io::Result<()> {
    writeln!(out, "=== Employee List ({} employees) ===", view.employees.len())?;
    if view.employees.is_empty() {
        return Ok(());
    }

    let employees = &view.employees;
    let w_name = column_width(employees.iter().map(|e| e.name.as_str()), "Name");
    let w_pos = column_width(employees.iter().map(|e| e.position.as_str()), "Position");
    let w_city = column_width(employees.iter().map(|e| e.city.as_str()), "City");
    let w_start = column_width(employees.iter().map(|e| e.start_date.as_str()), "Start Date");

    writeln!(
        out,
        "{:>4}  {:<w_name$}  {:<w_pos$}  {:<w_city$}  {:<w_start$}  Salary",
        "#", "Name", "Position", "City", "Start Date"
    )?;
    for e in employees.iter() {
        writeln!(
            out,
            "{:>4}  {:<w_name$}  {:<w_pos$}  {:<w_city$}  {:<w_start$}  {}",
            e.id, e.name, e.position, e.city, e.start_date, e.salary
        )?;
    }
    Ok(())
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

fn print_details(out: &mut impl Write, view: &DetailView) -> io::Result<()> {
    let e = &view.employee;
    let initial = e.initial().map(String::from).unwrap_or_default();
    writeln!(out, "=== [{initial}] {} ===", e.name)?;
    writeln!(out, "{}", e.position)?;
    writeln!(out)?;
    writeln!(out, "  {:<14} {}", "Employee ID", e.employee_id)?;
    writeln!(out, "  {:<14} {}", "Position", e.position)?;
    writeln!(out, "  {:<14} {}", "Location", e.city)?;
    writeln!(out, "  {:<14} {}", "Start Date", e.start_date)?;
    writeln!(out, "  {:<14} {}", "Salary", e.salary)?;
    if let DetailSource::Snapshot { epoch } = view.source {
        writeln!(out)?;
        writeln!(out, "(record {} of fetch #{epoch})", e.id)?;
    }
    Ok(())
}

/// `saved_to` is shown when the photo was written to disk.
pub fn print_photo_result(
    out: &mut impl Write,
    view: &PhotoResultView,
    saved_to: Option<&std::path::Path>,
) -> io::Result<()> {
    writeln!(out, "=== Photo for {} ===", view.employee.name)?;
    writeln!(
        out,
        "  {:<14} {}",
        "Captured",
        view.image.captured_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out, "  {:<14} {} bytes ({})", "Image", view.image.bytes.len(), view.image.mime)?;
    if let Some(path) = saved_to {
        writeln!(out, "  {:<14} {}", "Saved to", path.display())?;
    }
    Ok(())
}

fn print_chart(out: &mut impl Write, chart: &SalaryChart) -> io::Result<()> {
    writeln!(out, "=== Top 10 Employee Salaries ===")?;
    let Some(stats) = chart.stats else {
        return writeln!(out, "No salary data.");
    };

    let w_name = chart
        .entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &chart.entries {
        let mut filled = (chart.bar_percent(entry) / 100.0 * BAR_WIDTH as f64).round() as usize;
        // Keep tiny non-zero salaries visible.
        if entry.salary > 0 {
            filled = filled.max(1);
        }
        writeln!(
            out,
            "{:<w_name$}  {:<bar$}  {}",
            entry.name,
            "█".repeat(filled),
            format_salary(entry.salary),
            bar = BAR_WIDTH,
        )?;
    }
    writeln!(out)?;
    writeln!(out, "  {:<16} {}", "Highest Salary", format_salary(stats.highest))?;
    writeln!(out, "  {:<16} {}", "Average Salary", format_salary(stats.average))?;
    writeln!(out, "  {:<16} {}", "Lowest Salary", format_salary(stats.lowest))
}

fn print_map(out: &mut impl Write, projection: &MapProjection, city: Option<&str>) -> io::Result<()> {
    writeln!(out, "=== Office Locations ({} cities) ===", projection.cities.len())?;
    for c in projection.by_headcount() {
        let plural = if c.headcount() == 1 { "" } else { "s" };
        writeln!(
            out,
            "  {:<16} {:>3} employee{plural:<2} [{}]  ({:.4}, {:.4})",
            c.city,
            c.headcount(),
            c.tier().as_str(),
            c.coordinates.lat,
            c.coordinates.lng
        )?;
    }

    if !projection.unmapped.is_empty() {
        let names: Vec<&str> = projection.unmapped.iter().map(|g| g.city.as_str()).collect();
        writeln!(
            out,
            "  ({} employees in unmapped cities not shown: {})",
            projection.unmapped_employees(),
            names.join(", ")
        )?;
    }

    if let Some(name) = city {
        writeln!(out)?;
        match projection.select(name) {
            Some(selected) => {
                writeln!(out, "=== {} Team ({} members) ===", selected.city, selected.headcount())?;
                let (shown, more) = selected.preview(POPUP_PREVIEW);
                for e in shown {
                    writeln!(out, "  {:<24} {:<32} {}", e.name, e.position, e.salary)?;
                }
                if more > 0 {
                    writeln!(out, "  +{more} more employees...")?;
                }
            }
            None => writeln!(out, "No mapped office in {name}.")?,
        }
    }

    writeln!(out)?;
    writeln!(out, "Global Statistics")?;
    match projection.stats() {
        Some(stats) => {
            writeln!(out, "  {:<16} {}", "Total Cities", stats.total_cities)?;
            writeln!(out, "  {:<16} {}", "Total Employees", stats.total_employees)?;
            writeln!(out, "  {:<16} {}", "Largest Office", stats.largest_office)?;
            writeln!(out, "  {:<16} {}", "Avg per City", stats.average_per_city)
        }
        None => writeln!(out, "  no data"),
    }
}
