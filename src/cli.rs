use std::{
    io::{self, IsTerminal, Write},
    process::{Command, Stdio},
};

use anyhow::Context;
use chrono::{Datelike, NaiveDate};

use team_cal::{
    app::{AppState, SyncStatus},
    calendar::{
        date::{self, day_name, month_label, parse_date},
        CalendarDocument, Event, NewEvent, NewEventType,
    },
    query::{format_date_range, UpcomingEvent, UPCOMING_WINDOW_DAYS, VISIBLE_EVENT_CAP},
    storage::{open_store, Config},
    ui::{
        icons::{builtin_catalog, IconCatalog},
        month_view::{CalendarDay, MonthLayout},
        palette,
    },
};

pub const USAGE: &str = "\
Usage: team-cal <command> [--employee ID]

Commands:
  month [YYYY-MM]                         Month grid (default: current month)
  day YYYY-MM-DD                          Events on one day
  upcoming [YYYY-MM-DD]                   Events starting in the next 7 days
  legend                                  Event types
  employees                               Employees
  add-employee NAME...
  remove-employee ID
  add-type NAME COLOR ICON
  remove-type ID
  add-event EMPLOYEE TYPE START END
  update-event ID EMPLOYEE TYPE START END
  remove-event ID";

const CELL_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Month { year: i32, month: u32 },
    Day(NaiveDate),
    Upcoming(NaiveDate),
    Legend,
    Employees,
    AddEmployee(String),
    RemoveEmployee(String),
    AddType(NewEventType),
    RemoveType(String),
    AddEvent(NewEvent),
    UpdateEvent { id: String, event: NewEvent },
    RemoveEvent(String),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: CliCommand,
    pub employee: Option<String>,
}

pub fn parse_args<I>(args: I, today: NaiveDate) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut employee = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--employee" | "-e" => {
                let id = args.next().ok_or("--employee requires an employee id")?;
                employee = Some(id);
            }
            "--help" | "-h" => {
                return Ok(CliArgs { command: CliCommand::Help, employee });
            }
            _ if arg.starts_with("--") => return Err(format!("Unknown argument: {}", arg)),
            _ => positional.push(arg),
        }
    }

    let Some((name, rest)) = positional.split_first() else {
        return Ok(CliArgs {
            command: CliCommand::Month { year: today.year(), month: today.month() },
            employee,
        });
    };

    let command = match (name.as_str(), rest) {
        ("month", []) => CliCommand::Month { year: today.year(), month: today.month() },
        ("month", [month]) => {
            let (year, month) = parse_month(month)?;
            CliCommand::Month { year, month }
        }
        ("day", [day]) => CliCommand::Day(parse_date(day).map_err(|e| e.to_string())?),
        ("upcoming", []) => CliCommand::Upcoming(today),
        ("upcoming", [day]) => CliCommand::Upcoming(parse_date(day).map_err(|e| e.to_string())?),
        ("legend", []) => CliCommand::Legend,
        ("employees", []) => CliCommand::Employees,
        ("add-employee", words) if !words.is_empty() => CliCommand::AddEmployee(words.join(" ")),
        ("remove-employee", [id]) => CliCommand::RemoveEmployee(id.clone()),
        ("add-type", [name, color, icon]) => CliCommand::AddType(NewEventType {
            name: name.clone(),
            color: color.clone(),
            icon: icon.clone(),
        }),
        ("remove-type", [id]) => CliCommand::RemoveType(id.clone()),
        ("add-event", [employee_id, type_id, start, end]) => {
            CliCommand::AddEvent(NewEvent::new(employee_id, type_id, start, end))
        }
        ("update-event", [id, employee_id, type_id, start, end]) => CliCommand::UpdateEvent {
            id: id.clone(),
            event: NewEvent::new(employee_id, type_id, start, end),
        },
        ("remove-event", [id]) => CliCommand::RemoveEvent(id.clone()),
        ("help", []) => CliCommand::Help,
        (other, _) => return Err(format!("Unknown command or wrong arguments: {}", other)),
    };

    Ok(CliArgs { command, employee })
}

/// Like [`parse_args`], but the error carries the usage text for the binary.
pub fn parse_command_line<I>(args: I, today: NaiveDate) -> anyhow::Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    parse_args(args, today).map_err(|err| anyhow::anyhow!("{}\n\n{}", err, USAGE))
}

fn parse_month(input: &str) -> Result<(i32, u32), String> {
    let error = || format!("Invalid month '{}'. Use YYYY-MM.", input);
    let first = parse_date(&format!("{}-01", input)).map_err(|_| error())?;
    Ok((first.year(), first.month()))
}

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.command == CliCommand::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::load_or_create().context("failed to load configuration")?;
    let today = date::today();
    let store = open_store(&config.storage);
    let mut app = AppState::load(store, today).await;
    if let SyncStatus::Offline = app.sync_status {
        eprintln!("Warning: calendar data could not be loaded, showing an empty calendar");
    }

    let employee = args.employee.or_else(|| config.default_employee().map(String::from));
    app.set_employee_filter(employee);

    let renderer = TextRenderer {
        icons: builtin_catalog(),
        color: !config.ui.pager && io::stdout().is_terminal(),
    };

    let output = match args.command {
        CliCommand::Month { year, month } => {
            app.jump_to(NaiveDate::from_ymd_opt(year, month, 1).context("invalid month")?);
            let layout = app.month_layout(today)?;
            renderer.month(&layout, &app.document)
        }
        CliCommand::Day(day) => renderer.day(day, &app.day_events(day), &app.document),
        CliCommand::Upcoming(reference) => renderer.upcoming(&app.upcoming(reference)),
        CliCommand::Legend => renderer.legend(&app.document),
        CliCommand::Employees => renderer.employees(&app.document),
        CliCommand::AddEmployee(name) => {
            app.add_employee(&name).await?;
            format!("Added employee {}", name.trim())
        }
        CliCommand::RemoveEmployee(id) => {
            app.remove_employee(&id).await;
            format!("Removed employee {}", id)
        }
        CliCommand::AddType(new_type) => {
            let name = new_type.name.trim().to_string();
            app.add_event_type(new_type).await?;
            format!("Added event type {}", name)
        }
        CliCommand::RemoveType(id) => {
            app.remove_event_type(&id).await;
            format!("Removed event type {}", id)
        }
        CliCommand::AddEvent(event) => {
            app.add_event(event).await?;
            "Added event".to_string()
        }
        CliCommand::UpdateEvent { id, event } => {
            app.update_event(&id, event).await?;
            format!("Updated event {}", id)
        }
        CliCommand::RemoveEvent(id) => {
            app.remove_event(&id).await;
            format!("Removed event {}", id)
        }
        CliCommand::Help => USAGE.to_string(),
    };

    if let SyncStatus::Error(message) = &app.sync_status {
        eprintln!("Warning: {}", message);
    }

    if config.ui.pager && output.lines().count() > 1 {
        display_with_pager(&output)?;
    } else {
        println!("{output}");
    }

    Ok(())
}

struct TextRenderer {
    icons: &'static IconCatalog,
    color: bool,
}

impl TextRenderer {
    fn month(&self, layout: &MonthLayout<'_>, document: &CalendarDocument) -> String {
        let mut lines = Vec::new();
        let title = month_label(layout.year, layout.month)
            .unwrap_or_else(|_| format!("{}-{:02}", layout.year, layout.month));
        lines.push(title);
        lines.push(String::new());

        let header: String = (0..7)
            .filter_map(|i| day_name(i).ok())
            .map(|name| pad(name, CELL_WIDTH))
            .collect();
        lines.push(header.trim_end().to_string());

        for week in &layout.weeks {
            lines.push(row(&week.days, day_number));
            for slot in 0..VISIBLE_EVENT_CAP {
                lines.push(row(&week.days, |day| {
                    day.visible_events()
                        .get(slot)
                        .map(|event| self.event_chip(event, document))
                        .unwrap_or_default()
                }));
            }
            lines.push(row(&week.days, |day| match day.overflow_count() {
                0 => String::new(),
                n => format!("+{} još", n),
            }));
        }

        lines.join("\n")
    }

    fn event_chip(&self, event: &Event, document: &CalendarDocument) -> String {
        match (document.employee(&event.employee_id), document.event_type(&event.event_type_id)) {
            (Some(employee), Some(event_type)) => {
                format!("{} {}", self.icons.resolve(&event_type.icon).glyph(), employee.name)
            }
            _ => String::new(),
        }
    }

    fn day(&self, day: NaiveDate, events: &[&Event], document: &CalendarDocument) -> String {
        let mut lines = vec![
            format!("{}, {}. {} {}", weekday_name(day), day.day(), date::month_name(day), day.year()),
            String::new(),
        ];

        if events.is_empty() {
            lines.push("Nema događaja".to_string());
        }

        for event in events {
            let Some(employee) = document.employee(&event.employee_id) else { continue };
            let Some(event_type) = document.event_type(&event.event_type_id) else { continue };
            let range = format_date_range(&event.start_date, &event.end_date)
                .unwrap_or_else(|_| format!("{} - {}", event.start_date, event.end_date));
            let label = self.label(event_type.icon.as_str(), &event_type.name, &event_type.color);
            lines.push(format!("- {} {} ({}) [{}]", label, employee.name, range, event.id));
            if let Some(title) = &event.title {
                lines.push(format!("    {}", title));
            }
        }

        lines.join("\n")
    }

    fn upcoming(&self, upcoming: &[UpcomingEvent<'_>]) -> String {
        let mut lines = vec!["Nadolazeći događaji".to_string(), String::new()];

        if upcoming.is_empty() {
            lines.push(format!("Nema nadolazećih događaja u sledećih {} dana", UPCOMING_WINDOW_DAYS));
        }

        for item in upcoming {
            let range = format_date_range(&item.event.start_date, &item.event.end_date)
                .unwrap_or_else(|_| item.event.start_date.clone());
            let label = self.label(&item.event_type.icon, &item.event_type.name, &item.event_type.color);
            lines.push(format!("{:<10} {} {}", range, item.employee.name, label));
        }

        lines.join("\n")
    }

    fn legend(&self, document: &CalendarDocument) -> String {
        let mut lines = vec!["Legenda".to_string(), String::new()];
        for event_type in &document.event_types {
            let label = self.label(&event_type.icon, &event_type.name, &event_type.color);
            lines.push(format!("{} {} [{}]", label, event_type.color, event_type.id));
        }
        lines.join("\n")
    }

    fn employees(&self, document: &CalendarDocument) -> String {
        let mut lines = vec!["Zaposleni".to_string(), String::new()];
        for employee in &document.employees {
            lines.push(format!("{:<24} [{}]", employee.name, employee.id));
        }
        lines.join("\n")
    }

    fn label(&self, icon: &str, name: &str, color: &str) -> String {
        let text = format!("{} {}", self.icons.resolve(icon).glyph(), name);
        if self.color {
            palette::paint(&format!(" {} ", text), color)
        } else {
            text
        }
    }
}

fn weekday_name(day: NaiveDate) -> &'static str {
    day_name(day.weekday().num_days_from_monday() as usize).unwrap_or("")
}

fn day_number(day: &CalendarDay<'_>) -> String {
    if day.is_today {
        format!("[{}]", day.date.day())
    } else if day.is_current_month {
        format!("{}", day.date.day())
    } else {
        format!("({})", day.date.day())
    }
}

fn row<F>(days: &[CalendarDay<'_>], cell: F) -> String
where
    F: Fn(&CalendarDay<'_>) -> String,
{
    let line: String = days.iter().map(|day| pad(&cell(day), CELL_WIDTH)).collect();
    line.trim_end().to_string()
}

fn pad(text: &str, width: usize) -> String {
    let truncated = truncate_to_width(text, width - 1);
    let len = truncated.chars().count();
    format!("{}{}", truncated, " ".repeat(width - len))
}

fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = std::env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            println!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd).args(&args).stdin(Stdio::piped()).spawn() {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            println!("{text}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use team_cal::calendar::{Employee, EventType};
    use team_cal::ui::month_view::calculate_layout;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn parse(list: &[&str]) -> Result<CliArgs, String> {
        parse_args(args(list), date(2024, 6, 10))
    }

    fn create_test_document() -> CalendarDocument {
        CalendarDocument {
            employees: vec![Employee { id: "E1".to_string(), name: "Ana".to_string() }],
            event_types: vec![EventType {
                id: "T1".to_string(),
                name: "Odmor".to_string(),
                color: "#10B981".to_string(),
                icon: "Sun".to_string(),
            }],
            events: (1..=5)
                .map(|i| Event {
                    id: format!("V{}", i),
                    employee_id: "E1".to_string(),
                    event_type_id: "T1".to_string(),
                    start_date: "2024-06-12".to_string(),
                    end_date: "2024-06-12".to_string(),
                    title: None,
                })
                .collect(),
        }
    }

    fn plain_renderer() -> TextRenderer {
        TextRenderer { icons: builtin_catalog(), color: false }
    }

    #[test]
    fn no_arguments_shows_current_month() {
        let parsed = parse(&[]).unwrap();
        assert_eq!(parsed.command, CliCommand::Month { year: 2024, month: 6 });
        assert_eq!(parsed.employee, None);
    }

    #[test]
    fn parses_month_argument() {
        assert_eq!(parse(&["month", "2025-02"]).unwrap().command, CliCommand::Month { year: 2025, month: 2 });
        assert!(parse(&["month", "2025-13"]).is_err());
        assert!(parse(&["month", "2025/02"]).is_err());
    }

    #[test]
    fn parses_employee_filter_anywhere() {
        let parsed = parse(&["--employee", "E1", "day", "2024-06-12"]).unwrap();
        assert_eq!(parsed.command, CliCommand::Day(date(2024, 6, 12)));
        assert_eq!(parsed.employee.as_deref(), Some("E1"));

        let parsed = parse(&["upcoming", "-e", "E2"]).unwrap();
        assert_eq!(parsed.command, CliCommand::Upcoming(date(2024, 6, 10)));
        assert_eq!(parsed.employee.as_deref(), Some("E2"));
    }

    #[test]
    fn employee_flag_needs_a_value() {
        assert!(parse(&["day", "2024-06-12", "--employee"]).is_err());
    }

    #[test]
    fn malformed_day_is_rejected() {
        assert!(parse(&["day", "12.06.2024"]).is_err());
    }

    #[test]
    fn add_employee_joins_words() {
        assert_eq!(
            parse(&["add-employee", "Ana", "Petrović"]).unwrap().command,
            CliCommand::AddEmployee("Ana Petrović".to_string())
        );
    }

    #[test]
    fn parses_event_commands() {
        assert_eq!(
            parse(&["add-event", "E1", "T1", "2024-06-10", "2024-06-12"]).unwrap().command,
            CliCommand::AddEvent(NewEvent::new("E1", "T1", "2024-06-10", "2024-06-12"))
        );
        assert_eq!(
            parse(&["update-event", "V1", "E1", "T1", "2024-06-10", "2024-06-12"]).unwrap().command,
            CliCommand::UpdateEvent {
                id: "V1".to_string(),
                event: NewEvent::new("E1", "T1", "2024-06-10", "2024-06-12"),
            }
        );
        assert_eq!(parse(&["remove-event", "V1"]).unwrap().command, CliCommand::RemoveEvent("V1".to_string()));
    }

    #[test]
    fn unknown_command_or_flag_is_rejected() {
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["remove-event"]).is_err());
    }

    #[test]
    fn command_line_error_includes_usage() {
        let err = parse_command_line(args(&["add-evnet", "E1"]), date(2024, 6, 10)).unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Unknown command or wrong arguments: add-evnet"));
        assert!(message.contains("Usage: team-cal"));
    }

    #[test]
    fn help_flag_wins() {
        assert_eq!(parse(&["day", "--help"]).unwrap().command, CliCommand::Help);
    }

    #[test]
    fn month_grid_shows_overflow_marker() {
        let document = create_test_document();
        let layout = calculate_layout(&document, 2024, 6, date(2024, 6, 10), None).unwrap();

        let text = plain_renderer().month(&layout, &document);

        assert!(text.starts_with("Jun 2024"));
        assert!(text.contains("Pon"));
        assert!(text.contains("[10]"));
        assert!(text.contains("(27)"));
        assert!(text.contains("+2 još"));
        assert_eq!(text.matches("☀ Ana").count(), 3);
    }

    #[test]
    fn day_view_lists_events() {
        let document = create_test_document();
        let events: Vec<&Event> = document.events.iter().take(1).collect();

        let text = plain_renderer().day(date(2024, 6, 12), &events, &document);

        assert!(text.starts_with("Sre, 12. Jun 2024"));
        assert!(text.contains("☀ Odmor Ana (12. jun) [V1]"));
    }

    #[test]
    fn empty_upcoming_list_says_so() {
        let text = plain_renderer().upcoming(&[]);
        assert!(text.contains("sledećih 7 dana"));
    }

    #[test]
    fn pad_truncates_long_names() {
        assert_eq!(pad("Aleksandra Jovanović", 12).chars().count(), 12);
        assert!(pad("Aleksandra Jovanović", 12).contains('…'));
        assert_eq!(pad("Ana", 6), "Ana   ");
    }
}
