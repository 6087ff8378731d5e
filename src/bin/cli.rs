use calendar_tool::{
    CalendarImporter, CalendarStore, DayType, SqliteCalendarStore, StatusMapping,
    entries_dataframe, monthly_breakdown, summarize_year,
};
use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame};
use std::fs;
use std::io::{self, Write};

fn parse_date_arg(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = format_cell(av);
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = match col.get(row_idx) {
                Ok(ref av) => format_cell(av),
                Err(_) => String::new(),
            };
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                Show this help\n  show <start> <end>                  Display stored entries (YYYY-MM-DD)\n  summary <year>                      Yearly counts and working rate\n  monthly <start> <end>               Per-month working/holiday counts\n  import <xlsx|csv> <path> [overwrite]\n                                      Import a calendar file\n  export <xlsx|csv> <path> <start> <end>\n                                      Export a stored range to a file\n  add-holiday <date> <type> [name...] Register a non-working date\n                                      (type: holiday|special-closure)\n  add-workday <date> [notes...]       Register a working date\n  delete <date>                       Remove a date from the calendar\n  next-workday <date> [skip]          Next working day after a date\n  mapping show                        Show status-token mapping\n  mapping set <json_path>             Load status-token mapping from JSON\n  mapping save <json_path>            Save status-token mapping to JSON\n  quit|exit                           Exit"
    );
}

fn show_range(store: &SqliteCalendarStore, start: NaiveDate, end: NaiveDate) {
    match store.read_range(start, end) {
        Ok(entries) if entries.is_empty() => println!("No entries between {start} and {end}."),
        Ok(entries) => match entries_dataframe(&entries) {
            Ok(df) => println!("{}", render_df_as_text_table(&df)),
            Err(e) => println!("Error building table: {}", e),
        },
        Err(e) => println!("Error reading calendar: {}", e),
    }
}

fn main() {
    let store = match std::env::args().nth(1) {
        Some(path) => match SqliteCalendarStore::new(&path) {
            Ok(store) => {
                println!("Calendar Tool (CLI) - {path} - type 'help' for commands\n");
                store
            }
            Err(e) => {
                eprintln!("Error opening {path}: {e}");
                std::process::exit(1);
            }
        },
        None => match SqliteCalendarStore::in_memory() {
            Ok(store) => {
                println!("Calendar Tool (CLI) - in-memory store - type 'help' for commands\n");
                store
            }
            Err(e) => {
                eprintln!("Error opening in-memory store: {e}");
                std::process::exit(1);
            }
        },
    };

    let mut mapping = StatusMapping::default();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(end_s)) => {
                    match (parse_date_arg(start_s), parse_date_arg(end_s)) {
                        (Some(start), Some(end)) => show_range(&store, start, end),
                        _ => println!("Invalid date (YYYY-MM-DD)"),
                    }
                }
                _ => println!("Usage: show <start> <end>"),
            },
            "summary" => match parts.next().and_then(|s| s.parse::<i32>().ok()) {
                Some(year) => match summarize_year(&store, year) {
                    Ok(summary) => {
                        println!("Total days  : {}", summary.total_days);
                        println!("Working days: {}", summary.working_days);
                        println!("Holidays    : {}", summary.holidays);
                        println!("Working rate: {}%", summary.working_rate);
                    }
                    Err(e) => println!("Error reading calendar: {}", e),
                },
                None => println!("Usage: summary <year>"),
            },
            "monthly" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(end_s)) => {
                    match (parse_date_arg(start_s), parse_date_arg(end_s)) {
                        (Some(start), Some(end)) => match monthly_breakdown(&store, start, end) {
                            Ok(months) if months.is_empty() => {
                                println!("No entries between {start} and {end}.")
                            }
                            Ok(months) => {
                                for month in months {
                                    println!(
                                        "{}  working={:<3} holidays={}",
                                        month.label(),
                                        month.working_days,
                                        month.holiday_days
                                    );
                                }
                            }
                            Err(e) => println!("Error reading calendar: {}", e),
                        },
                        _ => println!("Invalid date (YYYY-MM-DD)"),
                    }
                }
                _ => println!("Usage: monthly <start> <end>"),
            },
            "import" => {
                let fmt = parts.next();
                let path = parts.next();
                let overwrite = matches!(parts.next(), Some("overwrite"));
                match (fmt, path) {
                    (Some(fmt @ ("xlsx" | "csv")), Some(path)) => match fs::read(path) {
                        Ok(bytes) => {
                            let importer = CalendarImporter::with_mapping(&store, mapping.clone());
                            let outcome = if fmt == "csv" {
                                importer.import_csv(&bytes, overwrite)
                            } else {
                                importer.import_workbook(&bytes, overwrite)
                            };
                            match outcome {
                                Ok(result) => {
                                    println!("{}", result.message);
                                    for row_error in &result.row_errors {
                                        println!("  {}", row_error);
                                    }
                                }
                                Err(e) => println!("Import failed: {}", e),
                            }
                        }
                        Err(e) => println!("Error reading {}: {}", path, e),
                    },
                    _ => println!("Usage: import <xlsx|csv> <path> [overwrite]"),
                }
            }
            "export" => {
                let fmt = parts.next();
                let path = parts.next();
                let start_s = parts.next();
                let end_s = parts.next();
                match (fmt, path, start_s, end_s) {
                    (Some(fmt @ ("xlsx" | "csv")), Some(path), Some(start_s), Some(end_s)) => {
                        match (parse_date_arg(start_s), parse_date_arg(end_s)) {
                            (Some(start), Some(end)) => {
                                let importer =
                                    CalendarImporter::with_mapping(&store, mapping.clone());
                                let outcome = if fmt == "csv" {
                                    importer.export_csv(start, end)
                                } else {
                                    importer.export_workbook(start, end)
                                };
                                match outcome {
                                    Ok(bytes) => match fs::write(path, bytes) {
                                        Ok(_) => println!("Calendar exported to {}.", path),
                                        Err(e) => println!("Error writing {}: {}", path, e),
                                    },
                                    Err(e) => println!("Export failed: {}", e),
                                }
                            }
                            _ => println!("Invalid date (YYYY-MM-DD)"),
                        }
                    }
                    _ => println!("Usage: export <xlsx|csv> <path> <start> <end>"),
                }
            }
            "add-holiday" => {
                let date_s = parts.next();
                let type_s = parts.next();
                match (date_s.and_then(parse_date_arg), type_s) {
                    (Some(date), Some(type_s)) => match DayType::from_str(type_s) {
                        Some(day_type) if !day_type.is_working() => {
                            let rest: Vec<&str> = parts.collect();
                            let name = if rest.is_empty() {
                                None
                            } else {
                                Some(rest.join(" "))
                            };
                            let importer = CalendarImporter::with_mapping(&store, mapping.clone());
                            match importer.add_holiday(date, day_type, name.as_deref(), None) {
                                Ok(_) => println!("Registered {} as {}.", date, day_type.as_str()),
                                Err(e) => println!("Error adding holiday: {}", e),
                            }
                        }
                        Some(_) => println!("Type must be holiday or special-closure."),
                        None => println!("Unknown day type '{}'.", type_s),
                    },
                    _ => println!("Usage: add-holiday <YYYY-MM-DD> <type> [name...]"),
                }
            }
            "add-workday" => match parts.next().and_then(parse_date_arg) {
                Some(date) => {
                    let rest: Vec<&str> = parts.collect();
                    let notes = if rest.is_empty() {
                        None
                    } else {
                        Some(rest.join(" "))
                    };
                    let importer = CalendarImporter::with_mapping(&store, mapping.clone());
                    match importer.add_working_day(date, notes.as_deref()) {
                        Ok(_) => println!("Registered {} as a working day.", date),
                        Err(e) => println!("Error adding working day: {}", e),
                    }
                }
                None => println!("Usage: add-workday <YYYY-MM-DD> [notes...]"),
            },
            "delete" => match parts.next().and_then(parse_date_arg) {
                Some(date) => {
                    let importer = CalendarImporter::with_mapping(&store, mapping.clone());
                    match importer.remove_date(date) {
                        Ok(true) => println!("Deleted {}.", date),
                        Ok(false) => println!("{} was not registered.", date),
                        Err(e) => println!("Error deleting date: {}", e),
                    }
                }
                None => println!("Usage: delete <YYYY-MM-DD>"),
            },
            "next-workday" => match parts.next().and_then(parse_date_arg) {
                Some(date) => {
                    let skip = parts
                        .next()
                        .and_then(|s| s.parse::<usize>().ok())
                        .unwrap_or(1);
                    match store.next_working_day(date, skip) {
                        Ok(next) => println!("{}", next),
                        Err(e) => println!("Error reading calendar: {}", e),
                    }
                }
                None => println!("Usage: next-workday <YYYY-MM-DD> [skip]"),
            },
            "mapping" => match parts.next() {
                Some("show") | None => {
                    println!("working     : {}", mapping.token_for(true));
                    println!("non-working : {}", mapping.token_for(false));
                }
                Some("set") => match parts.next() {
                    Some(path) => match fs::read_to_string(path) {
                        Ok(contents) => match serde_json::from_str::<StatusMapping>(&contents) {
                            Ok(loaded) => {
                                mapping = loaded;
                                println!("Status mapping updated from {}.", path);
                            }
                            Err(e) => println!("Invalid mapping JSON: {}", e),
                        },
                        Err(e) => println!("Error reading {}: {}", path, e),
                    },
                    None => println!("Usage: mapping set <json_path>"),
                },
                Some("save") => match parts.next() {
                    Some(path) => match serde_json::to_string_pretty(&mapping) {
                        Ok(json) => match fs::write(path, json) {
                            Ok(_) => println!("Status mapping saved to {}.", path),
                            Err(e) => println!("Error writing {}: {}", path, e),
                        },
                        Err(e) => println!("Error serializing mapping: {}", e),
                    },
                    None => println!("Usage: mapping save <json_path>"),
                },
                Some(other) => {
                    println!("Unknown mapping command '{}'.", other);
                    println!("Usage: mapping show|set <json_path>|save <json_path>");
                }
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
