// Entry point and interactive menu.
//
// - [1] imports a CSV rate sheet, replacing both tables.
// - [2] walks the city/region/type/supply/scale cascade and estimates.
// - [3] and [4] show and prune the accumulated results.
// - [5] shows the rate table and exports it as CSV.
// - [6] saves both tables as JSON.
// - [7] writes the accumulated results as CSV.
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use student_yield::ledger::parse_line_numbers;
use student_yield::output::{self, preview_table_rows};
use student_yield::util::{format_int, parse_i64_safe};
use student_yield::{Config, Selection, Session};

const PREVIEW_ROWS: usize = 20;

fn init_logger() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .try_init()
        .ok();
}

/// Print `prompt` and read one trimmed line. `None` means stdin is closed.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Offer a numbered list and return the picked option.
fn choose(label: &str, options: &[String]) -> Option<String> {
    if options.is_empty() {
        println!("No {} available for this selection.\n", label);
        return None;
    }
    println!("Select {}:", label);
    for (idx, option) in options.iter().enumerate() {
        println!("  [{}] {}", idx + 1, option);
    }
    loop {
        let input = read_line("Enter choice: ")?;
        match input.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(options[n - 1].clone()),
            _ => println!("Invalid choice. Please enter 1 to {}.", options.len()),
        }
    }
}

fn handle_import(session: &mut Session, path: &str) {
    match session.import_csv_path(Path::new(path)) {
        Ok(report) => println!(
            "Imported {} rows ({} combinations, {} with high-school data).\n",
            format_int(report.rows),
            format_int(report.rate_leaves),
            format_int(report.high_school_leaves)
        ),
        Err(e) => eprintln!("Import failed, rate table unchanged: {}\n", e),
    }
}

fn select(session: &Session) -> Option<Selection> {
    let lookup = session.lookup();
    let city = choose("city", &lookup.cities())?;
    let region = choose("region", &lookup.regions(&city))?;
    let housing_type = choose("housing type", &lookup.housing_types(&region))?;
    let supply_type = choose("supply type", &lookup.supply_types(&region, &housing_type))?;
    let scale = choose("scale", &lookup.scales(&region, &housing_type, &supply_type))?;
    Some(Selection { city, region, housing_type, supply_type, scale })
}

fn handle_estimate(session: &mut Session) {
    let Some(selection) = select(session) else {
        return;
    };
    let Some(input) = read_line("Number of units: ") else {
        return;
    };
    let Some(units) = parse_i64_safe(Some(input.as_str())) else {
        println!("Error: '{}' is not a whole number of units.\n", input);
        return;
    };

    match session.estimate(&selection, units) {
        Ok(estimate) => {
            let r = &estimate.result;
            println!("\nExpected students:");
            println!(
                "{} / {} / {} / {} units -> kindergarten {}, elementary {}, middle {}, high {}\n",
                r.housing_type,
                r.supply_type,
                r.scale,
                format_int(r.units),
                format_int(r.kindergarten),
                format_int(r.elementary),
                format_int(r.middle),
                format_int(r.high)
            );
            println!("Calculation basis:");
            println!("{}", estimate.basis);
        }
        Err(rejection) if rejection.is_lookup_miss() => {
            println!("Warning: {}. Add it to the rate sheet and import again.\n", rejection);
        }
        Err(rejection) => println!("Error: {}\n", rejection),
    }
}

fn handle_results(session: &Session) {
    if session.ledger().is_empty() {
        println!("No results yet. Run an estimate first (option 2).\n");
        return;
    }
    println!("Accumulated results (units, persons):\n");
    preview_table_rows(&session.ledger().display_rows(), usize::MAX);
}

fn handle_export_results(session: &Session, config: &Config) {
    match session.export_results(&config.results_file) {
        Ok(n) => println!(
            "({} results exported to {})\n",
            format_int(n),
            config.results_file.display()
        ),
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn handle_remove(session: &mut Session) {
    if session.ledger().is_empty() {
        println!("Nothing to remove.\n");
        return;
    }
    preview_table_rows(&session.ledger().display_rows(), usize::MAX);
    let Some(input) = read_line("Line numbers to remove (e.g. 1,3): ") else {
        return;
    };
    match parse_line_numbers(&input) {
        Some(positions) if !positions.is_empty() => {
            let removed = session.remove_results(positions);
            println!("Removed {} results.\n", format_int(removed));
        }
        Some(_) => println!("Nothing selected.\n"),
        None => println!("Invalid line numbers: {}\n", input),
    }
}

fn handle_rate_table(session: &Session, config: &Config) {
    let rows = session.export_rows();
    println!("Stored yield rates (%, %, persons, %):\n");
    preview_table_rows(&rows, PREVIEW_ROWS);
    match output::write_rate_export(&config.export_file, session.tables()) {
        Ok(n) => println!(
            "({} rows exported to {})\n",
            format_int(n),
            config.export_file.display()
        ),
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn handle_save(session: &Session, config: &Config) {
    match session.save(config) {
        Ok(()) => println!(
            "Saved {} and {}.\n",
            config.rate_file.display(),
            config.high_school_rate_file.display()
        ),
        Err(e) => eprintln!("Save failed: {}\n", e),
    }
}

fn main() {
    init_logger();
    let config = Config::parse();
    log::info!("student_yield v{}", env!("CARGO_PKG_VERSION"));

    let (mut session, errors) = Session::open(&config);
    for e in &errors {
        eprintln!("Note: {}", e);
    }
    if let Some(path) = &config.import {
        handle_import(&mut session, &path.to_string_lossy());
    }

    loop {
        println!("Student Yield Estimator");
        println!("[1] Import rate sheet (CSV)");
        println!("[2] Estimate students");
        println!("[3] Show accumulated results");
        println!("[4] Remove results");
        println!("[5] Show / export rate table");
        println!("[6] Save rate tables");
        println!("[7] Export results (CSV)");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Some(path) = read_line("CSV path: ") {
                    handle_import(&mut session, &path);
                }
            }
            "2" => handle_estimate(&mut session),
            "3" => handle_results(&session),
            "4" => handle_remove(&mut session),
            "5" => handle_rate_table(&session, &config),
            "6" => handle_save(&session, &config),
            "7" => handle_export_results(&session, &config),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0 to 7.\n"),
        }
    }
}
