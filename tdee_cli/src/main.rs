use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tdee_core::*;

#[derive(Parser)]
#[command(name = "tdee")]
#[command(about = "TDEE calculator with on-device history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive calculator session (the default)
    Form,

    /// One-shot calculation from flags
    Calc {
        /// Age in years
        #[arg(long)]
        age: String,

        /// Weight in kilograms
        #[arg(long)]
        weight: String,

        /// Height in centimeters
        #[arg(long)]
        height: String,

        /// male or female
        #[arg(long, default_value = "male")]
        gender: String,

        /// Activity multiplier (1.2, 1.375, 1.55, 1.725, 1.9) or bucket name
        #[arg(long, default_value = "1.2")]
        activity: String,

        /// Compute and print without saving to history
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the saved calculation history
    History,
}

fn main() -> Result<()> {
    // Initialize logging
    tdee_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory: {:?}", data_dir);

    match cli.command {
        Some(Commands::Calc {
            age,
            weight,
            height,
            gender,
            activity,
            dry_run,
        }) => cmd_calc(data_dir, age, weight, height, gender, activity, dry_run),
        Some(Commands::History) => cmd_history(data_dir),
        Some(Commands::Form) | None => cmd_form(data_dir),
    }
}

fn cmd_calc(
    data_dir: PathBuf,
    age: String,
    weight: String,
    height: String,
    gender: String,
    activity: String,
    dry_run: bool,
) -> Result<()> {
    // Selector flags are strict here; the interactive form re-prompts instead
    let gender: Gender = gender.parse().map_err(Error::Other)?;
    let activity: ActivityLevel = activity.parse().map_err(Error::Other)?;

    if dry_run {
        let mut app = App::new(MemoryStore::new());
        run_calc(&mut app, age, weight, height, gender, activity)?;
        println!("[Dry run - not saved to history]");
        Ok(())
    } else {
        let mut app = App::new(FileStore::new(data_dir));
        run_calc(&mut app, age, weight, height, gender, activity)
    }
}

fn run_calc<S: HistoryStore>(
    app: &mut App<S>,
    age: String,
    weight: String,
    height: String,
    gender: Gender,
    activity: ActivityLevel,
) -> Result<()> {
    app.set_field(Field::Age, age);
    app.set_field(Field::Weight, weight);
    app.set_field(Field::Height, height);
    app.set_gender(gender);
    app.set_activity(activity);

    match app.submit() {
        Some(tdee) => {
            display_result(tdee);
            Ok(())
        }
        None => {
            eprintln!("{}", app::INVALID_INPUT_TITLE);
            for (field, message) in app.errors() {
                eprintln!("  {}: {}", field, message);
            }
            Err(Error::Other(app::INVALID_INPUT_MESSAGE.to_string()))
        }
    }
}

fn cmd_history(data_dir: PathBuf) -> Result<()> {
    let store = FileStore::new(data_dir);
    let history = load_history(&store);
    display_history(&history);
    Ok(())
}

/// Interactive calculator loop
fn cmd_form(data_dir: PathBuf) -> Result<()> {
    let mut app = App::new(FileStore::new(data_dir));

    println!("TDEE Calculator");

    loop {
        if app.showing_history() {
            display_history(app.history());
            match prompt_action("[Enter] back to calculator, 'q' to quit")? {
                Some(ref action) if action == "q" => break,
                Some(_) => app.toggle_history(),
                None => break,
            }
            continue;
        }

        if !prompt_form(&mut app)? {
            break;
        }

        if let Some(tdee) = app.submit() {
            display_result(tdee);
        } else {
            display_errors(app.errors());
            // The form keeps its values; re-prompt with each one prefilled
            if prompt_action("Press Enter to correct the form")?.is_none() {
                break;
            }
            continue;
        }

        match prompt_action("[Enter] new calculation, 'h' for history, 'q' to quit")? {
            Some(ref action) if action == "q" => break,
            Some(ref action) if action == "h" => app.toggle_history(),
            Some(_) => {}
            None => break,
        }
    }

    Ok(())
}

/// Walk the form fields in display order, keeping current values on Enter.
///
/// Returns false when stdin closes mid-form.
fn prompt_form<S: HistoryStore>(app: &mut App<S>) -> Result<bool> {
    println!();
    let form = app.form().clone();

    let age = match prompt_field("Age", &form.age)? {
        Some(value) => value,
        None => return Ok(false),
    };
    app.set_field(Field::Age, age);

    let gender = match prompt_gender(form.gender)? {
        Some(value) => value,
        None => return Ok(false),
    };
    app.set_gender(gender);

    let weight = match prompt_field("Weight (kg)", &form.weight)? {
        Some(value) => value,
        None => return Ok(false),
    };
    app.set_field(Field::Weight, weight);

    let height = match prompt_field("Height (cm)", &form.height)? {
        Some(value) => value,
        None => return Ok(false),
    };
    app.set_field(Field::Height, height);

    let activity = match prompt_activity(form.activity)? {
        Some(value) => value,
        None => return Ok(false),
    };
    app.set_activity(activity);

    Ok(true)
}

/// Prompt for a free-text field, keeping the current value on empty input
fn prompt_field(label: &str, current: &str) -> Result<Option<String>> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    io::stdout().flush()?;

    Ok(read_line()?.map(|input| {
        if input.is_empty() {
            current.to_string()
        } else {
            input
        }
    }))
}

fn prompt_gender(current: Gender) -> Result<Option<Gender>> {
    let input = match prompt_field("Gender (male/female)", current.label())? {
        Some(input) => input,
        None => return Ok(None),
    };

    match input.parse::<Gender>() {
        Ok(gender) => Ok(Some(gender)),
        Err(e) => {
            eprintln!("{}. Keeping {}.", e, current.label());
            Ok(Some(current))
        }
    }
}

fn prompt_activity(current: ActivityLevel) -> Result<Option<ActivityLevel>> {
    println!("Activity level:");
    for (i, level) in ActivityLevel::ALL.iter().enumerate() {
        let marker = if *level == current { "*" } else { " " };
        println!(
            "  {} {}) {} ({})",
            marker,
            i + 1,
            level.label(),
            level.multiplier()
        );
    }

    let input = match prompt_field("Choose 1-5", "")? {
        Some(input) => input,
        None => return Ok(None),
    };
    if input.is_empty() {
        return Ok(Some(current));
    }

    if let Ok(choice) = input.parse::<usize>() {
        if (1..=ActivityLevel::ALL.len()).contains(&choice) {
            return Ok(Some(ActivityLevel::ALL[choice - 1]));
        }
    }

    match input.parse::<ActivityLevel>() {
        Ok(level) => Ok(Some(level)),
        Err(e) => {
            eprintln!("{}. Keeping {}.", e, current.label());
            Ok(Some(current))
        }
    }
}

/// Show a divider and read the next action, lowercased
fn prompt_action(label: &str) -> Result<Option<String>> {
    println!("─────────────────────────────────────────");
    println!("{}", label);
    print!("> ");
    io::stdout().flush()?;

    Ok(read_line()?.map(|input| input.to_lowercase()))
}

/// Read one line from stdin, None once the stream closes
fn read_line() -> Result<Option<String>> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn display_result(tdee: u32) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  YOUR TDEE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} calories/day", tdee);
    println!();
}

fn display_errors(errors: &FieldErrors) {
    println!();
    println!("{}", app::INVALID_INPUT_TITLE);
    println!("{}", app::INVALID_INPUT_MESSAGE);
    for (field, message) in errors {
        println!("  {}: {}", field, message);
    }
    println!();
}

fn display_history(history: &[HistoryEntry]) {
    println!();
    println!("Calculation History");
    println!("───────────────────");

    if history.is_empty() {
        println!("  No calculations yet.");
        return;
    }

    for entry in history {
        println!();
        println!("  {}", format_date(entry.date));
        println!(
            "  Age: {}, Weight: {}kg, Height: {}cm",
            entry.age, entry.weight, entry.height
        );
        println!("  TDEE: {} calories/day", entry.tdee);
    }
}

/// Render an epoch-millisecond stamp as a local calendar date
fn format_date(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}
