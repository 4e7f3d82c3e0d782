//! LevelUp - Personal Progress Tracker
//!
//! Command-line front end for goals, scheduled tasks and workout logs.

use anyhow::bail;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fmt::Display;
use std::path::PathBuf;

use levelup::config::CONFIG_FILE;
use levelup::{
    BodyPart, FileStore, GoalBook, LevelUpError, SystemClock, TaskScheduler, TrackerConfig,
    WorkoutLog,
};

#[derive(Parser)]
#[command(name = "levelup")]
#[command(version)]
#[command(about = "Track goals, daily tasks and workouts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the data store (defaults to the platform data dir)
    #[arg(long, global = true, env = "LEVELUP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to levelup.toml in the data dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage goals, completions and ranks
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Manage scheduled tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage workout logs
    Workout {
        #[command(subcommand)]
        action: WorkoutAction,
    },
}

#[derive(Subcommand)]
enum GoalAction {
    /// Create a goal
    Add {
        /// Goal title
        title: String,

        /// Category the goal belongs to
        #[arg(short, long)]
        category: String,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        due: NaiveDate,

        /// Position within the category (defaults to last)
        #[arg(short, long)]
        priority: Option<u32>,
    },

    /// List active goals by category
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a goal one place up in its category
    Up {
        /// Goal ID (or unique prefix)
        id: String,
    },

    /// Move a goal one place down in its category
    Down {
        /// Goal ID (or unique prefix)
        id: String,
    },

    /// Set goal progress in percent
    Progress {
        /// Goal ID (or unique prefix)
        id: String,

        /// Progress from 0 to 100
        percent: f64,
    },

    /// Change a goal's title or due date
    Edit {
        /// Goal ID (or unique prefix)
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        due: Option<NaiveDate>,
    },

    /// Mark a goal as completed
    Complete {
        /// Goal ID (or unique prefix)
        id: String,
    },

    /// Delete an active goal
    Delete {
        /// Goal ID (or unique prefix)
        id: String,
    },

    /// Add a category
    Category {
        /// Category name
        name: String,
    },

    /// List completed goals by category
    Completed {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a goal from the completed list (it stays in the rank archive)
    RemoveCompleted {
        /// Goal ID (or unique prefix)
        id: String,
    },

    /// Erase a category's completion history and rank
    Reset {
        /// Category to reset
        category: String,

        /// Confirm the reset
        #[arg(long)]
        yes: bool,

        /// Repeat the category name to confirm
        #[arg(long, value_name = "CATEGORY")]
        confirm: Option<String>,
    },

    /// Show ranks per category
    Ranks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Schedule a task
    Add {
        /// Task title
        title: String,

        /// Day to schedule on (YYYY-MM-DD)
        #[arg(short = 'D', long, value_parser = parse_date)]
        date: NaiveDate,

        /// Time of day (HH:MM)
        #[arg(short, long, value_parser = parse_time, default_value = "09:00")]
        time: NaiveTime,

        /// Longer description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },

    /// List tasks (today's by default)
    List {
        /// Day to list (YYYY-MM-DD)
        #[arg(short = 'D', long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// List every task
        #[arg(short, long, conflicts_with = "date")]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle a task between open and done
    Toggle {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Run the rollover pass and report what it did
    Maintain {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkoutAction {
    /// Start logging an exercise
    Add {
        /// Body part (chest, back, legs, shoulders, rest)
        part: BodyPart,

        /// Exercise name
        exercise: String,
    },

    /// List exercise logs
    List {
        /// Only show this body part
        part: Option<BodyPart>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append an empty set
    AddSet {
        /// Log ID (or unique prefix)
        id: String,
    },

    /// Remove the last set
    RemoveSet {
        /// Log ID (or unique prefix)
        id: String,
    },

    /// Record weight and reps for a set
    Set {
        /// Log ID (or unique prefix)
        id: String,

        /// Set number, starting at 1
        set: usize,

        /// Weight lifted
        #[arg(short, long)]
        weight: u32,

        /// Repetitions
        #[arg(short, long)]
        reps: u32,
    },

    /// Delete an exercise log
    Delete {
        /// Log ID (or unique prefix)
        id: String,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

/// First eight characters of an id, enough to address it from the CLI.
fn short(id: impl Display) -> String {
    id.to_string().chars().take(8).collect()
}

/// Find the single id starting with `query`.
fn resolve<T: Copy + Display>(
    ids: impl IntoIterator<Item = T>,
    query: &str,
    kind: &str,
) -> anyhow::Result<T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        bail!("{} id cannot be empty", kind);
    }

    let matches: Vec<T> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&query))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No {} matches '{}'", kind, query),
        _ => bail!(
            "'{}' matches {} {}s, use a longer prefix",
            query,
            matches.len(),
            kind
        ),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<TrackerConfig> {
    let path = match (&cli.config, &cli.data_dir) {
        (Some(path), _) => path.clone(),
        (None, Some(dir)) => dir.join(CONFIG_FILE),
        (None, None) => TrackerConfig::default().resolve_data_dir().join(CONFIG_FILE),
    };

    let mut config = TrackerConfig::load(&path)?;
    if let Some(ref dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "levelup=debug,info"
    } else {
        "levelup=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        let code = e
            .downcast_ref::<LevelUpError>()
            .map_or(1, LevelUpError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let store = FileStore::new(config.resolve_data_dir());

    match cli.command {
        Commands::Goal { action } => run_goal(action, store, &config),
        Commands::Task { action } => run_task(action, store, &config),
        Commands::Workout { action } => run_workout(action, store, &config),
    }
}

fn run_goal(action: GoalAction, store: FileStore, config: &TrackerConfig) -> anyhow::Result<()> {
    let mut book = GoalBook::load(store, SystemClock, config);
    let goal_ids =
        |book: &GoalBook<FileStore>| book.goals().iter().map(|g| g.id).collect::<Vec<_>>();

    match action {
        GoalAction::Add {
            title,
            category,
            due,
            priority,
        } => match book.create(&title, due, &category, priority)? {
            Some(id) => {
                let priority = book.get(id).map_or(0, |g| g.priority);
                println!(
                    "{} Added '{}' to {} at #{} ({})",
                    "OK".green(),
                    title.trim(),
                    category.trim().bold(),
                    priority,
                    short(id)
                );
            }
            None => bail!("Goal title and category cannot be blank"),
        },

        GoalAction::List { category, json } => {
            let groups: Vec<_> = book
                .active_by_category()
                .into_iter()
                .filter(|(name, _)| category.as_ref().map_or(true, |c| c == name))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
                return Ok(());
            }

            for (name, goals) in groups {
                println!(
                    "\n{} {}",
                    name.cyan().bold(),
                    format!("[{}]", book.rank(&name)).dimmed()
                );
                println!("{}", "─".repeat(40));
                if goals.is_empty() {
                    println!("   {}", "No goals".dimmed());
                }
                for goal in goals {
                    println!(
                        "   {}. {}  {:>3}%  due {}  ({})",
                        goal.priority,
                        goal.title,
                        goal.percent(),
                        goal.due_date,
                        short(goal.id)
                    );
                }
            }
        }

        GoalAction::Up { id } => {
            let id = resolve(goal_ids(&book), &id, "goal")?;
            if book.move_up(id)? {
                println!("{} Moved up", "OK".green());
            } else {
                println!("{} Already at the top", "Info:".blue());
            }
        }

        GoalAction::Down { id } => {
            let id = resolve(goal_ids(&book), &id, "goal")?;
            if book.move_down(id)? {
                println!("{} Moved down", "OK".green());
            } else {
                println!("{} Already at the bottom", "Info:".blue());
            }
        }

        GoalAction::Progress { id, percent } => {
            let id = resolve(goal_ids(&book), &id, "goal")?;
            if !book.update_progress(id, percent / 100.0)? {
                bail!("Progress must be a number from 0 to 100, nothing changed");
            }
            let shown = book.get(id).map_or(0, |g| g.percent());
            println!("{} Progress set to {}%", "OK".green(), shown);
        }

        GoalAction::Edit { id, title, due } => {
            let id = resolve(goal_ids(&book), &id, "goal")?;
            if title.is_none() && due.is_none() {
                bail!("Nothing to change, pass --title or --due");
            }
            if let Some(title) = title {
                if !book.rename(id, &title)? {
                    bail!("Goal title cannot be blank");
                }
            }
            if let Some(due) = due {
                book.update_due_date(id, due)?;
            }
            println!("{} Goal updated", "OK".green());
        }

        GoalAction::Complete { id } => {
            let id = resolve(goal_ids(&book), &id, "goal")?;
            if let Some(done) = book.complete(id)? {
                let category = done.category();
                println!(
                    "{} Completed '{}'. {} is now {}",
                    "OK".green(),
                    done.goal.title,
                    category.bold(),
                    book.rank(category).to_string().yellow().bold()
                );
            }
        }

        GoalAction::Delete { id } => {
            let id = resolve(goal_ids(&book), &id, "goal")?;
            book.delete(id)?;
            println!("{} Goal deleted", "OK".green());
        }

        GoalAction::Category { name } => {
            if book.add_category(&name)? {
                println!("{} Added category {}", "OK".green(), name.trim().bold());
            } else {
                println!("{} Category already exists", "Info:".blue());
            }
        }

        GoalAction::Completed { json } => {
            let grouped = book.completed_by_category();
            if json {
                println!("{}", serde_json::to_string_pretty(&grouped)?);
                return Ok(());
            }

            if grouped.is_empty() {
                println!("{} No completed goals", "Info:".blue());
            }
            for (category, entries) in grouped {
                println!("\n{}", category.cyan().bold());
                println!("{}", "─".repeat(40));
                for entry in entries {
                    println!(
                        "   {}  completed {}  ({})",
                        entry.goal.title,
                        entry.completed_date.format("%Y-%m-%d"),
                        short(entry.id)
                    );
                }
            }
        }

        GoalAction::RemoveCompleted { id } => {
            let ids: Vec<_> = book.completed().iter().map(|c| c.id).collect();
            let id = resolve(ids, &id, "completed goal")?;
            book.remove_completed(id)?;
            println!("{} Removed from completed list", "OK".green());
        }

        GoalAction::Reset {
            category,
            yes,
            confirm,
        } => {
            let count = book.archived_count(&category);
            if !yes {
                println!(
                    "{} This erases {} archived completion(s) in {} and resets its rank to Iron.",
                    "Warning:".yellow(),
                    count,
                    category.bold()
                );
                bail!("Re-run with --yes --confirm {} to proceed", category);
            }
            if confirm.as_deref() != Some(category.as_str()) {
                bail!(
                    "Confirmation does not match, pass --confirm {} exactly",
                    category
                );
            }

            let removed = book.reset_category(&category)?;
            println!(
                "{} Reset {} ({} archived completion(s) removed)",
                "OK".green(),
                category.bold(),
                removed
            );
        }

        GoalAction::Ranks { json } => {
            let ranks: Vec<_> = book
                .categories()
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "category": c,
                        "completed": book.archived_count(c),
                        "rank": book.rank(c).to_string(),
                        "progressToNext": book.progress_to_next(c),
                    })
                })
                .collect();

            if json {
                let out = serde_json::json!({
                    "overall": book.overall_rank().to_string(),
                    "categories": ranks,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("\n{} Ranks", "Goals:".cyan().bold());
            println!("{}", "─".repeat(40));
            for category in book.categories() {
                println!(
                    "   {:<12} {:<14} {:>3} done  {:>3}% to next",
                    category,
                    book.rank(category).to_string().yellow(),
                    book.archived_count(category),
                    (book.progress_to_next(category) * 100.0).round() as u32
                );
            }
            println!(
                "\n   Overall: {}",
                book.overall_rank().to_string().yellow().bold()
            );
        }
    }

    Ok(())
}

fn run_task(action: TaskAction, store: FileStore, config: &TrackerConfig) -> anyhow::Result<()> {
    if let TaskAction::Maintain { json } = action {
        let mut scheduler = TaskScheduler::load(store, SystemClock, config);
        let report = scheduler.maintain()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("\n{} Rollover", "Tasks:".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("   Unchanged: {}", report.unchanged);
            println!("   Rolled:    {}", report.rolled);
            println!("   Escalated: {}", report.escalated);
            println!("   Expired:   {}", report.expired);
        }
        return Ok(());
    }

    let (mut scheduler, _) = TaskScheduler::open(store, SystemClock, config)?;
    let task_ids =
        |s: &TaskScheduler<FileStore>| s.tasks().iter().map(|t| t.id).collect::<Vec<_>>();

    match action {
        TaskAction::Add {
            title,
            date,
            time,
            description,
        } => match scheduler.add(&title, &description, date.and_time(time))? {
            Some(id) => println!(
                "{} Scheduled '{}' for {} {} ({})",
                "OK".green(),
                title.trim(),
                date,
                time.format("%H:%M"),
                short(id)
            ),
            None => bail!("Task title cannot be blank"),
        },

        TaskAction::List { date, all, json } => {
            let mut tasks: Vec<_> = if all {
                scheduler.tasks().iter().collect()
            } else {
                let day = date.unwrap_or_else(|| chrono::Local::now().date_naive());
                scheduler.tasks_on(day)
            };
            tasks.sort_by_key(|t| t.date);

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
                return Ok(());
            }

            if tasks.is_empty() {
                println!("{} No tasks", "Info:".blue());
            }
            for task in tasks {
                let mark = if task.is_completed {
                    "[x]".green()
                } else {
                    "[ ]".normal()
                };
                let rolled = if task.rollover_count > 0 {
                    format!(" (rolled {}x)", task.rollover_count).yellow()
                } else {
                    "".normal()
                };
                println!(
                    "   {} {}  {}{}  ({})",
                    mark,
                    task.date.format("%Y-%m-%d %H:%M"),
                    task.title,
                    rolled,
                    short(task.id)
                );
                if !task.description.is_empty() {
                    println!("         {}", task.description.dimmed());
                }
            }
        }

        TaskAction::Toggle { id } => {
            let id = resolve(task_ids(&scheduler), &id, "task")?;
            scheduler.toggle_completed(id)?;
            let done = scheduler.get(id).is_some_and(|t| t.is_completed);
            println!(
                "{} Marked {}",
                "OK".green(),
                if done { "done" } else { "open" }
            );
        }

        TaskAction::Delete { id } => {
            let id = resolve(task_ids(&scheduler), &id, "task")?;
            scheduler.delete(id)?;
            println!("{} Task deleted", "OK".green());
        }

        TaskAction::Maintain { .. } => {}
    }

    Ok(())
}

fn run_workout(
    action: WorkoutAction,
    store: FileStore,
    config: &TrackerConfig,
) -> anyhow::Result<()> {
    let mut log = WorkoutLog::load(store, SystemClock, config);
    let log_ids = |log: &WorkoutLog<FileStore>| {
        BodyPart::ALL
            .into_iter()
            .flat_map(|p| log.logs_for(p).iter().map(|l| l.id))
            .collect::<Vec<_>>()
    };

    match action {
        WorkoutAction::Add { part, exercise } => match log.add_exercise(part, &exercise)? {
            Some(id) => println!(
                "{} Logging '{}' on {} day ({})",
                "OK".green(),
                exercise.trim(),
                part,
                short(id)
            ),
            None => bail!(
                "'{}' is blank or already logged under {}",
                exercise.trim(),
                part
            ),
        },

        WorkoutAction::List { part, json } => {
            let parts: Vec<BodyPart> = part.map_or_else(|| BodyPart::ALL.to_vec(), |p| vec![p]);

            if json {
                let logs: Vec<_> = parts.iter().flat_map(|p| log.logs_for(*p)).collect();
                println!("{}", serde_json::to_string_pretty(&logs)?);
                return Ok(());
            }

            for part in parts {
                let logs = log.logs_for(part);
                if logs.is_empty() {
                    continue;
                }
                println!("\n{}", part.to_string().cyan().bold());
                println!("{}", "─".repeat(40));
                for entry in logs {
                    println!(
                        "   {}  volume {}  ({})",
                        entry.exercise_name.bold(),
                        entry.volume(),
                        short(entry.id)
                    );
                    for (i, set) in entry.sets.iter().enumerate() {
                        println!("      {}. {} x {}", i + 1, set.weight, set.reps);
                    }
                }
            }
        }

        WorkoutAction::AddSet { id } => {
            let id = resolve(log_ids(&log), &id, "log")?;
            log.add_set(id)?;
            println!("{} Set added", "OK".green());
        }

        WorkoutAction::RemoveSet { id } => {
            let id = resolve(log_ids(&log), &id, "log")?;
            if log.remove_last_set(id)? {
                println!("{} Set removed", "OK".green());
            } else {
                println!("{} No sets to remove", "Info:".blue());
            }
        }

        WorkoutAction::Set {
            id,
            set,
            weight,
            reps,
        } => {
            let id = resolve(log_ids(&log), &id, "log")?;
            let Some(index) = set.checked_sub(1) else {
                bail!("Set numbers start at 1");
            };
            if !log.update_set(id, index, weight, reps)? {
                bail!("Set {} does not exist", set);
            }
            println!("{} Set {}: {} x {}", "OK".green(), set, weight, reps);
        }

        WorkoutAction::Delete { id } => {
            let id = resolve(log_ids(&log), &id, "log")?;
            log.delete(id)?;
            println!("{} Log deleted", "OK".green());
        }
    }

    Ok(())
}
