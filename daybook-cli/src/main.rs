use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use daybook_core::{
    DateKey, FileStorage, Filter, Priority, TaskStore, compute_stats, filter_tasks,
    normalize_title,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod state;

use config::{Config, load_config};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DAYBOOK_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "daybook", version = VERSION, about = "Daily task list")]
struct Cli {
    /// Day to work on (YYYY-MM-DD, default: today)
    #[arg(long, global = true)]
    date: Option<DateKey>,

    /// Use the day after --date
    #[arg(long, global = true, conflicts_with = "prev")]
    next: bool,

    /// Use the day before --date
    #[arg(long, global = true)]
    prev: bool,

    /// Override the data directory from config.toml
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task to the day
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        #[arg(long, short, default_value = "medium")]
        priority: Priority,
    },

    /// Show the day's tasks (default command)
    List {
        /// all, open or done (default from config.toml)
        #[arg(long, short)]
        filter: Option<Filter>,
    },

    /// Mark a task done, or open again
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id or unique prefix
        id: String,
    },

    /// Change a task's title and/or priority
    Edit {
        /// Task id or unique prefix
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        priority: Option<Priority>,
    },

    /// Counts for the day
    Stats,

    /// Days that have tasks
    Dates,

    /// Manage ~/.daybook/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = load_config()?;
    init_logging(&cfg);

    let date = selected_date(&cli);
    let data_dir = cfg.data_dir(cli.data_dir)?;
    let open = || {
        tracing::debug!("data dir: {}", data_dir.display());
        let mut store = TaskStore::open(FileStorage::new(data_dir.clone()));
        store.select_date(date);
        store
    };

    match cli.command.unwrap_or(Command::List { filter: None }) {
        Command::List { filter } => list(&open(), filter.unwrap_or(cfg.view.default_filter)),
        Command::Add { title, priority } => add(&mut open(), &title.join(" "), priority)?,
        Command::Toggle { id } => toggle(&mut open(), &id)?,
        Command::Rm { id } => remove(&mut open(), &id)?,
        Command::Edit { id, title, priority } => edit(&mut open(), &id, title, priority)?,
        Command::Stats => {
            let store = open();
            println!("{}", render::header(date, compute_stats(store.get_tasks(date))));
        }
        Command::Dates => dates(&open()),
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_env("DAYBOOK_LOG")
        .or_else(|_| EnvFilter::try_new(&cfg.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn selected_date(cli: &Cli) -> DateKey {
    let base = cli.date.unwrap_or_else(DateKey::today);
    if cli.next {
        base.succ()
    } else if cli.prev {
        base.pred()
    } else {
        base
    }
}

type Store = TaskStore<FileStorage>;

fn list(store: &Store, filter: Filter) {
    let date = store.selected_date();
    let tasks = store.get_tasks(date);
    println!("{}\n", render::header(date, compute_stats(tasks)));
    let shown = filter_tasks(tasks, filter);
    println!("{}", render::table(&shown, filter).trim_end());
}

fn add(store: &mut Store, title: &str, priority: Priority) -> Result<()> {
    let date = store.selected_date();
    let Some(task) = store.add_task(date, title, priority) else {
        bail!("task title must not be blank");
    };
    println!("Added {} to {}: {}", render::short_id(&task.id), date, task.title);
    Ok(())
}

fn toggle(store: &mut Store, needle: &str) -> Result<()> {
    let date = store.selected_date();
    let id = render::resolve_id(store.get_tasks(date), needle)?;
    store.toggle_task(date, &id);
    if let Some(t) = store.find_task(date, &id) {
        let state = if t.done { "done" } else { "open" };
        println!("{} is now {}: {}", render::short_id(&id), state, t.title);
    }
    Ok(())
}

fn remove(store: &mut Store, needle: &str) -> Result<()> {
    let date = store.selected_date();
    let id = render::resolve_id(store.get_tasks(date), needle)?;
    store.remove_task(date, &id);
    println!("Removed {}", render::short_id(&id));
    Ok(())
}

fn edit(
    store: &mut Store,
    needle: &str,
    title: Option<String>,
    priority: Option<Priority>,
) -> Result<()> {
    if title.is_none() && priority.is_none() {
        bail!("nothing to change (pass --title and/or --priority)");
    }
    if let Some(t) = &title {
        if normalize_title(t).is_none() {
            bail!("task title must not be blank");
        }
    }

    let date = store.selected_date();
    let id = render::resolve_id(store.get_tasks(date), needle)?;
    if let Some(t) = title {
        store.update_task_title(date, &id, &t);
    }
    if let Some(p) = priority {
        store.update_task_priority(date, &id, p);
    }
    if let Some(t) = store.find_task(date, &id) {
        println!("{}  [{}]  {}", render::short_id(&id), t.priority.label(), t.title);
    }
    Ok(())
}

fn dates(store: &Store) {
    let days = store.dates();
    if days.is_empty() {
        println!("No tasks yet.");
        return;
    }
    for d in days {
        let stats = compute_stats(store.get_tasks(d));
        println!("{d}  {:>3} total  {:>3} open", stats.total, stats.open);
    }
}
