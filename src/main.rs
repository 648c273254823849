use clap::{error::ErrorKind, CommandFactory, Parser};
use std::{error::Error, fs::OpenOptions, path::PathBuf, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wordrill::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    console::Console,
    records::SqliteRecordStore,
    word_list::FileWordList,
};

/// drill the words you keep mistyping
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice a list of troublesome words until you type each one correctly several times in a row, with per-word timing, accuracy and all-time best records."
)]
pub struct Cli {
    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// word list file, one word per line
    #[clap(short = 'w', long)]
    words_file: Option<PathBuf>,

    /// SQLite file holding best records
    #[clap(short = 'r', long)]
    records: Option<PathBuf>,

    /// correct repetitions required per word
    #[clap(short = 'n', long)]
    repetitions: Option<usize>,

    /// write the effective settings back to the config file before starting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Apply command line overrides on top of the stored config
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(path) = &self.words_file {
            config.words_file = path.clone();
        }
        if let Some(path) = &self.records {
            config.records_file = path.clone();
        }
        if let Some(n) = self.repetitions {
            config.repetitions_per_word = n;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// Log to a file; the terminal belongs to the practice prompts.
fn init_logging() {
    let Some(log_path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = cli.config_store();
    let config = cli.merge_into(store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    info!(?config, "starting");

    let mut console = Console::stdio();
    if cli.save_config {
        match store.save(&config) {
            Ok(()) => info!(path = %store.path().display(), "saved config"),
            Err(e) => {
                error!(path = %store.path().display(), error = %e, "could not save config");
                console.alert(&format!(
                    "Could not save settings to {}: {e}",
                    store.path().display()
                ))?;
            }
        }
    }
    let records = match SqliteRecordStore::open(&config.records_file) {
        Ok(store) => store,
        Err(e) => {
            warn!(path = %config.records_file.display(), error = %e, "falling back to in-memory records");
            console.alert(&format!(
                "Could not open {}: {e}. Records from this run will not be kept.",
                config.records_file.display()
            ))?;
            SqliteRecordStore::open_in_memory()?
        }
    };
    let words = FileWordList::new(&config.words_file);

    let mut app = App::new(config, words, records);
    app.run(&mut console)?;

    Ok(())
}
