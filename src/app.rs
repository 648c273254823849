use std::io::{BufRead, Write};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::console::Console;
use crate::error::{Error, Result};
use crate::records::RecordStore;
use crate::session::PracticeSession;
use crate::ui;
use crate::word_list::WordRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MenuChoice {
    #[strum(to_string = "Practice words")]
    Practice,
    #[strum(to_string = "View all records")]
    ViewRecords,
    #[strum(to_string = "Modify words file")]
    ModifyWords,
    #[strum(to_string = "Exit")]
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 4] = [
        MenuChoice::Practice,
        MenuChoice::ViewRecords,
        MenuChoice::ModifyWords,
        MenuChoice::Exit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        pick(&Self::ALL, input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum WordMenuChoice {
    #[strum(to_string = "Add a word")]
    Add,
    #[strum(to_string = "Remove a word")]
    Remove,
    #[strum(to_string = "Show current words")]
    Show,
    #[strum(to_string = "Back to main menu")]
    Back,
}

impl WordMenuChoice {
    pub const ALL: [WordMenuChoice; 4] = [
        WordMenuChoice::Add,
        WordMenuChoice::Remove,
        WordMenuChoice::Show,
        WordMenuChoice::Back,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        pick(&Self::ALL, input)
    }
}

/// Options are chosen by their 1-based number
fn pick<T: Copy>(options: &[T], input: &str) -> Option<T> {
    let n: usize = input.trim().parse().ok()?;
    n.checked_sub(1).and_then(|i| options.get(i)).copied()
}

fn menu_text<T: std::fmt::Display>(title: &str, options: &[T]) -> String {
    let mut text = format!("\n{title}:");
    for (i, option) in options.iter().enumerate() {
        text.push_str(&format!("\n{}. {option}", i + 1));
    }
    text
}

/// Whether the menu loop keeps going after a screen returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Input ended; leave without further output
    Quit,
}

/// Top-level menu over a word list and a record store
pub struct App<L: WordRepository, S: RecordStore> {
    config: Config,
    words: L,
    records: S,
}

impl<L: WordRepository, S: RecordStore> App<L, S> {
    pub fn new(config: Config, words: L, records: S) -> Self {
        Self {
            config,
            words,
            records,
        }
    }

    pub fn records(&self) -> &S {
        &self.records
    }

    pub fn words(&self) -> &L {
        &self.words
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        console.clear()?;

        loop {
            console.say(menu_text("Typing Trainer Menu", &MenuChoice::ALL))?;
            let Some(answer) = console.ask("Choose an option: ")? else {
                return Ok(());
            };

            let flow = match MenuChoice::parse(&answer) {
                Some(MenuChoice::Practice) => self.practice(console)?,
                Some(MenuChoice::ViewRecords) => self.view_records(console)?,
                Some(MenuChoice::ModifyWords) => self.modify_words(console)?,
                Some(MenuChoice::Exit) => {
                    console.say("Goodbye!")?;
                    return Ok(());
                }
                None => {
                    console.say("Invalid option. Please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Current word list, or `None` after telling the user it could not be read
    fn read_words<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Option<Vec<String>>> {
        match self.words.list() {
            Ok(words) => Ok(Some(words)),
            Err(e) => {
                error!(error = %e, "could not read word list");
                console.alert(&format!("Could not read the word list: {e}"))?;
                Ok(None)
            }
        }
    }

    fn practice<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<Flow> {
        let Some(words) = self.read_words(console)? else {
            return Ok(Flow::Continue);
        };
        if words.is_empty() {
            console.say("No words found for practice. Make sure the file is not empty.")?;
            return Ok(Flow::Continue);
        }

        console.say("\nStarting practice session!")?;
        if console
            .ask("Press Enter when you are ready to start...")?
            .is_none()
        {
            return Ok(Flow::Quit);
        }

        let mut session = PracticeSession::new(self.config.repetitions_per_word, &mut self.records)?;
        let summary = match session.run(&words, console) {
            Ok(summary) => summary,
            Err(Error::InputClosed) => {
                info!("input closed during practice");
                return Ok(Flow::Quit);
            }
            Err(e @ Error::Io(_)) => return Err(e),
            Err(e) => {
                warn!(error = %e, "practice session aborted");
                console.alert(&format!("Practice session aborted: {e}"))?;
                return Ok(Flow::Continue);
            }
        };

        console.clear()?;
        console.say("\nFinal Results for this session:")?;
        console.say(ui::results_table(&summary.results))?;
        if !summary.unsaved.is_empty() {
            console.alert(&format!(
                "Records could not be saved for: {}",
                summary.unsaved.join(", ")
            ))?;
        }
        Ok(Flow::Continue)
    }

    fn view_records<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<Flow> {
        match self.records.list_all() {
            Ok(records) => {
                console.say("\nAll Records:")?;
                console.say(ui::records_table(&records))?;
            }
            Err(e) => {
                error!(error = %e, "could not load records");
                console.alert(&format!("Could not load records: {e}"))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn modify_words<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<Flow> {
        loop {
            console.say(menu_text("Words File Menu", &WordMenuChoice::ALL))?;
            let Some(answer) = console.ask("Choose an option: ")? else {
                return Ok(Flow::Quit);
            };

            match WordMenuChoice::parse(&answer) {
                Some(WordMenuChoice::Add) => {
                    let Some(word) = console.ask("Enter the word to add: ")? else {
                        return Ok(Flow::Quit);
                    };
                    match self.words.add(&word) {
                        Ok(word) => console.say(format!("Word '{word}' added."))?,
                        Err(Error::BlankWord) => {}
                        Err(e) => {
                            error!(error = %e, "could not add word");
                            console.alert(&format!("Could not add the word: {e}"))?;
                        }
                    }
                }
                Some(WordMenuChoice::Remove) => {
                    if self.remove_word(console)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                Some(WordMenuChoice::Show) => {
                    let Some(words) = self.read_words(console)? else {
                        continue;
                    };
                    console.say("Current words:")?;
                    for word in words {
                        console.say(word)?;
                    }
                }
                Some(WordMenuChoice::Back) => return Ok(Flow::Continue),
                None => console.say("Invalid option. Please try again.")?,
            }
        }
    }

    fn remove_word<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<Flow> {
        let Some(words) = self.read_words(console)? else {
            return Ok(Flow::Continue);
        };
        console.say("Current words:")?;
        if !words.is_empty() {
            console.say(ui::numbered_words(&words))?;
        }

        let Some(answer) = console.ask("Enter the number of the word to remove: ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(index) = answer.trim().parse::<usize>() else {
            console.say("Please enter a valid number.")?;
            return Ok(Flow::Continue);
        };

        match self.words.remove(index) {
            Ok(word) => console.say(format!("Word '{word}' removed."))?,
            Err(Error::IndexOutOfRange { .. }) => console.say("Invalid choice.")?,
            Err(e) => {
                error!(error = %e, index, "could not remove word");
                console.alert(&format!("Could not remove the word: {e}"))?;
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SqliteRecordStore;
    use crate::word_list::FileWordList;
    use std::fs;
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    type TestApp = App<FileWordList, SqliteRecordStore>;

    fn app_with_words(contents: Option<&str>, repetitions: usize) -> (TempDir, TestApp) {
        let dir = tempdir().unwrap();
        let words_path = dir.path().join("words.txt");
        if let Some(contents) = contents {
            fs::write(&words_path, contents).unwrap();
        }
        let config = Config {
            repetitions_per_word: repetitions,
            words_file: words_path.clone(),
            ..Config::default()
        };
        let app = App::new(
            config,
            FileWordList::new(&words_path),
            SqliteRecordStore::open_in_memory().unwrap(),
        );
        (dir, app)
    }

    fn run(app: &mut TestApp, input: &str) -> String {
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), false);
        app.run(&mut console).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn menu_choices_parse_by_number() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::Practice));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
        assert_eq!(WordMenuChoice::parse("2"), Some(WordMenuChoice::Remove));
        assert_eq!(MenuChoice::Practice.to_string(), "Practice words");
    }

    #[test]
    fn exit_says_goodbye() {
        let (_dir, mut app) = app_with_words(None, 2);
        let out = run(&mut app, "4\n");
        assert!(out.contains("1. Practice words"));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn end_of_input_exits_quietly() {
        let (_dir, mut app) = app_with_words(None, 2);
        let out = run(&mut app, "");
        assert!(!out.contains("Goodbye!"));
    }

    #[test]
    fn invalid_option_reprompts() {
        let (_dir, mut app) = app_with_words(None, 2);
        let out = run(&mut app, "9\n4\n");
        assert!(out.contains("Invalid option. Please try again."));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn practice_without_words_is_refused() {
        let (_dir, mut app) = app_with_words(None, 2);
        let out = run(&mut app, "1\n4\n");
        assert!(out.contains("No words found for practice."));
        assert!(!out.contains("Starting practice session!"));
    }

    #[test]
    fn practice_session_saves_records_and_prints_table() {
        let (_dir, mut app) = app_with_words(Some("cat\n\ndog\n"), 1);
        let out = run(&mut app, "1\n\ncta\ncat\ndog\n2\n4\n");

        assert!(out.contains("INCORRECT! The attempt does not count. Try again."));
        assert!(out.contains("Previous attempt: cta"));
        assert!(out.contains("Final Results for this session:"));
        assert!(out.contains("All Records:"));

        let stored: Vec<String> = app
            .records()
            .list_all()
            .unwrap()
            .into_iter()
            .map(|r| r.word)
            .collect();
        assert_eq!(stored, vec!["cat", "dog"]);
        assert_eq!(app.records().get("cat").unwrap().unwrap().best_accuracy, 100.0);
    }

    #[test]
    fn input_ending_mid_word_keeps_finished_words_only() {
        let (_dir, mut app) = app_with_words(Some("cat\ndog\n"), 1);
        let out = run(&mut app, "1\n\ncat\nd");

        assert!(!out.contains("Final Results"));
        assert!(app.records().get("cat").unwrap().is_some());
        assert!(app.records().get("dog").unwrap().is_none());
    }

    #[test]
    fn add_list_and_remove_words() {
        let (_dir, mut app) = app_with_words(None, 2);
        let out = run(&mut app, "3\n1\n  apple \n1\nbanana\n1\n   \n3\n2\n1\n4\n4\n");

        assert!(out.contains("Word 'apple' added."));
        assert!(out.contains("Word 'banana' added."));
        assert!(out.contains("Current words:\napple\nbanana\n"));
        assert!(out.contains("1. apple\n2. banana"));
        assert!(out.contains("Word 'apple' removed."));
        assert_eq!(app.words().list().unwrap(), vec!["banana"]);
    }

    #[test]
    fn unreadable_word_list_keeps_menus_running() {
        let (dir, mut app) = app_with_words(None, 2);
        fs::create_dir(dir.path().join("words.txt")).unwrap();

        // practice, show, remove, add, then back out and exit
        let out = run(&mut app, "1\n3\n3\n2\n1\nword\n4\n4\n");

        assert_eq!(out.matches("Could not read the word list").count(), 3);
        assert!(out.contains("Could not add the word"));
        assert!(!out.contains("Current words:"));
        assert!(!out.contains("Enter the number of the word to remove"));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn bad_removal_index_is_recoverable() {
        let (_dir, mut app) = app_with_words(Some("only\n"), 2);
        let out = run(&mut app, "3\n2\nabc\n2\n7\n4\n4\n");

        assert!(out.contains("Please enter a valid number."));
        assert!(out.contains("Invalid choice."));
        assert_eq!(app.words().list().unwrap(), vec!["only"]);
    }
}
