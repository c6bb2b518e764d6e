use std::fmt;

use practice_core::model::{QuestionId, TimerThreshold};
use services::AppServices;
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::vm::{
    FilterControlsVm, OptionFeedback, QuestionPanelVm, StopwatchTicker, describe_filter,
    map_filter_controls, map_goal, map_question_panel, map_timer_pill,
    parse_goal_input, source_changed, strip_html_tags, subject_changed, topic_changed,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Answer(usize),
    ToggleSolution,
    Subject(String),
    Topic(String),
    Source(String),
    ClearFilter,
    Goal(String),
    Timer(String),
    Filters,
    Status,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandError {
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidOption(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => write!(f, "unknown command: {word} (try `help`)"),
            CommandError::MissingArgument { command } => write!(f, "{command} requires a value"),
            CommandError::InvalidOption(raw) => {
                write!(f, "invalid option {raw:?}: use a letter (A, B, ...) or a number")
            }
        }
    }
}

impl Command {
    fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let value = |command: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument { command })
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "show" => Ok(Self::Show),
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "a" | "answer" => parse_option(&value("answer")?).map(Self::Answer),
            "s" | "solution" => Ok(Self::ToggleSolution),
            "subject" => value("subject").map(Self::Subject),
            "topic" => value("topic").map(Self::Topic),
            "source" => value("source").map(Self::Source),
            "clear" => Ok(Self::ClearFilter),
            "goal" => value("goal").map(Self::Goal),
            "timer" => value("timer").map(Self::Timer),
            "filters" => Ok(Self::Filters),
            "status" => Ok(Self::Status),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// `B` or `2` both mean the second option.
fn parse_option(raw: &str) -> Result<usize, CommandError> {
    let invalid = || CommandError::InvalidOption(raw.to_string());
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Ok(usize::from(letter.to_ascii_uppercase() as u8 - b'A'))
        }
        _ => raw
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .ok_or_else(invalid),
    }
}

/// Line-oriented practice loop over stdin.
pub struct Driver {
    services: AppServices,
    threshold: TimerThreshold,
    ticker: Option<StopwatchTicker>,
    shown: Option<QuestionId>,
}

impl Driver {
    #[must_use]
    pub fn new(services: AppServices) -> Self {
        let threshold = services.timer_settings().load();
        Self {
            services,
            threshold,
            ticker: None,
            shown: None,
        }
    }

    /// Run until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if stdin cannot be read.
    pub async fn run(mut self) -> std::io::Result<()> {
        if !self.track_question() {
            self.services.session_mut().start_stopwatch();
        }
        self.sync_ticker();
        self.print_question();
        println!("Type `help` for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command),
                Err(err) => println!("{err}"),
            }
            self.track_question();
            self.sync_ticker();
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) {
        let session = self.services.session_mut();
        match command {
            Command::Next => {
                session.go_to_next();
                self.print_question();
            }
            Command::Previous => {
                session.go_to_previous();
                self.print_question();
            }
            Command::Answer(option) => {
                let in_range = session
                    .current_question()
                    .is_some_and(|question| option < question.option_count());
                if in_range {
                    session.answer(option);
                    self.print_question();
                } else {
                    println!("No such option.");
                }
            }
            Command::ToggleSolution => {
                session.toggle_solution_visibility();
                self.print_question();
            }
            Command::Subject(value) => {
                session.set_filter(subject_changed(&value));
                self.print_question();
            }
            Command::Topic(value) => {
                if session.filter().subject.is_none() {
                    println!("Pick a subject first.");
                    return;
                }
                session.set_filter(topic_changed(&value));
                self.print_question();
            }
            Command::Source(value) => {
                session.set_filter(source_changed(&value));
                self.print_question();
            }
            Command::ClearFilter => {
                session.clear_filter();
                self.print_question();
            }
            Command::Goal(raw) => match parse_goal_input(&raw) {
                Ok(goal) => {
                    session.set_daily_goal(goal);
                    self.print_status();
                }
                Err(err) => println!("{err}"),
            },
            Command::Timer(raw) => match self.services.timer_settings().save_input(&raw) {
                Ok(threshold) => {
                    self.threshold = threshold;
                    println!("Time per question: {}", threshold.format_mm_ss());
                }
                Err(err) => println!("{err}"),
            },
            Command::Filters => print_filters(&map_filter_controls(self.services.session())),
            Command::Status => self.print_status(),
            Command::Show => self.print_question(),
            Command::Help => print_help(),
            Command::Quit => {}
        }
    }

    /// Restart the stopwatch when a different question is on screen, however
    /// it got there. Returns whether the shown question changed.
    fn track_question(&mut self) -> bool {
        let current = self
            .services
            .session()
            .current_question()
            .map(|question| question.id.clone());
        if current == self.shown {
            return false;
        }
        self.shown = current;
        if self.shown.is_some() {
            self.services.session_mut().restart_stopwatch();
        }
        true
    }

    fn sync_ticker(&mut self) {
        let Some(anchor) = self.services.session().stopwatch_started_at() else {
            return;
        };
        match self.ticker.as_mut() {
            Some(ticker) => ticker.restart(anchor),
            None => {
                self.ticker = Some(StopwatchTicker::spawn(
                    self.services.session().clock(),
                    anchor,
                ));
            }
        }
    }

    fn print_question(&self) {
        let card = match map_question_panel(self.services.session()) {
            QuestionPanelVm::Empty { title, hint } => {
                println!("\n{title}\n{hint}");
                return;
            }
            QuestionPanelVm::Card(card) => card,
        };

        println!(
            "\n[{}] {} / {} / {}",
            card.position_label, card.subject, card.topic, card.source
        );
        println!("{}", plain(&card.prompt_html));
        for option in &card.options {
            let mark = match option.feedback {
                OptionFeedback::Correct => "+",
                OptionFeedback::Incorrect => "x",
                OptionFeedback::Neutral if option.selected => ">",
                OptionFeedback::Neutral => " ",
            };
            println!(" {mark} {}. {}", option.label, plain(&option.html));
        }
        if let Some(solution) = &card.solution_html {
            println!("Solution:\n{}", plain(solution));
        }

        let mut hints = Vec::new();
        if card.can_go_previous {
            hints.push("prev");
        }
        if card.can_go_next {
            hints.push("next");
        }
        if let Some(label) = card.solution_toggle_label {
            hints.push(label);
        }
        if !hints.is_empty() {
            println!("({})", hints.join(", "));
        }
    }

    fn print_status(&self) {
        let session = self.services.session();
        let goal = map_goal(session);
        println!(
            "Daily goal: {} ({}%){}",
            goal.progress_label,
            goal.percent,
            if goal.is_met { " done!" } else { "" }
        );
        println!("Filter: {}", describe_filter(session.filter()));
        if let Some(ticker) = &self.ticker {
            let pill = map_timer_pill(ticker.elapsed_millis(), self.threshold);
            println!(
                "Time: {} of {} ({:?}{})",
                pill.stopwatch_label,
                pill.threshold_label,
                pill.indicator,
                if pill.pulse { ", over time" } else { "" }
            );
        }
    }
}

fn plain(html: &str) -> String {
    strip_html_tags(html).trim().to_string()
}

fn print_filters(controls: &FilterControlsVm) {
    for select in [&controls.subject, &controls.topic, &controls.source] {
        let choices: Vec<&str> = select.choices.iter().map(|c| c.value.as_str()).collect();
        println!(
            "{}: {}{} [{}]",
            select.label,
            select.value,
            if select.disabled { " (pick a subject first)" } else { "" },
            choices.join(", ")
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  next | n, prev | p         move through the filtered questions");
    println!("  answer <A|1> | a <A|1>     pick an option (reveals the solution)");
    println!("  solution | s               show or hide the solution");
    println!("  subject|topic|source <v>   filter; `all` removes the constraint");
    println!("  clear                      remove every filter");
    println!("  filters                    list filter choices");
    println!("  goal <n>                   set the daily goal");
    println!("  timer <mm:ss>              set the time per question");
    println!("  status                     goal progress, filter and timer");
    println!("  show                       print the current question again");
    println!("  quit | q");
}
