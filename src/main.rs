//! gitapro - Reveal a fresh Bhagavad Gita verse from your terminal
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use anyhow::{Result, anyhow, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use gitapro::worker::{RevealCommand, RevealEvent, spawn_worker};
use gitapro::{Config, Database, GitaClient, Lesson, RevealStore, Verse, VerseRevealService, auth};

/// Column width for wrapped verse text
const WRAP_WIDTH: usize = 78;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Reveal { save } => reveal_cli(save).await,
        Command::Progress => progress_cli(),
        Command::Check { verse_number } => check_cli(&verse_number),
        Command::Mark { verse_number } => mark_cli(verse_number).await,
        Command::Lessons => list_lessons(),
        Command::DeleteLesson { id } => delete_lesson(id),
        Command::Auth { api_key } => store_key(api_key.as_deref()),
        Command::Reset { confirmed } => reset_cli(confirmed).await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            println!("gitapro {}", gitapro::VERSION);
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Reveal { save: bool },
    Progress,
    Check { verse_number: String },
    Mark { verse_number: String },
    Lessons,
    DeleteLesson { id: Uuid },
    Auth { api_key: Option<String> },
    Reset { confirmed: bool },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();
    let has_flag = |flag: &str| args.iter().skip(2).any(|a| a == flag);

    let Some(command) = args.get(1) else {
        return Ok(Command::Reveal { save: false });
    };

    match command.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "reveal" => Ok(Command::Reveal {
            save: has_flag("--save") || has_flag("-s"),
        }),

        "progress" | "profile" => Ok(Command::Progress),

        "check" => {
            let verse_number = args
                .get(2)
                .ok_or_else(|| anyhow!("Missing verse number (e.g. 2.47)"))?
                .clone();
            Ok(Command::Check { verse_number })
        }

        "mark" => {
            let verse_number = args
                .get(2)
                .ok_or_else(|| anyhow!("Missing verse number (e.g. 2.47)"))?;
            if !is_verse_number(verse_number) {
                bail!("Invalid verse number: {verse_number} (expected <chapter>.<verse>)");
            }
            Ok(Command::Mark {
                verse_number: verse_number.clone(),
            })
        }

        "lessons" => match args.get(2).map(String::as_str) {
            None => Ok(Command::Lessons),
            Some("delete" | "rm") => {
                let id = args
                    .get(3)
                    .ok_or_else(|| anyhow!("Missing lesson id"))?;
                let id = Uuid::parse_str(id).map_err(|_| anyhow!("Invalid lesson id: {id}"))?;
                Ok(Command::DeleteLesson { id })
            }
            Some(other) => Err(anyhow!("Unknown lessons command: {other}")),
        },

        "auth" => Ok(Command::Auth {
            api_key: args.get(2).cloned(),
        }),

        "reset" => Ok(Command::Reset {
            confirmed: has_flag("--yes") || has_flag("-y"),
        }),

        other => Err(anyhow!(
            "Unknown command: {other}\nRun 'gitapro --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"📖 gitapro - Reveal a fresh Bhagavad Gita verse

USAGE:
    gitapro                            Reveal a verse
    gitapro [COMMAND]

COMMANDS:
    reveal [--save]                    Reveal a verse you haven't seen
      Options:
        -s, --save                     Keep the verse as a lesson

    progress                           Show how many verses you've revealed
    check <verse>                      Check whether a verse was revealed (e.g. 2.47)
    mark <verse>                       Count a verse you read elsewhere as revealed

    lessons                            List saved lessons
    lessons delete <id>                Delete a saved lesson

    auth [api-key]                     Store the RapidAPI key (omit to remove it)
    reset --yes                        Forget every revealed verse

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

ENVIRONMENT:
    {}                    Overrides the stored API key
    RUST_LOG                           Log level (e.g. debug)

CONFIG:
    {}
"#,
        auth::API_KEY_ENV,
        config_path
    );
}

fn open_service(api_key: &str) -> Result<VerseRevealService<GitaClient, Database>> {
    let config = Config::load()?;
    let client = GitaClient::from_config(&config, api_key);
    VerseRevealService::from_config(client, Database::open()?, &config)
}

async fn reveal_cli(save: bool) -> Result<()> {
    let api_key = auth::get_api_key()?.ok_or_else(|| {
        anyhow!(
            "No API key configured.\nRun: gitapro auth <key>  (or set {})",
            auth::API_KEY_ENV
        )
    })?;

    let mut handle = spawn_worker(open_service(&api_key)?);
    handle.cmd_tx.send(RevealCommand::Reveal).await?;
    handle.cmd_tx.send(RevealCommand::Shutdown).await?;

    while let Some(event) = handle.event_rx.recv().await {
        match event {
            RevealEvent::Status { message } => eprintln!("{message}"),
            RevealEvent::Revealed { verse, progress } => {
                print_verse(&verse);
                println!("\n📖 {progress} verses revealed");

                if save {
                    let lesson = Database::open()?.save_lesson(&Lesson::from_verse(&verse))?;
                    println!("✓ Saved as lesson {}", lesson.id);
                }
            }
            RevealEvent::Failed { message } => {
                bail!("{message}\nRun 'gitapro reveal' to try again");
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_verse(verse: &Verse) {
    println!("{}", verse.title());
    println!("{}", "─".repeat(WRAP_WIDTH.min(60)));
    println!("\n{}", verse.sanskrit_text);
    println!("\n{}", textwrap::fill(&verse.transliteration, WRAP_WIDTH));
    println!("\n{}", textwrap::fill(&verse.translation, WRAP_WIDTH));

    if !verse.word_meanings.is_empty() {
        println!("\nWord Meanings:");
        println!("{}", textwrap::fill(&verse.word_meanings, WRAP_WIDTH));
    }
}

fn progress_cli() -> Result<()> {
    let service = open_service(&auth::get_api_key_or_warn().unwrap_or_default())?;
    let progress = service.progress();

    let filled = (progress.fraction() * 30.0).round() as usize;
    println!("Progress");
    println!("[{}{}]", "█".repeat(filled), "░".repeat(30 - filled));
    println!(
        "{} out of {} verses revealed",
        progress.revealed, progress.total
    );

    Ok(())
}

fn check_cli(verse_number: &str) -> Result<()> {
    let service = open_service(&auth::get_api_key_or_warn().unwrap_or_default())?;

    if service.is_revealed(verse_number) {
        println!("✓ Verse {verse_number} has been revealed");
    } else {
        println!("Verse {verse_number} has not been revealed yet");
    }

    Ok(())
}

/// `<chapter>.<verse>` with a chapter in 1..=18
fn is_verse_number(value: &str) -> bool {
    value.split_once('.').is_some_and(|(chapter, verse)| {
        matches!(chapter.parse::<u32>(), Ok(1..=18)) && matches!(verse.parse::<u32>(), Ok(1..))
    })
}

async fn mark_cli(verse_number: String) -> Result<()> {
    let api_key = auth::get_api_key_or_warn().unwrap_or_default();
    let mut handle = spawn_worker(open_service(&api_key)?);
    handle
        .cmd_tx
        .send(RevealCommand::Mark { verse_number })
        .await?;
    handle.cmd_tx.send(RevealCommand::Shutdown).await?;

    while let Some(event) = handle.event_rx.recv().await {
        match event {
            RevealEvent::Marked {
                verse_number,
                newly_revealed: true,
                progress,
            } => println!("✓ Verse {verse_number} marked as revealed ({progress})"),
            RevealEvent::Marked { verse_number, .. } => {
                println!("Verse {verse_number} was already revealed");
            }
            RevealEvent::Failed { message } => bail!(message),
            _ => {}
        }
    }

    Ok(())
}

fn list_lessons() -> Result<()> {
    let db = Database::open()?;
    let lessons = db.get_lessons()?;

    if lessons.is_empty() {
        println!("No saved lessons yet.");
        println!("\nSave one with:");
        println!("  gitapro reveal --save");
        return Ok(());
    }

    println!("Saved Lessons\n");

    for lesson in lessons {
        println!(
            "  {} · {}\n    {}",
            lesson.title,
            lesson.display_date().format("%b %-d, %Y"),
            lesson.id
        );
        let preview = textwrap::wrap(&lesson.translation, WRAP_WIDTH - 4);
        for line in preview.iter().take(2) {
            println!("    {line}");
        }
        println!();
    }

    Ok(())
}

fn delete_lesson(id: Uuid) -> Result<()> {
    let db = Database::open()?;

    if db.delete_lesson(id)? {
        println!("✓ Lesson deleted");
        Ok(())
    } else {
        Err(anyhow!("No lesson with id {id}"))
    }
}

fn store_key(api_key: Option<&str>) -> Result<()> {
    match api_key {
        Some(key) if !key.trim().is_empty() => {
            auth::store_api_key(key)?;
            println!("✓ API key saved");
        }
        _ => {
            auth::delete_api_key()?;
            println!("✓ API key removed");
        }
    }
    Ok(())
}

async fn reset_cli(confirmed: bool) -> Result<()> {
    if !confirmed {
        let revealed = Database::open()?.load_revealed()?.len();
        println!("This forgets all {revealed} revealed verses.");
        println!("Run 'gitapro reset --yes' to continue.");
        return Ok(());
    }

    let api_key = auth::get_api_key_or_warn().unwrap_or_default();
    let mut handle = spawn_worker(open_service(&api_key)?);
    handle.cmd_tx.send(RevealCommand::Reset).await?;
    handle.cmd_tx.send(RevealCommand::Shutdown).await?;

    while let Some(event) = handle.event_rx.recv().await {
        match event {
            RevealEvent::Reset => println!("✓ Revealed verses cleared"),
            RevealEvent::Failed { message } => bail!(message),
            _ => {}
        }
    }

    Ok(())
}
