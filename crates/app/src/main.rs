use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use reader_core::WordFocus;
use reader_core::model::{ChapterId, TextSegment, Word};
use services::{
    AiLookupConfig, AppServices, Face, RandomShuffler, ReadingService, ReviewSession,
    ReviewState, ReviewView,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hanzi-reader")]
#[command(about = "Read Chinese chapters, look up words and review the hard ones", long_about = None)]
struct Cli {
    /// SQLite database holding difficult words
    #[arg(long = "db", env = "READER_DB_URL", default_value = "sqlite://reader.sqlite3")]
    db_url: String,

    /// JSON chapter catalog
    #[arg(long, env = "READER_CHAPTERS", default_value = "data/chapters.json")]
    chapters: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List chapters
    Chapters,
    /// Print a chapter with its interactive and difficult words highlighted
    Read { chapter: ChapterId },
    /// Look a word up and mark it difficult
    Lookup { chapter: ChapterId, word: String },
    /// Remove a word from the difficult list
    Unmark { chapter: ChapterId, word: String },
    /// Review the chapter's difficult words as flashcards
    Review {
        chapter: ChapterId,
        /// Fixed shuffle seed for a reproducible card order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Forget every difficult word of a chapter
    Reset { chapter: ChapterId },
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

async fn list_chapters(reading: &ReadingService) -> anyhow::Result<()> {
    for id in reading.chapter_ids().await? {
        let chapter = reading.chapter(id).await?;
        let marked = reading.difficult_words(id).await?;
        println!(
            "{:>4}  {}  ({} marked)",
            id.value(),
            chapter.title(),
            marked.len()
        );
    }
    Ok(())
}

async fn read_chapter(reading: &ReadingService, id: ChapterId) -> anyhow::Result<()> {
    let view = reading.open_chapter(id).await?;
    println!("# {}\n", view.chapter.title());

    let mut text = String::new();
    for segment in &view.segments {
        match segment {
            TextSegment::Word(word) => {
                text.push('[');
                text.push_str(word.as_str());
                text.push(']');
                if view.is_difficult(word) {
                    text.push('*');
                }
            }
            other => text.push_str(other.as_text()),
        }
    }
    println!("{text}\n");

    let (previous, next) = reading.neighbours(id).await?;
    let show = |id: Option<ChapterId>| id.map_or_else(|| "-".to_string(), |id| id.to_string());
    println!("previous: {}  next: {}", show(previous), show(next));
    Ok(())
}

async fn lookup(reading: &ReadingService, chapter: ChapterId, raw: &str) -> anyhow::Result<()> {
    let word = Word::new(raw.trim());
    let mut focus = WordFocus::default();
    focus.begin(word.clone());

    let detail = reading.lookup_word(chapter, &word).await?;
    if focus.complete(&word, detail) {
        if let Some(detail) = focus.detail_for(&word) {
            println!("{word}  {}  {}", detail.pinyin, detail.translation);
        }
    }
    Ok(())
}

fn render(view: &ReviewView) {
    match &view.state {
        ReviewState::Presenting { card, face } => {
            println!(
                "\nround {}  card {}/{}  mastered {}/{} ({:.0}%)",
                view.round,
                view.position,
                view.round_len,
                view.mastered,
                view.total,
                view.progress() * 100.0
            );
            println!("  {}", card.character());
            if *face == Face::Up {
                println!("  {}", card.pinyin());
                println!("  {}", card.translations().join("; "));
                println!("knew it? [y/n]");
            } else {
                println!("[enter] flip  [r] restart  [q] quit");
            }
        }
        ReviewState::Complete => {
            println!("\nall {} words mastered. [r] restart  [q] quit", view.total);
        }
        ReviewState::Empty => println!("nothing to review"),
        ReviewState::Finished => {}
    }
}

async fn review(session: &mut ReviewSession) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    render(&session.view());

    loop {
        if session.view().state == ReviewState::Empty {
            break;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let view = match (line.trim(), session.view().face()) {
            ("q", _) => break,
            ("r", _) => session.restart(),
            ("", Some(_)) => session.flip(),
            ("y", Some(Face::Up)) => session.judge(true),
            ("n", Some(Face::Up)) => session.judge(false),
            _ => {
                println!("?");
                continue;
            }
        };
        match view {
            Ok(view) => render(&view),
            Err(err) => println!("{err}"),
        }
    }

    let summary = session.finish()?;
    println!(
        "mastered {}/{} in {} round(s), {} answer(s)",
        summary.mastered, summary.total, summary.rounds, summary.judgments
    );
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;

    let services = AppServices::new_sqlite(&db_url, &cli.chapters, AiLookupConfig::from_env())
        .await
        .with_context(|| format!("starting with {} and {db_url}", cli.chapters.display()))?;
    let reading = services.reading();

    match cli.command {
        Command::Chapters => list_chapters(&reading).await,
        Command::Read { chapter } => read_chapter(&reading, chapter).await,
        Command::Lookup { chapter, word } => lookup(&reading, chapter, &word).await,
        Command::Unmark { chapter, word } => {
            if !reading.unmark_word(chapter, &Word::new(word.trim())).await? {
                println!("{word} was not marked");
            }
            Ok(())
        }
        Command::Review { chapter, seed } => {
            let mut session = match seed {
                Some(seed) => {
                    reading
                        .start_review_with(chapter, RandomShuffler::seeded(seed))
                        .await?
                }
                None => reading.start_review(chapter).await?,
            };
            review(&mut session).await
        }
        Command::Reset { chapter } => {
            reading.reset_chapter(chapter).await?;
            println!("chapter {chapter} reset");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_absolute_urls_are_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/reader.sqlite3"),
            "sqlite:///tmp/reader.sqlite3"
        );
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:/var/lib/reader.db");
        assert_eq!(url, "sqlite:///var/lib/reader.db");

        let relative = normalize_sqlite_url("reader.db");
        assert!(relative.starts_with("sqlite://"));
        assert!(relative.ends_with("reader.db"));
    }

    #[test]
    fn prepare_rejects_non_file_urls() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }

    #[test]
    fn cli_parses_review_with_seed() {
        let cli = Cli::try_parse_from(["hanzi-reader", "--db", "sqlite::memory:", "review", "3", "--seed", "7"])
            .unwrap();
        assert_eq!(cli.db_url, "sqlite::memory:");
        match cli.command {
            Command::Review { chapter, seed } => {
                assert_eq!(chapter, ChapterId::new(3));
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
