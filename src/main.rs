//! NeoCoder - edit source files from the command line.
//!
//! # Usage
//!
//! ```bash
//! neocoder format main.swift --tab-size 2
//! neocoder find main.swift print
//! neocoder replace main.swift foo bar --write
//! neocoder insert index.html --snippet "HTML Template" --offset 0
//! neocoder snippets --category Functions
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::filter::Directive;

use neocoder::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_dir, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use neocoder::editor::{DocumentBuffer, SelectionRange};
use neocoder::language::Language;
use neocoder::perf;
use neocoder::session::{ContentSink, EditorSession, FileId, Message, SourceFile, update};
use neocoder::snippet::{SNIPPETS_FILE_NAME, SnippetLibrary};

/// Search, replace, re-indent and insert snippets into source files
#[derive(Parser, Debug)]
#[command(name = "neocoder", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Spaces per indentation level (2-8)
    #[arg(long, global = true, value_name = "N")]
    tab_size: Option<usize>,

    /// Editor font size in points (10-24)
    #[arg(long, global = true, value_name = "N")]
    font_size: Option<u16>,

    /// Color theme
    #[arg(long, global = true, value_enum)]
    theme: Option<ThemeMode>,

    /// Show a line-number gutter in printed output
    #[arg(long, global = true)]
    line_numbers: bool,

    /// Hide the line-number gutter
    #[arg(long, global = true, conflicts_with = "line_numbers")]
    no_line_numbers: bool,

    /// Keep indentation on new lines
    #[arg(long, global = true)]
    auto_indent: bool,

    /// Do not keep indentation on new lines
    #[arg(long, global = true, conflicts_with = "auto_indent")]
    no_auto_indent: bool,

    /// Soft-wrap long lines
    #[arg(long, global = true)]
    word_wrap: bool,

    /// Do not soft-wrap long lines
    #[arg(long, global = true, conflicts_with = "word_wrap")]
    no_word_wrap: bool,

    /// Log operation timings
    #[arg(long, global = true)]
    perf: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-indent a file by brace depth
    Format {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write the result back to FILE instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// List the lines containing QUERY (case-insensitive)
    Find {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        query: String,
    },
    /// Replace every occurrence of QUERY (case-sensitive)
    Replace {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        query: String,
        replacement: String,
        /// Write the result back to FILE instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Insert a snippet from the library
    Insert {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Snippet title (case-insensitive)
        #[arg(long, value_name = "TITLE")]
        snippet: String,
        /// Character offset to insert at (defaults to the start)
        #[arg(long, value_name = "N")]
        offset: Option<usize>,
        /// Write the result back to FILE instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// List the snippet library
    Snippets {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },
}

/// Writes committed content straight back to the file it came from.
struct DiskSink {
    path: PathBuf,
}

impl ContentSink for DiskSink {
    fn on_content_changed(&mut self, file: FileId, content: &str, _timestamp: SystemTime) {
        match fs::write(&self.path, content) {
            Ok(()) => tracing::debug!(%file, path = %self.path.display(), "wrote file"),
            Err(err) => tracing::warn!(
                %file,
                path = %self.path.display(),
                error = %err,
                "failed to write file"
            ),
        }
    }
}

fn init_logging(perf_enabled: bool) -> Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if perf_enabled {
        filter = filter.add_directive("neocoder::perf=info".parse::<Directive>()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn open_session<S: ContentSink>(path: &Path, sink: S) -> Result<EditorSession<S>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let language = Language::from_path(path).unwrap_or_default();
    let mut session = EditorSession::new(sink);
    session.subscribe(|event| tracing::debug!(?event, "session event"));
    Ok(update(
        session,
        Message::OpenFile(SourceFile {
            id: FileId::new(),
            content,
            language,
        }),
    ))
}

/// Open `path`, apply `messages`, and either print the result or let the
/// session write it back.
fn edit_file(path: &Path, messages: Vec<Message>, write: bool, line_numbers: bool) -> Result<usize> {
    if write {
        let sink = DiskSink {
            path: path.to_path_buf(),
        };
        let session = messages
            .into_iter()
            .fold(open_session(path, sink)?, update);
        return Ok(session.search_results().len());
    }
    let session = messages.into_iter().fold(open_session(path, ())?, update);
    if let Some(buffer) = session.buffer() {
        print_document(buffer, line_numbers);
    }
    Ok(session.search_results().len())
}

fn print_document(buffer: &DocumentBuffer, line_numbers: bool) {
    if !line_numbers {
        println!("{}", buffer.text());
        return;
    }
    let width = buffer.line_count().to_string().len();
    for line in buffer.lines() {
        println!("{:>width$} | {}", line.number, line.text);
    }
}

fn list_snippets(category: Option<&str>) -> Result<()> {
    let library = SnippetLibrary::open(global_config_dir().join(SNIPPETS_FILE_NAME))
        .context("Failed to open snippet library")?;
    for name in library.categories() {
        if category.is_some_and(|wanted| !wanted.eq_ignore_ascii_case(name)) {
            continue;
        }
        println!("{name}");
        for snippet in library.by_category(name) {
            println!("  {} ({})", snippet.title, snippet.language);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    let settings = effective.settings();

    init_logging(effective.perf)?;
    perf::set_enabled(effective.perf);
    tracing::debug!(?settings, "effective settings");

    let Some(command) = cli.command else {
        if !cli.save && !cli.clear {
            Cli::command().print_help()?;
        }
        return Ok(());
    };

    match command {
        Command::Format { file, write } => {
            edit_file(
                &file,
                vec![Message::Format(settings.tab_size)],
                write,
                settings.show_line_numbers,
            )?;
        }
        Command::Find { file, query } => {
            let session = update(open_session(&file, ())?, Message::Find(query));
            for result in session.search_results() {
                println!("{}: {}", result.line_number, result.line_text);
            }
        }
        Command::Replace {
            file,
            query,
            replacement,
            write,
        } => {
            let remaining = edit_file(
                &file,
                vec![Message::ReplaceAll { query, replacement }],
                write,
                settings.show_line_numbers,
            )?;
            eprintln!("{remaining} matching line(s) remain");
        }
        Command::Insert {
            file,
            snippet,
            offset,
            write,
        } => {
            let library = SnippetLibrary::open(global_config_dir().join(SNIPPETS_FILE_NAME))
                .context("Failed to open snippet library")?;
            let Some(snippet) = library.by_title(&snippet).cloned() else {
                anyhow::bail!("Snippet not found: {snippet}");
            };
            let caret = SelectionRange::caret(offset.unwrap_or(0));
            edit_file(
                &file,
                vec![Message::Select(caret), Message::InsertSnippet(snippet)],
                write,
                settings.show_line_numbers,
            )?;
        }
        Command::Snippets { category } => list_snippets(category.as_deref())?,
    }

    Ok(())
}
