use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser};
use eqinv_core::core_api::{Engine, QuestProgress, RecipeBook, SearchQuery, Session};
use eqinv_core::location::Category;
use eqinv_render::{
    JsonStyle, TextRenderOptions, render_character_summary_text, render_characters_text,
    render_component_report_text, render_duplicates_text, render_json_character_summary,
    render_json_characters, render_json_component_report, render_json_duplicates,
    render_json_overview, render_json_quest_progress, render_json_search,
    render_load_report_text, render_overview_text, render_quest_progress_text,
    render_search_text,
};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

const DEFAULT_DUPLICATE_MIN: &str = "2";

#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("mode")
        .args([
            "search",
            "duplicates",
            "summary",
            "characters",
            "zeb",
            "quest",
            "signet",
            "recipes",
        ])
        .multiple(false)
))]
#[command(group(ArgGroup::new("components").args(["zeb", "quest"])))]
struct Cli {
    /// Directory holding the *-Inventory.txt exports.
    #[arg(value_name = "DIR", env = "EQINV_DATA_DIR", default_value = ".")]
    dir: PathBuf,
    /// Item name to search for; `a|b` matches either.
    #[arg(long, value_name = "TERM")]
    search: Option<String>,
    #[arg(long, value_name = "NAME", requires = "search")]
    character: Option<String>,
    #[arg(
        long = "type",
        value_name = "equipped|inventory|bank|other",
        requires = "search",
        value_parser = parse_category
    )]
    category: Option<Category>,
    #[arg(long, requires = "search")]
    exact: bool,
    /// List items held in at least MIN places.
    #[arg(
        long,
        value_name = "MIN",
        num_args = 0..=1,
        default_missing_value = DEFAULT_DUPLICATE_MIN
    )]
    duplicates: Option<usize>,
    #[arg(long, value_name = "CHARACTER")]
    summary: Option<String>,
    #[arg(long)]
    characters: bool,
    /// Check the Zeb weapon components.
    #[arg(long)]
    zeb: bool,
    /// Check where every component of one Signet of Might quest is held.
    #[arg(long, value_name = "KEY")]
    quest: Option<String>,
    /// Count augments socketed into worn gear.
    #[arg(long = "include-equipped", requires = "components")]
    include_equipped: bool,
    /// Check progress through the Signet of Might quests.
    #[arg(long)]
    signet: bool,
    /// Check progress for every quest in a JSON manifest.
    #[arg(long, value_name = "FILE.json")]
    recipes: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum Mode {
    Overview,
    Search(SearchQuery),
    Duplicates(usize),
    Summary(String),
    Characters,
    Zeb { include_equipped: bool },
    QuestComponents { key: String, include_equipped: bool },
    Signet,
    Recipes(PathBuf),
}

impl Mode {
    fn from_cli(cli: &Cli) -> Self {
        if let Some(term) = &cli.search {
            let mut query = SearchQuery::new(term.clone()).exact(cli.exact);
            if let Some(owner) = &cli.character {
                query = query.owner(owner.clone());
            }
            if let Some(category) = cli.category {
                query = query.category(category);
            }
            return Self::Search(query);
        }
        if let Some(min) = cli.duplicates {
            return Self::Duplicates(min);
        }
        if let Some(owner) = &cli.summary {
            return Self::Summary(owner.clone());
        }
        if cli.characters {
            return Self::Characters;
        }
        if cli.zeb {
            return Self::Zeb {
                include_equipped: cli.include_equipped,
            };
        }
        if let Some(key) = &cli.quest {
            return Self::QuestComponents {
                key: key.clone(),
                include_equipped: cli.include_equipped,
            };
        }
        if cli.signet {
            return Self::Signet;
        }
        if let Some(path) = &cli.recipes {
            return Self::Recipes(path.clone());
        }
        Self::Overview
    }
}

enum Output {
    Text(String),
    Json(JsonValue),
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>()
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mode = Mode::from_cli(&cli);
    let session = Engine::new().load_directory(&cli.dir).unwrap_or_else(|e| {
        eprintln!("Error loading inventories from {}: {e}", cli.dir.display());
        process::exit(1);
    });

    let options = TextRenderOptions {
        verbose: cli.verbose,
    };
    let output = run(&session, mode, cli.json, options).unwrap_or_else(|message| {
        eprintln!("{message}");
        process::exit(1);
    });

    match output {
        Output::Text(text) => print!("{text}"),
        Output::Json(value) => {
            let rendered = serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
            println!("{rendered}");
        }
    }
}

fn run(
    session: &Session,
    mode: Mode,
    json: bool,
    options: TextRenderOptions,
) -> Result<Output, String> {
    let style = JsonStyle::CanonicalV1;
    let output = match mode {
        Mode::Overview => {
            let overview = session.overview();
            let characters = session.character_overview();
            if json {
                Output::Json(render_json_overview(
                    &overview,
                    &characters,
                    session.report(),
                    style,
                ))
            } else {
                let mut text = render_overview_text(&overview, &characters);
                let notes = render_load_report_text(session.report());
                if !notes.is_empty() {
                    text.push('\n');
                    text.push_str(&notes);
                }
                Output::Text(text)
            }
        }
        Mode::Search(query) => {
            let results = session.search(&query);
            if json {
                Output::Json(render_json_search(&results, style))
            } else {
                Output::Text(render_search_text(&results, options))
            }
        }
        Mode::Duplicates(min) => {
            let groups = session.find_duplicates(min);
            if json {
                Output::Json(render_json_duplicates(&groups, min, style))
            } else {
                Output::Text(render_duplicates_text(&groups, min))
            }
        }
        Mode::Summary(owner) => {
            let summary = session
                .character_summary(&owner)
                .map_err(|e| format!("Error: {}", e.message))?;
            if json {
                Output::Json(render_json_character_summary(&summary, style))
            } else {
                Output::Text(render_character_summary_text(&summary))
            }
        }
        Mode::Characters => {
            let characters = session.character_overview();
            if json {
                Output::Json(render_json_characters(&characters, style))
            } else {
                Output::Text(render_characters_text(&characters))
            }
        }
        Mode::Zeb { include_equipped } => {
            let report = session.zeb_weapon(include_equipped);
            if json {
                Output::Json(render_json_component_report(&report, style))
            } else {
                Output::Text(render_component_report_text(
                    "Zeb Weapon Components",
                    &report,
                    options,
                ))
            }
        }
        Mode::QuestComponents {
            key,
            include_equipped,
        } => {
            let book = RecipeBook::signet_of_might();
            let quest = book
                .get(&key)
                .ok_or_else(|| format!("Error: no Signet of Might quest with key {key:?}"))?;
            let report = session.quest_components(quest, include_equipped);
            if json {
                Output::Json(render_json_component_report(&report, style))
            } else {
                Output::Text(render_component_report_text(
                    &format!("{key}. {} Components", quest.name),
                    &report,
                    options,
                ))
            }
        }
        Mode::Signet => quest_output(session, &RecipeBook::signet_of_might(), json, options),
        Mode::Recipes(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
            let book = RecipeBook::from_json_str(&text)
                .map_err(|e| format!("Error in {}: {}", path.display(), e.message))?;
            quest_output(session, &book, json, options)
        }
    };
    Ok(output)
}

fn quest_output(
    session: &Session,
    book: &RecipeBook,
    json: bool,
    options: TextRenderOptions,
) -> Output {
    let progress: Vec<(String, QuestProgress)> = book
        .quests()
        .map(|(key, quest)| (key.to_string(), session.quest_progress(quest)))
        .collect();
    if json {
        Output::Json(render_json_quest_progress(&progress, JsonStyle::CanonicalV1))
    } else {
        Output::Text(render_quest_progress_text(&progress, options))
    }
}
