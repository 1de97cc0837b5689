use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use aimlstore_core::{DocumentMeta, RuleStore, SetMode};

use aimlstore::{load_rules, records_json, records_table};

#[derive(Parser)]
#[command(name = "aimlstore")]
#[command(about = "Inspect and edit AIML-family rule files")]
struct Args {
    /// Path to an existing rule file to load
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Rules file (YAML or JSON list of pattern/response pairs).
    /// Alone: build a new document. With --input: replace the loaded
    /// records, or reconcile with --merge.
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Merge rules into the loaded document by pattern instead of
    /// replacing every record
    #[arg(long)]
    merge: bool,

    /// Delete the record at this 0-based index before printing/saving
    #[arg(long)]
    delete_index: Option<usize>,

    /// Output format: table, json, or fragment
    #[arg(short, long, default_value = "table")]
    format: String,

    /// Destination path to save. With --input and mutations but no
    /// destination, the input file is written back in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Author recorded when building a new document
    #[arg(long)]
    author: Option<String>,

    /// Language recorded when building a new document
    #[arg(long)]
    language: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut meta = DocumentMeta::default();
    if let Some(author) = &args.author {
        meta.author = author.clone();
    }
    if let Some(language) = &args.language {
        meta.language = language.clone();
    }

    let rules = match &args.rules {
        Some(path) => Some(load_rules(path)?),
        None => None,
    };

    let mut mutated = false;
    let mut store = match (&args.input, rules) {
        (Some(input), None) => {
            println!("📄 Loading {}...", input.display());
            RuleStore::open(input)?
        }
        (Some(input), Some(rules)) => {
            println!("📄 Loading {}...", input.display());
            let mut store = RuleStore::open(input)?;
            let mode = if args.merge {
                SetMode::MergeByPattern
            } else {
                SetMode::Overwrite
            };
            store.set_records(&rules, mode)?;
            mutated = true;
            store
        }
        (None, Some(rules)) => {
            println!("📄 Building a new document from {} rules", rules.len());
            mutated = true;
            RuleStore::from_records(&rules, meta)
        }
        (None, None) => bail!("nothing to do: provide --input and/or --rules"),
    };

    if let Some(index) = args.delete_index {
        store.delete_record(index)?;
        mutated = true;
    }

    let records = store.as_record_list()?;
    println!("{} rules loaded:", records.len());
    match args.format.as_str() {
        "table" => print!("{}", records_table(&records)),
        "json" => println!("{}", records_json(&records)?),
        "fragment" => println!("{}", store.to_text()?),
        other => {
            println!("⚠️  Unknown output format '{other}', using table");
            print!("{}", records_table(&records));
        }
    }

    if let Some(output) = &args.output {
        store.save(Some(output.as_path()))?;
        println!("💾 Saved to: {}", output.display());
    } else if mutated && args.input.is_some() {
        store.save(None)?;
        if let Some(path) = store.path() {
            println!("💾 Saved to: {}", path.display());
        }
    } else if mutated {
        println!("⚠️  Changes not saved — pass --output <path> to write them");
    }

    Ok(())
}
