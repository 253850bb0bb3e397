//! versa - Render a USFM file as JSON, HTML and verse text

use std::process::ExitCode;

use clap::Parser;

use versa::render::html::{HtmlOutput, html_actions};
use versa::render::verses::{VerseOutput, verse_actions};
use versa::{DocumentProvider, Error, Library, Metadata, RenderConfig, Renderer};

const USAGE: &str = "USAGE: versa <usfm>";

// Exactly one positional path and no options: anything that looks like a
// flag is passed through as an argument.
#[derive(Parser)]
#[command(name = "versa")]
#[command(about = "Render a USFM file", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// USFM file to load
    #[arg(
        value_name = "USFM",
        num_args = 0..,
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    args: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli.args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Error> {
    let [path] = args else {
        return Err(Error::Usage(format!(
            "Expected exactly 1 argument, not {}\n{USAGE}",
            args.len()
        )));
    };

    let mut library = Library::new();
    let doc_id = library.import_usfm_file(Metadata::new("xxx", "yyy"), path)?;

    // Verse text of chapter 2, then the tokenized blocks of 2:3-6
    for query in ["cvIndex(chapter: 2)", r#"blocks(withScriptureCV: "2:3-6")"#] {
        let result = library.query(query)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    let config = RenderConfig::default();

    let mut html = HtmlOutput::default();
    Renderer::new(&library, html_actions()).render_document(&doc_id, &config, &mut html)?;
    println!("{:#?}", html.paras);

    let mut verses = VerseOutput::default();
    Renderer::new(&library, verse_actions()).render_document(&doc_id, &config, &mut verses)?;
    println!("{}", verses.lines().join("\n"));

    Ok(())
}
