use pressmark::render::{docx_abstract_numbers, docx_nums, docx_relationships, odt_automatic_styles};
use pressmark::{JobState, PipelineError, RenderOptions, Schema, render_html};
use std::env;
use std::fs;

/// Compiles an HTML file and prints the fragment and its definitions.
fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Compiles rich-text HTML into document markup.");
        eprintln!();
        eprintln!(
            "Usage: {} <odt|docx> <path/to/file.html> [path/to/options.json]",
            args.first().map(String::as_str).unwrap_or("pressmark")
        );
        std::process::exit(1);
    }

    let schema = Schema::from_extension(&args[1])
        .ok_or_else(|| PipelineError::Arguments(format!("unknown schema '{}'", args[1])))?;
    let mut options = match args.get(3) {
        Some(path) => RenderOptions::from_json(&fs::read_to_string(path)?)?,
        None => RenderOptions::default(),
    };
    options.schema = schema;

    let html = fs::read_to_string(&args[2])?;
    let mut job = JobState::new(options.job_config());
    let fragment = render_html(&html, &mut job, None).build(&job);

    println!("{fragment}");
    match schema {
        Schema::Odt => {
            let styles = odt_automatic_styles(&job);
            if !styles.is_empty() {
                println!();
                println!("{styles}");
            }
        }
        Schema::Docx => {
            let numbering = format!("{}{}", docx_abstract_numbers(&job), docx_nums(&job));
            if !numbering.is_empty() {
                println!();
                println!("{numbering}");
            }
            let relationships = docx_relationships(&job);
            if !relationships.is_empty() {
                println!();
                println!("{relationships}");
            }
        }
    }
    Ok(())
}
