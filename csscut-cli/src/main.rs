use anyhow::Result;
use clap::Parser;
use csscut_core::{CssCut, CssCutConfig};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "csscut")]
#[command(about = "Cut unused CSS out of an HTML page and inline what remains")]
struct Args {
    /// Path to the HTML file to process
    #[arg(short, long)]
    input: String,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Path to config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Document root that root-relative stylesheet hrefs resolve against
    #[arg(long, default_value = ".")]
    www_root: String,

    /// Style store directory
    #[arg(long, default_value = "cache")]
    store: String,

    /// Wipe the style store before starting
    #[arg(long)]
    clean_start: bool,

    /// Interpreter launching the precise-pruning tool
    #[arg(long, default_value = "node")]
    tool_command: String,

    /// Script passed to the interpreter
    #[arg(long, default_value = "uncss.js")]
    tool_script: String,

    /// Exit without waiting for the background precise reduction
    #[arg(long)]
    no_refine: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !Path::new(&args.input).exists() {
        println!("⚠️  Input HTML not found at: {}", args.input);
        println!("   Please check the file path.");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => CssCutConfig::load_from_file(path)?,
        None => CssCutConfig {
            www_root: args.www_root.clone(),
            store_path: args.store.clone(),
            clean_on_start: args.clean_start,
            tool_command: args.tool_command.clone(),
            tool_script: args.tool_script.clone(),
            ..CssCutConfig::default()
        },
    };

    let service = CssCut::open(config)?;

    let html = fs::read_to_string(&args.input)?;
    let rewritten = service.cut_and_inject(&html)?;

    if args.no_refine {
        // Leave the queued refinement behind; the next run starts fresh
        drop(service);
    } else {
        service.shutdown();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, rewritten)?;
            println!("💾 Wrote inlined page to {}", path);
        }
        None => print!("{}", rewritten),
    }

    Ok(())
}
