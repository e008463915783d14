use caption_pack::{backgrounds, captions, config, imaging, output, run};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Values that override `caption-pack.toml` for this invocation.
#[derive(clap::Args, Clone)]
struct Overrides {
    /// Caption spreadsheet (.ods, .xlsx, .xls)
    #[arg(long, global = true)]
    captions: Option<PathBuf>,

    /// Sheet holding the captions
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Folder of background images
    #[arg(long, global = true)]
    backgrounds: Option<PathBuf>,

    /// Output root for pack folders
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// TrueType/OpenType font file
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Number of full passes over the caption sheet
    #[arg(long, global = true)]
    repeat: Option<usize>,

    /// Seed for reproducible background choices
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    seed: Option<u64>,
}

impl Overrides {
    /// The command-line config layer, shaped like `caption-pack.toml`.
    fn to_toml(&self) -> toml::Value {
        let mut root = toml::Table::new();
        let mut input = toml::Table::new();
        let mut output = toml::Table::new();
        let mut random = toml::Table::new();

        let path = |p: &PathBuf| toml::Value::String(p.to_string_lossy().into_owned());
        if let Some(p) = &self.captions {
            input.insert("captions".into(), path(p));
        }
        if let Some(sheet) = &self.sheet {
            input.insert("sheet".into(), toml::Value::String(sheet.clone()));
        }
        if let Some(p) = &self.backgrounds {
            input.insert("backgrounds".into(), path(p));
        }
        if let Some(p) = &self.font {
            input.insert("font".into(), path(p));
        }
        if let Some(p) = &self.output {
            output.insert("root".into(), path(p));
        }
        if let Some(repeat) = self.repeat {
            root.insert("repeat_count".into(), toml::Value::Integer(repeat as i64));
        }
        if let Some(seed) = self.seed {
            // Bounded to i64::MAX by the argument parser, as TOML integers are signed.
            random.insert("seed".into(), toml::Value::Integer(seed as i64));
        }

        for (name, table) in [("input", input), ("output", output), ("random", random)] {
            if !table.is_empty() {
                root.insert(name.into(), toml::Value::Table(table));
            }
        }
        toml::Value::Table(root)
    }
}

#[derive(Parser)]
#[command(name = "caption-pack")]
#[command(about = "Render spreadsheet captions onto random backgrounds, one folder per post")]
#[command(long_about = "\
Render spreadsheet captions onto random backgrounds, one folder per post

Each spreadsheet row is a post and each cell one caption. Every caption is
wrapped, centered and drawn with an outline onto a background picked at
random, never reusing a background within the same post folder.

Layout:

  captions.ods                     # Sheet1: rows = posts, cells = captions
  backgrounds/                     # Flat folder of background images
  ├── beach.png
  └── city.png
  font.ttf
  output/
  ├── post_1_repeat_1/
  │   ├── 1.png                    # Caption 1 of row 1
  │   └── 2.png
  ├── post_1_repeat_2/             # Same captions, fresh backgrounds
  └── manifest.json                # What went where

Settings come from caption-pack.toml (optional); flags override it.
Run 'caption-pack gen-config' to generate a documented caption-pack.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file [default: caption-pack.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every caption pack
    Run,
    /// Load captions, backgrounds and font, and show what a run would produce
    Check,
    /// Print a stock caption-pack.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run => {
            let config = config::load_config(cli.config.as_deref(), Some(cli.overrides.to_toml()))?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                let mut printer = output::ProgressPrinter::new(std::io::stdout());
                for event in rx {
                    // A closed stdout does not stop the run.
                    printer.print(&event).ok();
                }
            });
            let result = run::run(&config, Some(tx));
            printer.join().unwrap();
            let summary = result?;
            println!();
            output::print_run_summary(&summary);
        }
        Command::Check => {
            let config = config::load_config(cli.config.as_deref(), Some(cli.overrides.to_toml()))?;
            println!("==> Checking {}", config.input.captions.display());
            let table = captions::load_captions(&config.input.captions, &config.input.sheet)?;
            let pool =
                backgrounds::scan_backgrounds(&config.input.backgrounds, &config.input.extensions)?;
            imaging::TrueTypeFont::load(&config.input.font, config.render.font_size)?;
            output::print_check_output(&table, &pool, &config);
            if pool.is_empty() {
                return Err(run::RunError::NoBackgrounds(pool.dir().to_path_buf()).into());
            }
            println!("==> Inputs are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
