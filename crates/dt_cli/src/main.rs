use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dt_ast::Options;
use dt_desugar::transform_file;
use dt_parser::parse_markup;

#[derive(Parser)]
#[command(name = "detag", about = "detag — desugar inline tag elements to factory calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite tag elements in a file and emit plain ECMAScript.
    Transform {
        /// Input file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Options file (JSON, camelCase keys). Flags override its values.
        #[arg(long)]
        options: Option<PathBuf>,
        /// Factory identifier for element construction, e.g. `DOM`.
        #[arg(long)]
        factory: Option<String>,
        /// Merge-helper used for spread attributes (default: Object.assign).
        #[arg(long)]
        spread_fn: Option<String>,
        /// Call-target template for unknown tags; `{tag}` is substituted.
        #[arg(long)]
        unknown_tag_pattern: Option<String>,
        /// Pass unknown tags to the factory instead of calling them.
        #[arg(long)]
        pass_unknown_tags: bool,
        /// With --pass-unknown-tags, quote the tag name.
        #[arg(long)]
        unknown_tags_as_string: bool,
        /// Emit children as trailing arguments instead of one array.
        #[arg(long)]
        no_array_children: bool,
        /// Rename an attribute key, e.g. --rename-attr class=className.
        /// May be repeated.
        #[arg(long = "rename-attr", value_name = "FROM=TO")]
        rename_attrs: Vec<String>,
    },
    /// Parse the file and report any syntax errors.
    Check { input: PathBuf },
    /// Parse and dump the AST.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of the debug representation.
        #[arg(long)]
        ast: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            output,
            options,
            factory,
            spread_fn,
            unknown_tag_pattern,
            pass_unknown_tags,
            unknown_tags_as_string,
            no_array_children,
            rename_attrs,
        } => {
            let mut opts = match &options {
                Some(path) => {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    serde_json::from_str::<Options>(&text)
                        .with_context(|| format!("invalid options file {}", path.display()))?
                }
                None => Options::default(),
            };

            if factory.is_some() {
                opts.factory = factory;
            }
            if spread_fn.is_some() {
                opts.spread_fn = spread_fn;
            }
            if unknown_tag_pattern.is_some() {
                opts.unknown_tag_pattern = unknown_tag_pattern;
            }
            if pass_unknown_tags {
                opts.pass_unknown_tags_to_factory = true;
            }
            if unknown_tags_as_string {
                opts.unknown_tags_as_string = true;
            }
            if no_array_children {
                opts.array_children = Some(false);
            }
            if !rename_attrs.is_empty() {
                let mut map = opts.rename_attrs.take().unwrap_or_default();
                map.extend(parse_rename_attrs(&rename_attrs)?);
                opts.rename_attrs = Some(map);
            }

            let rewritten = transform_file(&input, &opts)
                .with_context(|| format!("failed to transform {}", input.display()))?;

            match &output {
                Some(path) => std::fs::write(path, &rewritten)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{rewritten}"),
            }
        }
        Commands::Check { input } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();
            parse_markup(&source, &filename)?;
            eprintln!("OK: {filename}");
        }
        Commands::Parse { input, ast } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();
            let parsed = parse_markup(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.module);
            }
        }
    }

    Ok(())
}

fn parse_rename_attrs(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => {
                map.insert(from.to_string(), to.to_string());
            }
            _ => bail!("invalid --rename-attr value `{pair}`, expected FROM=TO"),
        }
    }
    Ok(map)
}
