use crate::commands::{
    Edit, create_child, create_floating, create_sibling, create_standalone, delete_and_relayout,
    navigate, paint, relayout, split_into_mindmap,
};
use crate::config::{Settings, load_settings};
use crate::headings::MarkdownHeadings;
use crate::ids::RandomIds;
use crate::ir::{Graph, LayoutDirection, Rect, Selection, Side};
use crate::layout::build_forest;
use crate::render::{render_svg, write_output_svg};
use crate::theme::Theme;
use crate::tree_dump::write_tree_dump;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "cmm", version, about = "Mind-map editing for JSON canvas files")]
pub struct Args {
    /// Input canvas file or '-' for stdin
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<PathBuf>,

    /// Settings file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Selected node id; repeat for multi-selection
    #[arg(short = 's', long = "select", global = true)]
    pub select: Vec<String>,

    /// Overrides the configured layout direction (LR, RL, TB, BT)
    #[arg(short = 'l', long = "layout", global = true, value_parser = parse_direction)]
    pub layout: Option<LayoutDirection>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a child to the selected node
    Child,
    /// Add a sibling after the selected node
    Sibling,
    /// Add an unconnected node next to the selection
    Float {
        #[arg(short = 'd', long = "direction", value_parser = parse_side)]
        direction: Side,
    },
    /// Add a blank node at the canvas origin
    Node,
    /// Print the id of the nearest node in a direction
    Navigate {
        #[arg(short = 'd', long = "direction", value_parser = parse_side)]
        direction: Side,
        /// Only consider nodes inside x,y,width,height
        #[arg(long = "viewport", value_parser = parse_viewport)]
        viewport: Option<Rect>,
    },
    /// Delete the selected node and re-stack its siblings
    Delete,
    /// Split a markdown file node into one node per heading
    Split {
        /// Directory that file node paths are relative to
        #[arg(long = "vault", default_value = ".")]
        vault: PathBuf,
    },
    /// Print the mind-map forest as JSON
    Tree,
    /// Re-stack the selected subtree, or every tree without a selection
    Relayout,
    /// Set the colour of the selected nodes and their outgoing edges
    Paint {
        /// Preset "1"-"6" or hex; omit to clear
        #[arg(long = "color")]
        color: Option<String>,
    },
    /// Render a static preview
    Render {
        #[arg(short = 'e', long = "format", value_enum, default_value = "svg")]
        format: OutputFormat,
        #[arg(long = "dark")]
        dark: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(direction) = args.layout {
        settings.layout.direction = direction;
    }
    let graph = read_graph(args.input.as_deref())?;
    let selection: Selection = args.select.iter().cloned().collect();
    execute(&args.command, &graph, &selection, &settings, args.output.as_deref())
}

fn execute(
    command: &Command,
    graph: &Graph,
    selection: &Selection,
    settings: &Settings,
    output: Option<&Path>,
) -> Result<()> {
    let mut ids = RandomIds;
    let edit = match command {
        Command::Child => create_child(graph, selection, settings, &mut ids)?,
        Command::Sibling => create_sibling(graph, selection, settings, &mut ids)?,
        Command::Float { direction } => {
            create_floating(graph, selection, *direction, settings, &mut ids)?
        }
        Command::Node => Some(create_standalone(graph, settings, &mut ids)?),
        Command::Delete => delete_and_relayout(graph, selection, settings)?,
        Command::Split { vault } => {
            let provider = MarkdownHeadings::new(vault);
            split_into_mindmap(graph, selection, &provider, settings, &mut ids)?
        }
        Command::Relayout => relayout(graph, selection, settings),
        Command::Paint { color } => paint(graph, selection, color.as_deref())?,
        Command::Navigate {
            direction,
            viewport,
        } => {
            let target = navigate(graph, selection, *direction, viewport.as_ref(), settings)
                .context("No node found in that direction")?;
            println!("{}", target);
            return Ok(());
        }
        Command::Tree => {
            let direction = settings.layout.direction;
            let forest = build_forest(graph, direction);
            return write_tree_dump(output, &forest, graph, direction);
        }
        Command::Render { format, dark } => {
            let theme = if *dark { Theme::dark() } else { Theme::light() };
            let svg = render_svg(graph, &theme);
            return match format {
                OutputFormat::Svg => write_output_svg(&svg, output),
                OutputFormat::Png => write_png(&svg, output, &theme),
            };
        }
    };
    write_edit(graph, edit, output)
}

fn write_edit(graph: &Graph, edit: Option<Edit>, output: Option<&Path>) -> Result<()> {
    let (next, focus) = match edit {
        Some(edit) => (edit.graph, edit.focus),
        None => {
            eprintln!("nothing to do; canvas left unchanged");
            (graph.clone(), None)
        }
    };
    if let Some(focus) = focus {
        eprintln!("focus: {}", focus);
    }
    let json = next.to_json_pretty()?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, theme: &Theme) -> Result<()> {
    let output = output.context("Output path required for png output")?;
    crate::render::write_output_png(svg, output, theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn read_graph(path: Option<&Path>) -> Result<Graph> {
    let input = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_graph(&input)
}

fn parse_graph(input: &str) -> Result<Graph> {
    if input.trim().is_empty() {
        return Ok(Graph::new());
    }
    Graph::from_json(input).context("Input is not a valid canvas document")
}

fn parse_side(value: &str) -> std::result::Result<Side, String> {
    Side::from_token(value).ok_or_else(|| format!("unknown direction '{}'", value))
}

fn parse_direction(value: &str) -> std::result::Result<LayoutDirection, String> {
    LayoutDirection::from_token(value).ok_or_else(|| format!("unknown layout direction '{}'", value))
}

fn parse_viewport(value: &str) -> std::result::Result<Rect, String> {
    let parts: Vec<f32> = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|err| format!("invalid viewport '{}': {}", value, err))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
        _ => Err(format!("viewport needs x,y,width,height, got '{}'", value)),
    }
}
