//! Extract OID symbols from a directory of MIB files.
//!
//! Usage: mibtree --path <DIR> [OPTIONS]
//!
//! Writes `<DIR>.json` (flat table) and `<DIR>-tree.json` (tree).

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use mibtree_core::config::DEFAULT_MODULE_SUFFIX;
use mibtree_core::source::merge_lines;
use mibtree_core::{Extraction, Oid, Options, OrphanPolicy, RootSet, SourceFile, SymbolNode};
use mibtree_std::{cache, read_source_dir, write_outputs, LogTracer};

/// Fingerprint name of the single source a merged run scans.
const MERGED_SOURCE: &str = "\0merged";

#[derive(Parser, Debug)]
#[command(name = "mibtree")]
#[command(about = "Extract OID symbols from MIB files into flat and tree JSON", long_about = None)]
struct Args {
    /// Directory of MIB files
    #[arg(short, long, value_name = "DIR")]
    path: PathBuf,

    /// Fail on malformed clauses and OID values instead of warning
    #[arg(long)]
    strict: bool,

    /// Let later definitions replace earlier ones with the same name
    #[arg(long)]
    allow_duplicates: bool,

    /// What to do with symbols whose parent is unknown
    #[arg(long, value_enum, default_value_t = Orphans::Drop)]
    orphans: Orphans,

    /// Additional root anchor such as `ccitt=0` (repeatable)
    #[arg(long = "root", value_name = "NAME=ARCS")]
    roots: Vec<RootArg>,

    /// Module file suffix used for dependency checks
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_MODULE_SUFFIX)]
    suffix: String,

    /// Module that counts as present without a source file (repeatable)
    #[arg(long = "builtin", value_name = "MODULE")]
    builtins: Vec<String>,

    /// Scan all files as one merged line sequence instead of file by file
    #[arg(long)]
    merged: bool,

    /// Snapshot cache file, reused while sources and options are unchanged
    #[arg(long, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Print the tree to stdout
    #[arg(long)]
    print_tree: bool,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Orphans {
    /// Leave them out of the tree
    Drop,
    /// Fail the run
    Error,
    /// Group them under a synthetic node
    Attach,
}

impl From<Orphans> for OrphanPolicy {
    fn from(value: Orphans) -> Self {
        match value {
            Orphans::Drop => OrphanPolicy::Drop,
            Orphans::Error => OrphanPolicy::Error,
            Orphans::Attach => OrphanPolicy::Attach,
        }
    }
}

/// `NAME=ARCS`, e.g. `ccitt=0` or `private=1.3.6.1.4`.
#[derive(Clone, Debug)]
struct RootArg {
    name: String,
    arcs: Vec<u32>,
}

impl FromStr for RootArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arcs) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=ARCS, got `{s}`"))?;
        let oid = Oid::from_dotted(arcs)
            .filter(|oid| !oid.is_empty())
            .ok_or_else(|| format!("invalid arcs `{arcs}`"))?;
        if name.is_empty() {
            return Err(String::from("root name is empty"));
        }
        Ok(Self {
            name: name.into(),
            arcs: oid.arcs().to_vec(),
        })
    }
}

impl Args {
    fn options(&self) -> Options {
        let mut roots = RootSet::iso();
        for root in &self.roots {
            roots.insert(root.name.clone(), root.arcs.clone());
        }

        let mut options = Options::new()
            .with_orphans(self.orphans.into())
            .with_roots(roots)
            .with_module_suffix(self.suffix.clone());
        if self.strict {
            options = options.strict();
        }
        if self.allow_duplicates {
            options = options.allow_duplicates();
        }
        for module in &self.builtins {
            options = options.with_builtin_module(module.clone());
        }
        options
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = args.options();
    let sources = read_source_dir(&args.path)?;

    let extraction = match &args.cache {
        Some(path) => {
            let fingerprint = if args.merged {
                let merged = SourceFile::from_lines(
                    MERGED_SOURCE,
                    merge_lines(&sources).into_iter().map(String::from).collect(),
                );
                cache::fingerprint_sources(&[merged], &options)?
            } else {
                cache::fingerprint_sources(&sources, &options)?
            };
            if cache::is_cache_valid(path, &fingerprint) {
                log::info!("using cache {}", path.display());
                let table = cache::load_cache_verified(path, &fingerprint)
                    .with_context(|| format!("failed to load cache {}", path.display()))?;
                cache::restore_extraction(table, &options)?
            } else {
                let extraction = extract(&sources, &options, args.merged)?;
                cache::save_cache(&extraction.table, path, Some(fingerprint))
                    .with_context(|| format!("failed to save cache {}", path.display()))?;
                extraction
            }
        }
        None => extract(&sources, &options, args.merged)?,
    };

    let (flat, tree) = write_outputs(&args.path, &extraction, &options.orphan_root_name)?;
    log::info!(
        "{} symbols, {} in the tree; wrote {} and {}",
        extraction.symbols().len(),
        extraction.forest.len(),
        flat.display(),
        tree.display()
    );

    if args.print_tree {
        for node in extraction.tree_nodes(&options.orphan_root_name) {
            print_tree(&node);
        }
    }

    Ok(())
}

fn extract(sources: &[SourceFile], options: &Options, merged: bool) -> anyhow::Result<Extraction> {
    let mut tracer = LogTracer::new();
    let extraction = if merged {
        mibtree_core::resolve_traced(&merge_lines(sources), options, &mut tracer)
    } else {
        mibtree_core::resolve_sources_traced(sources, options, &mut tracer)
    };
    extraction.context("extraction failed")
}

fn print_tree(root: &SymbolNode) {
    root.walk(&mut |node, depth| {
        let indent = "  ".repeat(depth);
        if node.symbol.oid.is_empty() {
            println!("{indent}{}", node.name());
        } else {
            println!("{indent}{} ({})", node.name(), node.symbol.oid);
        }
        true
    });
}
