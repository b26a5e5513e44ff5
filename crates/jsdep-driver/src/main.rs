use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jsdep_driver::{
    build, clean, manifests, processor_for, report, resolve, BuildConfig, CompilerCommand,
    Result, DEFAULT_REMOTE_SYMBOL,
};
use jsdep_files::{DEFAULT_COMPILED_SUFFIX, DEFAULT_MANIFEST_SUFFIX};
use jsdep_resolver::{DependencySet, SourceFile};

#[derive(Parser)]
#[command(
    name = "jsdep",
    version,
    about = "Annotation-driven dependency resolver for JavaScript sources",
    long_about = "Resolves @require/@root/@nocompile/@remote annotations into ordered\npackages, writes per-package manifests and drives the compile step."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suffix marking compiled output (foo.js -> foo.<suffix>.js)
    #[arg(long, env = "JSDEP_COMPILED_SUFFIX", default_value = DEFAULT_COMPILED_SUFFIX, global = true)]
    compiled_suffix: String,

    /// Suffix marking manifests (foo.js -> foo.js.<suffix>)
    #[arg(long, env = "JSDEP_MANIFEST_SUFFIX", default_value = DEFAULT_MANIFEST_SUFFIX, global = true)]
    manifest_suffix: String,

    /// Folder that @remote paths are resolved against
    #[arg(long, env = "JSDEP_REMOTE_FOLDER", global = true)]
    remote_folder: Option<PathBuf>,

    /// Prefix used for remote paths in manifests
    #[arg(long, env = "JSDEP_REMOTE_SYMBOL", default_value = DEFAULT_REMOTE_SYMBOL, global = true)]
    remote_symbol: String,

    /// Compiler program run once per package (default: concatenate sources)
    #[arg(long, env = "JSDEP_COMPILER", global = true)]
    compiler: Option<PathBuf>,

    /// Argument passed to the compiler before the input files (repeatable)
    #[arg(long = "compiler-arg", allow_hyphen_values = true, global = true)]
    compiler_args: Vec<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an entry file and print its packages
    Resolve {
        /// Entry script
        input: PathBuf,

        /// Also list every visited file
        #[arg(short, long)]
        files: bool,
    },

    /// Print the manifest generated for each package
    Manifest {
        /// Entry script
        input: PathBuf,
    },

    /// Compile every package and write compiled files and manifests
    Build {
        /// Entry script
        input: PathBuf,
    },

    /// List script sources under a directory
    List {
        /// Directory to search
        dir: PathBuf,

        /// List compiled files and manifests instead
        #[arg(short, long)]
        artifacts: bool,
    },

    /// Remove compiled files and manifests under a directory
    Clean {
        /// Directory to clean
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn config(cli: &Cli) -> Result<BuildConfig> {
    let mut config = BuildConfig::new(&cli.compiled_suffix, &cli.manifest_suffix)?;
    if let Some(folder) = &cli.remote_folder {
        config = config.with_remote(folder, &cli.remote_symbol)?;
    }
    if let Some(program) = &cli.compiler {
        config = config
            .with_compiler(CompilerCommand::new(program).with_args(cli.compiler_args.iter().cloned()));
    }
    debug!(?config, "configuration");
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = config(cli)?;

    match &cli.command {
        Commands::Resolve { input, files } => resolve_command(&config, input, *files),
        Commands::Manifest { input } => manifest_command(&config, input),
        Commands::Build { input } => build_command(&config, input),
        Commands::List { dir, artifacts } => list_command(&config, dir, *artifacts),
        Commands::Clean { dir } => clean_command(&config, dir),
    }
}

fn resolve_command(config: &BuildConfig, input: &Path, files: bool) -> Result<()> {
    let resolved = resolve(config, input)?;

    for (index, set) in resolved.collection.iter().enumerate() {
        print_set(index, set);
    }

    if files {
        println!("files:");
        for file in &resolved.files {
            print_file(file);
        }
    }
    Ok(())
}

fn print_set(index: usize, set: &DependencySet) {
    println!("[{}] {}", index, set.root().display());
    print_section("dependencies", set.dependency_paths());
    print_section("stylesheets", set.stylesheets().iter().map(PathBuf::as_path));
    print_section("packages", set.packages().iter().map(PathBuf::as_path));
    print_section(
        "no-compile",
        set.paths_marked_no_compile().iter().map(PathBuf::as_path),
    );
}

fn print_section<'a>(title: &str, paths: impl Iterator<Item = &'a Path>) {
    let mut paths = paths.peekable();
    if paths.peek().is_none() {
        return;
    }
    println!("  {}:", title);
    for path in paths {
        println!("    {}", path.display());
    }
}

fn print_file(file: &SourceFile) {
    let mut flags = Vec::new();
    if file.is_root() {
        flags.push("root".to_string());
    }
    if file.is_no_compile() {
        flags.push("nocompile".to_string());
    }
    if let Some(remote) = file.remote_path() {
        flags.push(format!("remote {}", remote.display()));
    }

    if flags.is_empty() {
        println!("  {}", file.path().display());
    } else {
        println!("  {} ({})", file.path().display(), flags.join(", "));
    }
    println!(
        "    requires {} scripts, {} stylesheets, {} packages, {} no-compile",
        file.script_count(),
        file.stylesheets().count(),
        file.packages().count(),
        file.no_compile_paths().count()
    );
}

fn manifest_command(config: &BuildConfig, input: &Path) -> Result<()> {
    let (collection, manifests) = manifests(config, input)?;
    let generator = config.manifest_generator();

    for (set, manifest) in collection.iter().zip(manifests) {
        match manifest {
            Some(contents) => {
                println!("# {}", generator.manifest_name(set).display());
                print!("{}", contents);
            }
            None => println!("# {} (no manifest)", set.root().display()),
        }
    }
    Ok(())
}

fn build_command(config: &BuildConfig, input: &Path) -> Result<()> {
    let processor = processor_for(config);
    let artifacts = build(config, input, processor.as_ref())?;

    for artifact in &artifacts {
        println!("{}", artifact.compiled.display());
        if let Some(manifest) = &artifact.manifest {
            println!("{}", manifest.display());
        }
    }
    Ok(())
}

fn list_command(config: &BuildConfig, dir: &Path, artifacts: bool) -> Result<()> {
    let finder = config.finder();
    let found = if artifacts {
        finder.find_artifact_files(dir)?
    } else {
        finder.find_source_files(dir)?
    };

    for path in found {
        println!("{}", path.display());
    }
    Ok(())
}

fn clean_command(config: &BuildConfig, dir: &Path) -> Result<()> {
    for path in clean(config, dir)? {
        println!("removed {}", path.display());
    }
    Ok(())
}
