//! admission-scaffold entry point.
//! Parses command-line flags into descriptors and writes the generated
//! webhook sources below the output directory.

use admission_scaffold::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::Scaffold,
    renderer::MiniJinjaRenderer,
    sink::FileSystemSink,
    template::TemplateUnit,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Builds resource and webhook descriptors from the flags
/// 2. Loads the project context
/// 3. Selects the template units for the admission type
/// 4. Renders them, then writes or lists the generated files
fn run(args: Args) -> Result<()> {
    let resource = args.resource()?;
    let webhook = args.webhook()?;
    let project = args.project()?;

    let renderer = MiniJinjaRenderer::new();
    let scaffold = Scaffold::new(&renderer);
    let units = TemplateUnit::for_webhook(&webhook);

    if args.dry_run {
        for file in scaffold.run(&resource, &webhook, &project, &units)? {
            println!("{}: '{}'", file.unit, file.path);
        }
        return Ok(());
    }

    let sink = FileSystemSink::new(&args.output_dir, args.force);
    for (path, outcome) in scaffold.run_into(&resource, &webhook, &project, &units, &sink)? {
        println!("{outcome}: '{}'", sink.root().join(path).display());
    }

    println!(
        "Webhook scaffolding completed successfully in {}.",
        args.output_dir.display()
    );
    Ok(())
}
