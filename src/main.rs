use clap::Parser;
use form_paths::cli::commands::{cmd_decode, cmd_manifest, cmd_resolve, format_manifest, format_resolve};
use form_paths::cli::config::{Cli, Commands, load_config};
use form_paths::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > defaults
    let trace_path = cli.trace.as_deref().or(config.trace.path.as_deref());
    let tracer = TraceLogger::open(trace_path);

    match cli.command {
        Commands::Resolve {
            model,
            placeholder,
            namespace,
            nest,
            field,
            value,
            format,
        } => {
            let namespace = namespace.as_deref().or(config.form.namespace.as_deref());
            let format = format.as_deref().unwrap_or(&config.output.format);
            let output = cmd_resolve(
                &model,
                placeholder,
                namespace,
                &nest,
                &field,
                value.as_deref(),
                cli.verbose,
            )?;
            print!("{}", format_resolve(&output, format)?);
        }
        Commands::Manifest {
            input,
            namespace,
            format,
            output,
        } => {
            let namespace = namespace.as_deref().or(config.form.namespace.as_deref());
            let format = format.as_deref().unwrap_or(&config.output.format);
            let manifest = cmd_manifest(
                &input,
                namespace,
                &config.form.error_class,
                &tracer,
                cli.verbose,
            )?;
            let content = format_manifest(&manifest, format)?;
            match output {
                Some(path) => std::fs::write(path, &content)?,
                None => print!("{}", content),
            }
        }
        Commands::Decode { pairs } => {
            print!("{}", cmd_decode(&pairs)?);
        }
    }

    Ok(())
}
