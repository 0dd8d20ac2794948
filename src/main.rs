use clap::Parser;
use miette::Result;
use qsched::cli::{Cli, Commands};
use qsched::core::{logging, Verbosity};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    logging::init(Verbosity::from_flags(global.quiet, global.verbose));

    match cli.command {
        Commands::Generate(args) => qsched::cli::commands::generate::run(args, &global),
        Commands::Extract(args) => qsched::cli::commands::extract::run(args, &global),
        Commands::Resolve(args) => qsched::cli::commands::resolve::run(args, &global),
        Commands::Countries => qsched::cli::commands::countries::run(&global),
        Commands::Batch(args) => qsched::cli::commands::batch::run(args, &global),
        Commands::Config(cmd) => qsched::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => qsched::cli::commands::completions::run(args),
    }
}
