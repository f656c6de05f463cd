use clap::Parser;
use miette::{miette, Result};
use oracle::{
    cli::OracleCli,
    markup::Renderer,
    repl::Repl,
    save::SaveStore,
    theme::Themes,
};

fn main() -> Result<()> {
    let cli = OracleCli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level)
        .init();

    let theme = match &cli.themes_file {
        Some(path) => Themes::load(path),
        None => Ok(Themes::builtin()),
    }
    .and_then(|themes| themes.select(&cli.theme))
    .map_err(|e| miette!("{e:#}"))?;

    let repl = Repl::new(
        Renderer::new(theme, cli.plain),
        SaveStore::new(cli.saves_dir),
        cli.debug,
    );

    if !cli.no_boot {
        repl.boot();
    }

    repl.run()
}
