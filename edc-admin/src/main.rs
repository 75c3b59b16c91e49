use colored::Colorize;
use commands::command_argument_builder;
use edc_admin::handlers::{handle_directive, handle_resolve, handle_routes};
use tracing::Level;

mod commands;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("resolve", primary_command)) => handle_resolve(primary_command),
        Some(("routes", primary_command)) => handle_routes(primary_command),
        Some(("directive", primary_command)) => handle_directive(primary_command),
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn print_banner() {
    println!(
        "{} {}",
        "edc-admin".bright_blue().bold(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
