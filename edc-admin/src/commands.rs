use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("edc-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("edc-admin")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log each redirect decision")
                .required(false)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand_required(false)
        .subcommand(
            command!("resolve")
                .about(
                    "Dry-run the post-save redirect for a querystring against a configured \
                admin site.",
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(true)
                        .help("Path to the admin site JSON configuration"),
                )
                .arg(
                    arg!(-Q --"query" <QUERYSTRING>)
                        .required(false)
                        .help("The request querystring, e.g. 'next=dashboard_url,subject_identifier&subject_identifier=101-001'")
                        .default_value(""),
                )
                .arg(
                    arg!(-m --"model" <LABEL>)
                        .required(false)
                        .help("Label of the model just saved, e.g. edc_example.crfone"),
                )
                .arg(
                    arg!(--"visit-id" <UUID>)
                        .required(false)
                        .help("Visit the saved record belongs to")
                        .value_parser(clap::value_parser!(uuid::Uuid))
                        .requires("model"),
                )
                .arg(
                    arg!(--"visit-attr" <NAME>)
                        .required(false)
                        .help("Name of the visit attribute on the saved record")
                        .default_value("subject_visit"),
                )
                .arg(
                    arg!(--"visit-code" <CODE>)
                        .required(false)
                        .help("Visit code, selects the visit's own form sequence"),
                )
                .arg(
                    arg!(--"panel" <NAME>)
                        .required(false)
                        .help("Panel of the saved record, for requisitions"),
                )
                .arg(
                    arg!(--"cancel")
                        .required(false)
                        .help("Simulate the Cancel button")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("save-next"),
                )
                .arg(
                    arg!(--"save-next")
                        .required(false)
                        .help("Simulate the Save next button")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("cancel"),
                ),
        )
        .subcommand(
            command!("routes")
                .about("List the routes of a configured admin site")
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(true)
                        .help("Path to the admin site JSON configuration"),
                ),
        )
        .subcommand(
            command!("directive")
                .about("Show the route and kwargs a querystring's next directive resolves to")
                .arg(arg!(<QUERYSTRING>).required(true).help("The request querystring"))
                .arg(
                    arg!(-a --"attr" <NAME>)
                        .required(false)
                        .help("Querystring attribute holding the directive")
                        .default_value("next"),
                ),
        )
}
