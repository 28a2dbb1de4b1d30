use std::process::ExitCode;

use clap::Arg;
use clibuild::{validate_descriptor, Command, Error, Platform, Usage};
use serde_json::json;

mod version;

fn example_flags() -> clap::Command {
    clap::Command::new("example_flag_set").arg(
        Arg::new("example")
            .long("example")
            .env("EXAMPLE")
            .default_value("")
            .help("Example flag cli option"),
    )
}

fn example_command(input: &str, example_flag: &str) -> clibuild::Result<()> {
    // Built with json! so quotes in the input cannot break the descriptor.
    let descriptor = json!([
        {"name": "input", "value": input, "validate": ["NotEmpty"]}
    ]);
    validate_descriptor(&descriptor.to_string())?;

    if input == "show-error" {
        return Err(Error::internal_unexpected(
            "this is what an execution error looks like from the CLI",
        ));
    }

    println!("Input: {}\nFlags: {}", input, example_flag);
    Ok(())
}

fn main() -> ExitCode {
    // Commands are verb-then-noun. Each lists the platforms it runs on.
    let commands = vec![Command::new(
        "run",
        "example",
        &[Platform::Linux, Platform::MacOs, Platform::Windows],
        |inv| {
            let usage = Usage::new(
                "clibuild run example [INPUT] [FLAGS]",
                "Example CLI command. Demonstrates an error when [INPUT] is 'show-error'",
            )
            .with_flags(example_flags());

            let parsed = inv.should_have_args(1, &usage)?;
            let example_flag = parsed.flag("example").unwrap_or_default();

            usage.handle(example_command(
                parsed.positional(0).unwrap_or_default(),
                example_flag,
            ))
        },
    )];

    clibuild::run("clibuild", version::VERSION, commands)
}
