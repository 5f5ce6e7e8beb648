use env_logger::{Builder, Env};
use fieldsync::commands::{Command, USAGE};
use log::error;
use std::env;
use std::io::{self, Write as _};
use std::process::exit;

fn main() {
    let _log_init: Result<(), _> = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn"))
        .is_test(false)
        .try_init();
    let command = match Command::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            error!("{err}");
            let _written: io::Result<()> = writeln!(io::stderr().lock(), "{USAGE}");
            exit(2);
        }
    };
    match command.run() {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(err) = writeln!(stdout, "{output}") {
                error!("failed to write output: {err}");
                exit(1);
            }
        }
        Err(err) => {
            error!("error: {err:#}");
            exit(1);
        }
    }
}
