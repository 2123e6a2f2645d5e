use std::io::Write;

use anyhow::Context;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = ledgerlab::Config::default();
    let mut rng = rand::thread_rng();
    let contents =
        ledgerlab::generate(&config, &mut rng).context("ledger generation failed")?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(contents.as_bytes())
        .context("failed writing the ledger to stdout")?;
    Ok(())
}
