mod command;
mod model;
mod plot;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
