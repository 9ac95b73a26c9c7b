use looperd::{LooperError, daemon};

fn main() -> Result<(), LooperError> {
    daemon::start().inspect_err(|err| eprintln!("{err}"))
}
