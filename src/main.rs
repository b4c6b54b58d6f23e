//! shiftledger main entrypoint.

use shiftledger::run;

fn main() {
    if let Err(e) = run() {
        shiftledger::ui::messages::error(&e);
        std::process::exit(1);
    }
}
