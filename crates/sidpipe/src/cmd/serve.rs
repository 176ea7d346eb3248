use sidpipe_player::{Dispatcher, PsidEngine};
use tracing::info;

use crate::cmd::ServeArgs;
use crate::exit::{dispatch_error, CliResult, SUCCESS};

pub fn run(_args: ServeArgs) -> CliResult<i32> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    let mut dispatcher = Dispatcher::new(PsidEngine::new());
    dispatcher
        .run(&mut input, &mut output)
        .map_err(|err| dispatch_error("serve", err))?;

    info!("client closed the session");
    Ok(SUCCESS)
}
