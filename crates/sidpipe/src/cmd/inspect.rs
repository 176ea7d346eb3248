use sidpipe_player::PsidTune;

use crate::cmd::InspectArgs;
use crate::exit::{io_error, tune_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_tune, OutputFormat, TuneOutput};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let context = args.path.display().to_string();
    let bytes = std::fs::read(&args.path).map_err(|err| io_error(&context, err))?;
    let tune = PsidTune::parse(&bytes).map_err(|err| tune_error(&context, err))?;

    let subsong = args.subsong.unwrap_or_else(|| tune.start_song());
    let info = tune
        .song_info(subsong)
        .filter(|_| subsong != 0)
        .ok_or_else(|| {
            CliError::new(
                USAGE,
                format!("subsong {subsong} out of range (1..={})", tune.songs()),
            )
        })?;

    print_tune(&TuneOutput::new(&args.path, &tune, subsong, &info), format);
    Ok(SUCCESS)
}
