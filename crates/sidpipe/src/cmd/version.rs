use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("sidpipe {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: sidpipe");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SIDPIPE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("buffer_size: {}", sidpipe_frame::BUFFER_SIZE);
    println!("max_content_length: {}", sidpipe_frame::MAX_CONTENT_LENGTH);
    println!("max_samples: {}", sidpipe_proto::MAX_SAMPLES);

    Ok(SUCCESS)
}
