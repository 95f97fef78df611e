use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("specwire {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!(
        "target: {}",
        option_env!("SPECWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("os: {}", std::env::consts::OS);
    println!("arch: {}", std::env::consts::ARCH);
    println!(
        "wire: sentinel={:#04x} word_interval={:?} settle={:?} baud={}",
        specwire::frame::SENTINEL,
        specwire::frame::DEFAULT_WORD_INTERVAL,
        specwire::transport::DEFAULT_SETTLE_DELAY,
        specwire::transport::DEFAULT_BAUD_RATE
    );

    Ok(SUCCESS)
}
