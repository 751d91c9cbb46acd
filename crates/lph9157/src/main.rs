use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(target_os = "linux")]
fn main() -> ExitCode {
	let (args, _guard) = match lph9157::args() {
		Ok(args) => args,
		Err(err) => return err.exit(),
	};

	match lph9157::run(args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => err.exit(),
	}
}

#[cfg(not(target_os = "linux"))]
fn main() -> ExitCode {
	eprintln!("lph9157 only runs on Linux");
	ExitCode::from(1)
}
