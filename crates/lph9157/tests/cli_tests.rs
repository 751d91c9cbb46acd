#![cfg(target_os = "linux")]

#[test]
fn cli_tests() {
	let cases = trycmd::TestCases::new();
	cases
		.env("RUST_LOG", "warn")
		.env("NO_COLOR", "1")
		.case("tests/cmd/*.toml");

	cases.run();
}
