use assert_cmd::Command;

pub fn tagedit_cmd() -> Command {
	let mut cmd = Command::cargo_bin("tagedit").unwrap_or_else(|e| panic!("tagedit binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("TAGEDIT_LOG");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub const PRODUCT: &str = "class Product\n  def price\n    1\n  end\nend\n";
