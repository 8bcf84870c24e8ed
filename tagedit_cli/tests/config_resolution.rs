mod common;

use common::PRODUCT;
use similar_asserts::assert_eq;
use tagedit_core::AnyEmptyResult;

#[test]
fn data_dir_comes_from_the_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;
	std::fs::write(tmp.path().join("tagedit.toml"), "data_dir = \"fixtures\"\n")?;
	std::fs::create_dir(tmp.path().join("fixtures"))?;
	std::fs::write(tmp.path().join("fixtures").join("price.rb"), "    7\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("product.rb")
		.arg("1")
		.arg("--from-data")
		.arg("price.rb")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("product.rb"))?,
		"class Product\n  def price\n    7\n  end\nend\n"
	);

	Ok(())
}

#[test]
fn dot_config_directory_is_discovered() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;
	std::fs::create_dir(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config").join("tagedit.toml"),
		"data_dir = \"snippets\"\n\n[persist]\npoll_interval_ms = 10\nmax_attempts = 3\n",
	)?;
	std::fs::create_dir(tmp.path().join("snippets"))?;
	std::fs::write(tmp.path().join("snippets").join("price.rb"), "    9\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("product.rb")
		.arg("1")
		.arg("--from-data")
		.arg("price.rb")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("product.rb"))?,
		"class Product\n  def price\n    9\n  end\nend\n"
	);

	Ok(())
}

#[test]
fn missing_data_file_fails_the_script() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("product.rb")
		.arg("1")
		.arg("--from-data")
		.arg("absent.rb")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("failed to read data file"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("product.rb"))?, PRODUCT);

	Ok(())
}

#[test]
fn invalid_config_is_a_hard_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;
	std::fs::write(tmp.path().join("tagedit.toml"), "data_dir = [\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("show")
		.arg("product.rb")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("tagedit::config_parse"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("product.rb"))?, PRODUCT);

	Ok(())
}
