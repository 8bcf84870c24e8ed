mod common;

use common::PRODUCT;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use similar_asserts::assert_eq;
use tagedit_core::AnyEmptyResult;

#[test]
fn show_renders_only_the_tagged_excerpt() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let content = "#START:body\nx = 1\n#END:body\ny = 2\n";
	std::fs::write(tmp.path().join("app.rb"), content)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("show")
		.arg("app.rb")
		.arg("--tag")
		.arg("body")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("  x = 1"))
		.stdout(predicates::str::contains("y = 2").not())
		.stdout(predicates::str::contains("START").not());

	assert_eq!(std::fs::read_to_string(tmp.path().join("app.rb"))?, content);

	Ok(())
}

#[test]
fn edit_replaces_and_highlights_a_literal_line() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("product.rb")
		.arg("1")
		.arg("--replace")
		.arg("    2")
		.arg("--highlight")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(">     2"))
		.stdout(predicates::str::contains("  class Product"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("product.rb"))?,
		"class Product\n  def price\n#START_HIGHLIGHT\n    2\n#END_HIGHLIGHT\n  end\nend\n"
	);

	Ok(())
}

#[test]
fn edit_accepts_a_pattern_target() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("product.rb")
		.arg(r"(?m)^ +\d+$")
		.arg("--pattern")
		.arg("--replace")
		.arg("    3")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("product.rb"))?,
		"class Product\n  def price\n    3\n  end\nend\n"
	);

	Ok(())
}

#[test]
fn edit_reports_a_missing_target_after_rendering() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("product.rb")
		.arg("discount")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("  class Product"))
		.stderr(predicates::str::contains("pattern not matched"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("product.rb"))?, PRODUCT);

	Ok(())
}

#[test]
fn edit_reads_replacement_from_the_data_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;
	std::fs::create_dir(tmp.path().join("data"))?;
	std::fs::write(tmp.path().join("data").join("price.rb"), "    42\n")?;

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
		.success()
		.stdout(predicates::str::contains(">     42"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("product.rb"))?,
		"class Product\n  def price\n    42\n  end\nend\n"
	);

	Ok(())
}

#[test]
fn declaration_marks_the_block_for_later_excerpts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("declaration")
		.arg("product.rb")
		.arg("price")
		.arg("--mark")
		.arg("pricing")
		.arg("--tag")
		.arg("pricing")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("    def price"))
		.stdout(predicates::str::contains("class Product").not());

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("product.rb"))?,
		"class Product\n#START:pricing\n  def price\n    1\n  end\n#END:pricing\nend\n"
	);

	Ok(())
}

#[test]
fn sub_replaces_the_first_capture_group() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("version.rb"), "VERSION = '1.0'\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("sub")
		.arg("version.rb")
		.arg("VERSION = '([^']+)'")
		.arg("2.0")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("> VERSION = '2.0'"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("version.rb"))?,
		"VERSION = '2.0'\n"
	);

	Ok(())
}

#[test]
fn sub_optional_leaves_the_file_alone_without_a_match() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("version.rb"), "VERSION = '1.0'\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("sub")
		.arg("version.rb")
		.arg("RELEASE = '([^']+)'")
		.arg("2.0")
		.arg("--optional")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("  VERSION = '1.0'"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("version.rb"))?,
		"VERSION = '1.0'\n"
	);

	Ok(())
}

#[test]
fn sub_without_a_capture_group_fails_the_script() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("version.rb"), "VERSION = '1.0'\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("sub")
		.arg("version.rb")
		.arg("VERSION")
		.arg("RELEASE")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("has no capturing group"));

	Ok(())
}

#[test]
fn clear_removes_every_sentinel_line() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("product.rb"),
		"class Product\n#START:pricing\n#START_HIGHLIGHT\n  def price\n    1\n  \
		 end\n#END_HIGHLIGHT\n#END:pricing\nend\n",
	)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("clear")
		.arg("product.rb")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(std::fs::read_to_string(tmp.path().join("product.rb"))?, PRODUCT);

	Ok(())
}

#[test]
fn clear_highlights_only_keeps_tags() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("app.css"),
		"/* START_HIGHLIGHT */\n.button {\n/* END_HIGHLIGHT */\n<!-- START:nav -->\n<nav>\n<!-- \
		 END:nav -->\n",
	)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("clear")
		.arg("app.css")
		.arg("--highlights-only")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("app.css"))?,
		".button {\n<!-- START:nav -->\n<nav>\n<!-- END:nav -->\n"
	);

	Ok(())
}

#[test]
fn json_format_lists_styled_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let output = cmd
		.arg("edit")
		.arg("product.rb")
		.arg("1")
		.arg("--replace")
		.arg("    2")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(true));
	assert_eq!(json["lines"][0]["style"], "command");
	assert_eq!(json["lines"][1]["text"], "class Product");
	assert_eq!(json["lines"][1]["style"], "unchanged");
	assert_eq!(json["lines"][3]["text"], "    2");
	assert_eq!(json["lines"][3]["style"], "highlighted");
	assert_eq!(json["errors"], Value::Array(vec![]));

	Ok(())
}

#[test]
fn missing_subcommand_prints_usage_hint() {
	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.assert()
		.code(1)
		.stderr(predicates::str::contains("tagedit --help"));
}

#[test]
fn edit_expands_a_wildcard_file_to_its_first_match() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let models = tmp.path().join("app").join("models");
	std::fs::create_dir_all(&models)?;
	std::fs::write(models.join("product.rb"), PRODUCT)?;
	std::fs::write(models.join("user.rb"), "class User\n  def price\n    1\n  end\nend\n")?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("edit")
		.arg("app/models/*.rb")
		.arg("1")
		.arg("--replace")
		.arg("    2")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("product.rb"));

	assert_eq!(
		std::fs::read_to_string(models.join("product.rb"))?,
		"class Product\n  def price\n    2\n  end\nend\n"
	);
	assert_eq!(
		std::fs::read_to_string(models.join("user.rb"))?,
		"class User\n  def price\n    1\n  end\nend\n"
	);
	assert!(!models.join("*.rb").exists());

	Ok(())
}

#[test]
fn wildcard_without_a_match_is_used_literally() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("show")
		.arg("*.rb")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("*.rb").is_file());

	Ok(())
}

#[test]
fn edit_rejects_a_tag_name_with_whitespace() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("product.rb"), PRODUCT)?;

	let mut cmd = common::tagedit_cmd();
	let _ = cmd
		.arg("declaration")
		.arg("product.rb")
		.arg("price")
		.arg("--mark")
		.arg("my tag")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("invalid tag name `my tag`"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("product.rb"))?, PRODUCT);

	Ok(())
}
